use crate::btree::node_cache::NodeCache;
use crate::error::BtError;

//-------------------------------------------------------------------------

/// In-order dump of the whole tree as `(key, value)` pairs.
pub fn inorder(cache: &mut NodeCache, root_id: u64) -> Result<Vec<(u64, u64)>, BtError> {
    let mut out = Vec::new();
    inorder_into(cache, root_id, &mut out)?;
    Ok(out)
}

fn inorder_into(
    cache: &mut NodeCache,
    node_id: u64,
    out: &mut Vec<(u64, u64)>,
) -> Result<(), BtError> {
    if node_id == 0 {
        return Ok(());
    }

    // Clone the small fixed arrays out so the recursive descent into a
    // child doesn't need to hold a borrow of this node across the call.
    let (keys, values, children) = {
        let node = cache.get(node_id)?;
        (node.keys.clone(), node.values.clone(), node.children.clone())
    };

    for i in 0..keys.len() {
        if let Some(&child) = children.get(i) {
            if child != 0 {
                inorder_into(cache, child, out)?;
            }
        }
        out.push((keys[i], values[i]));
    }

    if let Some(&last_child) = children.get(keys.len()) {
        if last_child != 0 {
            inorder_into(cache, last_child, out)?;
        }
    }

    Ok(())
}

//-------------------------------------------------------------------------

use tracing::debug;

use crate::btree::node::{Node, T};
use crate::btree::node_cache::NodeCache;
use crate::error::BtError;
use crate::header::Allocator;

//-------------------------------------------------------------------------

/// Splits `parent.children[i]`, which must be full (`2T - 1` keys), into
/// two nodes of `T - 1` keys each, promoting the median key/value into
/// `parent` at position `i` and inserting the new right sibling's block
/// id at `i + 1`.
pub fn split_child(
    alloc: &mut Allocator,
    cache: &mut NodeCache,
    parent_id: u64,
    i: usize,
) -> Result<(), BtError> {
    let full_id = cache.get(parent_id)?.children[i];
    let new_id = alloc.allocate()?;

    let (median_key, median_val, right_keys, right_vals, right_children, full_is_leaf) = {
        let full = cache.get(full_id)?;
        debug_assert_eq!(
            full.keys.len(),
            2 * T - 1,
            "split_child called on a non-full node"
        );
        let full_is_leaf = full.is_leaf();

        let right_keys = full.keys.split_off(T);
        let right_vals = full.values.split_off(T);
        let median_key = full.keys.pop().expect("full node has a median key");
        let median_val = full.values.pop().expect("full node has a median value");
        let right_children = if full_is_leaf {
            Vec::new()
        } else {
            full.children.split_off(T)
        };
        full.dirty = true;

        (
            median_key,
            median_val,
            right_keys,
            right_vals,
            right_children,
            full_is_leaf,
        )
    };

    let new_node = Node {
        block_id: new_id,
        parent_id,
        keys: right_keys,
        values: right_vals,
        children: right_children.clone(),
        dirty: true,
    };
    cache.put(new_node)?;

    if !full_is_leaf {
        for &child_id in &right_children {
            let child = cache.get(child_id)?;
            child.parent_id = new_id;
            child.dirty = true;
        }
    }

    {
        let parent = cache.get(parent_id)?;
        parent.keys.insert(i, median_key);
        parent.values.insert(i, median_val);
        parent.children.insert(i + 1, new_id);
        parent.dirty = true;
    }

    debug!(parent_id, full_id, new_id, median_key, "split child");
    Ok(())
}

//-------------------------------------------------------------------------

use crate::btree::node_cache::NodeCache;
use crate::error::BtError;

//-------------------------------------------------------------------------

/// Point lookup. Returns `None` if the tree is empty or `key` isn't
/// present; otherwise the value stored alongside the first matching key
/// encountered along the descent (relevant only for duplicate keys, see
/// the design notes on first-write-wins).
pub fn search(cache: &mut NodeCache, root_id: u64, key: u64) -> Result<Option<u64>, BtError> {
    if root_id == 0 {
        return Ok(None);
    }

    let mut node_id = root_id;
    loop {
        let node = cache.get(node_id)?;
        let i = node.lower_bound(key);

        if i < node.keys.len() && node.keys[i] == key {
            return Ok(Some(node.values[i]));
        }

        if node.is_leaf() {
            return Ok(None);
        }

        let child_id = node.children[i];
        if child_id == 0 {
            return Err(BtError::Corrupt(node_id));
        }
        node_id = child_id;
    }
}

//-------------------------------------------------------------------------

use std::collections::BTreeSet;

use crate::btree::node::{MAX_KEYS, MIN_KEYS};
use crate::btree::node_cache::NodeCache;
use crate::error::BtError;

//-------------------------------------------------------------------------

/// Walks the whole tree checking the invariants the design lays out:
/// `num_keys` within bounds, non-decreasing keys within a node (equal
/// adjacent keys are permitted; duplicate inserts coexist in the tree),
/// each non-leaf having exactly `num_keys + 1` non-zero children, and
/// every node visited exactly once (no cycles, no shared ownership).
/// Returns the total number of entries.
pub fn check(cache: &mut NodeCache, root_id: u64) -> Result<u64, BtError> {
    if root_id == 0 {
        return Ok(0);
    }
    let mut seen = BTreeSet::new();
    check_node(cache, root_id, 0, true, &mut seen)
}

fn check_node(
    cache: &mut NodeCache,
    node_id: u64,
    parent_id: u64,
    is_root: bool,
    seen: &mut BTreeSet<u64>,
) -> Result<u64, BtError> {
    if !seen.insert(node_id) {
        return Err(BtError::Corrupt(node_id));
    }

    let (keys, children) = {
        let node = cache.get(node_id)?;
        if node.parent_id != parent_id {
            return Err(BtError::Corrupt(node_id));
        }
        let n = node.num_keys();
        if n > MAX_KEYS {
            return Err(BtError::BadNumKeys(node_id, n as u64));
        }
        if !is_root && n < MIN_KEYS {
            return Err(BtError::Corrupt(node_id));
        }
        for w in node.keys.windows(2) {
            if w[0] > w[1] {
                return Err(BtError::Corrupt(node_id));
            }
        }
        let leaf = node.is_leaf();
        if !leaf && node.children.len() != n + 1 {
            return Err(BtError::Corrupt(node_id));
        }
        (
            node.keys.clone(),
            if leaf {
                Vec::new()
            } else {
                node.children.clone()
            },
        )
    };

    let mut total = keys.len() as u64;
    for &child_id in &children {
        if child_id == 0 {
            return Err(BtError::Corrupt(node_id));
        }
        total += check_node(cache, child_id, node_id, false, seen)?;
    }
    Ok(total)
}

//-------------------------------------------------------------------------

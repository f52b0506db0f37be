use tracing::trace;

use crate::btree::node::{Node, MAX_KEYS};
use crate::btree::node_cache::NodeCache;
use crate::btree::split::split_child;
use crate::error::BtError;
use crate::header::Allocator;

//-------------------------------------------------------------------------

/// Inserts `(key, value)` into the tree rooted at `root_id` (0 if empty),
/// preemptively splitting any full node on the way down, and returns the
/// (possibly new) root's block id. Does not flush or update the header;
/// the caller (the engine) does that once, after this returns, so the
/// persisted root is never written ahead of the node writes it depends on.
pub fn insert(
    alloc: &mut Allocator,
    cache: &mut NodeCache,
    root_id: u64,
    key: u64,
    value: u64,
) -> Result<u64, BtError> {
    if root_id == 0 {
        let id = alloc.allocate()?;
        let node = Node {
            block_id: id,
            parent_id: 0,
            keys: vec![key],
            values: vec![value],
            children: vec![],
            dirty: true,
        };
        cache.put(node)?;
        return Ok(id);
    }

    let root_full = cache.get(root_id)?.is_full();
    if !root_full {
        insert_non_full(alloc, cache, root_id, key, value)?;
        return Ok(root_id);
    }

    let new_root_id = alloc.allocate()?;
    {
        let old_root = cache.get(root_id)?;
        old_root.parent_id = new_root_id;
        old_root.dirty = true;
    }
    let new_root = Node {
        block_id: new_root_id,
        parent_id: 0,
        keys: vec![],
        values: vec![],
        children: vec![root_id],
        dirty: true,
    };
    cache.put(new_root)?;

    split_child(alloc, cache, new_root_id, 0)?;
    insert_non_full(alloc, cache, new_root_id, key, value)?;

    trace!(old_root = root_id, new_root = new_root_id, "root split");
    Ok(new_root_id)
}

/// Inserts into a node already known not to be full, descending (and
/// preemptively splitting full children) until it lands in a leaf.
fn insert_non_full(
    alloc: &mut Allocator,
    cache: &mut NodeCache,
    node_id: u64,
    key: u64,
    value: u64,
) -> Result<(), BtError> {
    let is_leaf = cache.get(node_id)?.is_leaf();

    if is_leaf {
        let node = cache.get(node_id)?;
        debug_assert!(node.keys.len() < MAX_KEYS);
        let pos = node.keys.partition_point(|&k| k <= key);
        node.keys.insert(pos, key);
        node.values.insert(pos, value);
        node.dirty = true;
        return Ok(());
    }

    let mut i = {
        let node = cache.get(node_id)?;
        node.lower_bound(key)
    };

    let child_full = {
        let child_id = cache.get(node_id)?.children[i];
        cache.get(child_id)?.is_full()
    };

    if child_full {
        split_child(alloc, cache, node_id, i)?;
        let parent_key_i = cache.get(node_id)?.keys[i];
        if key > parent_key_i {
            i += 1;
        }
    }

    let child_id = cache.get(node_id)?.children[i];
    insert_non_full(alloc, cache, child_id, key, value)
}

//-------------------------------------------------------------------------

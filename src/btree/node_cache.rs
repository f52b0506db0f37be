use tracing::trace;

use crate::block::{BlockDevice, BlockId};
use crate::btree::node::Node;
use crate::codec::{decode_node, encode_node};
use crate::error::BtError;

//-------------------------------------------------------------------------

/// A bounded, most-recently-used-at-tail cache of [`Node`]s, mediating all
/// node I/O for the B-tree engine.
///
/// Capacity is a deliberate stress on eviction correctness (the reference
/// capacity is 3). Entries are kept in a small `Vec` ordered by recency;
/// linear scan is fine at this size and keeps the eviction order trivially
/// auditable.
///
/// [`NodeCache::get`] returns `&mut Node` borrowed from `self`, so the
/// borrow checker enforces "callers must re-`get` after any operation that
/// may evict": you cannot hold a stale reference across a further cache
/// call.
pub struct NodeCache {
    device: BlockDevice,
    capacity: usize,
    entries: Vec<Node>,
}

impl NodeCache {
    pub fn new(device: BlockDevice, capacity: usize) -> Self {
        assert!(capacity >= 1, "cache capacity must be at least one");
        Self {
            device,
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    fn position(&self, block_id: BlockId) -> Option<usize> {
        self.entries.iter().position(|n| n.block_id == block_id)
    }

    /// Fetches a node, reading through the block device on a miss. Moves
    /// the entry to the most-recently-used position either way.
    pub fn get(&mut self, block_id: BlockId) -> Result<&mut Node, BtError> {
        if let Some(pos) = self.position(block_id) {
            let node = self.entries.remove(pos);
            self.entries.push(node);
        } else {
            let buf = self.device.read_block(block_id)?;
            let node = decode_node(&buf)?;
            trace!(block_id, "cache miss, read through");
            self.entries.push(node);
            self.evict_excess()?;
        }
        Ok(self
            .entries
            .last_mut()
            .expect("the entry just placed at the tail"))
    }

    /// Installs `node` at the most-recently-used position, replacing any
    /// existing entry for the same block id without writing it back (the
    /// caller is supplying the new authoritative state).
    pub fn put(&mut self, node: Node) -> Result<(), BtError> {
        if let Some(pos) = self.position(node.block_id) {
            self.entries.remove(pos);
        }
        self.entries.push(node);
        self.evict_excess()
    }

    fn evict_excess(&mut self) -> Result<(), BtError> {
        while self.entries.len() > self.capacity {
            let victim = self.entries.remove(0);
            if victim.dirty {
                trace!(block_id = victim.block_id, "evicting dirty node");
                self.device.write_block(victim.block_id, &encode_node(&victim))?;
            }
        }
        Ok(())
    }

    /// Writes back every dirty node and clears the cache.
    pub fn flush(&mut self) -> Result<(), BtError> {
        for node in self.entries.drain(..) {
            if node.dirty {
                self.device.write_block(node.block_id, &encode_node(&node))?;
            }
        }
        Ok(())
    }
}

//-------------------------------------------------------------------------

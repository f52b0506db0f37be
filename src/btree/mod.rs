use std::path::Path;

use tracing::info;

use crate::block::BlockDevice;
use crate::btree::node_cache::NodeCache;
use crate::error::BtError;
use crate::header::Allocator;

pub mod check;
pub mod insert;
pub mod lookup;
pub mod node;
pub mod node_cache;
mod split;
pub mod traverse;

//-------------------------------------------------------------------------

/// The reference cache capacity: a deliberate stress on eviction
/// correctness (see the node cache's own doc comment).
pub const CACHE_CAPACITY: usize = 3;

/// A persistent, disk-resident B-tree index bound to one open file.
///
/// Owns the allocator/header manager and the node cache, each with its
/// own [`BlockDevice`] handle onto the same path. The allocator reads and
/// writes the header independently of whatever the node cache is doing
/// with node blocks.
pub struct BTreeIndex {
    alloc: Allocator,
    cache: NodeCache,
}

impl BTreeIndex {
    /// Creates a new index file with an empty tree. Fails if it exists.
    pub fn create(path: impl AsRef<Path>) -> Result<(), BtError> {
        Allocator::init(path)?;
        Ok(())
    }

    /// Opens an existing index file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BtError> {
        let path = path.as_ref();
        let alloc = Allocator::open(path)?;
        let device = BlockDevice::open_existing(path)?;
        let cache = NodeCache::new(device, CACHE_CAPACITY);
        Ok(Self { alloc, cache })
    }

    pub fn root(&self) -> u64 {
        self.alloc.root()
    }

    /// Point lookup; does not mutate the file.
    pub fn search(&mut self, key: u64) -> Result<Option<u64>, BtError> {
        lookup::search(&mut self.cache, self.alloc.root(), key)
    }

    /// Inserts one pair. Splits propagate top-down as needed. All node
    /// writes are flushed before the header's root is updated, so a
    /// crash never leaves the persisted root pointing past un-flushed
    /// blocks.
    pub fn insert(&mut self, key: u64, value: u64) -> Result<(), BtError> {
        let old_root = self.alloc.root();
        let new_root = insert::insert(&mut self.alloc, &mut self.cache, old_root, key, value)?;

        self.cache.flush()?;
        if new_root != old_root {
            self.alloc.set_root(new_root)?;
        }

        info!(key, value, root = new_root, "inserted pair");
        Ok(())
    }

    /// In-order dump of every stored pair; does not mutate the file.
    pub fn inorder(&mut self) -> Result<Vec<(u64, u64)>, BtError> {
        traverse::inorder(&mut self.cache, self.alloc.root())
    }

    /// Verifies the on-disk invariants (key ordering, bounds, parent
    /// linkage) and returns the number of entries found.
    pub fn check(&mut self) -> Result<u64, BtError> {
        check::check(&mut self.cache, self.alloc.root())
    }
}

//-------------------------------------------------------------------------

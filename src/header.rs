use std::path::Path;

use tracing::{debug, trace};

use crate::block::{BlockDevice, BlockId};
use crate::btree::node::Node;
use crate::codec::{decode_header, encode_header, encode_node, Header};
use crate::error::BtError;

//-------------------------------------------------------------------------

/// Owns the file header: magic, root block id, next-free block id.
///
/// Reads and writes the header directly through its own [`BlockDevice`],
/// independently of the node cache. The header is small, hot, and is
/// persisted on its own schedule (after every allocation, and after a
/// root change), not whenever the node cache happens to flush.
pub struct Allocator {
    device: BlockDevice,
    root: BlockId,
    next: BlockId,
}

impl Allocator {
    /// Creates a new index file with an empty tree. Fails if the file
    /// already exists.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, BtError> {
        let device = BlockDevice::create_new(path)?;
        let header = Header { root: 0, next: 1 };
        device.write_block(0, &encode_header(&header))?;
        Ok(Self {
            device,
            root: 0,
            next: 1,
        })
    }

    /// Opens an existing index file and validates its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BtError> {
        let path = path.as_ref();
        let device = BlockDevice::open_existing(path)?;
        let buf = device.read_block(0)?;
        let header = decode_header(&buf).map_err(|e| match e {
            BtError::BadMagic(_) => BtError::BadMagic(path.display().to_string()),
            other => other,
        })?;
        Ok(Self {
            device,
            root: header.root,
            next: header.next,
        })
    }

    pub fn root(&self) -> BlockId {
        self.root
    }

    pub fn next(&self) -> BlockId {
        self.next
    }

    fn persist(&self) -> Result<(), BtError> {
        let header = Header {
            root: self.root,
            next: self.next,
        };
        self.device.write_block(0, &encode_header(&header))
    }

    /// Returns `next`, increments it, persists the header, then writes an
    /// all-zero, self-identifying node skeleton at the new block so that
    /// any later read of it (even after a crash) is well-formed.
    pub fn allocate(&mut self) -> Result<BlockId, BtError> {
        let id = self.next;
        self.next += 1;
        self.persist()?;

        let skeleton = Node::empty(id);
        self.device.write_block(id, &encode_node(&skeleton))?;

        trace!(block_id = id, next = self.next, "allocated block");
        Ok(id)
    }

    /// Updates the root and persists the header. Callers must ensure all
    /// node writes for the current command have already been flushed, so
    /// that the persisted root never outruns the blocks it reaches.
    pub fn set_root(&mut self, block_id: BlockId) -> Result<(), BtError> {
        self.root = block_id;
        self.persist()?;
        debug!(new_root = block_id, "updated root");
        Ok(())
    }
}

//-------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn scratch_path() -> std::path::PathBuf {
        let f = NamedTempFile::new().unwrap();
        let path = f.path().to_path_buf();
        // drop the handle and the file so `init` can create_new it
        drop(f);
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn init_starts_with_empty_tree() {
        let path = scratch_path();
        let alloc = Allocator::init(&path).unwrap();
        assert_eq!(alloc.root(), 0);
        assert_eq!(alloc.next(), 1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn init_fails_if_file_exists() {
        let path = scratch_path();
        Allocator::init(&path).unwrap();
        assert!(matches!(
            Allocator::init(&path),
            Err(BtError::FileExists(_))
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn open_fails_if_file_missing() {
        let path = scratch_path();
        assert!(matches!(
            Allocator::open(&path),
            Err(BtError::FileNotFound(_))
        ));
    }

    #[test]
    fn allocate_increments_next_and_persists() {
        let path = scratch_path();
        let mut alloc = Allocator::init(&path).unwrap();
        let a = alloc.allocate().unwrap();
        let b = alloc.allocate().unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(alloc.next(), 3);

        drop(alloc);
        let reopened = Allocator::open(&path).unwrap();
        assert_eq!(reopened.next(), 3);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn set_root_persists_across_reopen() {
        let path = scratch_path();
        let mut alloc = Allocator::init(&path).unwrap();
        let id = alloc.allocate().unwrap();
        alloc.set_root(id).unwrap();
        drop(alloc);

        let reopened = Allocator::open(&path).unwrap();
        assert_eq!(reopened.root(), id);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn open_rejects_corrupted_magic() {
        let path = scratch_path();
        Allocator::init(&path).unwrap();
        {
            use std::io::{Seek, SeekFrom, Write};
            let mut f = std::fs::OpenOptions::new()
                .write(true)
                .open(&path)
                .unwrap();
            f.seek(SeekFrom::Start(0)).unwrap();
            f.write_all(&[0u8; 8]).unwrap();
        }
        assert!(matches!(Allocator::open(&path), Err(BtError::BadMagic(_))));
        let _ = std::fs::remove_file(&path);
    }
}

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::os::unix::fs::FileExt;
use std::path::Path;

use crate::error::BtError;

//-------------------------------------------------------------------------

/// Every block, header or node, is exactly this many bytes on disk.
pub const BLOCK_SIZE: usize = 512;

/// Zero-based block identifier. Block 0 is always the header; node blocks
/// start at 1.
pub type BlockId = u64;

/// Positioned whole-block I/O against the index file.
///
/// A `BlockDevice` holds a single open file handle for the lifetime of a
/// command and performs positioned reads/writes against it (`pread`/
/// `pwrite` via `FileExt`), rather than opening and seeking per call.
pub struct BlockDevice {
    file: File,
}

impl BlockDevice {
    /// Creates a brand new index file. Fails if one already exists at `path`.
    pub fn create_new(path: impl AsRef<Path>) -> Result<Self, BtError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => BtError::FileExists(path.display().to_string()),
                _ => BtError::Io(e),
            })?;
        Ok(Self { file })
    }

    /// Opens an existing index file. Fails if it does not exist.
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Self, BtError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => BtError::FileNotFound(path.display().to_string()),
                _ => BtError::Io(e),
            })?;
        Ok(Self { file })
    }

    /// Reads the whole block at `block_id`. A short read is a fatal error.
    pub fn read_block(&self, block_id: BlockId) -> Result<[u8; BLOCK_SIZE], BtError> {
        let mut buf = [0u8; BLOCK_SIZE];
        let offset = block_id
            .checked_mul(BLOCK_SIZE as u64)
            .expect("block id overflowed file offset");
        self.file
            .read_exact_at(&mut buf, offset)
            .map_err(|e| match e.kind() {
                ErrorKind::UnexpectedEof => BtError::ShortBlock(block_id),
                _ => BtError::Io(e),
            })?;
        Ok(buf)
    }

    /// Writes the whole block at `block_id`, extending the file if the
    /// write lands past the current end-of-file.
    pub fn write_block(&self, block_id: BlockId, buf: &[u8; BLOCK_SIZE]) -> Result<(), BtError> {
        let offset = block_id
            .checked_mul(BLOCK_SIZE as u64)
            .expect("block id overflowed file offset");
        self.file.write_all_at(buf, offset)?;
        Ok(())
    }
}

//-------------------------------------------------------------------------

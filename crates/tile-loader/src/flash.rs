//! Flash read abstraction.
//!
//! The loader only ever issues whole-buffer reads at explicit offsets, so
//! the boundary is a single trait method. Two stores are provided: a
//! `Bytes`-backed store for tests and the simulated bus, and a file-backed
//! store for flash image files.

use crate::error::{LoadError, Result};
use bytes::Bytes;
use std::fs::File;
use std::path::Path;

/// Random-access read over a flash device.
pub trait FlashRead {
    /// Fill `buf` with `buf.len()` bytes starting at `offset`.
    ///
    /// Partial reads are not part of the contract; any shortfall is an
    /// error and aborts the transfer in progress.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::FlashRead`] if the range cannot be read.
    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<()>;
}

/// In-memory flash store.
///
/// `Bytes` keeps clones cheap when the same image backs several tests.
#[derive(Debug, Clone)]
pub struct MemFlash {
    data: Bytes,
}

impl MemFlash {
    /// Wrap a byte image as a flash store.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Total flash size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl FlashRead for MemFlash {
    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let start = usize::try_from(offset)
            .map_err(|_| LoadError::flash_read(offset, "offset exceeds address space"))?;
        let end = start
            .checked_add(buf.len())
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| LoadError::flash_read(offset, "read past end of flash"))?;
        buf.copy_from_slice(&self.data[start..end]);
        Ok(())
    }
}

/// Flash store backed by an image file on disk.
#[derive(Debug)]
pub struct FileFlash {
    file: File,
}

impl FileFlash {
    /// Open a flash image file read-only.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self { file })
    }
}

impl FlashRead for FileFlash {
    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        use std::os::unix::fs::FileExt;
        self.file
            .read_exact_at(buf, offset)
            .map_err(|e| LoadError::flash_read(offset, e.to_string()))
    }
}

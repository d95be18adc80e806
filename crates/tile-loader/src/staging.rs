//! Fixed-capacity staging buffer.
//!
//! One scratch buffer shuttles bytes between flash and the tile bus. It is
//! owned by exactly one in-flight transfer (`&mut` borrow), zero-filled
//! before every chunk read so a short final chunk never exposes stale bytes,
//! and released on every exit path by `Drop`.

use crate::error::{LoadError, Result};

/// Default staging capacity in bytes. Fixed at compile time.
pub const STAGING_CAPACITY: usize = 4096;

/// Alignment of the buffer backing in bytes.
pub const STAGING_ALIGN: usize = 4;

/// Fixed-capacity, 4-byte-aligned scratch buffer.
#[derive(Debug)]
pub struct StagingBuffer {
    /// u32 backing guarantees [`STAGING_ALIGN`] alignment.
    words: Vec<u32>,
    len: usize,
}

impl StagingBuffer {
    /// Allocate a buffer of the default [`STAGING_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(STAGING_CAPACITY).expect("default capacity is non-zero")
    }

    /// Allocate a buffer of `capacity` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidArgument`] for a zero capacity. This is
    /// checked before any I/O is attempted.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(LoadError::invalid_argument("staging capacity must be non-zero"));
        }
        Ok(Self {
            words: vec![0u32; capacity.div_ceil(4)],
            len: capacity,
        })
    }

    /// Buffer capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.len
    }

    /// Zero the whole buffer.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// View the buffer contents.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: words is a live Vec<u32> holding at least len bytes;
        // casting u32 storage to u8 only lowers the alignment requirement
        // and every byte is initialized (vec![0u32; ..] + fill writes).
        unsafe { std::slice::from_raw_parts(self.words.as_ptr().cast::<u8>(), self.len) }
    }

    /// View the buffer contents mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as as_slice, and the &mut self borrow makes this the
        // only live view of the backing storage.
        unsafe { std::slice::from_raw_parts_mut(self.words.as_mut_ptr().cast::<u8>(), self.len) }
    }
}

impl Default for StagingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backing_is_aligned() {
        let buf = StagingBuffer::new();
        assert_eq!(buf.capacity(), STAGING_CAPACITY);
        assert_eq!(buf.as_slice().as_ptr() as usize % STAGING_ALIGN, 0);
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(
            StagingBuffer::with_capacity(0),
            Err(LoadError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn clear_wipes_previous_chunk() {
        let mut buf = StagingBuffer::with_capacity(16).unwrap();
        buf.as_mut_slice().fill(0xAB);
        buf.clear();
        assert!(buf.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn odd_capacity_rounds_backing_not_view() {
        let buf = StagingBuffer::with_capacity(10).unwrap();
        assert_eq!(buf.capacity(), 10);
        assert_eq!(buf.as_slice().len(), 10);
    }
}

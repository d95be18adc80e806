//! Chunked transfer engine.
//!
//! [`ChunkWalk`] partitions an image length into staging-buffer-sized
//! chunks; [`stream_image`] drives one walk: zero the staging buffer, read
//! the chunk from flash, hand it to the sink at the current destination
//! offset, advance. This is the only place the flash offset, remaining
//! length, and destination cursor move, so the
//! `consumed + remaining == total` invariant lives here.

use crate::bootfs::ImageDescriptor;
use crate::error::Result;
use crate::flash::FlashRead;
use crate::sink::ChunkSink;
use crate::staging::StagingBuffer;

/// Yields chunk lengths for one image walk.
///
/// Every chunk is `min(capacity, remaining)`, strictly positive; a zero
/// total length yields no chunks at all.
#[derive(Debug, Clone)]
pub struct ChunkWalk {
    remaining: u64,
    capacity: usize,
}

impl ChunkWalk {
    /// Walk `total_length` bytes in chunks of at most `capacity`.
    #[must_use]
    pub fn new(total_length: u64, capacity: usize) -> Self {
        debug_assert!(capacity > 0, "chunk capacity must be non-zero");
        Self {
            remaining: total_length,
            capacity,
        }
    }

    /// Bytes not yet yielded.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl Iterator for ChunkWalk {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let len = usize::try_from(self.remaining.min(self.capacity as u64))
            .expect("chunk length bounded by capacity");
        self.remaining -= len as u64;
        Some(len)
    }
}

/// Byte counters for one completed transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    /// Total bytes delivered to the sink.
    pub bytes: u64,
    /// Number of chunks processed.
    pub chunks: usize,
}

/// Stream one image from flash into `sink`.
///
/// The destination cursor starts at `dest_base` (window-relative) and
/// advances by each chunk length; sinks that carry per-record addresses
/// simply ignore it. A zero-length image is a successful no-op: no reads,
/// no sink calls.
///
/// # Errors
///
/// A flash-read or sink failure aborts immediately with the underlying
/// error; the failing chunk is never partially applied and no further
/// chunks are attempted.
pub fn stream_image<F, S>(
    flash: &F,
    image: &ImageDescriptor,
    staging: &mut StagingBuffer,
    dest_base: u64,
    sink: &mut S,
) -> Result<TransferStats>
where
    F: FlashRead + ?Sized,
    S: ChunkSink + ?Sized,
{
    let mut offset = image.flash_offset;
    let mut dest = dest_base;
    let mut stats = TransferStats::default();

    for len in ChunkWalk::new(image.byte_length, staging.capacity()) {
        staging.clear();
        if let Err(e) = flash.read(offset, &mut staging.as_mut_slice()[..len]) {
            tracing::error!("flash_read failed: {e}");
            return Err(e);
        }

        sink.consume(&staging.as_slice()[..len], dest)?;

        offset += len as u64;
        dest += len as u64;
        stats.bytes += len as u64;
        stats.chunks += 1;
        tracing::trace!(chunk = stats.chunks, len, "chunk delivered");
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(total: u64, capacity: usize) -> Vec<usize> {
        ChunkWalk::new(total, capacity).collect()
    }

    #[test]
    fn lengths_sum_to_total() {
        for total in [0u64, 1, 4095, 4096, 4097, 5000, 12_288, 100_001] {
            let chunks = walk(total, 4096);
            assert_eq!(chunks.iter().map(|&c| c as u64).sum::<u64>(), total);
            assert!(chunks.iter().all(|&c| c > 0 && c <= 4096));
        }
    }

    #[test]
    fn zero_total_yields_no_chunks() {
        assert!(walk(0, 4096).is_empty());
    }

    #[test]
    fn exact_multiple_is_all_full_chunks() {
        assert_eq!(walk(3 * 4096, 4096), vec![4096, 4096, 4096]);
    }

    #[test]
    fn one_byte_short_final_chunk() {
        assert_eq!(walk(2 * 4096 - 1, 4096), vec![4096, 4095]);
    }

    #[test]
    fn typical_image_shapes() {
        assert_eq!(walk(4096, 4096), vec![4096]);
        assert_eq!(walk(5000, 4096), vec![4096, 904]);
    }
}

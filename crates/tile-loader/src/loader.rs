//! Public entry points: load SerDes images to a tile.
//!
//! Both operations follow the same shape: resolve the tag, validate that
//! the whole destination span fits under one window program, bind the
//! setup window slot, then stream the image through the staging buffer
//! into the matching sink. Both surface failures as [`Result`] — neither
//! swallows an abort behind a log line, though each failing primitive is
//! still logged before the error propagates.
//!
//! Partial application is not rolled back: registers already written or
//! bytes already placed before an abort stay written. Retry, if any, is a
//! caller policy around the whole load.

use crate::bootfs::{ImageDescriptor, ImageLocator};
use crate::bus::TileBus;
use crate::chunk::{stream_image, TransferStats};
use crate::error::{LoadError, Result};
use crate::flash::FlashRead;
use crate::sink::{BlockSink, RegisterTableSink};
use crate::staging::StagingBuffer;
use std::time::{Duration, Instant};
use tile_chip::noc::{serdes_coords, TileCoords};
use tile_chip::serdes;
use tile_chip::window::{SERDES_SETUP_SLOT, WINDOW_REACH};
use tracing::{debug, info};

/// Loads SerDes images from a boot filesystem to tile destinations.
#[derive(Debug)]
pub struct SerdesLoader<L, F, B> {
    locator: L,
    flash: F,
    bus: B,
}

impl<L, F, B> SerdesLoader<L, F, B>
where
    L: ImageLocator,
    F: FlashRead,
    B: TileBus,
{
    /// Create a loader over a locator, flash store, and tile bus.
    pub fn new(locator: L, flash: F, bus: B) -> Self {
        Self { locator, flash, bus }
    }

    /// Borrow the tile bus (to inspect simulated state, for instance).
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Recover the collaborators.
    pub fn into_parts(self) -> (L, F, B) {
        (self.locator, self.flash, self.bus)
    }

    /// Load a register-table image and replay it against the CMN block of
    /// a SerDes instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance or ring is out of range, the tag
    /// is absent, the image exceeds the window reach, or a flash read
    /// fails. Records applied before an abort are not rolled back.
    pub fn load_register_table(&mut self, instance: u32, ring: u8, tag: &str) -> Result<LoadMetrics> {
        let (image, coords) = self.prepare(instance, ring, tag, WINDOW_REACH)?;
        self.bus
            .program_window(ring, SERDES_SETUP_SLOT, coords, serdes::cmn_base(instance));

        let start = Instant::now();
        let mut sink = RegisterTableSink::new(&mut self.bus, ring, SERDES_SETUP_SLOT);
        let mut staging = StagingBuffer::new();
        let stats = stream_image(&self.flash, &image, &mut staging, 0, &mut sink)?;

        Ok(Self::finish("register table", tag, stats, start.elapsed()))
    }

    /// Load a firmware image into the SRAM of a SerDes instance.
    ///
    /// # Errors
    ///
    /// As [`Self::load_register_table`], plus block-transfer failures and
    /// images larger than the instance SRAM.
    pub fn load_firmware_block(&mut self, instance: u32, ring: u8, tag: &str) -> Result<LoadMetrics> {
        let reach = WINDOW_REACH.min(serdes::SRAM_SIZE);
        let (image, coords) = self.prepare(instance, ring, tag, reach)?;
        self.bus
            .program_window(ring, SERDES_SETUP_SLOT, coords, serdes::sram_base(instance));

        let start = Instant::now();
        let mut sink = BlockSink::new(&mut self.bus, ring, SERDES_SETUP_SLOT);
        let mut staging = StagingBuffer::new();
        let stats = stream_image(&self.flash, &image, &mut staging, 0, &mut sink)?;

        Ok(Self::finish("firmware", tag, stats, start.elapsed()))
    }

    /// Resolve tag and coordinates and validate the destination span.
    ///
    /// The window is programmed once per load; `reach` is the largest
    /// image a single program can cover, so anything bigger fails here,
    /// before any I/O, instead of wrapping past the window.
    fn prepare(
        &mut self,
        instance: u32,
        ring: u8,
        tag: &str,
        reach: u64,
    ) -> Result<(ImageDescriptor, TileCoords)> {
        let coords = serdes_coords(instance, ring).ok_or_else(|| {
            LoadError::invalid_argument(format!("no SerDes instance {instance} on ring {ring}"))
        })?;

        let image = match self.locator.find(tag) {
            Ok(image) => image,
            Err(e) => {
                tracing::error!("boot filesystem lookup ({tag}) failed: {e}");
                return Err(e);
            }
        };

        if image.byte_length > reach {
            return Err(LoadError::DestinationTooLarge {
                length: image.byte_length,
                reach,
            });
        }

        debug!(
            tag,
            offset = image.flash_offset,
            length = image.byte_length,
            instance,
            ring,
            "image resolved"
        );
        Ok((image, coords))
    }

    fn finish(kind: &str, tag: &str, stats: TransferStats, elapsed: Duration) -> LoadMetrics {
        let metrics = LoadMetrics {
            bytes: stats.bytes,
            chunks: stats.chunks,
            duration: elapsed,
            throughput_mbps: throughput_mbps(stats.bytes, elapsed.as_secs_f64()),
        };
        info!(
            "✅ {kind} {tag} loaded: {} bytes in {} chunks ({:.2} MB/s)",
            metrics.bytes, metrics.chunks, metrics.throughput_mbps
        );
        metrics
    }
}

/// Metrics for one completed load.
#[derive(Debug, Clone, Copy)]
pub struct LoadMetrics {
    /// Total bytes transferred.
    pub bytes: u64,
    /// Number of chunks transferred.
    pub chunks: usize,
    /// Wall-clock duration of the transfer.
    pub duration: Duration,
    /// Throughput in MB/s.
    pub throughput_mbps: f64,
}

fn throughput_mbps(bytes: u64, seconds: f64) -> f64 {
    if seconds == 0.0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let megabytes = bytes as f64 / 1_048_576.0;
    megabytes / seconds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throughput_sane() {
        let t = throughput_mbps(1_048_576, 1.0);
        assert!((t - 1.0).abs() < 0.01);
        assert_eq!(throughput_mbps(1_048_576, 0.0), 0.0);
    }
}

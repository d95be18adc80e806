//! Chunk consumption strategies.
//!
//! One chunk stream, two consumers: [`RegisterTableSink`] replays a chunk
//! as `(addr, data)` register writes, [`BlockSink`] places it verbatim at
//! the advancing destination offset. Both go through the same programmed
//! window slot on the [`TileBus`].

use crate::bus::TileBus;
use crate::error::Result;
use tile_chip::record::RegisterRecord;

/// Consumes one chunk of image bytes against a destination offset.
pub trait ChunkSink {
    /// Apply `chunk` at window-relative offset `dest`.
    ///
    /// `chunk` holds exactly the chunk's true bytes; the engine never
    /// passes buffer padding. Sinks with per-record addressing ignore
    /// `dest`.
    ///
    /// # Errors
    ///
    /// A sink failure aborts the transfer in progress.
    fn consume(&mut self, chunk: &[u8], dest: u64) -> Result<()>;
}

/// Applies chunks as ordered register-record writes.
///
/// Records later in a chunk may depend on configuration written by earlier
/// ones, so array order is preserved exactly. A trailing partial record is
/// dropped. The write primitive cannot fail, so neither can this sink.
#[derive(Debug)]
pub struct RegisterTableSink<'b, B: TileBus> {
    bus: &'b mut B,
    ring: u8,
    slot: u8,
}

impl<'b, B: TileBus> RegisterTableSink<'b, B> {
    /// Write records through the given window slot.
    pub fn new(bus: &'b mut B, ring: u8, slot: u8) -> Self {
        Self { bus, ring, slot }
    }
}

impl<B: TileBus> ChunkSink for RegisterTableSink<'_, B> {
    fn consume(&mut self, chunk: &[u8], _dest: u64) -> Result<()> {
        for record in RegisterRecord::iter(chunk) {
            self.bus.write32(self.ring, self.slot, record.addr, record.data);
        }
        Ok(())
    }
}

/// Places chunks verbatim at the advancing destination offset.
#[derive(Debug)]
pub struct BlockSink<'b, B: TileBus> {
    bus: &'b mut B,
    ring: u8,
    slot: u8,
}

impl<'b, B: TileBus> BlockSink<'b, B> {
    /// Place blocks through the given window slot.
    pub fn new(bus: &'b mut B, ring: u8, slot: u8) -> Self {
        Self { bus, ring, slot }
    }
}

impl<B: TileBus> ChunkSink for BlockSink<'_, B> {
    fn consume(&mut self, chunk: &[u8], dest: u64) -> Result<()> {
        if let Err(e) = self.bus.block_transfer(self.ring, self.slot, dest, chunk) {
            tracing::error!("block_transfer failed: {e}");
            return Err(e);
        }
        Ok(())
    }
}

//! Tile bus abstraction.
//!
//! [`TileBus`] is the seam between the transfer engine and the hardware:
//! window programming, 32-bit register writes, and block transfers, all
//! addressed through a programmed window slot. `&mut self` on every method
//! makes window state and writes mutually exclusive per bus instance.
//!
//! [`SimTileBus`] implements the trait in plain memory so the whole loader
//! runs in CI without hardware, in the same spirit as a software backend
//! standing in for a physical device.

use crate::error::{LoadError, Result};
use std::collections::BTreeMap;
use tile_chip::noc::TileCoords;
use tile_chip::window::{SLOT_COUNT, WINDOW_REACH};

/// Hardware access used by the transfer engine.
pub trait TileBus {
    /// Bind a window slot: map [`WINDOW_REACH`] bytes of local address
    /// space onto tile `(x, y)` at `base` on the given ring.
    fn program_window(&mut self, ring: u8, slot: u8, coords: TileCoords, base: u64);

    /// 32-bit register write through a programmed window slot.
    ///
    /// The primitive has no failure path; a write to a mis-programmed
    /// window corrupts state rather than reporting an error.
    fn write32(&mut self, ring: u8, slot: u8, offset: u32, value: u32);

    /// Copy `src` into the window at `offset` bytes from its base.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::TransferFailed`] if the block-transfer engine
    /// reports failure.
    fn block_transfer(&mut self, ring: u8, slot: u8, offset: u64, src: &[u8]) -> Result<()>;
}

/// One programmed window binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBinding {
    /// Target tile coordinates.
    pub coords: TileCoords,
    /// Tile-space base address the window exposes.
    pub base: u64,
}

/// In-memory tile bus for tests and the CLI.
///
/// Records every window program, register write, and placed byte against
/// absolute tile addresses, so end state can be compared across runs.
#[derive(Debug, Default)]
pub struct SimTileBus {
    windows: BTreeMap<(u8, u8), WindowBinding>,
    registers: Vec<(u64, u32)>,
    memory: BTreeMap<u64, u8>,
    transfers_until_failure: Option<usize>,
}

impl SimTileBus {
    /// Create an empty simulated bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n+1`-th block transfer (and all later ones) fail.
    pub fn fail_block_transfers_after(&mut self, n: usize) {
        self.transfers_until_failure = Some(n);
    }

    /// The current binding of a window slot, if programmed.
    #[must_use]
    pub fn window(&self, ring: u8, slot: u8) -> Option<WindowBinding> {
        self.windows.get(&(ring, slot)).copied()
    }

    /// Register writes in application order, as `(absolute addr, value)`.
    #[must_use]
    pub fn register_log(&self) -> &[(u64, u32)] {
        &self.registers
    }

    /// Bytes placed at an absolute tile address range. Unwritten bytes
    /// read as zero.
    #[must_use]
    pub fn memory_at(&self, addr: u64, len: usize) -> Vec<u8> {
        (0..len as u64)
            .map(|i| self.memory.get(&(addr + i)).copied().unwrap_or(0))
            .collect()
    }

    /// Final register state: last value written to each absolute address.
    #[must_use]
    pub fn register_state(&self) -> BTreeMap<u64, u32> {
        self.registers.iter().copied().collect()
    }

    fn binding(&self, ring: u8, slot: u8) -> WindowBinding {
        assert!(slot < SLOT_COUNT, "window slot {slot} out of range");
        *self
            .windows
            .get(&(ring, slot))
            .unwrap_or_else(|| panic!("window ring {ring} slot {slot} used before programming"))
    }
}

impl TileBus for SimTileBus {
    fn program_window(&mut self, ring: u8, slot: u8, coords: TileCoords, base: u64) {
        assert!(slot < SLOT_COUNT, "window slot {slot} out of range");
        tracing::debug!(ring, slot, ?coords, base, "window programmed");
        self.windows.insert((ring, slot), WindowBinding { coords, base });
    }

    fn write32(&mut self, ring: u8, slot: u8, offset: u32, value: u32) {
        let binding = self.binding(ring, slot);
        assert!(u64::from(offset) + 4 <= WINDOW_REACH, "register write past window reach");
        self.registers.push((binding.base + u64::from(offset), value));
    }

    fn block_transfer(&mut self, ring: u8, slot: u8, offset: u64, src: &[u8]) -> Result<()> {
        let binding = self.binding(ring, slot);
        assert!(offset + src.len() as u64 <= WINDOW_REACH, "block transfer past window reach");

        if let Some(remaining) = self.transfers_until_failure.as_mut() {
            if *remaining == 0 {
                return Err(LoadError::transfer_failed("simulated DMA failure"));
            }
            *remaining -= 1;
        }

        let dest = binding.base + offset;
        for (i, &byte) in src.iter().enumerate() {
            self.memory.insert(dest + i as u64, byte);
        }
        Ok(())
    }
}

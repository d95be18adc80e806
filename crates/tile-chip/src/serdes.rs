//! SerDes instance address map.
//!
//! Each SerDes tile decodes a fixed slice of tile address space. Two regions
//! matter to the loader: the CMN configuration-register block (replayed as
//! `(addr, data)` records) and the firmware SRAM (filled by block transfer).
//!
//! ```text
//! instance base ──┬── 0x0000_0000  CMN configuration registers
//!                 ├── 0x0020_0000  lane registers (not touched here)
//!                 └── 0x0040_0000  firmware SRAM
//! ```

/// Number of SerDes instances on the chip.
pub const INSTANCE_COUNT: usize = 6;

/// Address-space stride between consecutive SerDes instances.
pub const INSTANCE_STRIDE: u64 = 0x0100_0000; // 16 MB

/// Base of the first SerDes instance in tile address space.
pub const INSTANCE0_BASE: u64 = 0x8000_0000;

/// Offset of the CMN configuration-register block within an instance.
pub const CMN_OFFSET: u64 = 0x0000_0000;

/// Offset of the firmware SRAM within an instance.
pub const SRAM_OFFSET: u64 = 0x0040_0000;

/// Firmware SRAM size per instance.
pub const SRAM_SIZE: u64 = 256 * 1024;

/// Base address of a SerDes instance in tile address space.
#[must_use]
pub const fn instance_base(instance: u32) -> u64 {
    INSTANCE0_BASE + instance as u64 * INSTANCE_STRIDE
}

/// Base of the CMN configuration-register block for an instance.
#[must_use]
pub const fn cmn_base(instance: u32) -> u64 {
    instance_base(instance) + CMN_OFFSET
}

/// Base of the firmware SRAM for an instance.
#[must_use]
pub const fn sram_base(instance: u32) -> u64 {
    instance_base(instance) + SRAM_OFFSET
}

//! Address-translation window geometry.
//!
//! The local bus reaches tile address space through a small set of
//! hardware windows. Each window slot maps [`WINDOW_REACH`] bytes of the
//! local address map onto an arbitrary [`WINDOW_REACH`]-aligned region of
//! one tile. A slot is programmed with `(ring, x, y, base)` and stays bound
//! until reprogrammed; nothing guards writes past the reach, they wrap onto
//! whatever the slot currently maps.

/// Reach of one window slot in bytes.
pub const WINDOW_REACH: u64 = 2 * 1024 * 1024; // 2 MB

/// Number of window slots per ring.
pub const SLOT_COUNT: u8 = 8;

/// Slot reserved for SerDes setup transfers.
pub const SERDES_SETUP_SLOT: u8 = 0;

/// Required alignment of a window base address.
pub const BASE_ALIGN: u64 = WINDOW_REACH;

/// Align an arbitrary tile address down to a valid window base.
#[must_use]
pub const fn align_base(addr: u64) -> u64 {
    addr & !(BASE_ALIGN - 1)
}

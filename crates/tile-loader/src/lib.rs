//! Streaming chunked transfer of SerDes images from SPI flash to an ASIC
//! tile.
//!
//! The boot filesystem maps tags to images of unbounded size; on-chip
//! destinations are only reachable through a fixed-capacity staging buffer
//! and a hardware address-translation window of limited reach. This crate
//! walks an image in bounded chunks and delivers each chunk either as a
//! table of `(addr, data)` register writes (SerDes configuration) or as a
//! raw block placement (SerDes firmware), with no under- or overrun at any
//! boundary.
//!
//! Everything is synchronous, single-threaded, and blocking: one transfer
//! at a time owns the staging buffer and the setup window slot.
//!
//! # Quick start
//!
//! ```
//! use tile_loader::{BootFs, BootFsBuilder, MemFlash, SerdesLoader, SimTileBus};
//!
//! # fn main() -> tile_loader::Result<()> {
//! let mut builder = BootFsBuilder::new();
//! builder.add("ethsdreg", 0, vec![0u8; 64])?;
//! let flash = MemFlash::new(builder.build());
//!
//! let bootfs = BootFs::scan(&flash)?;
//! let mut loader = SerdesLoader::new(bootfs, flash, SimTileBus::new());
//! let metrics = loader.load_register_table(0, 0, "ethsdreg")?;
//! assert_eq!(metrics.bytes, 64);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod bootfs;
mod bus;
mod chunk;
mod error;
mod flash;
mod loader;
mod sink;
mod staging;

pub use bootfs::{
    BootFs, BootFsBuilder, ImageDescriptor, ImageLocator, DIRECTORY_SIZE, ENTRY_SIZE,
    FLAG_EXECUTABLE, MAX_ENTRIES, TAG_SIZE,
};
pub use bus::{SimTileBus, TileBus, WindowBinding};
pub use chunk::{stream_image, ChunkWalk, TransferStats};
pub use error::{LoadError, Result};
pub use flash::{FileFlash, FlashRead, MemFlash};
pub use loader::{LoadMetrics, SerdesLoader};
pub use sink::{BlockSink, ChunkSink, RegisterTableSink};
pub use staging::{StagingBuffer, STAGING_ALIGN, STAGING_CAPACITY};

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        BootFs, BootFsBuilder, ChunkSink, FlashRead, ImageDescriptor, ImageLocator, LoadError,
        LoadMetrics, MemFlash, Result, SerdesLoader, SimTileBus, StagingBuffer, TileBus,
    };
}

//! End-to-end loads against the simulated tile bus.

use tile_chip::record::RegisterRecord;
use tile_chip::serdes;
use tile_chip::window::SERDES_SETUP_SLOT;
use tile_loader::{
    BootFs, BootFsBuilder, FlashRead, ImageLocator, LoadError, MemFlash, Result, SerdesLoader,
    SimTileBus, STAGING_CAPACITY,
};

/// Flash wrapper that fails every read at or past a byte offset.
struct FailingFlash {
    inner: MemFlash,
    fail_from: u64,
}

impl FlashRead for FailingFlash {
    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        if offset >= self.fail_from {
            return Err(LoadError::flash_read(offset, "injected failure"));
        }
        self.inner.read(offset, buf)
    }
}

fn packed_flash(tag: &str, data: Vec<u8>) -> MemFlash {
    let mut builder = BootFsBuilder::new();
    builder.add(tag, 0, data).unwrap();
    MemFlash::new(builder.build())
}

fn loader_for(tag: &str, data: Vec<u8>) -> SerdesLoader<BootFs, MemFlash, SimTileBus> {
    let flash = packed_flash(tag, data);
    let bootfs = BootFs::scan(&flash).unwrap();
    SerdesLoader::new(bootfs, flash, SimTileBus::new())
}

fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn firmware_exactly_one_buffer_is_one_chunk() {
    let data = patterned(STAGING_CAPACITY);
    let mut loader = loader_for("fw", data.clone());

    let metrics = loader.load_firmware_block(2, 0, "fw").unwrap();
    assert_eq!(metrics.chunks, 1);
    assert_eq!(metrics.bytes, STAGING_CAPACITY as u64);

    let base = serdes::sram_base(2);
    assert_eq!(loader.bus().memory_at(base, data.len()), data);
}

#[test]
fn firmware_5000_bytes_splits_and_advances_cursor() {
    let data = patterned(5000);
    let mut loader = loader_for("fw", data.clone());

    let metrics = loader.load_firmware_block(0, 0, "fw").unwrap();
    assert_eq!(metrics.chunks, 2);
    assert_eq!(metrics.bytes, 5000);

    // Second chunk landed at base + 4096, contiguous with the first.
    let base = serdes::sram_base(0);
    assert_eq!(loader.bus().memory_at(base, 5000), data);
    assert_eq!(loader.bus().memory_at(base + 4096, 1), vec![data[4096]]);
}

#[test]
fn register_table_applies_records_in_order() {
    let mut image = Vec::new();
    for i in 0..600u32 {
        image.extend_from_slice(&RegisterRecord { addr: i * 4, data: !i }.to_le_bytes());
    }
    let mut loader = loader_for("regs", image);

    // 600 records * 8 B = 4800 B: crosses a chunk boundary mid-table.
    let metrics = loader.load_register_table(1, 1, "regs").unwrap();
    assert_eq!(metrics.chunks, 2);

    let base = serdes::cmn_base(1);
    let log = loader.bus().register_log();
    assert_eq!(log.len(), 600);
    for (i, &(addr, value)) in log.iter().enumerate() {
        assert_eq!(addr, base + i as u64 * 4);
        assert_eq!(value, !(i as u32));
    }
}

#[test]
fn register_table_ignores_trailing_partial_record() {
    let mut image = RegisterRecord { addr: 0x40, data: 0x55 }.to_le_bytes().to_vec();
    image.extend_from_slice(&[0xAA; 4]); // 12 bytes: one record, 4 stray bytes

    let mut loader = loader_for("regs", image);
    loader.load_register_table(0, 0, "regs").unwrap();
    assert_eq!(loader.bus().register_log(), &[(serdes::cmn_base(0) + 0x40, 0x55)]);
}

#[test]
fn zero_length_image_is_a_successful_noop() {
    let mut loader = loader_for("empty", vec![]);
    let metrics = loader.load_firmware_block(0, 0, "empty").unwrap();
    assert_eq!(metrics.chunks, 0);
    assert_eq!(metrics.bytes, 0);
    assert!(loader.bus().register_log().is_empty());
}

#[test]
fn replay_is_idempotent() {
    let mut image = Vec::new();
    for i in 0..100u32 {
        image.extend_from_slice(&RegisterRecord { addr: i * 8, data: i ^ 0xFFFF }.to_le_bytes());
    }
    let mut loader = loader_for("regs", image);

    loader.load_register_table(3, 0, "regs").unwrap();
    let first = loader.bus().register_state();
    loader.load_register_table(3, 0, "regs").unwrap();
    assert_eq!(loader.bus().register_state(), first);
}

#[test]
fn window_binds_to_instance_region() {
    let mut loader = loader_for("fw", patterned(16));
    loader.load_firmware_block(4, 1, "fw").unwrap();

    let binding = loader.bus().window(1, SERDES_SETUP_SLOT).unwrap();
    assert_eq!(binding.base, serdes::sram_base(4));
}

#[test]
fn missing_tag_is_reported() {
    let mut loader = loader_for("fw", patterned(16));
    assert!(matches!(
        loader.load_firmware_block(0, 0, "absent"),
        Err(LoadError::TagNotFound { .. })
    ));
}

#[test]
fn invalid_instance_is_rejected_before_lookup() {
    let mut loader = loader_for("fw", patterned(16));
    assert!(matches!(
        loader.load_firmware_block(99, 0, "fw"),
        Err(LoadError::InvalidArgument { .. })
    ));
    assert!(matches!(
        loader.load_firmware_block(0, 7, "fw"),
        Err(LoadError::InvalidArgument { .. })
    ));
}

#[test]
fn oversized_firmware_fails_fast() {
    let len = usize::try_from(serdes::SRAM_SIZE).unwrap() + 1;
    let mut loader = loader_for("fw", vec![0x5A; len]);

    assert!(matches!(
        loader.load_firmware_block(0, 0, "fw"),
        Err(LoadError::DestinationTooLarge { .. })
    ));
    // Validation precedes window programming and all I/O.
    assert!(loader.bus().window(0, SERDES_SETUP_SLOT).is_none());
    assert_eq!(loader.bus().memory_at(serdes::sram_base(0), 1), vec![0]);
}

#[test]
fn flash_failure_mid_transfer_aborts_without_touching_later_chunks() {
    let data = patterned(3 * STAGING_CAPACITY);
    let flash = packed_flash("fw", data.clone());
    let bootfs = BootFs::scan(&flash).unwrap();
    let image = bootfs.find("fw").unwrap();

    // Fail the second chunk's read; the first must land, the third must not
    // be attempted.
    let failing = FailingFlash {
        inner: flash,
        fail_from: image.flash_offset + STAGING_CAPACITY as u64,
    };
    let mut loader = SerdesLoader::new(bootfs, failing, SimTileBus::new());

    let err = loader.load_firmware_block(0, 0, "fw").unwrap_err();
    assert!(matches!(err, LoadError::FlashRead { .. }));

    let base = serdes::sram_base(0);
    assert_eq!(
        loader.bus().memory_at(base, STAGING_CAPACITY),
        data[..STAGING_CAPACITY]
    );
    // Nothing past the first chunk was placed.
    assert_eq!(
        loader.bus().memory_at(base + STAGING_CAPACITY as u64, 2 * STAGING_CAPACITY),
        vec![0u8; 2 * STAGING_CAPACITY]
    );
}

#[test]
fn dma_failure_propagates_as_transfer_error() {
    let loader = loader_for("fw", patterned(2 * STAGING_CAPACITY));
    let (bootfs, flash, mut bus) = loader.into_parts();
    bus.fail_block_transfers_after(1);
    let mut loader = SerdesLoader::new(bootfs, flash, bus);

    let err = loader.load_firmware_block(0, 0, "fw").unwrap_err();
    assert!(matches!(err, LoadError::TransferFailed { .. }));
    assert_eq!(
        loader.bus().memory_at(serdes::sram_base(0) + STAGING_CAPACITY as u64, 1),
        vec![0]
    );
}

//! `tileload` — pack, inspect, and replay SerDes boot filesystem images.
//!
//! ```text
//! USAGE:
//!   tileload pack <out.bin> --image tag=file [--exec tag=file ...]
//!   tileload list <flash.bin>                List directory entries
//!   tileload load-regs <flash.bin> <tag>     Replay a register table (simulated bus)
//!   tileload load-fw <flash.bin> <tag>       Place a firmware image (simulated bus)
//! ```
//!
//! Loads run against the simulated tile bus; this is a packing and
//! validation tool, not a path to real hardware.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tile_loader::{
    BootFs, BootFsBuilder, FileFlash, ImageLocator, SerdesLoader, SimTileBus, FLAG_EXECUTABLE,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tileload", about = "SerDes boot filesystem image tool", version)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Pack files into a boot filesystem flash image.
    Pack {
        /// Output flash image path.
        out: String,
        /// Register-table image as tag=file (repeatable).
        #[arg(long = "image", value_name = "TAG=FILE")]
        images: Vec<String>,
        /// Executable firmware image as tag=file (repeatable).
        #[arg(long = "exec", value_name = "TAG=FILE")]
        execs: Vec<String>,
    },
    /// List the directory entries of a flash image.
    List {
        /// Flash image path.
        flash: String,
    },
    /// Replay a register-table image against the simulated bus.
    LoadRegs {
        /// Flash image path.
        flash: String,
        /// Image tag.
        tag: String,
        /// SerDes instance.
        #[arg(long, default_value_t = 0)]
        instance: u32,
        /// NOC ring.
        #[arg(long, default_value_t = 0)]
        ring: u8,
    },
    /// Place a firmware image through the simulated bus.
    LoadFw {
        /// Flash image path.
        flash: String,
        /// Image tag.
        tag: String,
        /// SerDes instance.
        #[arg(long, default_value_t = 0)]
        instance: u32,
        /// NOC ring.
        #[arg(long, default_value_t = 0)]
        ring: u8,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Cmd::Pack { out, images, execs } => cmd_pack(&out, &images, &execs)?,
        Cmd::List { flash } => cmd_list(&flash)?,
        Cmd::LoadRegs { flash, tag, instance, ring } => {
            cmd_load(&flash, &tag, instance, ring, LoadKind::Registers)?;
        }
        Cmd::LoadFw { flash, tag, instance, ring } => {
            cmd_load(&flash, &tag, instance, ring, LoadKind::Firmware)?;
        }
    }

    Ok(())
}

enum LoadKind {
    Registers,
    Firmware,
}

fn split_spec(spec: &str) -> Result<(&str, &str)> {
    spec.split_once('=')
        .context(format!("expected tag=file, got {spec:?}"))
}

fn cmd_pack(out: &str, images: &[String], execs: &[String]) -> Result<()> {
    let mut builder = BootFsBuilder::new();

    for (specs, flags) in [(images, 0), (execs, FLAG_EXECUTABLE)] {
        for spec in specs {
            let (tag, path) = split_spec(spec)?;
            let data = std::fs::read(path).context(format!("reading {path}"))?;
            println!("  {tag:8}  {:8} B  {path}", data.len());
            builder.add(tag, flags, data)?;
        }
    }

    let flash = builder.build();
    std::fs::write(out, &flash).context(format!("writing {out}"))?;
    println!("Packed {} bytes into {out}", flash.len());
    Ok(())
}

fn cmd_list(flash: &str) -> Result<()> {
    let flash = FileFlash::open(flash)?;
    let bootfs = BootFs::scan(&flash)?;

    println!("{:8}  {:>10}  {:>10}  flags", "tag", "offset", "length");
    for entry in bootfs.entries() {
        let kind = if entry.flags & FLAG_EXECUTABLE != 0 { "exec" } else { "" };
        println!(
            "{:8}  {:#10x}  {:>10}  {kind}",
            entry.tag, entry.flash_offset, entry.byte_length
        );
    }
    Ok(())
}

fn cmd_load(flash: &str, tag: &str, instance: u32, ring: u8, kind: LoadKind) -> Result<()> {
    let flash = FileFlash::open(flash)?;
    let bootfs = BootFs::scan(&flash)?;
    let image = bootfs.find(tag)?;
    let mut loader = SerdesLoader::new(bootfs, flash, SimTileBus::new());

    let metrics = match kind {
        LoadKind::Registers => loader.load_register_table(instance, ring, tag)?,
        LoadKind::Firmware => loader.load_firmware_block(instance, ring, tag)?,
    };

    println!("Image     : {tag} ({} bytes at {:#x})", image.byte_length, image.flash_offset);
    println!("Target    : SerDes instance {instance}, ring {ring}");
    println!("Chunks    : {}", metrics.chunks);
    println!("Bytes     : {}", metrics.bytes);
    println!("Duration  : {:?}", metrics.duration);
    println!("Throughput: {:.2} MB/s", metrics.throughput_mbps);

    match kind {
        LoadKind::Registers => {
            println!("Registers : {} writes applied", loader.bus().register_log().len());
        }
        LoadKind::Firmware => {
            let base = tile_chip::serdes::sram_base(instance);
            let head = loader.bus().memory_at(base, 8.min(metrics.bytes as usize));
            println!("SRAM head : {head:02x?}");
        }
    }
    Ok(())
}

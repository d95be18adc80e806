//! Silicon model for the tile-based ASIC served by `tile-loader`.
//!
//! This crate has **no dependencies** and **no hardware access** — it is a
//! pure model of the silicon: NOC grid geometry, per-instance SerDes
//! coordinates and address maps, address-window geometry, and the
//! register-record wire format replayed from flash.
//!
//! # Crate organisation
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`noc`] | NOC grid geometry, ring ids, SerDes tile coordinates |
//! | [`serdes`] | SerDes instance address map (CMN registers, firmware SRAM) |
//! | [`window`] | Address-translation window geometry (slots, reach) |
//! | [`record`] | `(addr, data)` register-record wire format |

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod noc;
pub mod record;
pub mod serdes;
pub mod window;

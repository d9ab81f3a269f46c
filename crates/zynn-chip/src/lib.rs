//! Silicon model for the zynn MLP inference accelerator.
//!
//! This crate has **no dependencies** and **no hardware access** — it is a
//! pure model of the IP core as synthesized into the FPGA fabric: the AXI-Lite
//! register map, the control/status bit fields, the Q4.11 fixed-point sample
//! encoding, and the network topology the register file describes.
//!
//! Everything here is the wire-level contract with the RTL and must stay
//! bit-exact: offsets, bit positions, the self-clearing START semantics, and
//! the truncating fixed-point conversion the hardware testbench uses.
//!
//! # Crate organisation
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`regs`] | AXI-Lite register map — all offsets and bit definitions |
//! | [`fixed`] | Q4.11 signed fixed-point encoding (scale 2048) |
//! | [`topology`] | Per-layer node counts and the reference MNIST topology |

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod fixed;
pub mod regs;
pub mod topology;

pub use topology::Topology;

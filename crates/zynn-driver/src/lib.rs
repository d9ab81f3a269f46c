//! Userspace driver for the zynn MLP inference accelerator.
//!
//! The accelerator is a fixed-function two-hidden-layer MLP in FPGA fabric,
//! exposed as six 32-bit registers behind an AXI GP port. This crate drives
//! its control/status protocol — reset, topology programming, start, and
//! completion polling under a timeout — and interprets the Q4.11 output
//! vector as a class label with a normalized confidence.
//!
//! Bulk data movement (input images, weight tensors) rides a separate DMA
//! path and enters this crate only through the [`BulkTransfer`] seam.
//!
//! # Quick start
//!
//! ```
//! use zynn_driver::{interpret, Controller, LoopbackTransfer, SimulatedAccelerator};
//! use zynn_chip::fixed;
//!
//! # fn main() -> zynn_driver::Result<()> {
//! // Against hardware this would be Controller::new(DevMemBus::map(base)?)
//! let mut ctl = Controller::new(SimulatedAccelerator::new())
//!     .with_reset_settle(std::time::Duration::ZERO);
//! ctl.initialize(None);
//!
//! let image = vec![0i16; usize::from(ctl.topology().num_inputs)];
//! let mut dma = LoopbackTransfer::new(vec![fixed::from_f32(0.9); 10]);
//! let scores = ctl.run_inference(&mut dma, &image)?;
//!
//! let result = interpret::interpret(&scores)?;
//! println!("class {} ({:.1}%)", result.index, result.confidence * 100.0);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod bus;
mod controller;
mod error;
pub mod interpret;
pub mod mmio;
pub mod sim;
mod transfer;

pub use bus::RegisterBus;
pub use controller::{
    Controller, DeviceStatus, DEFAULT_POLL_INTERVAL, DEFAULT_RESET_SETTLE, INFERENCE_TIMEOUT,
};
pub use error::{Result, ZynnError};
pub use interpret::{classify, confidence, Classification};
pub use mmio::DevMemBus;
pub use sim::{LoopbackTransfer, SimulatedAccelerator};
pub use transfer::BulkTransfer;

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        classify, confidence, BulkTransfer, Classification, Controller, DevMemBus, DeviceStatus,
        RegisterBus, Result, ZynnError,
    };
}

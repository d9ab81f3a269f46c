//! Bulk-transfer seam
//!
//! Image and weight movement is not a register-file concern: on the reference
//! board it rides a separate DMA/AXI-Stream path. The controller only
//! sequences control/status and talks to that path through this trait.

use crate::error::Result;

/// Bulk data movement between host memory and the accelerator.
///
/// Implementations wrap whatever transport the board provides (AXI DMA,
/// AXI-Stream FIFO). For tests and demos, [`crate::sim::LoopbackTransfer`]
/// supplies canned data without hardware.
pub trait BulkTransfer {
    /// Move one input image (Q4.11 samples) into the device. Must complete
    /// before `start()` is issued.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ZynnError::TransferFailed`] if the transport stalls
    /// or rejects the data.
    fn transfer_input(&mut self, samples: &[i16]) -> Result<()>;

    /// Retrieve the output vector (one Q4.11 score per class) after DONE has
    /// been observed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ZynnError::TransferFailed`] if the transport stalls.
    fn transfer_output(&mut self) -> Result<Vec<i16>>;
}

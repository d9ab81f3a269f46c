//! Register bus abstraction
//!
//! Unified interface over the accelerator's 32-bit register file, implemented
//! by the `/dev/mem` MMIO backend for hardware and by the simulated device
//! for tests and CI.

use std::fmt::Debug;

/// Typed access to the accelerator register file.
///
/// Every call is a direct device access: no buffering, no caching, no read
/// elision. Implementations must preserve access ordering and treat reads as
/// side-effecting even when the returned value is unused (the MMIO backend
/// uses volatile accesses for this).
///
/// AXI-Lite register access has no failure reporting path, so the methods are
/// infallible by contract. Callers must use only the offsets defined in
/// [`zynn_chip::regs`]; implementations may panic on out-of-window offsets
/// but do not validate register semantics.
pub trait RegisterBus: Debug {
    /// Read a 32-bit register at `offset` bytes from the base.
    fn read32(&self, offset: usize) -> u32;

    /// Write a 32-bit register at `offset` bytes from the base.
    fn write32(&mut self, offset: usize, value: u32);
}

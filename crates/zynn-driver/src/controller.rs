//! Accelerator lifecycle control
//!
//! Drives the device through reset → configure → start → poll-for-done over
//! a [`RegisterBus`]. One controller owns one device instance and its held
//! topology; there is no process-wide state, so multiple devices (or a
//! hardware device and a simulated one in tests) coexist freely.

use crate::bus::RegisterBus;
use crate::error::{Result, ZynnError};
use crate::transfer::BulkTransfer;
use std::time::Duration;
use zynn_chip::regs::{self, ctrl, status};
use zynn_chip::Topology;

/// Settle time after asserting or releasing SOFT_RESET.
///
/// The reset line has no completion handshake; the RTL specifies this delay
/// as sufficient at the reference clock.
pub const DEFAULT_RESET_SETTLE: Duration = Duration::from_micros(10);

/// Interval between DONE polls in [`Controller::wait_done`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_micros(100);

/// Timeout budget used by [`Controller::run_inference`].
pub const INFERENCE_TIMEOUT: Duration = Duration::from_secs(10);

/// Decoded snapshot of the STATUS register.
///
/// Re-read on every query; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceStatus {
    /// Inference in progress.
    pub busy: bool,
    /// Inference complete.
    pub done: bool,
    /// 4-bit internal FSM code. Device-internal; opaque beyond equality.
    pub state: u8,
}

impl DeviceStatus {
    /// Decode a raw STATUS word.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            busy: raw & status::BUSY != 0,
            done: raw & status::DONE != 0,
            state: status::state(raw),
        }
    }
}

/// Controller for one accelerator instance.
///
/// Owns the register bus and the held [`Topology`]. All mutating operations
/// take `&mut self`, so interleaved use from multiple call sites is a compile
/// error rather than a runtime race — wrap the controller in a mutex or an
/// actor if it must be shared.
#[derive(Debug)]
pub struct Controller<B: RegisterBus> {
    bus: B,
    topology: Topology,
    initialized: bool,
    reset_settle: Duration,
    poll_interval: Duration,
}

impl<B: RegisterBus> Controller<B> {
    /// Create a controller with the reference topology, not yet initialized.
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            topology: Topology::default(),
            initialized: false,
            reset_settle: DEFAULT_RESET_SETTLE,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the reset settle delay (e.g. zero against the simulator).
    #[must_use]
    pub fn with_reset_settle(mut self, settle: Duration) -> Self {
        self.reset_settle = settle;
        self
    }

    /// Override the DONE poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The held topology.
    #[must_use]
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// Whether `initialize` has completed at least once.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Initialize the accelerator.
    ///
    /// A supplied topology replaces the held one wholesale; `None` keeps the
    /// current (initially the reference) topology. Always resets the device,
    /// pushes the topology to the four size registers, and marks the
    /// configuration initialized. Idempotent — safe to call repeatedly.
    pub fn initialize(&mut self, topology: Option<Topology>) {
        if let Some(t) = topology {
            self.topology = t;
        }

        self.reset();
        self.configure(self.topology);
        self.initialized = true;

        tracing::info!(topology = ?self.topology, "accelerator initialized");
    }

    /// Soft-reset the device.
    ///
    /// Asserts SOFT_RESET, waits the settle delay, clears CTRL, waits again.
    /// There is no hardware acknowledgement for reset; the fixed delay is the
    /// protocol. Recovery from a wedged device is re-issuing this and
    /// re-polling.
    pub fn reset(&mut self) {
        tracing::debug!("soft reset");
        self.bus.write32(regs::CTRL, ctrl::SOFT_RESET);
        self.settle();
        self.bus.write32(regs::CTRL, 0);
        self.settle();
    }

    /// Program the network topology.
    ///
    /// Writes all four size registers unconditionally and updates the held
    /// configuration to match. No capacity validation — the fabric accepts
    /// whatever is programmed. Callable in any state; does not start or stop
    /// inference.
    pub fn configure(&mut self, topology: Topology) {
        tracing::debug!(?topology, "programming topology");
        self.bus.write32(regs::NUM_IN, u32::from(topology.num_inputs));
        self.bus.write32(regs::NUM_H1, u32::from(topology.num_hidden1));
        self.bus.write32(regs::NUM_H2, u32::from(topology.num_hidden2));
        self.bus.write32(regs::NUM_OUT, u32::from(topology.num_outputs));
        self.topology = topology;
    }

    /// Whether the device reports BUSY. One STATUS read; safe at any time.
    pub fn is_busy(&self) -> bool {
        self.bus.read32(regs::STATUS) & status::BUSY != 0
    }

    /// Whether the device reports DONE. One STATUS read; safe at any time.
    pub fn is_done(&self) -> bool {
        self.bus.read32(regs::STATUS) & status::DONE != 0
    }

    /// Read and decode the STATUS register.
    pub fn status(&self) -> DeviceStatus {
        DeviceStatus::from_raw(self.bus.read32(regs::STATUS))
    }

    /// Start inference: read-modify-write of CTRL, OR-ing in ENABLE and START.
    ///
    /// START is self-clearing once the device latches it. Calling this while
    /// an inference is already running is permitted at this layer; what the
    /// device does with a re-issued START is device-defined.
    pub fn start(&mut self) {
        let mut word = self.bus.read32(regs::CTRL);
        word |= ctrl::ENABLE | ctrl::START;
        self.bus.write32(regs::CTRL, word);
        tracing::debug!("inference started");
    }

    /// Block until the device reports DONE, or until `timeout` of accumulated
    /// polling has elapsed. `None` waits forever.
    ///
    /// Polls at the configured interval, sleeping (not spinning) between
    /// polls so other work on the core is not starved. Elapsed time is
    /// accounted by accumulating the poll interval rather than reading a
    /// clock, so a simulated bus produces deterministic timeout behavior.
    ///
    /// # Errors
    ///
    /// Returns [`ZynnError::Timeout`] once accumulated polling reaches the
    /// budget without DONE being observed. Timeout is recoverable: the caller
    /// may retry the wait, re-issue `start`, or `reset`.
    pub fn wait_done(&mut self, timeout: Option<Duration>) -> Result<()> {
        let mut elapsed = Duration::ZERO;

        while !self.is_done() {
            if let Some(budget) = timeout {
                if elapsed >= budget {
                    tracing::warn!(?elapsed, "timed out waiting for DONE");
                    return Err(ZynnError::Timeout { waited: elapsed });
                }
            }
            std::thread::sleep(self.poll_interval);
            elapsed += self.poll_interval;
        }

        tracing::debug!(?elapsed, "DONE observed");
        Ok(())
    }

    /// Run one complete inference.
    ///
    /// Initializes lazily if needed, hands the input to the bulk-transfer
    /// collaborator, starts the device, waits up to [`INFERENCE_TIMEOUT`],
    /// and retrieves the output vector. This method sequences control/status
    /// only — all data movement happens inside `transfer`.
    ///
    /// # Errors
    ///
    /// Returns [`ZynnError::Timeout`] if the device never reports DONE, or a
    /// transfer error from the collaborator. A timeout means the accelerator
    /// never finished; it is never conflated with a completed inference.
    pub fn run_inference<T: BulkTransfer>(
        &mut self,
        transfer: &mut T,
        input: &[i16],
    ) -> Result<Vec<i16>> {
        if !self.initialized {
            self.initialize(None);
        }

        transfer.transfer_input(input)?;
        self.start();
        self.wait_done(Some(INFERENCE_TIMEOUT))?;
        transfer.transfer_output()
    }

    /// Release the controller and recover the bus.
    pub fn into_bus(self) -> B {
        self.bus
    }

    fn settle(&self) {
        if !self.reset_settle.is_zero() {
            std::thread::sleep(self.reset_settle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_decodes_all_fields() {
        let s = DeviceStatus::from_raw(status::BUSY | (0x3 << status::STATE_SHIFT));
        assert!(s.busy);
        assert!(!s.done);
        assert_eq!(s.state, 3);

        let s = DeviceStatus::from_raw(status::DONE);
        assert!(!s.busy);
        assert!(s.done);
        assert_eq!(s.state, 0);
    }
}

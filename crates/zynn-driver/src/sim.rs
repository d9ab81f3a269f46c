//! Simulated accelerator
//!
//! A [`RegisterBus`] that models the RTL's observable register behavior:
//! soft reset clears everything, START self-clears and raises BUSY, DONE
//! rises after a configurable number of STATUS polls. Everything the test
//! suite and the CLI demo need runs against this, no bitstream required —
//! the same role the software backend plays for hardware-free CI elsewhere.

use crate::bus::RegisterBus;
use crate::error::{Result, ZynnError};
use crate::transfer::BulkTransfer;
use std::cell::RefCell;
use zynn_chip::regs::{self, ctrl, status};

// Internal FSM codes reported in the STATUS state field. Arbitrary but
// stable, as on the real device.
const STATE_IDLE: u32 = 0x0;
const STATE_BUSY: u32 = 0x2;
const STATE_DONE: u32 = 0x4;

#[derive(Debug, Default)]
struct SimState {
    ctrl: u32,
    num_in: u32,
    num_h1: u32,
    num_h2: u32,
    num_out: u32,
    busy: bool,
    done: bool,
    // STATUS polls remaining before DONE rises
    countdown: u32,
    ctrl_writes: Vec<u32>,
}

/// Register-level model of the accelerator.
///
/// STATUS reads have side effects (they advance the simulated inference), so
/// the state lives behind a `RefCell`; the bus contract's single-owner
/// discipline makes that safe.
#[derive(Debug)]
pub struct SimulatedAccelerator {
    state: RefCell<SimState>,
    /// STATUS polls that observe BUSY before DONE rises.
    latency_polls: u32,
    /// Device never reports DONE — for timeout testing.
    never_completes: bool,
}

impl SimulatedAccelerator {
    /// A device that completes on the first STATUS poll after START.
    #[must_use]
    pub fn new() -> Self {
        Self::with_latency(0)
    }

    /// A device that reports BUSY for `polls` STATUS reads, then DONE.
    #[must_use]
    pub fn with_latency(polls: u32) -> Self {
        Self {
            state: RefCell::new(SimState::default()),
            latency_polls: polls,
            never_completes: false,
        }
    }

    /// A wedged device: BUSY forever, DONE never rises.
    #[must_use]
    pub fn never_completes() -> Self {
        Self {
            state: RefCell::new(SimState::default()),
            latency_polls: 0,
            never_completes: true,
        }
    }

    /// Programmed topology registers, in layout order.
    #[must_use]
    pub fn topology_regs(&self) -> [u32; 4] {
        let s = self.state.borrow();
        [s.num_in, s.num_h1, s.num_h2, s.num_out]
    }

    /// Every value written to CTRL, in order. Test observation hook.
    #[must_use]
    pub fn ctrl_writes(&self) -> Vec<u32> {
        self.state.borrow().ctrl_writes.clone()
    }

    fn read_status(&self) -> u32 {
        let mut s = self.state.borrow_mut();

        if s.busy && !self.never_completes {
            if s.countdown > 0 {
                s.countdown -= 1;
            } else {
                s.busy = false;
                s.done = true;
            }
        }

        let mut word = 0;
        if s.busy {
            word |= status::BUSY | (STATE_BUSY << status::STATE_SHIFT);
        } else if s.done {
            word |= status::DONE | (STATE_DONE << status::STATE_SHIFT);
        } else {
            word |= STATE_IDLE << status::STATE_SHIFT;
        }
        word
    }

    fn write_ctrl(&self, value: u32) {
        let mut s = self.state.borrow_mut();
        s.ctrl_writes.push(value);

        if value & ctrl::SOFT_RESET != 0 {
            let writes = std::mem::take(&mut s.ctrl_writes);
            *s = SimState {
                ctrl: value & !ctrl::START,
                ctrl_writes: writes,
                ..SimState::default()
            };
            return;
        }

        if value & ctrl::START != 0 && value & ctrl::ENABLE != 0 {
            s.busy = true;
            s.done = false;
            s.countdown = self.latency_polls;
        }

        // START is self-clearing: it latches but is never read back.
        s.ctrl = value & !ctrl::START;
    }
}

impl Default for SimulatedAccelerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for SimulatedAccelerator {
    fn read32(&self, offset: usize) -> u32 {
        match offset {
            regs::CTRL => self.state.borrow().ctrl,
            regs::STATUS => self.read_status(),
            regs::NUM_IN => self.state.borrow().num_in,
            regs::NUM_H1 => self.state.borrow().num_h1,
            regs::NUM_H2 => self.state.borrow().num_h2,
            regs::NUM_OUT => self.state.borrow().num_out,
            _ => 0,
        }
    }

    fn write32(&mut self, offset: usize, value: u32) {
        match offset {
            regs::CTRL => self.write_ctrl(value),
            regs::NUM_IN => self.state.borrow_mut().num_in = value,
            regs::NUM_H1 => self.state.borrow_mut().num_h1 = value,
            regs::NUM_H2 => self.state.borrow_mut().num_h2 = value,
            regs::NUM_OUT => self.state.borrow_mut().num_out = value,
            _ => {}
        }
    }
}

/// Canned bulk-transfer collaborator for tests and demos.
///
/// Records the last input it was handed and returns a fixed output vector —
/// the fabricated data path the original demo used, kept out of the
/// controller and behind the transfer seam where it belongs.
#[derive(Debug, Default)]
pub struct LoopbackTransfer {
    outputs: Vec<i16>,
    last_input: Option<Vec<i16>>,
    fail: bool,
}

impl LoopbackTransfer {
    /// Transfer that yields `outputs` after every inference.
    #[must_use]
    pub fn new(outputs: Vec<i16>) -> Self {
        Self {
            outputs,
            last_input: None,
            fail: false,
        }
    }

    /// Transfer whose operations always fail, for error-path testing.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            outputs: Vec::new(),
            last_input: None,
            fail: true,
        }
    }

    /// The most recent input vector handed to `transfer_input`.
    #[must_use]
    pub fn last_input(&self) -> Option<&[i16]> {
        self.last_input.as_deref()
    }
}

impl BulkTransfer for LoopbackTransfer {
    fn transfer_input(&mut self, samples: &[i16]) -> Result<()> {
        if self.fail {
            return Err(ZynnError::transfer_failed("simulated input stall"));
        }
        self.last_input = Some(samples.to_vec());
        Ok(())
    }

    fn transfer_output(&mut self) -> Result<Vec<i16>> {
        if self.fail {
            return Err(ZynnError::transfer_failed("simulated output stall"));
        }
        Ok(self.outputs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_after_construction() {
        let sim = SimulatedAccelerator::new();
        let word = sim.read32(regs::STATUS);
        assert_eq!(word & status::BUSY, 0);
        assert_eq!(word & status::DONE, 0);
        assert_eq!(status::state(word), 0);
    }

    #[test]
    fn start_requires_enable() {
        let mut sim = SimulatedAccelerator::new();
        sim.write32(regs::CTRL, ctrl::START);
        assert_eq!(sim.read32(regs::STATUS) & status::BUSY, 0);

        sim.write32(regs::CTRL, ctrl::ENABLE | ctrl::START);
        // latency 0: first poll flips straight to DONE
        assert_ne!(sim.read32(regs::STATUS) & status::DONE, 0);
    }

    #[test]
    fn start_bit_self_clears() {
        let mut sim = SimulatedAccelerator::new();
        sim.write32(regs::CTRL, ctrl::ENABLE | ctrl::START);
        assert_eq!(sim.read32(regs::CTRL), ctrl::ENABLE);
    }

    #[test]
    fn done_rises_after_configured_latency() {
        let mut sim = SimulatedAccelerator::with_latency(3);
        sim.write32(regs::CTRL, ctrl::ENABLE | ctrl::START);

        for _ in 0..3 {
            let word = sim.read32(regs::STATUS);
            assert_ne!(word & status::BUSY, 0);
            assert_eq!(word & status::DONE, 0);
        }
        let word = sim.read32(regs::STATUS);
        assert_ne!(word & status::DONE, 0);
        assert_eq!(word & status::BUSY, 0);
    }

    #[test]
    fn wedged_device_stays_busy() {
        let mut sim = SimulatedAccelerator::never_completes();
        sim.write32(regs::CTRL, ctrl::ENABLE | ctrl::START);
        for _ in 0..100 {
            let word = sim.read32(regs::STATUS);
            assert_ne!(word & status::BUSY, 0);
            assert_eq!(word & status::DONE, 0);
        }
    }

    #[test]
    fn soft_reset_clears_everything() {
        let mut sim = SimulatedAccelerator::new();
        sim.write32(regs::NUM_IN, 784);
        sim.write32(regs::CTRL, ctrl::ENABLE | ctrl::START);
        let _ = sim.read32(regs::STATUS); // reach DONE

        sim.write32(regs::CTRL, ctrl::SOFT_RESET);
        assert_eq!(sim.read32(regs::NUM_IN), 0);
        let word = sim.read32(regs::STATUS);
        assert_eq!(word & (status::BUSY | status::DONE), 0);
    }

    #[test]
    fn state_codes_track_lifecycle() {
        let mut sim = SimulatedAccelerator::with_latency(1);
        assert_eq!(status::state(sim.read32(regs::STATUS)), 0x0);
        sim.write32(regs::CTRL, ctrl::ENABLE | ctrl::START);
        assert_eq!(status::state(sim.read32(regs::STATUS)), 0x2);
        assert_eq!(status::state(sim.read32(regs::STATUS)), 0x4);
    }

    #[test]
    fn loopback_records_input_and_replays_output() {
        let mut t = LoopbackTransfer::new(vec![1, 2, 3]);
        t.transfer_input(&[9, 9]).unwrap();
        assert_eq!(t.last_input(), Some(&[9, 9][..]));
        assert_eq!(t.transfer_output().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn failing_loopback_surfaces_transfer_errors() {
        let mut t = LoopbackTransfer::failing();
        assert!(matches!(
            t.transfer_input(&[0]),
            Err(ZynnError::TransferFailed { .. })
        ));
        assert!(matches!(
            t.transfer_output(),
            Err(ZynnError::TransferFailed { .. })
        ));
    }
}

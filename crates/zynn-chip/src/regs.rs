//! AXI-Lite register map for the MLP accelerator IP.
//!
//! The register file sits behind an AXI GP port at a fixed physical base
//! address assigned by the address editor at synthesis time. All registers
//! are 32 bits wide; byte offsets below are relative to that base.
//!
//! ```text
//! 0x00  CTRL      R/W  bit0 ENABLE, bit1 START (self-clearing), bit2 SOFT_RESET
//! 0x04  STATUS    R    bit0 BUSY, bit1 DONE, bits4-7 STATE
//! 0x08  NUM_IN    W    input node count
//! 0x0C  NUM_H1    W    hidden layer 1 size
//! 0x10  NUM_H2    W    hidden layer 2 size
//! 0x14  NUM_OUT   W    output node count
//! ```

/// Default physical base address of the register file (AXI GP0 window).
///
/// Matches the address-editor assignment for the reference bitstream; boards
/// with a different floorplan pass their own base to the driver.
pub const DEFAULT_BASE_ADDR: u64 = 0x43C0_0000;

// ── Control and status ───────────────────────────────────────────────────────

/// Control register.
pub const CTRL: usize = 0x00;
/// Status register (read-only on the AXI side).
pub const STATUS: usize = 0x04;

// ── Topology ─────────────────────────────────────────────────────────────────

/// Input node count register.
pub const NUM_IN: usize = 0x08;
/// Hidden layer 1 size register.
pub const NUM_H1: usize = 0x0C;
/// Hidden layer 2 size register.
pub const NUM_H2: usize = 0x10;
/// Output node count register.
pub const NUM_OUT: usize = 0x14;

// ── Control register bit definitions ─────────────────────────────────────────

pub mod ctrl {
    //! CTRL register bits.

    /// Enable the accelerator.
    pub const ENABLE: u32 = 1 << 0;
    /// Start inference. Self-clearing: the device drops this bit once latched.
    pub const START: u32 = 1 << 1;
    /// Soft reset. Held high for the settle period, then released.
    pub const SOFT_RESET: u32 = 1 << 2;
}

// ── Status register bit definitions ──────────────────────────────────────────

pub mod status {
    //! STATUS register bits and fields.

    /// Inference in progress.
    pub const BUSY: u32 = 1 << 0;
    /// Inference complete.
    pub const DONE: u32 = 1 << 1;
    /// Internal FSM state field mask (bits 4-7).
    pub const STATE_MASK: u32 = 0xF << STATE_SHIFT;
    /// Internal FSM state field shift.
    pub const STATE_SHIFT: u32 = 4;

    /// Extract the 4-bit internal state code from a raw STATUS word.
    ///
    /// The code is device-internal; software may compare it for equality but
    /// must not assign meaning to individual values.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // masked to 4 bits
    pub const fn state(raw: u32) -> u8 {
        ((raw & STATE_MASK) >> STATE_SHIFT) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_offsets_are_word_aligned_and_distinct() {
        let offsets = [CTRL, STATUS, NUM_IN, NUM_H1, NUM_H2, NUM_OUT];
        for (i, &a) in offsets.iter().enumerate() {
            assert_eq!(a % 4, 0, "offset {a:#x} not word-aligned");
            for &b in &offsets[i + 1..] {
                assert_ne!(a, b, "duplicate register offset {a:#x}");
            }
        }
    }

    #[test]
    fn register_layout_matches_rtl() {
        assert_eq!(CTRL, 0x00);
        assert_eq!(STATUS, 0x04);
        assert_eq!(NUM_IN, 0x08);
        assert_eq!(NUM_OUT, 0x14);
    }

    #[test]
    fn control_bits_do_not_overlap() {
        assert_eq!(ctrl::ENABLE & ctrl::START, 0);
        assert_eq!(ctrl::START & ctrl::SOFT_RESET, 0);
        assert_eq!(ctrl::ENABLE | ctrl::START | ctrl::SOFT_RESET, 0b111);
    }

    #[test]
    fn state_field_extraction() {
        assert_eq!(status::state(0x0000_0000), 0);
        assert_eq!(status::state(0x0000_00F0), 0xF);
        assert_eq!(status::state(0x0000_0053), 0x5);
        // Flag bits must not bleed into the state field.
        assert_eq!(status::state(status::BUSY | status::DONE), 0);
    }
}

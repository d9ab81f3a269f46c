//! Q4.11 signed fixed-point encoding.
//!
//! Every sample crossing the accelerator boundary — input pixels, activations,
//! output scores — is a signed 16-bit value with 11 fractional bits
//! (scale 2048): `float_value = raw / 2048`.
//!
//! The hardware testbench encodes with multiply-then-cast, truncating toward
//! zero, **not** round-to-nearest. Software must match that convention so both
//! sides agree bit-for-bit on boundary values. The one divergence from the C
//! toolchain: Rust's `as` cast saturates at the i16 range boundary where the C
//! cast is undefined; saturation is the behavior we want for out-of-range
//! inputs.

// The truncating i16 cast and the i32→f32 scale conversions are the encoding
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

/// Number of fractional bits.
pub const FRAC_BITS: u32 = 11;

/// Scale factor, `2^FRAC_BITS`.
pub const SCALE: i32 = 1 << FRAC_BITS;

/// Smallest float step representable in Q4.11 (one ULP, `1/2048`).
pub const RESOLUTION: f32 = 1.0 / SCALE as f32;

/// Encode a float as a Q4.11 raw sample.
///
/// Truncates toward zero; saturates to `i16::MIN`/`i16::MAX` out of range.
#[must_use]
pub fn from_f32(x: f32) -> i16 {
    // `as` performs truncation toward zero with saturation, matching the
    // testbench's (s16)(x * 2048) for all in-range values.
    (x * SCALE as f32) as i16
}

/// Decode a Q4.11 raw sample to a float. Exact for every raw value.
#[must_use]
pub fn to_f32(raw: i16) -> f32 {
    f32::from(raw) / SCALE as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_2048() {
        assert_eq!(SCALE, 2048);
        assert_eq!(FRAC_BITS, 11);
    }

    #[test]
    fn known_encodings() {
        assert_eq!(from_f32(0.0), 0);
        assert_eq!(from_f32(1.0), 2048);
        assert_eq!(from_f32(-1.0), -2048);
        assert_eq!(from_f32(0.5), 1024);
        assert_eq!(from_f32(0.9), 1843); // 0.9 * 2048 = 1843.2, truncated
    }

    #[test]
    fn truncates_toward_zero_not_nearest() {
        // 0.99951171875 * 2048 = 2047.0 exactly; 0.9999 * 2048 = 2047.7952
        assert_eq!(from_f32(0.9999), 2047);
        // Negative values truncate up toward zero.
        assert_eq!(from_f32(-0.9999), -2047);
    }

    #[test]
    fn saturates_out_of_range() {
        assert_eq!(from_f32(100.0), i16::MAX);
        assert_eq!(from_f32(-100.0), i16::MIN);
    }

    #[test]
    fn round_trip_within_one_ulp() {
        for f in [-15.9, -3.25, -0.001, 0.0, 0.1, 0.9, 1.0, 7.7773, 15.99] {
            let back = to_f32(from_f32(f));
            assert!(
                (back - f).abs() < RESOLUTION,
                "round trip of {f} drifted to {back}"
            );
        }
    }

    #[test]
    fn decode_is_exact() {
        assert!((to_f32(1024) - 0.5).abs() < f32::EPSILON);
        assert!((to_f32(-2048) + 1.0).abs() < f32::EPSILON);
        assert!((to_f32(1) - RESOLUTION).abs() < f32::EPSILON);
    }

    #[test]
    fn comparison_order_matches_float_order() {
        // Raw signed comparison must agree with decoded float comparison —
        // the interpreter relies on this to arg-max without conversion.
        let samples = [-2048i16, -1, 0, 1, 205, 1843, 2047];
        for w in samples.windows(2) {
            assert!(w[0] < w[1]);
            assert!(to_f32(w[0]) < to_f32(w[1]));
        }
    }
}

//! Inference output interpretation
//!
//! Turns the raw Q4.11 output vector (one score per class) into a class label
//! and a normalized confidence.

use crate::error::{Result, ZynnError};
use zynn_chip::fixed;

/// A classified inference output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Index of the winning class.
    pub index: usize,
    /// Normalized confidence. Nominally in `[0, 1]`; see [`confidence`] for
    /// the degenerate cases where it is not.
    pub confidence: f32,
}

/// Arg-max over the output vector.
///
/// Compares raw fixed-point values directly — Q-format ordering matches float
/// ordering when the fractional bit count matches, so no conversion is
/// needed. Ties go to the first index attaining the maximum (scan order;
/// later equal values never displace the current winner).
///
/// # Errors
///
/// Returns [`ZynnError::EmptyOutputVector`] on an empty vector.
pub fn classify(outputs: &[i16]) -> Result<usize> {
    let (first, rest) = outputs
        .split_first()
        .ok_or(ZynnError::EmptyOutputVector)?;

    let mut max_idx = 0;
    let mut max_val = *first;
    for (i, &v) in rest.iter().enumerate() {
        if v > max_val {
            max_val = v;
            max_idx = i + 1;
        }
    }
    Ok(max_idx)
}

/// Confidence of the selected class: `selected / sum` over float-converted
/// samples when the sum is positive.
///
/// When the sum is zero or negative the raw selected value is returned
/// unchanged — a normalization heuristic, not a true probability. With
/// negative or all-non-positive vectors the result can fall outside `[0, 1]`;
/// this behavior is part of the contract and is preserved deliberately.
///
/// # Errors
///
/// Returns [`ZynnError::EmptyOutputVector`] on an empty vector and
/// [`ZynnError::InvalidClassIndex`] when `class_index` is out of range.
pub fn confidence(outputs: &[i16], class_index: usize) -> Result<f32> {
    if outputs.is_empty() {
        return Err(ZynnError::EmptyOutputVector);
    }
    if class_index >= outputs.len() {
        return Err(ZynnError::InvalidClassIndex {
            index: class_index,
            count: outputs.len(),
        });
    }

    let value = fixed::to_f32(outputs[class_index]);
    let sum: f32 = outputs.iter().map(|&s| fixed::to_f32(s)).sum();

    if sum > 0.0 {
        Ok(value / sum)
    } else {
        Ok(value)
    }
}

/// Classify and score in one call.
///
/// # Errors
///
/// Returns [`ZynnError::EmptyOutputVector`] on an empty vector.
pub fn interpret(outputs: &[i16]) -> Result<Classification> {
    let index = classify(outputs)?;
    let confidence = confidence(outputs, index)?;
    Ok(Classification { index, confidence })
}

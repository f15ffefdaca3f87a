// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Methods to turn raw generator words into more constrained data types.

use crate::error::{Result, RqsError};

/// 2**32 as f64, the divisor mapping a u32 onto [0, 1).
pub const U32_RANGE: f64 = 4294967296.0;

/// Threshold separating the two classes of the runs test.
pub const BIT_THRESHOLD: f64 = 0.5;

/// Maps a u32 to the 0..1 range in f64.
/// Every u32 is exactly representable, so the result is always < 1.0.
pub fn u32_to_unit(int: u32) -> f64 {
    int as f64 / U32_RANGE
}

/// Normalize a sample sequence into [0, 1), preserving order.
/// Fails on an empty sequence.
pub fn normalize(samples: &[u32]) -> Result<Vec<f64>> {
    if samples.is_empty() {
        return Err(RqsError::invalid("sample sequence is empty"));
    }
    Ok(samples.iter().map(|&x| u32_to_unit(x)).collect())
}

/// Binarize unit floats at 0.5: values >= 0.5 become 1.
pub fn to_bitstream(u: &[f64]) -> Vec<u8> {
    u.iter().map(|&v| (v >= BIT_THRESHOLD) as u8).collect()
}

//! Fixed-point angles.
//!
//! An `angle[n]` holds an unsigned n-bit fraction of a full turn:
//! `value = raw / 2^n * 2π` with `raw ∈ [0, 2^n)`.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::bits::BitContainer;
use crate::error::{ClassicalError, ClassicalResult};
use crate::types::{MAX_WORD_WIDTH, ScalarType};

/// How an angle is narrowed to fewer bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleNarrowing {
    /// Round to the nearest representable value, ties to even.
    Round,
    /// Drop the discarded least-significant bits.
    Truncate,
}

/// An n-bit fixed-point angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Angle {
    raw: u64,
    width: u32,
}

pub(crate) fn width_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

impl Angle {
    /// Create an angle from its raw fraction.
    pub fn from_raw(raw: u64, width: u32) -> ClassicalResult<Self> {
        ScalarType::Angle(width).validate()?;
        if raw & !width_mask(width) != 0 {
            return Err(ClassicalError::WidthMismatch {
                expected: width,
                got: 64 - raw.leading_zeros(),
            });
        }
        Ok(Self { raw, width })
    }

    /// Quantize a real angle in radians.
    ///
    /// The input is reduced modulo 2π into `[0, 2π)` first, then rounded to the
    /// nearest n-bit value with ties going to the even raw value. A result that
    /// rounds up to a full turn wraps to zero.
    pub fn from_radians(radians: f64, width: u32) -> ClassicalResult<Self> {
        ScalarType::Angle(width).validate()?;
        if !radians.is_finite() {
            return Err(ClassicalError::NonFiniteAngle(radians));
        }
        let mut reduced = radians.rem_euclid(TAU);
        if reduced >= TAU {
            reduced = 0.0;
        }
        let scale = 2f64.powi(width as i32);
        let rounded = (reduced / TAU * scale).round_ties_even();
        let raw = if rounded >= scale { 0 } else { rounded as u64 };
        Ok(Self { raw, width })
    }

    /// Raw n-bit fraction.
    pub fn raw(&self) -> u64 {
        self.raw
    }

    /// Width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Value in radians, in `[0, 2π)`.
    pub fn to_radians(&self) -> f64 {
        self.raw as f64 / 2f64.powi(self.width as i32) * TAU
    }

    /// Reinterpret at a different width.
    ///
    /// Widening pads with zero least-significant bits. Narrowing discards
    /// least-significant bits according to `narrowing`.
    pub fn resize(&self, width: u32, narrowing: AngleNarrowing) -> ClassicalResult<Self> {
        ScalarType::Angle(width).validate()?;
        let raw = if width >= self.width {
            self.raw << (width - self.width)
        } else {
            let shift = self.width - width;
            let kept = self.raw >> shift;
            match narrowing {
                AngleNarrowing::Truncate => kept,
                AngleNarrowing::Round => {
                    let dropped = self.raw & width_mask(shift);
                    let half = 1u64 << (shift - 1);
                    if dropped > half || (dropped == half && kept & 1 == 1) {
                        (kept + 1) & width_mask(width)
                    } else {
                        kept
                    }
                }
            }
        };
        Ok(Self { raw, width })
    }

    /// Exact little-endian bit copy.
    pub fn to_bits(&self) -> BitContainer {
        BitContainer::from_u64(self.raw, self.width as usize)
    }

    /// Inverse of [`Angle::to_bits`].
    pub fn from_bits(bits: &BitContainer) -> ClassicalResult<Self> {
        let width = u32::try_from(bits.len()).map_err(|_| ClassicalError::InvalidWidth {
            kind: "angle",
            width: u32::MAX,
        })?;
        ScalarType::Angle(width).validate()?;
        Ok(Self {
            raw: bits.to_u64(),
            width,
        })
    }
}

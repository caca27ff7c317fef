//! Fixed-length bit containers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ClassicalError, ClassicalResult};
use crate::index::{IndexSpec, resolve_index, resolve_index_set};

/// An ordered, fixed-length sequence of bits.
///
/// Position 0 is the least-significant bit. The length never changes after
/// construction; slice writes must supply exactly as many bits as they replace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitContainer {
    bits: Vec<bool>,
}

impl BitContainer {
    /// Create an all-zero container.
    pub fn zeros(width: usize) -> Self {
        Self {
            bits: vec![false; width],
        }
    }

    /// Create a container from bits in little-endian order.
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Parse a bit string such as `"0110"`; the leftmost character is the MSB.
    ///
    /// Underscores are digit separators and do not count toward the width.
    pub fn from_str_bits(text: &str, width: usize) -> ClassicalResult<Self> {
        let digits: Vec<char> = text.chars().filter(|&c| c != '_').collect();
        if digits.len() != width {
            return Err(ClassicalError::LengthMismatch {
                expected: width,
                got: digits.len(),
            });
        }
        let bits = digits
            .iter()
            .rev()
            .map(|&c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(ClassicalError::invalid_argument(
                    "bit string",
                    format!("unexpected character '{other}'"),
                )),
            })
            .collect::<ClassicalResult<Vec<bool>>>()?;
        Ok(Self { bits })
    }

    /// Little-endian copy of the low `width` bits of `value`.
    pub fn from_u64(value: u64, width: usize) -> Self {
        let bits = (0..width).map(|i| i < 64 && (value >> i) & 1 == 1).collect();
        Self { bits }
    }

    /// Read the container back as an unsigned word. Bits past 64 are ignored.
    pub fn to_u64(&self) -> u64 {
        self.bits
            .iter()
            .take(64)
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc | (u64::from(b) << i))
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if the container holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Iterate from LSB to MSB.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Read a single bit; negative indices count from the MSB end.
    pub fn get(&self, index: i64) -> ClassicalResult<bool> {
        let pos = resolve_index(index, self.len())?;
        Ok(self.bits[pos])
    }

    /// Write a single bit.
    pub fn set(&mut self, index: i64, bit: bool) -> ClassicalResult<()> {
        let pos = resolve_index(index, self.len())?;
        self.bits[pos] = bit;
        Ok(())
    }

    /// Copy out the bits selected by an index set, in index-set order.
    pub fn slice_get(&self, spec: &IndexSpec) -> ClassicalResult<BitContainer> {
        let positions = resolve_index_set(spec, self.len())?;
        Ok(Self {
            bits: positions.iter().map(|&p| self.bits[p]).collect(),
        })
    }

    /// Overwrite the bits selected by an index set.
    pub fn slice_set(&mut self, spec: &IndexSpec, value: &BitContainer) -> ClassicalResult<()> {
        let positions = resolve_index_set(spec, self.len())?;
        if positions.len() != value.len() {
            return Err(ClassicalError::ShapeMismatch {
                expected: format!("bit[{}]", positions.len()),
                got: format!("bit[{}]", value.len()),
            });
        }
        for (&pos, bit) in positions.iter().zip(value.iter()) {
            self.bits[pos] = bit;
        }
        Ok(())
    }

    /// Rotate toward the MSB by `distance`; negative distances rotate right.
    #[must_use]
    pub fn rotl(&self, distance: i64) -> BitContainer {
        let len = self.len();
        if len == 0 {
            return self.clone();
        }
        let shift = distance.rem_euclid(len as i64) as usize;
        let mut bits = vec![false; len];
        for (i, &b) in self.bits.iter().enumerate() {
            bits[(i + shift) % len] = b;
        }
        Self { bits }
    }

    /// Rotate toward the LSB by `distance`.
    #[must_use]
    pub fn rotr(&self, distance: i64) -> BitContainer {
        self.rotl(distance.wrapping_neg())
    }

    /// Number of set bits.
    pub fn popcount(&self) -> u64 {
        self.bits.iter().filter(|&&b| b).count() as u64
    }

    /// `self ++ other`: the bits of `self` occupy the low positions.
    #[must_use]
    pub fn concat(&self, other: &BitContainer) -> BitContainer {
        let mut bits = self.bits.clone();
        bits.extend_from_slice(&other.bits);
        Self { bits }
    }

    /// Return `true` if any bit is set.
    pub fn any(&self) -> bool {
        self.bits.iter().any(|&b| b)
    }
}

impl fmt::Display for BitContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.bits.iter().rev() {
            write!(f, "{}", if b { '1' } else { '0' })?;
        }
        Ok(())
    }
}

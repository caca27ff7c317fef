//! Classical type tags.
//!
//! Widths are runtime values carried on the tag, never inferred: `int[8]` and
//! `int[16]` are distinct types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ClassicalError, ClassicalResult};

/// Largest width supported for `int`, `uint` and `angle` payloads.
pub const MAX_WORD_WIDTH: u32 = 64;

/// Maximum number of array dimensions.
pub const MAX_ARRAY_DIMS: usize = 7;

/// A classical scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// `bool`
    Bool,
    /// `int[n]`, two's complement.
    Int(u32),
    /// `uint[n]`
    UInt(u32),
    /// `float[n]`, IEEE 754 binary32 or binary64.
    Float(u32),
    /// `angle[n]`, an n-bit fraction of 2π.
    Angle(u32),
    /// `bit[n]`; a lone `bit` is `bit[1]`.
    Bit(u32),
    /// `complex[float[n]]`; the width is that of each component.
    Complex(u32),
    /// `duration`
    Duration,
    /// `stretch`
    Stretch,
}

impl ScalarType {
    /// Check that the declared width is one this core can represent.
    pub fn validate(&self) -> ClassicalResult<()> {
        let (kind, width, ok) = match *self {
            ScalarType::Int(w) => ("int", w, (1..=MAX_WORD_WIDTH).contains(&w)),
            ScalarType::UInt(w) => ("uint", w, (1..=MAX_WORD_WIDTH).contains(&w)),
            ScalarType::Angle(w) => ("angle", w, (1..=MAX_WORD_WIDTH).contains(&w)),
            ScalarType::Float(w) => ("float", w, w == 32 || w == 64),
            ScalarType::Complex(w) => ("complex", w, w == 32 || w == 64),
            ScalarType::Bit(w) => ("bit", w, w >= 1),
            ScalarType::Bool | ScalarType::Duration | ScalarType::Stretch => return Ok(()),
        };
        if ok {
            Ok(())
        } else {
            Err(ClassicalError::InvalidWidth { kind, width })
        }
    }

    /// Bit width of the type, if it has one.
    pub fn width(&self) -> Option<u32> {
        match *self {
            ScalarType::Int(w)
            | ScalarType::UInt(w)
            | ScalarType::Float(w)
            | ScalarType::Angle(w)
            | ScalarType::Bit(w)
            | ScalarType::Complex(w) => Some(w),
            ScalarType::Bool | ScalarType::Duration | ScalarType::Stretch => None,
        }
    }

    /// The component type of a complex type.
    pub fn component_type(&self) -> Option<ScalarType> {
        match *self {
            ScalarType::Complex(w) => Some(ScalarType::Float(w)),
            _ => None,
        }
    }

    /// Return `true` for `int`, `uint` and `float`.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ScalarType::Int(_) | ScalarType::UInt(_) | ScalarType::Float(_)
        )
    }

    /// Return `true` if the type has a little-endian bit representation.
    pub fn is_bit_indexable(&self) -> bool {
        matches!(
            self,
            ScalarType::Int(_) | ScalarType::UInt(_) | ScalarType::Angle(_) | ScalarType::Bit(_)
        )
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::Bool => write!(f, "bool"),
            ScalarType::Int(w) => write!(f, "int[{w}]"),
            ScalarType::UInt(w) => write!(f, "uint[{w}]"),
            ScalarType::Float(w) => write!(f, "float[{w}]"),
            ScalarType::Angle(w) => write!(f, "angle[{w}]"),
            ScalarType::Bit(w) => write!(f, "bit[{w}]"),
            ScalarType::Complex(w) => write!(f, "complex[float[{w}]]"),
            ScalarType::Duration => write!(f, "duration"),
            ScalarType::Stretch => write!(f, "stretch"),
        }
    }
}

/// The statically declared type of a classical array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayType {
    /// Element type, shared by every element.
    pub element: ScalarType,
    /// Extent of each dimension, outermost first.
    pub shape: Vec<usize>,
}

impl ArrayType {
    /// Create an array type, validating the element width and dimension count.
    pub fn new(element: ScalarType, shape: Vec<usize>) -> ClassicalResult<Self> {
        element.validate()?;
        if shape.is_empty() || shape.len() > MAX_ARRAY_DIMS {
            return Err(ClassicalError::TooManyDimensions(shape.len()));
        }
        Ok(Self { element, shape })
    }

    /// Total number of elements.
    pub fn num_elements(&self) -> usize {
        self.shape.iter().product()
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self.shape.iter().map(ToString::to_string).collect();
        write!(f, "array[{}, {}]", self.element, dims.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_widths() {
        assert!(ScalarType::Int(64).validate().is_ok());
        assert!(ScalarType::UInt(1).validate().is_ok());
        assert!(ScalarType::Float(32).validate().is_ok());
        assert!(ScalarType::Bit(1024).validate().is_ok());

        assert!(matches!(
            ScalarType::Int(0).validate(),
            Err(ClassicalError::InvalidWidth { kind: "int", width: 0 })
        ));
        assert!(ScalarType::Angle(65).validate().is_err());
        assert!(ScalarType::Float(16).validate().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ScalarType::Int(8).to_string(), "int[8]");
        assert_eq!(ScalarType::Complex(64).to_string(), "complex[float[64]]");
        let arr = ArrayType::new(ScalarType::UInt(8), vec![2, 3]).unwrap();
        assert_eq!(arr.to_string(), "array[uint[8], 2, 3]");
        assert_eq!(arr.num_elements(), 6);
    }

    #[test]
    fn test_array_dims_limit() {
        assert!(ArrayType::new(ScalarType::Bool, vec![1; 7]).is_ok());
        assert!(matches!(
            ArrayType::new(ScalarType::Bool, vec![1; 8]),
            Err(ClassicalError::TooManyDimensions(8))
        ));
    }

    #[test]
    fn test_component_type() {
        assert_eq!(
            ScalarType::Complex(32).component_type(),
            Some(ScalarType::Float(32))
        );
        assert!(ScalarType::Float(32).component_type().is_none());
    }
}

//! Typed scalar values.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::angle::{Angle, width_mask};
use crate::bits::BitContainer;
use crate::duration::{Duration, TimeUnit};
use crate::error::{ClassicalError, ClassicalResult};
use crate::index::IndexSpec;
use crate::types::ScalarType;

/// A scalar value whose payload always agrees with its declared width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    Bool(bool),
    /// Two's complement value, sign-extended into an `i64`.
    Int { value: i64, width: u32 },
    /// Value masked to `width` bits.
    UInt { value: u64, width: u32 },
    /// Binary32 values are stored widened; they always round-trip through `f32`.
    Float { value: f64, width: u32 },
    Angle(Angle),
    Bit(BitContainer),
    Complex { value: Complex64, width: u32 },
    Duration(Duration),
    /// A stretch whose length is resolved by the scheduler, outside this core.
    Stretch,
}

/// A literal handed over by the front end, before it meets its declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Bool(bool),
    Int(i128),
    Float(f64),
    /// Bit string as written, MSB first, e.g. `"0110"`.
    BitString(String),
    Duration(Duration),
    Complex { re: f64, im: f64 },
}

impl Literal {
    fn kind(&self) -> &'static str {
        match self {
            Literal::Bool(_) => "bool literal",
            Literal::Int(_) => "integer literal",
            Literal::Float(_) => "float literal",
            Literal::BitString(_) => "bit string literal",
            Literal::Duration(_) => "duration literal",
            Literal::Complex { .. } => "complex literal",
        }
    }
}

/// Sign-extend the low `width` bits of `raw`.
pub(crate) fn sign_extend(raw: u64, width: u32) -> i64 {
    if width >= 64 {
        return raw as i64;
    }
    let shift = 64 - width;
    ((raw << shift) as i64) >> shift
}

/// Minimum two's complement width holding `n`.
fn signed_bits(n: i128) -> u32 {
    if n >= 0 {
        129 - n.leading_zeros()
    } else {
        129 - n.leading_ones()
    }
}

fn unsigned_bits(n: i128) -> u32 {
    (128 - n.leading_zeros()).max(1)
}

fn to_float_width(value: f64, width: u32) -> f64 {
    if width == 32 {
        f64::from(value as f32)
    } else {
        value
    }
}

impl ScalarValue {
    /// `int[width]`; fails if `value` needs more bits.
    pub fn int(value: i64, width: u32) -> ClassicalResult<Self> {
        ScalarType::Int(width).validate()?;
        let needed = signed_bits(i128::from(value));
        if needed > width {
            return Err(ClassicalError::WidthMismatch {
                expected: width,
                got: needed,
            });
        }
        Ok(ScalarValue::Int { value, width })
    }

    /// `uint[width]`; fails if `value` needs more bits.
    pub fn uint(value: u64, width: u32) -> ClassicalResult<Self> {
        ScalarType::UInt(width).validate()?;
        let needed = unsigned_bits(i128::from(value));
        if needed > width {
            return Err(ClassicalError::WidthMismatch {
                expected: width,
                got: needed,
            });
        }
        Ok(ScalarValue::UInt { value, width })
    }

    /// `float[width]`; binary32 values are rounded to the nearest `f32`.
    pub fn float(value: f64, width: u32) -> ClassicalResult<Self> {
        ScalarType::Float(width).validate()?;
        Ok(ScalarValue::Float {
            value: to_float_width(value, width),
            width,
        })
    }

    /// `angle[width]` from radians.
    pub fn angle(radians: f64, width: u32) -> ClassicalResult<Self> {
        Ok(ScalarValue::Angle(Angle::from_radians(radians, width)?))
    }

    /// Build a complex value from two real components.
    ///
    /// Both components must be floats of the same width.
    pub fn complex(re: &ScalarValue, im: &ScalarValue) -> ClassicalResult<Self> {
        match (re, im) {
            (
                ScalarValue::Float { value: r, width: wr },
                ScalarValue::Float { value: i, width: wi },
            ) if wr == wi => Ok(ScalarValue::Complex {
                value: Complex64::new(*r, *i),
                width: *wr,
            }),
            _ => Err(ClassicalError::ComponentTypeMismatch {
                real: re.scalar_type().to_string(),
                imag: im.scalar_type().to_string(),
            }),
        }
    }

    /// Bind a literal to its declared type.
    pub fn from_literal(literal: &Literal, ty: ScalarType) -> ClassicalResult<Self> {
        ty.validate()?;
        match (literal, ty) {
            (Literal::Bool(b), ScalarType::Bool) => Ok(ScalarValue::Bool(*b)),
            (Literal::Int(n), ScalarType::Int(w)) => {
                let needed = signed_bits(*n);
                if needed > w {
                    return Err(ClassicalError::WidthMismatch { expected: w, got: needed });
                }
                Ok(ScalarValue::Int { value: *n as i64, width: w })
            }
            (Literal::Int(n), ScalarType::UInt(w)) => {
                let needed = if *n < 0 { signed_bits(*n) } else { unsigned_bits(*n) };
                if *n < 0 || needed > w {
                    return Err(ClassicalError::WidthMismatch { expected: w, got: needed });
                }
                Ok(ScalarValue::UInt { value: *n as u64, width: w })
            }
            (Literal::Int(n), ScalarType::Float(w)) => ScalarValue::float(*n as f64, w),
            (Literal::Float(x), ScalarType::Float(w)) => ScalarValue::float(*x, w),
            (Literal::Int(n), ScalarType::Angle(w)) => ScalarValue::angle(*n as f64, w),
            (Literal::Float(x), ScalarType::Angle(w)) => ScalarValue::angle(*x, w),
            (Literal::Int(n), ScalarType::Complex(w)) => Ok(ScalarValue::Complex {
                value: Complex64::new(to_float_width(*n as f64, w), 0.0),
                width: w,
            }),
            (Literal::Float(x), ScalarType::Complex(w)) => Ok(ScalarValue::Complex {
                value: Complex64::new(to_float_width(*x, w), 0.0),
                width: w,
            }),
            (Literal::Complex { re, im }, ScalarType::Complex(w)) => Ok(ScalarValue::Complex {
                value: Complex64::new(to_float_width(*re, w), to_float_width(*im, w)),
                width: w,
            }),
            (Literal::BitString(s), ScalarType::Bit(w)) => {
                Ok(ScalarValue::Bit(BitContainer::from_str_bits(s, w as usize)?))
            }
            (Literal::Duration(d), ScalarType::Duration) => Ok(ScalarValue::Duration(*d)),
            _ => Err(ClassicalError::illegal_cast(literal.kind(), ty)),
        }
    }

    /// The type tag of this value.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ScalarValue::Bool(_) => ScalarType::Bool,
            ScalarValue::Int { width, .. } => ScalarType::Int(*width),
            ScalarValue::UInt { width, .. } => ScalarType::UInt(*width),
            ScalarValue::Float { width, .. } => ScalarType::Float(*width),
            ScalarValue::Angle(a) => ScalarType::Angle(a.width()),
            ScalarValue::Bit(bits) => ScalarType::Bit(bits.len() as u32),
            ScalarValue::Complex { width, .. } => ScalarType::Complex(*width),
            ScalarValue::Duration(_) => ScalarType::Duration,
            ScalarValue::Stretch => ScalarType::Stretch,
        }
    }

    /// Zero value of a type, as produced by an uninitialized declaration.
    pub fn zero(ty: ScalarType) -> ClassicalResult<Self> {
        ty.validate()?;
        Ok(match ty {
            ScalarType::Bool => ScalarValue::Bool(false),
            ScalarType::Int(width) => ScalarValue::Int { value: 0, width },
            ScalarType::UInt(width) => ScalarValue::UInt { value: 0, width },
            ScalarType::Float(width) => ScalarValue::Float { value: 0.0, width },
            ScalarType::Angle(width) => ScalarValue::Angle(Angle::from_raw(0, width)?),
            ScalarType::Bit(width) => ScalarValue::Bit(BitContainer::zeros(width as usize)),
            ScalarType::Complex(width) => ScalarValue::Complex {
                value: Complex64::new(0.0, 0.0),
                width,
            },
            ScalarType::Duration => ScalarValue::Duration(Duration::new(0.0, TimeUnit::Ns)),
            ScalarType::Stretch => ScalarValue::Stretch,
        })
    }

    /// Little-endian bit view of an `int`, `uint`, `angle` or `bit` value.
    pub fn bits(&self) -> ClassicalResult<BitContainer> {
        match self {
            ScalarValue::Int { value, width } => {
                Ok(BitContainer::from_u64(*value as u64, *width as usize))
            }
            ScalarValue::UInt { value, width } => {
                Ok(BitContainer::from_u64(*value, *width as usize))
            }
            ScalarValue::Angle(a) => Ok(a.to_bits()),
            ScalarValue::Bit(bits) => Ok(bits.clone()),
            other => Err(ClassicalError::NotBitIndexable(
                other.scalar_type().to_string(),
            )),
        }
    }

    /// Rebuild a value of the same type from a full-width bit pattern.
    fn replace_bits(&self, bits: BitContainer) -> ClassicalResult<Self> {
        match self {
            ScalarValue::Int { width, .. } => Ok(ScalarValue::Int {
                value: sign_extend(bits.to_u64(), *width),
                width: *width,
            }),
            ScalarValue::UInt { width, .. } => Ok(ScalarValue::UInt {
                value: bits.to_u64() & width_mask(*width),
                width: *width,
            }),
            ScalarValue::Angle(_) => Ok(ScalarValue::Angle(Angle::from_bits(&bits)?)),
            ScalarValue::Bit(_) => Ok(ScalarValue::Bit(bits)),
            other => Err(ClassicalError::NotBitIndexable(
                other.scalar_type().to_string(),
            )),
        }
    }

    /// Read bits of the value selected by `spec`, e.g. `x[0:3]`.
    pub fn get_bits(&self, spec: &IndexSpec) -> ClassicalResult<BitContainer> {
        self.bits()?.slice_get(spec)
    }

    /// Return a copy with the bits selected by `spec` overwritten, e.g. `x[0] = 1`.
    pub fn with_bits(&self, spec: &IndexSpec, value: &BitContainer) -> ClassicalResult<Self> {
        let mut bits = self.bits()?;
        bits.slice_set(spec, value)?;
        self.replace_bits(bits)
    }

    /// Real value of a numeric or angle scalar, used by built-in functions.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Int { value, .. } => Some(*value as f64),
            ScalarValue::UInt { value, .. } => Some(*value as f64),
            ScalarValue::Float { value, .. } => Some(*value),
            ScalarValue::Angle(a) => Some(a.to_radians()),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{b}"),
            ScalarValue::Int { value, .. } => write!(f, "{value}"),
            ScalarValue::UInt { value, .. } => write!(f, "{value}"),
            ScalarValue::Float { value, .. } => write!(f, "{value}"),
            ScalarValue::Angle(a) => write!(f, "{}", a.to_radians()),
            ScalarValue::Bit(bits) => write!(f, "\"{bits}\""),
            ScalarValue::Complex { value, .. } => write!(f, "{} + {}im", value.re, value.im),
            ScalarValue::Duration(d) => write!(f, "{d}"),
            ScalarValue::Stretch => write!(f, "stretch"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_width_check() {
        assert!(ScalarValue::int(127, 8).is_ok());
        assert!(ScalarValue::int(-128, 8).is_ok());
        assert!(matches!(
            ScalarValue::int(128, 8),
            Err(ClassicalError::WidthMismatch { expected: 8, got: 9 })
        ));
        assert!(ScalarValue::uint(255, 8).is_ok());
        assert!(ScalarValue::uint(256, 8).is_err());
    }

    #[test]
    fn test_literal_binding() {
        let v = ScalarValue::from_literal(&Literal::Int(5), ScalarType::UInt(4)).unwrap();
        assert_eq!(v, ScalarValue::UInt { value: 5, width: 4 });

        assert!(matches!(
            ScalarValue::from_literal(&Literal::Int(-1), ScalarType::UInt(4)),
            Err(ClassicalError::WidthMismatch { .. })
        ));
        assert!(matches!(
            ScalarValue::from_literal(&Literal::Float(1.5), ScalarType::Int(8)),
            Err(ClassicalError::IllegalCast { .. })
        ));

        let b = ScalarValue::from_literal(&Literal::BitString("101".into()), ScalarType::Bit(3))
            .unwrap();
        assert_eq!(b.scalar_type(), ScalarType::Bit(3));
        assert!(matches!(
            ScalarValue::from_literal(&Literal::BitString("101".into()), ScalarType::Bit(4)),
            Err(ClassicalError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_float32_rounding() {
        let v = ScalarValue::float(0.1, 32).unwrap();
        assert_eq!(v.as_f64(), Some(f64::from(0.1f32)));
    }

    #[test]
    fn test_complex_components_must_match() {
        let re = ScalarValue::float(1.0, 64).unwrap();
        let im = ScalarValue::float(2.0, 64).unwrap();
        let c = ScalarValue::complex(&re, &im).unwrap();
        assert_eq!(c.scalar_type(), ScalarType::Complex(64));

        let im32 = ScalarValue::float(2.0, 32).unwrap();
        assert!(matches!(
            ScalarValue::complex(&re, &im32),
            Err(ClassicalError::ComponentTypeMismatch { .. })
        ));
        let int = ScalarValue::int(2, 32).unwrap();
        assert!(ScalarValue::complex(&re, &int).is_err());
    }

    #[test]
    fn test_bit_level_access_on_int() {
        let x = ScalarValue::int(-2, 4).unwrap();
        assert_eq!(x.bits().unwrap().to_string(), "1110");
        let low = x.get_bits(&IndexSpec::Single(0)).unwrap();
        assert!(!low.get(0).unwrap());

        let one = BitContainer::from_str_bits("1", 1).unwrap();
        let y = x.with_bits(&IndexSpec::Single(0), &one).unwrap();
        assert_eq!(y, ScalarValue::Int { value: -1, width: 4 });

        let zero = BitContainer::from_str_bits("0", 1).unwrap();
        let z = x.with_bits(&IndexSpec::Single(-1), &zero).unwrap();
        assert_eq!(z, ScalarValue::Int { value: 6, width: 4 });
    }

    #[test]
    fn test_float_not_bit_indexable() {
        let f = ScalarValue::float(1.0, 64).unwrap();
        assert!(matches!(f.bits(), Err(ClassicalError::NotBitIndexable(_))));
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(
            ScalarValue::zero(ScalarType::Bit(3)).unwrap(),
            ScalarValue::Bit(BitContainer::zeros(3))
        );
        assert!(ScalarValue::zero(ScalarType::Int(0)).is_err());
    }
}

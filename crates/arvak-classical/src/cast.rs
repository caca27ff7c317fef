//! Explicit casts between classical scalar types.
//!
//! Legality lives in [`check_cast`], one exhaustive match over (source, target)
//! type pairs. Adding a type variant fails to compile until every pairing with
//! it has been decided. [`cast`] performs the conversion once a pair is legal.
//!
//! Implementation-defined behavior, fixed for every program:
//! - narrowing `int`/`uint` conversions wrap modulo `2^n` (two's complement);
//! - `float -> int/uint` truncates toward zero, saturates to 64 bits, then wraps
//!   to the target width; NaN converts to 0;
//! - identical source and target types cast to themselves.

use tracing::trace;

use crate::angle::{Angle, width_mask};
use crate::bits::BitContainer;
use crate::error::{ClassicalError, ClassicalResult};
use crate::types::ScalarType;
use crate::value::{ScalarValue, sign_extend};

/// Decide whether `from` may be cast to `to`.
///
/// Returns `IllegalCast` for pairs outside the matrix and `WidthMismatch` for
/// bit-level reinterpretations between different widths.
pub fn check_cast(from: ScalarType, to: ScalarType) -> ClassicalResult<()> {
    use ScalarType::{Angle, Bit, Bool, Complex, Duration, Float, Int, Stretch, UInt};

    if from == to {
        return Ok(());
    }
    let illegal = || Err(ClassicalError::illegal_cast(from, to));
    let same_width = |expected: u32, got: u32| {
        if expected == got {
            Ok(())
        } else {
            Err(ClassicalError::WidthMismatch { expected, got })
        }
    };

    match (from, to) {
        (Bool, Int(_) | UInt(_) | Float(_)) => Ok(()),
        (Bool, Bit(n)) => same_width(n, 1),
        (Bool, Bool | Angle(_) | Complex(_) | Duration | Stretch) => illegal(),

        (Int(_), Bool | Int(_) | UInt(_) | Float(_)) => Ok(()),
        (Int(w), Bit(n)) => same_width(n, w),
        (Int(_), Angle(_) | Complex(_) | Duration | Stretch) => illegal(),

        (UInt(_), Bool | Int(_) | UInt(_) | Float(_)) => Ok(()),
        (UInt(w), Bit(n)) => same_width(n, w),
        (UInt(_), Angle(_) | Complex(_) | Duration | Stretch) => illegal(),

        (Float(_), Bool | Int(_) | UInt(_) | Angle(_)) => Ok(()),
        (Float(_), Float(_) | Bit(_) | Complex(_) | Duration | Stretch) => illegal(),

        (Angle(_), Bool) => Ok(()),
        (Angle(w), Bit(n)) => same_width(n, w),
        (Angle(_), Int(_) | UInt(_) | Float(_) | Angle(_) | Complex(_) | Duration | Stretch) => {
            illegal()
        }

        (Bit(_), Bool) => Ok(()),
        (Bit(w), Int(n) | UInt(n) | Angle(n)) => same_width(n, w),
        (Bit(_), Float(_) | Bit(_) | Complex(_) | Duration | Stretch) => illegal(),

        (
            Complex(_),
            Bool | Int(_) | UInt(_) | Float(_) | Angle(_) | Bit(_) | Complex(_) | Duration
            | Stretch,
        ) => illegal(),

        (
            Duration | Stretch,
            Bool | Int(_) | UInt(_) | Float(_) | Angle(_) | Bit(_) | Complex(_) | Duration
            | Stretch,
        ) => illegal(),
    }
}

/// Return `true` if [`check_cast`] accepts the pair.
pub fn can_cast(from: ScalarType, to: ScalarType) -> bool {
    check_cast(from, to).is_ok()
}

fn float_to_word(value: f64) -> u64 {
    let truncated = value.trunc();
    if truncated < 0.0 {
        (truncated as i64) as u64
    } else {
        truncated as u64
    }
}

fn float_width(value: f64, width: u32) -> f64 {
    if width == 32 {
        f64::from(value as f32)
    } else {
        value
    }
}

/// Cast `value` to `target`.
pub fn cast(value: &ScalarValue, target: ScalarType) -> ClassicalResult<ScalarValue> {
    target.validate()?;
    let source = value.scalar_type();
    check_cast(source, target)?;
    trace!(%source, %target, "cast");
    if source == target {
        return Ok(value.clone());
    }

    let converted = match (value, target) {
        (ScalarValue::Bool(b), ScalarType::Int(width)) => ScalarValue::Int {
            value: i64::from(*b),
            width,
        },
        (ScalarValue::Bool(b), ScalarType::UInt(width)) => ScalarValue::UInt {
            value: u64::from(*b),
            width,
        },
        (ScalarValue::Bool(b), ScalarType::Float(width)) => ScalarValue::Float {
            value: if *b { 1.0 } else { 0.0 },
            width,
        },
        (ScalarValue::Bool(b), ScalarType::Bit(_)) => {
            ScalarValue::Bit(BitContainer::from_bits(vec![*b]))
        }

        (ScalarValue::Int { value, .. }, ScalarType::Bool) => ScalarValue::Bool(*value != 0),
        (ScalarValue::Int { value, .. }, ScalarType::Int(width)) => ScalarValue::Int {
            value: sign_extend(*value as u64, width),
            width,
        },
        (ScalarValue::Int { value, .. }, ScalarType::UInt(width)) => ScalarValue::UInt {
            value: (*value as u64) & width_mask(width),
            width,
        },
        (ScalarValue::Int { value, .. }, ScalarType::Float(width)) => ScalarValue::Float {
            value: float_width(*value as f64, width),
            width,
        },
        (ScalarValue::Int { value, width }, ScalarType::Bit(_)) => {
            ScalarValue::Bit(BitContainer::from_u64(*value as u64, *width as usize))
        }

        (ScalarValue::UInt { value, .. }, ScalarType::Bool) => ScalarValue::Bool(*value != 0),
        (ScalarValue::UInt { value, .. }, ScalarType::Int(width)) => ScalarValue::Int {
            value: sign_extend(*value, width),
            width,
        },
        (ScalarValue::UInt { value, .. }, ScalarType::UInt(width)) => ScalarValue::UInt {
            value: *value & width_mask(width),
            width,
        },
        (ScalarValue::UInt { value, .. }, ScalarType::Float(width)) => ScalarValue::Float {
            value: float_width(*value as f64, width),
            width,
        },
        (ScalarValue::UInt { value, width }, ScalarType::Bit(_)) => {
            ScalarValue::Bit(BitContainer::from_u64(*value, *width as usize))
        }

        (ScalarValue::Float { value, .. }, ScalarType::Bool) => ScalarValue::Bool(*value != 0.0),
        (ScalarValue::Float { value, .. }, ScalarType::Int(width)) => ScalarValue::Int {
            value: sign_extend(float_to_word(*value), width),
            width,
        },
        (ScalarValue::Float { value, .. }, ScalarType::UInt(width)) => ScalarValue::UInt {
            value: float_to_word(*value) & width_mask(width),
            width,
        },
        (ScalarValue::Float { value, .. }, ScalarType::Angle(width)) => {
            ScalarValue::Angle(Angle::from_radians(*value, width)?)
        }

        (ScalarValue::Angle(a), ScalarType::Bool) => ScalarValue::Bool(a.raw() != 0),
        (ScalarValue::Angle(a), ScalarType::Bit(_)) => ScalarValue::Bit(a.to_bits()),

        (ScalarValue::Bit(bits), ScalarType::Bool) => ScalarValue::Bool(bits.any()),
        (ScalarValue::Bit(bits), ScalarType::Int(width)) => ScalarValue::Int {
            value: sign_extend(bits.to_u64(), width),
            width,
        },
        (ScalarValue::Bit(bits), ScalarType::UInt(width)) => ScalarValue::UInt {
            value: bits.to_u64(),
            width,
        },
        (ScalarValue::Bit(bits), ScalarType::Angle(_)) => {
            ScalarValue::Angle(Angle::from_bits(bits)?)
        }

        _ => return Err(ClassicalError::illegal_cast(source, target)),
    };
    Ok(converted)
}

//! Built-in math functions.
//!
//! Each function has a fixed table of accepted argument types. [`Builtin::result_type`]
//! applies that table; [`Builtin::call`] checks it again and evaluates with `f64`
//! or [`Complex64`] arithmetic.
//!
//! `mod` follows the sign of the dividend, like C's `%` and `fmod`. `popcount`
//! returns a `uint[64]`.

use num_complex::Complex64;
use std::fmt;

use crate::angle::width_mask;
use crate::bits::BitContainer;
use crate::error::{ClassicalError, ClassicalResult};
use crate::types::ScalarType;
use crate::value::{ScalarValue, sign_extend};

/// Width of the `uint` returned by `popcount`.
const POPCOUNT_WIDTH: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Arccos,
    Arcsin,
    Arctan,
    Ceiling,
    Cos,
    Exp,
    Floor,
    Log,
    Mod,
    Popcount,
    Pow,
    Rotl,
    Rotr,
    Sin,
    Sqrt,
    Tan,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        let builtin = match name {
            "arccos" => Builtin::Arccos,
            "arcsin" => Builtin::Arcsin,
            "arctan" => Builtin::Arctan,
            "ceiling" => Builtin::Ceiling,
            "cos" => Builtin::Cos,
            "exp" => Builtin::Exp,
            "floor" => Builtin::Floor,
            "log" => Builtin::Log,
            "mod" => Builtin::Mod,
            "popcount" => Builtin::Popcount,
            "pow" => Builtin::Pow,
            "rotl" => Builtin::Rotl,
            "rotr" => Builtin::Rotr,
            "sin" => Builtin::Sin,
            "sqrt" => Builtin::Sqrt,
            "tan" => Builtin::Tan,
            _ => return None,
        };
        Some(builtin)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Arccos => "arccos",
            Builtin::Arcsin => "arcsin",
            Builtin::Arctan => "arctan",
            Builtin::Ceiling => "ceiling",
            Builtin::Cos => "cos",
            Builtin::Exp => "exp",
            Builtin::Floor => "floor",
            Builtin::Log => "log",
            Builtin::Mod => "mod",
            Builtin::Popcount => "popcount",
            Builtin::Pow => "pow",
            Builtin::Rotl => "rotl",
            Builtin::Rotr => "rotr",
            Builtin::Sin => "sin",
            Builtin::Sqrt => "sqrt",
            Builtin::Tan => "tan",
        }
    }

    fn arity(&self) -> usize {
        match self {
            Builtin::Mod | Builtin::Pow | Builtin::Rotl | Builtin::Rotr => 2,
            _ => 1,
        }
    }

    fn reject(&self, args: &[ScalarType]) -> ClassicalError {
        let types: Vec<String> = args.iter().map(ToString::to_string).collect();
        ClassicalError::invalid_argument(
            self.name(),
            format!("no overload for ({})", types.join(", ")),
        )
    }

    /// Result type for the given argument types.
    pub fn result_type(&self, args: &[ScalarType]) -> ClassicalResult<ScalarType> {
        use ScalarType::{Angle, Bit, Complex, Float, Int, UInt};

        if args.len() != self.arity() {
            return Err(ClassicalError::invalid_argument(
                self.name(),
                format!("expected {} arguments, got {}", self.arity(), args.len()),
            ));
        }
        let resolved = match (self, args) {
            (
                Builtin::Arccos
                | Builtin::Arcsin
                | Builtin::Arctan
                | Builtin::Ceiling
                | Builtin::Floor
                | Builtin::Log,
                [Float(w)],
            ) => Float(*w),
            (Builtin::Cos | Builtin::Sin | Builtin::Tan, [Float(w)]) => Float(*w),
            (Builtin::Cos | Builtin::Sin | Builtin::Tan, [Angle(_)]) => Float(64),
            (Builtin::Exp | Builtin::Sqrt, [Float(w)]) => Float(*w),
            (Builtin::Exp | Builtin::Sqrt, [Complex(w)]) => Complex(*w),
            (Builtin::Mod, [Int(a), Int(b)]) => Int(*a.max(b)),
            (Builtin::Mod, [UInt(a), UInt(b)]) => UInt(*a.max(b)),
            (Builtin::Mod, [Float(a), Float(b)]) => Float(*a.max(b)),
            (Builtin::Popcount, [Bit(_)]) => UInt(POPCOUNT_WIDTH),
            (Builtin::Pow, [Int(w), UInt(_)]) => Int(*w),
            (Builtin::Pow, [Float(a), Float(b)]) => Float(*a.max(b)),
            (Builtin::Pow, [Complex(a), Complex(b)]) => Complex(*a.max(b)),
            (Builtin::Rotl | Builtin::Rotr, [Bit(w), Int(_) | UInt(_)]) => Bit(*w),
            (Builtin::Rotl | Builtin::Rotr, [UInt(w), Int(_) | UInt(_)]) => UInt(*w),
            _ => return Err(self.reject(args)),
        };
        Ok(resolved)
    }

    /// Evaluate the function.
    pub fn call(&self, args: &[ScalarValue]) -> ClassicalResult<ScalarValue> {
        let types: Vec<ScalarType> = args.iter().map(ScalarValue::scalar_type).collect();
        let result = self.result_type(&types)?;

        let value = match (self, args) {
            (_, [ScalarValue::Complex { value, .. }]) => {
                let z = match self {
                    Builtin::Exp => value.exp(),
                    _ => value.sqrt(),
                };
                complex(z, result)
            }
            (
                Builtin::Pow,
                [ScalarValue::Complex { value: a, .. }, ScalarValue::Complex { value: b, .. }],
            ) => complex(a.powc(*b), result),
            (Builtin::Pow, [ScalarValue::Int { value, .. }, ScalarValue::UInt { value: e, .. }]) => {
                let exponent = u32::try_from(*e).unwrap_or(u32::MAX);
                ScalarValue::Int {
                    value: sign_extend(value.wrapping_pow(exponent) as u64, result_width(result)),
                    width: result_width(result),
                }
            }
            (Builtin::Mod, [ScalarValue::Int { value: a, .. }, ScalarValue::Int { value: b, .. }]) => {
                if *b == 0 {
                    return Err(ClassicalError::DivisionByZero);
                }
                ScalarValue::Int {
                    value: a.wrapping_rem(*b),
                    width: result_width(result),
                }
            }
            (
                Builtin::Mod,
                [ScalarValue::UInt { value: a, .. }, ScalarValue::UInt { value: b, .. }],
            ) => {
                if *b == 0 {
                    return Err(ClassicalError::DivisionByZero);
                }
                ScalarValue::UInt {
                    value: a % b,
                    width: result_width(result),
                }
            }
            (Builtin::Popcount, [ScalarValue::Bit(bits)]) => ScalarValue::UInt {
                value: bits.popcount(),
                width: POPCOUNT_WIDTH,
            },
            (Builtin::Rotl | Builtin::Rotr, [target, distance]) => {
                let distance = match distance {
                    ScalarValue::Int { value, .. } => *value,
                    ScalarValue::UInt { value, .. } => *value as i64,
                    _ => return Err(self.reject(&types)),
                };
                rotate(*self, target, distance)?
            }
            (_, [x]) => {
                let x = x.as_f64().ok_or_else(|| self.reject(&types))?;
                let y = match self {
                    Builtin::Arccos => x.acos(),
                    Builtin::Arcsin => x.asin(),
                    Builtin::Arctan => x.atan(),
                    Builtin::Ceiling => x.ceil(),
                    Builtin::Floor => x.floor(),
                    Builtin::Cos => x.cos(),
                    Builtin::Sin => x.sin(),
                    Builtin::Tan => x.tan(),
                    Builtin::Exp => x.exp(),
                    Builtin::Log => x.ln(),
                    Builtin::Sqrt => x.sqrt(),
                    _ => return Err(self.reject(&types)),
                };
                ScalarValue::float(y, result_width(result))?
            }
            (Builtin::Mod | Builtin::Pow, [a, b]) => {
                let (a, b) = match (a.as_f64(), b.as_f64()) {
                    (Some(a), Some(b)) => (a, b),
                    _ => return Err(self.reject(&types)),
                };
                let y = if *self == Builtin::Mod {
                    if b == 0.0 {
                        return Err(ClassicalError::DivisionByZero);
                    }
                    a % b
                } else {
                    a.powf(b)
                };
                ScalarValue::float(y, result_width(result))?
            }
            _ => return Err(self.reject(&types)),
        };
        Ok(value)
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn result_width(ty: ScalarType) -> u32 {
    ty.width().unwrap_or(64)
}

fn complex(z: Complex64, ty: ScalarType) -> ScalarValue {
    let width = result_width(ty);
    let narrow = |x: f64| if width == 32 { f64::from(x as f32) } else { x };
    ScalarValue::Complex {
        value: Complex64::new(narrow(z.re), narrow(z.im)),
        width,
    }
}

fn rotate(op: Builtin, target: &ScalarValue, distance: i64) -> ClassicalResult<ScalarValue> {
    let distance = if op == Builtin::Rotr {
        distance.wrapping_neg()
    } else {
        distance
    };
    match target {
        ScalarValue::Bit(bits) => Ok(ScalarValue::Bit(bits.rotl(distance))),
        ScalarValue::UInt { value, width } => {
            let rotated = BitContainer::from_u64(*value, *width as usize).rotl(distance);
            Ok(ScalarValue::UInt {
                value: rotated.to_u64() & width_mask(*width),
                width: *width,
            })
        }
        other => Err(ClassicalError::invalid_argument(
            op.name(),
            format!("cannot rotate {}", other.scalar_type()),
        )),
    }
}

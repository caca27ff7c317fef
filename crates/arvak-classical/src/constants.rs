//! Built-in real constants.

use std::f64::consts::{E, PI, TAU};

use crate::value::ScalarValue;

/// A named constant. Every constant is a `float[64]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    Tau,
    Euler,
}

impl Constant {
    /// Look up by identifier, ASCII or symbolic.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" | "π" => Some(Constant::Pi),
            "tau" | "τ" => Some(Constant::Tau),
            "euler" | "ℇ" => Some(Constant::Euler),
            _ => None,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => PI,
            Constant::Tau => TAU,
            Constant::Euler => E,
        }
    }

    /// The constant as a `float[64]` value.
    pub fn to_scalar(&self) -> ScalarValue {
        ScalarValue::Float {
            value: self.value(),
            width: 64,
        }
    }
}

/// Resolve a constant identifier to its value.
pub fn lookup(name: &str) -> Option<ScalarValue> {
    Constant::from_name(name).map(|c| c.to_scalar())
}

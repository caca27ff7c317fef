//! Error types for the classical type core.

use thiserror::Error;

/// Errors that can occur while constructing, casting or indexing classical values.
///
/// Every error is reported at the point of occurrence and leaves storage untouched.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ClassicalError {
    /// The (source, target) pair is not in the cast matrix.
    #[error("Illegal cast from {from} to {to}")]
    IllegalCast {
        /// Source type.
        from: String,
        /// Target type.
        to: String,
    },

    /// Bit-level reinterpretation attempted across differing widths.
    #[error("Width mismatch: expected {expected} bits, got {got}")]
    WidthMismatch {
        /// Width required by the target.
        expected: u32,
        /// Width supplied by the source.
        got: u32,
    },

    /// Real and imaginary components differ in type.
    #[error("Complex components must share a float type, got {real} and {imag}")]
    ComponentTypeMismatch {
        /// Type of the real component.
        real: String,
        /// Type of the imaginary component.
        imag: String,
    },

    /// Index outside `[-length, length)`.
    #[error("Index {index} out of range for length {length}")]
    IndexOutOfRange {
        /// The index as written.
        index: i64,
        /// Length of the indexed dimension.
        length: usize,
    },

    /// An index set resolved to no positions where at least one is required.
    #[error("Index set resolves to no positions")]
    EmptyIndexSet,

    /// A range with step 0.
    #[error("Range step must be non-zero")]
    ZeroStep,

    /// A register concatenated with storage it already references.
    #[error("Concatenation refers to the same storage more than once")]
    SelfConcatenation,

    /// Assignment between differently shaped or typed containers.
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch {
        /// Shape (and element type) of the target.
        expected: String,
        /// Shape (and element type) of the value.
        got: String,
    },

    /// A bit string whose length differs from the declared width.
    #[error("Length mismatch: expected {expected} bits, got {got}")]
    LengthMismatch {
        /// Declared length.
        expected: usize,
        /// Supplied length.
        got: usize,
    },

    /// A width outside what the type supports.
    #[error("Invalid width {width} for {kind}")]
    InvalidWidth {
        /// Type family, e.g. `int`.
        kind: &'static str,
        /// Offending width.
        width: u32,
    },

    /// Arrays are limited to seven dimensions.
    #[error("Arrays support at most 7 dimensions, got {0}")]
    TooManyDimensions(usize),

    /// NaN or infinite input to angle quantization.
    #[error("Cannot represent non-finite value {0} as an angle")]
    NonFiniteAngle(f64),

    /// `dt` durations mixed with SI durations.
    #[error("Cannot combine durations in '{left}' and '{right}'")]
    DurationUnitMismatch {
        /// Unit of the left operand.
        left: String,
        /// Unit of the right operand.
        right: String,
    },

    /// Division by a zero duration or zero modulus.
    #[error("Division by zero")]
    DivisionByZero,

    /// Bit-level indexing applied to a type without a bit representation.
    #[error("Values of type {0} cannot be indexed at the bit level")]
    NotBitIndexable(String),

    /// A built-in function called with arguments outside its type table.
    #[error("Invalid arguments to '{function}': {message}")]
    InvalidArgument {
        /// Built-in function name.
        function: String,
        /// What was wrong.
        message: String,
    },

    /// Identifier not bound in any enclosing scope.
    #[error("Undefined identifier: {0}")]
    UndefinedIdentifier(String),

    /// Identifier already bound in the current scope.
    #[error("Redeclaration of '{0}'")]
    Redeclaration(String),

    /// Qubit, register and array declarations are global-scope only.
    #[error("'{0}' must be declared in the global scope")]
    NotInGlobalScope(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClassicalError {
    pub(crate) fn illegal_cast(from: impl ToString, to: impl ToString) -> Self {
        ClassicalError::IllegalCast {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub(crate) fn invalid_argument(function: &str, message: impl Into<String>) -> Self {
        ClassicalError::InvalidArgument {
            function: function.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for classical type operations.
pub type ClassicalResult<T> = Result<T, ClassicalError>;

//! Arvak Classical Type Core
//!
//! This crate implements the classical half of OpenQASM 3: fixed-width scalar
//! values, the explicit cast matrix, bit containers, index sets, arrays and
//! qubit/bit registers. A front end hands it typed literals and parsed index
//! expressions; it hands back typed values or a precise error.
//!
//! # Core Components
//!
//! - **Types and values**: [`ScalarType`], [`ScalarValue`], [`Angle`], [`Duration`]
//! - **Casts**: [`cast`] and [`check_cast`], one exhaustive match over type pairs
//! - **Bits**: [`BitContainer`], little-endian (index 0 is the least significant bit)
//! - **Indexing**: [`IndexSpec`] and [`resolve_index_set`]
//! - **Arrays**: [`ArrayValue`], copied on read and borrowed on assignment
//! - **Registers**: [`QubitRegister`], [`BitRegister`], references into [`Storage`]
//! - **Program state**: [`ClassicalContext`], configured by [`ClassicalConfig`]
//!
//! # Example: Casting and Bit Access
//!
//! ```rust
//! use arvak_classical::{cast, IndexSpec, ScalarType, ScalarValue};
//!
//! let x = ScalarValue::int(-1, 8).unwrap();
//! let u = cast(&x, ScalarType::UInt(8)).unwrap();
//! assert_eq!(u, ScalarValue::uint(255, 8).unwrap());
//!
//! let low = u.get_bits(&IndexSpec::span(0, 3)).unwrap();
//! assert_eq!(low.to_string(), "1111");
//! ```
//!
//! # Example: Registers Are References
//!
//! ```rust
//! use arvak_classical::{
//!     AngleNarrowing, BitContainer, ClassicalConfig, ClassicalContext, IndexSpec,
//!     SelfConcatPolicy,
//! };
//!
//! let config = ClassicalConfig::new(AngleNarrowing::Round, SelfConcatPolicy::Permit);
//! let mut ctx = ClassicalContext::new(config);
//!
//! let c = ctx.declare_bits("c", 6, None).unwrap();
//! ctx.alias_bits("picked", c.slice(&IndexSpec::Set(vec![0, 3, 5])).unwrap())
//!     .unwrap();
//!
//! let ones = BitContainer::from_str_bits("111", 3).unwrap();
//! ctx.write_bits("picked", &IndexSpec::full(), &ones).unwrap();
//! assert_eq!(ctx.read_bits("c", &IndexSpec::full()).unwrap().to_string(), "101001");
//! ```

pub mod angle;
pub mod array;
pub mod bits;
pub mod builtins;
pub mod cast;
pub mod config;
pub mod constants;
pub mod context;
pub mod duration;
pub mod error;
pub mod index;
pub mod register;
pub mod scope;
pub mod storage;
pub mod types;
pub mod value;

pub use angle::{Angle, AngleNarrowing};
pub use array::{ArraySliceMut, ArrayValue, Indexed};
pub use bits::BitContainer;
pub use builtins::Builtin;
pub use cast::{can_cast, cast, check_cast};
pub use config::{ClassicalConfig, SelfConcatPolicy};
pub use constants::Constant;
pub use context::ClassicalContext;
pub use duration::{Duration, TimeUnit};
pub use error::{ClassicalError, ClassicalResult};
pub use index::{IndexSpec, Positions, concat_positions, resolve_index, resolve_index_set};
pub use register::{BitRegister, QubitRegister, Register, StorageId};
pub use scope::{Binding, ScopeKind, ScopeStack};
pub use storage::{ClbitId, QubitId, Storage};
pub use types::{ArrayType, ScalarType};
pub use value::{Literal, ScalarValue};

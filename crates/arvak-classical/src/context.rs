//! Program-wide classical state.
//!
//! [`ClassicalContext`] owns the storage arena, the scope stack and the policy
//! configuration of one program. The configuration is fixed when the context
//! is created.

use tracing::{debug, info, instrument};

use crate::angle::Angle;
use crate::array::{ArrayValue, Indexed};
use crate::bits::BitContainer;
use crate::cast::cast;
use crate::config::{ClassicalConfig, SelfConcatPolicy};
use crate::constants;
use crate::error::{ClassicalError, ClassicalResult};
use crate::index::IndexSpec;
use crate::register::{BitRegister, QubitRegister};
use crate::scope::{Binding, ScopeStack};
use crate::storage::Storage;
use crate::types::{ArrayType, ScalarType};
use crate::value::ScalarValue;

/// Classical state of a single program.
#[derive(Debug, Clone)]
pub struct ClassicalContext {
    config: ClassicalConfig,
    storage: Storage,
    scopes: ScopeStack,
}

impl ClassicalContext {
    /// Create a context with empty storage and only the global scope.
    pub fn new(config: ClassicalConfig) -> Self {
        info!(%config, "created classical context");
        Self {
            config,
            storage: Storage::new(),
            scopes: ScopeStack::new(),
        }
    }

    pub fn config(&self) -> &ClassicalConfig {
        &self.config
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    // ------------------------------------------------------------------
    // Scopes
    // ------------------------------------------------------------------

    /// Open a block scope.
    pub fn enter_scope(&mut self) {
        self.scopes.enter();
    }

    /// Close the innermost block scope. Closing the global scope is a no-op.
    pub fn exit_scope(&mut self) {
        if self.scopes.exit().is_none() {
            debug!("exit_scope at global scope ignored");
        }
    }

    fn check_free(&self, name: &str) -> ClassicalResult<()> {
        if constants::lookup(name).is_some() {
            return Err(ClassicalError::Redeclaration(name.to_string()));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    /// `qubit[size] name;`
    #[instrument(skip(self))]
    pub fn declare_qubits(&mut self, name: &str, size: usize) -> ClassicalResult<QubitRegister> {
        self.check_free(name)?;
        if !self.scopes.is_global() {
            return Err(ClassicalError::NotInGlobalScope(name.to_string()));
        }
        if size == 0 {
            return Err(ClassicalError::InvalidWidth {
                kind: "qubit",
                width: 0,
            });
        }
        // Checked before allocating so a failed declaration leaves storage untouched.
        if self.scopes.contains(name) {
            return Err(ClassicalError::Redeclaration(name.to_string()));
        }
        let register = QubitRegister::from_ids(self.storage.alloc_qubits(size)?).with_label(name);
        self.scopes.declare(name, Binding::Qubits(register.clone()))?;
        Ok(register)
    }

    /// `bit[size] name;`, optionally initialized.
    #[instrument(skip(self, init))]
    pub fn declare_bits(
        &mut self,
        name: &str,
        size: usize,
        init: Option<&BitContainer>,
    ) -> ClassicalResult<BitRegister> {
        self.check_free(name)?;
        if !self.scopes.is_global() {
            return Err(ClassicalError::NotInGlobalScope(name.to_string()));
        }
        if size == 0 {
            return Err(ClassicalError::InvalidWidth {
                kind: "bit",
                width: 0,
            });
        }
        if let Some(value) = init {
            if value.len() != size {
                return Err(ClassicalError::LengthMismatch {
                    expected: size,
                    got: value.len(),
                });
            }
        }
        if self.scopes.contains(name) {
            return Err(ClassicalError::Redeclaration(name.to_string()));
        }
        let register = BitRegister::from_ids(self.storage.alloc_bits(size)?).with_label(name);
        if let Some(value) = init {
            register.write(&mut self.storage, value)?;
        }
        self.scopes.declare(name, Binding::Bits(register.clone()))?;
        Ok(register)
    }

    /// Declare a classical scalar in the current scope.
    ///
    /// The initializer, if any, is converted to `ty` as by assignment.
    #[instrument(skip(self, init))]
    pub fn declare_scalar(
        &mut self,
        name: &str,
        ty: ScalarType,
        init: Option<&ScalarValue>,
    ) -> ClassicalResult<ScalarValue> {
        self.check_free(name)?;
        let value = match init {
            Some(v) => self.convert(v, ty)?,
            None => ScalarValue::zero(ty)?,
        };
        self.scopes.declare(name, Binding::Scalar(value.clone()))?;
        Ok(value)
    }

    /// Declare a global array, zero-initialized or from row-major elements.
    #[instrument(skip(self, elements))]
    pub fn declare_array(
        &mut self,
        name: &str,
        ty: ArrayType,
        elements: Option<Vec<ScalarValue>>,
    ) -> ClassicalResult<()> {
        self.check_free(name)?;
        if !self.scopes.is_global() {
            return Err(ClassicalError::NotInGlobalScope(name.to_string()));
        }
        let array = match elements {
            Some(values) => {
                let converted = values
                    .iter()
                    .map(|v| self.convert(v, ty.element))
                    .collect::<ClassicalResult<Vec<_>>>()?;
                ArrayValue::from_elements(ty.element, ty.shape, converted)?
            }
            None => ArrayValue::new(ty)?,
        };
        self.scopes.declare(name, Binding::Array(array))
    }

    /// `let name = register;` for qubits. Never allocates.
    #[instrument(skip(self, target), fields(len = target.len()))]
    pub fn alias_qubits(&mut self, name: &str, target: QubitRegister) -> ClassicalResult<()> {
        self.check_free(name)?;
        self.scopes
            .declare(name, Binding::QubitAlias(target.with_label(name)))
    }

    /// `let name = register;` for classical bits. Never allocates.
    #[instrument(skip(self, target), fields(len = target.len()))]
    pub fn alias_bits(&mut self, name: &str, target: BitRegister) -> ClassicalResult<()> {
        self.check_free(name)?;
        self.scopes
            .declare(name, Binding::BitAlias(target.with_label(name)))
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Current value of a scalar or built-in constant.
    pub fn scalar(&self, name: &str) -> ClassicalResult<ScalarValue> {
        match self.scopes.lookup(name) {
            Ok(Binding::Scalar(value)) => Ok(value.clone()),
            Ok(other) => Err(ClassicalError::ShapeMismatch {
                expected: "scalar".to_string(),
                got: other.kind().to_string(),
            }),
            Err(err) => constants::lookup(name).ok_or(err),
        }
    }

    /// The qubit register or alias bound to `name`.
    pub fn qubits(&self, name: &str) -> ClassicalResult<QubitRegister> {
        match self.scopes.lookup(name)? {
            Binding::Qubits(r) | Binding::QubitAlias(r) => Ok(r.clone()),
            other => Err(ClassicalError::ShapeMismatch {
                expected: "qubit register".to_string(),
                got: other.kind().to_string(),
            }),
        }
    }

    /// The bit register or alias bound to `name`.
    pub fn bits(&self, name: &str) -> ClassicalResult<BitRegister> {
        match self.scopes.lookup(name)? {
            Binding::Bits(r) | Binding::BitAlias(r) => Ok(r.clone()),
            other => Err(ClassicalError::ShapeMismatch {
                expected: "bit register".to_string(),
                got: other.kind().to_string(),
            }),
        }
    }

    /// The array bound to `name`.
    pub fn array(&self, name: &str) -> ClassicalResult<&ArrayValue> {
        match self.scopes.lookup(name)? {
            Binding::Array(a) => Ok(a),
            other => Err(ClassicalError::ShapeMismatch {
                expected: "array".to_string(),
                got: other.kind().to_string(),
            }),
        }
    }

    fn array_mut(&mut self, name: &str) -> ClassicalResult<&mut ArrayValue> {
        match self.scopes.lookup_mut(name)? {
            Binding::Array(a) => Ok(a),
            other => Err(ClassicalError::ShapeMismatch {
                expected: "array".to_string(),
                got: other.kind().to_string(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Conversion and assignment
    // ------------------------------------------------------------------

    /// Change an angle's width using the program's narrowing policy.
    pub fn resize_angle(&self, angle: &Angle, width: u32) -> ClassicalResult<Angle> {
        angle.resize(width, self.config.angle_narrowing)
    }

    /// Implicit conversion applied on declaration and assignment.
    ///
    /// Angle-to-angle conversion across widths uses the configured narrowing
    /// policy; everything else follows the cast matrix.
    pub fn convert(&self, value: &ScalarValue, ty: ScalarType) -> ClassicalResult<ScalarValue> {
        match (value, ty) {
            (ScalarValue::Angle(a), ScalarType::Angle(width)) => {
                Ok(ScalarValue::Angle(self.resize_angle(a, width)?))
            }
            _ => cast(value, ty),
        }
    }

    /// `name = value;` for a scalar, converting to the declared type.
    #[instrument(skip(self, value))]
    pub fn assign_scalar(&mut self, name: &str, value: &ScalarValue) -> ClassicalResult<()> {
        let declared = match self.scopes.lookup(name)? {
            Binding::Scalar(current) => current.scalar_type(),
            other => {
                return Err(ClassicalError::ShapeMismatch {
                    expected: "scalar".to_string(),
                    got: other.kind().to_string(),
                });
            }
        };
        let converted = self.convert(value, declared)?;
        if let Binding::Scalar(slot) = self.scopes.lookup_mut(name)? {
            *slot = converted;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Slices
    // ------------------------------------------------------------------

    /// Read bits from a bit register, alias or bit-indexable scalar.
    pub fn read_bits(&self, name: &str, spec: &IndexSpec) -> ClassicalResult<BitContainer> {
        match self.scopes.lookup(name)? {
            Binding::Bits(r) | Binding::BitAlias(r) => r.read_slice(&self.storage, spec),
            Binding::Scalar(value) => value.get_bits(spec),
            other => Err(ClassicalError::NotBitIndexable(other.kind().to_string())),
        }
    }

    /// Write bits into a bit register, alias or bit-indexable scalar.
    #[instrument(skip(self, value), fields(len = value.len()))]
    pub fn write_bits(
        &mut self,
        name: &str,
        spec: &IndexSpec,
        value: &BitContainer,
    ) -> ClassicalResult<()> {
        match self.scopes.lookup_mut(name)? {
            Binding::Bits(r) | Binding::BitAlias(r) => {
                let register = r.clone();
                register.write_slice(&mut self.storage, spec, value)
            }
            Binding::Scalar(slot) => {
                let updated = slot.with_bits(spec, value)?;
                *slot = updated;
                Ok(())
            }
            other => Err(ClassicalError::NotBitIndexable(other.kind().to_string())),
        }
    }

    /// `a[subscript]`: always a copy.
    pub fn read_array(&self, name: &str, subscript: &[IndexSpec]) -> ClassicalResult<Indexed> {
        self.array(name)?.get(subscript)
    }

    /// `a[subscript] = value;`: writes land in the declared array.
    #[instrument(skip(self, subscript, value))]
    pub fn assign_array(
        &mut self,
        name: &str,
        subscript: &[IndexSpec],
        value: &Indexed,
    ) -> ClassicalResult<()> {
        self.array_mut(name)?.assign(subscript, value)
    }

    // ------------------------------------------------------------------
    // Concatenation
    // ------------------------------------------------------------------

    /// `a ++ b` over qubit registers. Overlapping storage is rejected.
    pub fn concat_qubits(
        &self,
        left: &QubitRegister,
        right: &QubitRegister,
    ) -> ClassicalResult<QubitRegister> {
        left.concat(right)
    }

    /// `a ++ b` over bit registers. Overlapping storage is rejected.
    pub fn concat_bits(&self, left: &BitRegister, right: &BitRegister) -> ClassicalResult<BitRegister> {
        left.concat(right)
    }

    /// `f(a ++ b)` where `a` and `b` name arrays.
    ///
    /// Arrays are copied on concatenation, so the only restriction is the
    /// configured self-concatenation policy for call arguments.
    pub fn concat_array_argument(&self, left: &str, right: &str) -> ClassicalResult<ArrayValue> {
        if left == right && self.config.array_call_self_concat == SelfConcatPolicy::Forbid {
            return Err(ClassicalError::SelfConcatenation);
        }
        self.array(left)?.concat(self.array(right)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::AngleNarrowing;

    fn context(narrowing: AngleNarrowing, policy: SelfConcatPolicy) -> ClassicalContext {
        ClassicalContext::new(ClassicalConfig::new(narrowing, policy))
    }

    #[test]
    fn test_scalar_lifecycle() {
        let mut ctx = context(AngleNarrowing::Round, SelfConcatPolicy::Permit);
        ctx.declare_scalar("x", ScalarType::Int(8), None).unwrap();
        ctx.assign_scalar("x", &ScalarValue::Bool(true)).unwrap();
        assert_eq!(ctx.scalar("x").unwrap(), ScalarValue::int(1, 8).unwrap());

        ctx.enter_scope();
        ctx.declare_scalar("y", ScalarType::Bool, None).unwrap();
        ctx.exit_scope();
        assert!(matches!(
            ctx.scalar("y"),
            Err(ClassicalError::UndefinedIdentifier(_))
        ));
    }

    #[test]
    fn test_constants_visible_and_reserved() {
        let mut ctx = context(AngleNarrowing::Round, SelfConcatPolicy::Permit);
        assert_eq!(ctx.scalar("π").unwrap(), constants::lookup("pi").unwrap());
        assert!(matches!(
            ctx.declare_scalar("tau", ScalarType::Float(64), None),
            Err(ClassicalError::Redeclaration(_))
        ));
    }

    #[test]
    fn test_angle_assignment_uses_policy() {
        // 0b0111 at width 4 narrows to 0b10 (round) or 0b01 (truncate).
        let raw = ScalarValue::Angle(Angle::from_raw(0b0111, 4).unwrap());
        let cases = [(AngleNarrowing::Round, 0b10), (AngleNarrowing::Truncate, 0b01)];
        for (narrowing, expected) in cases {
            let mut ctx = context(narrowing, SelfConcatPolicy::Permit);
            ctx.declare_scalar("a", ScalarType::Angle(2), Some(&raw))
                .unwrap();
            let ScalarValue::Angle(a) = ctx.scalar("a").unwrap() else {
                panic!("expected an angle");
            };
            assert_eq!(a.raw(), expected);
        }
    }

    #[test]
    fn test_registers_global_only() {
        let mut ctx = context(AngleNarrowing::Round, SelfConcatPolicy::Permit);
        ctx.enter_scope();
        assert!(matches!(
            ctx.declare_qubits("q", 2),
            Err(ClassicalError::NotInGlobalScope(_))
        ));
        assert_eq!(ctx.storage().num_qubits(), 0);
    }

    #[test]
    fn test_alias_writes_through() {
        let mut ctx = context(AngleNarrowing::Round, SelfConcatPolicy::Permit);
        let c = ctx.declare_bits("c", 4, None).unwrap();
        ctx.alias_bits("hi", c.slice(&IndexSpec::span(2, 3)).unwrap())
            .unwrap();
        ctx.write_bits("hi", &IndexSpec::full(), &BitContainer::from_str_bits("11", 2).unwrap())
            .unwrap();
        assert_eq!(
            ctx.read_bits("c", &IndexSpec::full()).unwrap().to_string(),
            "1100"
        );
    }

    #[test]
    fn test_array_self_concat_policy() {
        let ty = ArrayType::new(ScalarType::Int(8), vec![2]).unwrap();
        let mut permit = context(AngleNarrowing::Round, SelfConcatPolicy::Permit);
        permit.declare_array("a", ty.clone(), None).unwrap();
        assert_eq!(permit.concat_array_argument("a", "a").unwrap().shape(), &[4]);

        let mut forbid = context(AngleNarrowing::Round, SelfConcatPolicy::Forbid);
        forbid.declare_array("a", ty, None).unwrap();
        assert!(matches!(
            forbid.concat_array_argument("a", "a"),
            Err(ClassicalError::SelfConcatenation)
        ));
    }
}

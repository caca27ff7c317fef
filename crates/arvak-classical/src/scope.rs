//! Lexical scopes and the symbols bound in them.
//!
//! The outermost frame is the global scope. Qubit and bit registers and arrays
//! may only be declared there; classical scalars and `let` aliases may appear
//! in any block and are dropped when it closes.

use rustc_hash::FxHashMap;
use std::fmt;
use tracing::{debug, trace};

use crate::array::ArrayValue;
use crate::error::{ClassicalError, ClassicalResult};
use crate::register::{BitRegister, QubitRegister};
use crate::value::ScalarValue;

/// What a name refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// A classical scalar; its declared type is the value's type.
    Scalar(ScalarValue),
    /// An array value.
    Array(ArrayValue),
    /// A declared qubit register.
    Qubits(QubitRegister),
    /// A declared classical bit register.
    Bits(BitRegister),
    /// `let` alias to qubit storage.
    QubitAlias(QubitRegister),
    /// `let` alias to classical bit storage.
    BitAlias(BitRegister),
}

impl Binding {
    /// Short description for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Binding::Scalar(_) => "scalar",
            Binding::Array(_) => "array",
            Binding::Qubits(_) => "qubit register",
            Binding::Bits(_) => "bit register",
            Binding::QubitAlias(_) | Binding::BitAlias(_) => "alias",
        }
    }

    fn global_only(&self) -> bool {
        matches!(
            self,
            Binding::Array(_) | Binding::Qubits(_) | Binding::Bits(_)
        )
    }
}

/// Kind of a scope frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    Block,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Global => write!(f, "global"),
            ScopeKind::Block => write!(f, "block"),
        }
    }
}

#[derive(Debug, Clone)]
struct Frame {
    kind: ScopeKind,
    symbols: FxHashMap<String, Binding>,
}

impl Frame {
    fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            symbols: FxHashMap::default(),
        }
    }
}

/// A stack of scopes with the global scope at the bottom.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// Create a stack holding only the global scope.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new(ScopeKind::Global)],
        }
    }

    /// Nesting depth; 0 is the global scope.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn is_global(&self) -> bool {
        self.frames.len() == 1
    }

    pub fn current_kind(&self) -> ScopeKind {
        self.frames
            .last()
            .map_or(ScopeKind::Global, |frame| frame.kind)
    }

    /// Open a block scope.
    pub fn enter(&mut self) {
        self.frames.push(Frame::new(ScopeKind::Block));
        debug!(depth = self.depth(), "entered block scope");
    }

    /// Close the innermost block scope, dropping its symbols.
    ///
    /// Returns the number of dropped symbols, or `None` at global scope.
    pub fn exit(&mut self) -> Option<usize> {
        if self.is_global() {
            return None;
        }
        let frame = self.frames.pop()?;
        let dropped = frame.symbols.len();
        debug!(depth = self.depth(), dropped, "exited block scope");
        Some(dropped)
    }

    /// Bind `name` in the current scope.
    pub fn declare(&mut self, name: &str, binding: Binding) -> ClassicalResult<()> {
        if binding.global_only() && !self.is_global() {
            return Err(ClassicalError::NotInGlobalScope(name.to_string()));
        }
        let depth = self.depth();
        let frame = self
            .frames
            .last_mut()
            .ok_or_else(|| ClassicalError::NotInGlobalScope(name.to_string()))?;
        if frame.symbols.contains_key(name) {
            return Err(ClassicalError::Redeclaration(name.to_string()));
        }
        trace!(name, kind = binding.kind(), depth, "declared");
        frame.symbols.insert(name.to_string(), binding);
        Ok(())
    }

    /// Resolve `name`, innermost scope first.
    pub fn lookup(&self, name: &str) -> ClassicalResult<&Binding> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.symbols.get(name))
            .ok_or_else(|| ClassicalError::UndefinedIdentifier(name.to_string()))
    }

    /// Mutable access to the binding `name` resolves to.
    pub fn lookup_mut(&mut self, name: &str) -> ClassicalResult<&mut Binding> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.symbols.get_mut(name))
            .ok_or_else(|| ClassicalError::UndefinedIdentifier(name.to_string()))
    }

    /// Return `true` if `name` is visible from the current scope.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }
}

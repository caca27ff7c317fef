//! Qubit and classical-bit registers.
//!
//! A register is an ordered list of storage handles. Slicing and concatenating
//! registers produce new handle lists over the same storage, so they behave as
//! references: a write through a slice is visible through the original.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

use crate::bits::BitContainer;
use crate::error::{ClassicalError, ClassicalResult};
use crate::index::{IndexSpec, resolve_index, resolve_non_empty};
use crate::storage::{ClbitId, QubitId, Storage};

/// A handle type that registers can be built from.
pub trait StorageId: Copy + Eq + Hash + Debug {}

impl StorageId for QubitId {}
impl StorageId for ClbitId {}

/// A reference view over storage handles, LSB first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register<I> {
    ids: Vec<I>,
    label: Option<String>,
}

/// A register of qubits.
pub type QubitRegister = Register<QubitId>;

/// A register of classical bits.
pub type BitRegister = Register<ClbitId>;

impl<I: StorageId> Register<I> {
    /// Create a register over existing handles.
    pub fn from_ids(ids: Vec<I>) -> Self {
        Self { ids, label: None }
    }

    /// Attach a label (the declared name) for diagnostics.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the label if set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the register is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Handles in register order.
    pub fn ids(&self) -> &[I] {
        &self.ids
    }

    /// Handle at a signed index.
    pub fn id(&self, index: i64) -> ClassicalResult<I> {
        Ok(self.ids[resolve_index(index, self.len())?])
    }

    /// Reference to the elements selected by `spec`. An empty selection is an error.
    pub fn slice(&self, spec: &IndexSpec) -> ClassicalResult<Self> {
        let positions = resolve_non_empty(spec, self.len())?;
        Ok(Self::from_ids(positions.iter().map(|&p| self.ids[p]).collect()))
    }

    /// Return `true` if the two registers share any storage.
    pub fn overlaps(&self, other: &Self) -> bool {
        let mine: FxHashSet<I> = self.ids.iter().copied().collect();
        other.ids.iter().any(|id| mine.contains(id))
    }

    /// `self ++ other`. Registers may not be concatenated with themselves, in
    /// whole or in part.
    pub fn concat(&self, other: &Self) -> ClassicalResult<Self> {
        if self.overlaps(other) {
            return Err(ClassicalError::SelfConcatenation);
        }
        let mut ids = self.ids.clone();
        ids.extend_from_slice(&other.ids);
        Ok(Self::from_ids(ids))
    }

    /// Iterate over handles.
    pub fn iter(&self) -> impl Iterator<Item = I> + '_ {
        self.ids.iter().copied()
    }
}

impl BitRegister {
    /// Read the current contents of the referenced bits.
    pub fn read(&self, storage: &Storage) -> ClassicalResult<BitContainer> {
        let bits = self
            .ids
            .iter()
            .map(|&id| storage.read_bit(id))
            .collect::<ClassicalResult<Vec<bool>>>()?;
        Ok(BitContainer::from_bits(bits))
    }

    /// Read one bit.
    pub fn get(&self, storage: &Storage, index: i64) -> ClassicalResult<bool> {
        storage.read_bit(self.id(index)?)
    }

    /// Write one bit.
    pub fn set(&self, storage: &mut Storage, index: i64, value: bool) -> ClassicalResult<()> {
        storage.write_bit(self.id(index)?, value)
    }

    /// Overwrite every referenced bit; the value must have the register's length.
    pub fn write(&self, storage: &mut Storage, value: &BitContainer) -> ClassicalResult<()> {
        if value.len() != self.len() {
            return Err(ClassicalError::ShapeMismatch {
                expected: format!("bit[{}]", self.len()),
                got: format!("bit[{}]", value.len()),
            });
        }
        let writes: Vec<(ClbitId, bool)> = self.ids.iter().copied().zip(value.iter()).collect();
        storage.write_bits(&writes)
    }

    /// Read the bits selected by `spec`.
    pub fn read_slice(&self, storage: &Storage, spec: &IndexSpec) -> ClassicalResult<BitContainer> {
        self.slice(spec)?.read(storage)
    }

    /// Write the bits selected by `spec`.
    pub fn write_slice(
        &self,
        storage: &mut Storage,
        spec: &IndexSpec,
        value: &BitContainer,
    ) -> ClassicalResult<()> {
        self.slice(spec)?.write(storage, value)
    }
}

//! Process-wide storage for qubits and classical bits.
//!
//! Storage is an arena allocated as the program declares registers. Identifiers
//! resolve to stable integer handles into it; registers, slices and aliases only
//! ever hold handles, so writes through any of them land in the same place.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{ClassicalError, ClassicalResult};

/// Handle to a qubit in [`Storage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Handle to a classical bit in [`Storage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

/// The qubit and classical-bit arena of one program.
///
/// Qubits carry no state here; only their identity matters. Nothing is ever
/// freed: storage lives as long as the program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    num_qubits: u32,
    bits: Vec<bool>,
}

impl Storage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `size` fresh qubits.
    pub fn alloc_qubits(&mut self, size: usize) -> ClassicalResult<Vec<QubitId>> {
        let start = self.num_qubits;
        let end = grow(start, size, "qubit")?;
        self.num_qubits = end;
        debug!(start, size, "allocated qubits");
        Ok((start..end).map(QubitId).collect())
    }

    /// Allocate `size` classical bits, all zero.
    pub fn alloc_bits(&mut self, size: usize) -> ClassicalResult<Vec<ClbitId>> {
        let start = u32::try_from(self.bits.len()).map_err(|_| ClassicalError::InvalidWidth {
            kind: "bit",
            width: u32::MAX,
        })?;
        let end = grow(start, size, "bit")?;
        self.bits.resize(self.bits.len() + size, false);
        debug!(start, size, "allocated classical bits");
        Ok((start..end).map(ClbitId).collect())
    }

    /// Number of qubits allocated so far.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Number of classical bits allocated so far.
    pub fn num_clbits(&self) -> usize {
        self.bits.len()
    }

    fn slot(&self, id: ClbitId) -> ClassicalResult<usize> {
        let pos = id.0 as usize;
        if pos < self.bits.len() {
            Ok(pos)
        } else {
            Err(ClassicalError::IndexOutOfRange {
                index: i64::from(id.0),
                length: self.bits.len(),
            })
        }
    }

    /// Read one classical bit.
    pub fn read_bit(&self, id: ClbitId) -> ClassicalResult<bool> {
        Ok(self.bits[self.slot(id)?])
    }

    /// Write one classical bit.
    pub fn write_bit(&mut self, id: ClbitId, value: bool) -> ClassicalResult<()> {
        let pos = self.slot(id)?;
        self.bits[pos] = value;
        Ok(())
    }

    /// Write several bits, all or nothing.
    pub(crate) fn write_bits(&mut self, writes: &[(ClbitId, bool)]) -> ClassicalResult<()> {
        let slots = writes
            .iter()
            .map(|(id, _)| self.slot(*id))
            .collect::<ClassicalResult<Vec<usize>>>()?;
        for (pos, (_, value)) in slots.into_iter().zip(writes) {
            self.bits[pos] = *value;
        }
        Ok(())
    }
}

/// Handle count after `size` more allocations, if every handle still fits a `u32`.
fn grow(start: u32, size: usize, kind: &'static str) -> ClassicalResult<u32> {
    u32::try_from(size)
        .ok()
        .and_then(|count| start.checked_add(count))
        .ok_or(ClassicalError::InvalidWidth {
            kind,
            width: u32::try_from(size).unwrap_or(u32::MAX),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_sequential() {
        let mut storage = Storage::new();
        let a = storage.alloc_qubits(2).unwrap();
        let b = storage.alloc_qubits(3).unwrap();
        assert_eq!(a, vec![QubitId(0), QubitId(1)]);
        assert_eq!(b[0], QubitId(2));
        assert_eq!(storage.num_qubits(), 5);
    }

    #[test]
    fn test_bits_start_zeroed() {
        let mut storage = Storage::new();
        let c = storage.alloc_bits(4).unwrap();
        assert_eq!(storage.num_clbits(), 4);
        assert!(!storage.read_bit(c[3]).unwrap());
        storage.write_bit(c[3], true).unwrap();
        assert!(storage.read_bit(c[3]).unwrap());
    }

    #[test]
    fn test_allocation_past_handle_range() {
        let mut storage = Storage::new();
        storage.alloc_qubits(1).unwrap();
        assert!(matches!(
            storage.alloc_qubits(usize::MAX),
            Err(ClassicalError::InvalidWidth { kind: "qubit", .. })
        ));
        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            storage.alloc_bits(usize::MAX),
            Err(ClassicalError::InvalidWidth { kind: "bit", .. })
        ));
        assert_eq!(storage.num_qubits(), 1);
        assert_eq!(storage.num_clbits(), 0);

        let mut full = Storage {
            num_qubits: u32::MAX - 1,
            bits: Vec::new(),
        };
        assert_eq!(full.alloc_qubits(1).unwrap(), vec![QubitId(u32::MAX - 1)]);
        assert_eq!(
            full.alloc_qubits(1),
            Err(ClassicalError::InvalidWidth {
                kind: "qubit",
                width: 1,
            })
        );
        assert_eq!(full.num_qubits(), u32::MAX as usize);
        assert!(full.alloc_qubits(0).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_handle() {
        let storage = Storage::new();
        assert!(storage.read_bit(ClbitId(0)).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(QubitId(3).to_string(), "q3");
        assert_eq!(ClbitId(1).to_string(), "c1");
    }
}

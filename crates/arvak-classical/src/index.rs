//! Index sets and their resolution against a container length.
//!
//! An index expression as written (`x[-1]`, `x[{0, 3, 5}]`, `x[0:2:12]`) is an
//! [`IndexSpec`]. Resolving it yields the ordered list of physical positions
//! it denotes.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use crate::error::{ClassicalError, ClassicalResult};

/// Ordered physical positions, duplicates allowed.
pub type Positions = Vec<usize>;

/// An index expression as supplied by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexSpec {
    /// A single signed index.
    Single(i64),
    /// A discrete set `{a, b, c}`; order is preserved as written.
    Set(Vec<i64>),
    /// An inclusive range `start:step:stop`. Omitted bounds run to the end of the
    /// container in the step's direction; an omitted step is 1.
    Range {
        start: Option<i64>,
        step: Option<i64>,
        stop: Option<i64>,
    },
}

impl IndexSpec {
    /// `start:step:stop`
    pub fn range(start: i64, step: i64, stop: i64) -> Self {
        IndexSpec::Range {
            start: Some(start),
            step: Some(step),
            stop: Some(stop),
        }
    }

    /// `start:stop`
    pub fn span(start: i64, stop: i64) -> Self {
        IndexSpec::Range {
            start: Some(start),
            step: None,
            stop: Some(stop),
        }
    }

    /// `:`, every position in order.
    pub fn full() -> Self {
        IndexSpec::Range {
            start: None,
            step: None,
            stop: None,
        }
    }

    /// Return `true` if this spec selects one element and drops the dimension.
    pub fn is_single(&self) -> bool {
        matches!(self, IndexSpec::Single(_))
    }

    /// Resolve against a container of `length` elements.
    pub fn resolve(&self, length: usize) -> ClassicalResult<Positions> {
        resolve_index_set(self, length)
    }
}

impl From<i64> for IndexSpec {
    fn from(index: i64) -> Self {
        IndexSpec::Single(index)
    }
}

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexSpec::Single(i) => write!(f, "{i}"),
            IndexSpec::Set(items) => {
                let items: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{{{}}}", items.join(", "))
            }
            IndexSpec::Range { start, step, stop } => {
                let bound = |b: &Option<i64>| b.map(|v| v.to_string()).unwrap_or_default();
                match step {
                    Some(step) => write!(f, "{}:{}:{}", bound(start), step, bound(stop)),
                    None => write!(f, "{}:{}", bound(start), bound(stop)),
                }
            }
        }
    }
}

/// Resolve a single signed index: negative indices count from the end.
pub fn resolve_index(index: i64, length: usize) -> ClassicalResult<usize> {
    let len = i64::try_from(length).map_err(|_| ClassicalError::IndexOutOfRange { index, length })?;
    let physical = if index >= 0 { index } else { len + index };
    if (0..len).contains(&physical) {
        // In range of a usize-sized length, so the conversion cannot fail.
        Ok(physical as usize)
    } else {
        Err(ClassicalError::IndexOutOfRange { index, length })
    }
}

/// Resolve an index expression to physical positions.
///
/// The result may be empty (a range whose step disagrees with its bounds); callers
/// that require a non-empty set use [`resolve_non_empty`].
pub fn resolve_index_set(spec: &IndexSpec, length: usize) -> ClassicalResult<Positions> {
    let positions = match spec {
        IndexSpec::Single(i) => vec![resolve_index(*i, length)?],
        IndexSpec::Set(items) => items
            .iter()
            .map(|&i| resolve_index(i, length))
            .collect::<ClassicalResult<Positions>>()?,
        IndexSpec::Range { start, step, stop } => resolve_range(*start, *step, *stop, length)?,
    };
    trace!(%spec, length, resolved = positions.len(), "resolved index set");
    Ok(positions)
}

/// Resolve an index expression, rejecting an empty result.
pub fn resolve_non_empty(spec: &IndexSpec, length: usize) -> ClassicalResult<Positions> {
    let positions = resolve_index_set(spec, length)?;
    if positions.is_empty() {
        return Err(ClassicalError::EmptyIndexSet);
    }
    Ok(positions)
}

fn resolve_range(
    start: Option<i64>,
    step: Option<i64>,
    stop: Option<i64>,
    length: usize,
) -> ClassicalResult<Positions> {
    let step = step.unwrap_or(1);
    if step == 0 {
        return Err(ClassicalError::ZeroStep);
    }
    if length == 0 && start.is_none() {
        return Ok(Vec::new());
    }
    let len = i64::try_from(length).map_err(|_| ClassicalError::IndexOutOfRange {
        index: start.unwrap_or(0),
        length,
    })?;
    let last = len - 1;

    let first = match start {
        Some(a) => resolve_index(a, length)? as i64,
        None if step > 0 => 0,
        None => last,
    };
    // The stop is only negative-resolved, then clamped into the container.
    let bound = match stop {
        Some(b) => {
            let b = if b < 0 { len + b } else { b };
            if step > 0 { b.min(last) } else { b.max(0) }
        }
        None if step > 0 => last,
        None => 0,
    };

    let mut positions = Vec::new();
    let mut current = Some(first);
    while let Some(p) = current {
        if (step > 0 && p > bound) || (step < 0 && p < bound) {
            break;
        }
        positions.push(p as usize);
        // A step past the representable range ends the walk.
        current = p.checked_add(step);
    }
    Ok(positions)
}

/// Concatenate two resolved index sets, preserving order.
pub fn concat_positions(first: &[usize], second: &[usize]) -> Positions {
    let mut positions = Vec::with_capacity(first.len() + second.len());
    positions.extend_from_slice(first);
    positions.extend_from_slice(second);
    positions
}

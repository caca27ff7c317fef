//! Statically shaped classical arrays.
//!
//! Arrays own their elements. Reading a slice or concatenating arrays copies;
//! the only way to write through a slice is [`ArrayValue::slice_mut`], which
//! borrows the array for the duration of one assignment.

use serde::{Deserialize, Serialize};

use crate::bits::BitContainer;
use crate::error::{ClassicalError, ClassicalResult};
use crate::index::{IndexSpec, resolve_index, resolve_index_set};
use crate::types::{ArrayType, ScalarType};
use crate::value::ScalarValue;

/// Result of indexing into an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Indexed {
    /// Every dimension was indexed by a single index.
    Scalar(ScalarValue),
    /// A copied sub-array.
    Array(ArrayValue),
    /// Bits of a scalar element, reached by indexing past the array dimensions.
    Bits(BitContainer),
}

/// A classical array, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    ty: ArrayType,
    data: Vec<ScalarValue>,
}

/// Flat offsets chosen by a subscript, plus the shape they form.
struct Selection {
    offsets: Vec<usize>,
    shape: Vec<usize>,
}

fn describe(element: ScalarType, shape: &[usize]) -> String {
    if shape.is_empty() {
        element.to_string()
    } else {
        let dims: Vec<String> = shape.iter().map(ToString::to_string).collect();
        format!("array[{}, {}]", element, dims.join(", "))
    }
}

impl Indexed {
    fn describe(&self) -> String {
        match self {
            Indexed::Scalar(v) => v.scalar_type().to_string(),
            Indexed::Array(a) => describe(a.element_type(), a.shape()),
            Indexed::Bits(b) => format!("bit[{}]", b.len()),
        }
    }
}

impl ArrayValue {
    /// Create a zero-initialized array.
    ///
    /// The type is revalidated: its fields are public, so it may not have been
    /// built through [`ArrayType::new`].
    pub fn new(ty: ArrayType) -> ClassicalResult<Self> {
        let ty = ArrayType::new(ty.element, ty.shape)?;
        let zero = ScalarValue::zero(ty.element)?;
        let data = vec![zero; ty.num_elements()];
        Ok(Self { ty, data })
    }

    /// Create an array from row-major elements, all of the element type.
    pub fn from_elements(
        element: ScalarType,
        shape: Vec<usize>,
        data: Vec<ScalarValue>,
    ) -> ClassicalResult<Self> {
        let ty = ArrayType::new(element, shape)?;
        if data.len() != ty.num_elements() {
            return Err(ClassicalError::ShapeMismatch {
                expected: describe(element, &ty.shape),
                got: format!("{} elements", data.len()),
            });
        }
        if let Some(bad) = data.iter().find(|v| v.scalar_type() != element) {
            return Err(ClassicalError::ShapeMismatch {
                expected: element.to_string(),
                got: bad.scalar_type().to_string(),
            });
        }
        Ok(Self { ty, data })
    }

    /// The declared array type.
    pub fn array_type(&self) -> &ArrayType {
        &self.ty
    }

    pub fn element_type(&self) -> ScalarType {
        self.ty.element
    }

    pub fn shape(&self) -> &[usize] {
        &self.ty.shape
    }

    /// Extent of the outermost dimension.
    pub fn len(&self) -> usize {
        self.ty.shape.first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Elements in row-major order.
    pub fn elements(&self) -> &[ScalarValue] {
        &self.data
    }

    fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1; self.ty.shape.len()];
        for dim in (0..self.ty.shape.len().saturating_sub(1)).rev() {
            strides[dim] = strides[dim + 1] * self.ty.shape[dim + 1];
        }
        strides
    }

    /// Resolve a comma-delimited subscript. Dimensions past the subscript are
    /// taken whole; a single index drops its dimension.
    fn select(&self, subscript: &[IndexSpec]) -> ClassicalResult<Selection> {
        let dims = self.ty.shape.len();
        if subscript.len() > dims {
            return Err(ClassicalError::ShapeMismatch {
                expected: format!("at most {dims} indices"),
                got: format!("{} indices", subscript.len()),
            });
        }
        let strides = self.strides();
        let mut offsets = vec![0usize];
        let mut shape = Vec::new();
        for (dim, &extent) in self.ty.shape.iter().enumerate() {
            let positions = match subscript.get(dim) {
                Some(spec) => {
                    let positions = resolve_index_set(spec, extent)?;
                    if !spec.is_single() {
                        shape.push(positions.len());
                    }
                    positions
                }
                None => {
                    shape.push(extent);
                    (0..extent).collect()
                }
            };
            let stride = strides[dim];
            offsets = offsets
                .iter()
                .flat_map(|&base| positions.iter().map(move |&p| base + p * stride))
                .collect();
        }
        Ok(Selection { offsets, shape })
    }

    /// `a[i, j, ...]`: a scalar if every dimension is singly indexed, otherwise a copy.
    pub fn get(&self, subscript: &[IndexSpec]) -> ClassicalResult<Indexed> {
        let selection = self.select(subscript)?;
        if selection.shape.is_empty() {
            return Ok(Indexed::Scalar(self.data[selection.offsets[0]].clone()));
        }
        let data = selection
            .offsets
            .iter()
            .map(|&o| self.data[o].clone())
            .collect();
        Ok(Indexed::Array(Self {
            ty: ArrayType {
                element: self.ty.element,
                shape: selection.shape,
            },
            data,
        }))
    }

    /// `a[i][j]...`: successive brackets.
    ///
    /// Each bracket indexes the result of the previous one. Once a scalar
    /// element is reached, further brackets index its bits.
    pub fn get_chain(&self, brackets: &[Vec<IndexSpec>]) -> ClassicalResult<Indexed> {
        let mut current = Indexed::Array(self.clone());
        for bracket in brackets {
            current = match current {
                Indexed::Array(array) => array.get(bracket)?,
                Indexed::Scalar(value) => Indexed::Bits(value.get_bits(single_bit_spec(bracket)?)?),
                Indexed::Bits(bits) => Indexed::Bits(bits.slice_get(single_bit_spec(bracket)?)?),
            };
        }
        Ok(current)
    }

    /// Borrow the selected elements as an assignment target.
    pub fn slice_mut(&mut self, subscript: &[IndexSpec]) -> ClassicalResult<ArraySliceMut<'_>> {
        let selection = self.select(subscript)?;
        Ok(ArraySliceMut {
            array: self,
            offsets: selection.offsets,
            shape: selection.shape,
        })
    }

    /// `a[subscript] = value`.
    pub fn assign(&mut self, subscript: &[IndexSpec], value: &Indexed) -> ClassicalResult<()> {
        self.slice_mut(subscript)?.assign(value)
    }

    /// `a[subscript][bits] = value`: bit-level write into one scalar element.
    pub fn assign_bits(
        &mut self,
        subscript: &[IndexSpec],
        bits: &IndexSpec,
        value: &BitContainer,
    ) -> ClassicalResult<()> {
        let selection = self.select(subscript)?;
        if !selection.shape.is_empty() {
            return Err(ClassicalError::NotBitIndexable(describe(
                self.ty.element,
                &selection.shape,
            )));
        }
        let offset = selection.offsets[0];
        let updated = self.data[offset].with_bits(bits, value)?;
        self.data[offset] = updated;
        Ok(())
    }

    /// `self ++ other` along the outermost dimension. Always a copy, so an array
    /// may be concatenated with itself.
    pub fn concat(&self, other: &ArrayValue) -> ClassicalResult<ArrayValue> {
        if self.ty.element != other.ty.element || self.ty.shape[1..] != other.ty.shape[1..] {
            return Err(ClassicalError::ShapeMismatch {
                expected: describe(self.ty.element, &self.ty.shape),
                got: describe(other.ty.element, &other.ty.shape),
            });
        }
        let mut shape = self.ty.shape.clone();
        shape[0] += other.ty.shape[0];
        let mut data = self.data.clone();
        data.extend_from_slice(&other.data);
        Ok(Self {
            ty: ArrayType {
                element: self.ty.element,
                shape,
            },
            data,
        })
    }
}

fn single_bit_spec(bracket: &[IndexSpec]) -> ClassicalResult<&IndexSpec> {
    match bracket {
        [spec] => Ok(spec),
        _ => Err(ClassicalError::ShapeMismatch {
            expected: "one bit index".to_string(),
            got: format!("{} indices", bracket.len()),
        }),
    }
}

/// A mutable view into an array, used as the target of one assignment.
///
/// Writes land in the original array.
#[derive(Debug)]
pub struct ArraySliceMut<'a> {
    array: &'a mut ArrayValue,
    offsets: Vec<usize>,
    shape: Vec<usize>,
}

impl ArraySliceMut<'_> {
    /// Shape of the view; empty for a single element.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of elements in the view.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Overwrite element `index` of the flattened view.
    pub fn set(&mut self, index: i64, value: ScalarValue) -> ClassicalResult<()> {
        let element = self.array.ty.element;
        if value.scalar_type() != element {
            return Err(ClassicalError::ShapeMismatch {
                expected: element.to_string(),
                got: value.scalar_type().to_string(),
            });
        }
        let pos = resolve_index(index, self.offsets.len())?;
        self.array.data[self.offsets[pos]] = value;
        Ok(())
    }

    /// Assign a value of exactly the view's shape and element type.
    ///
    /// Nothing is written unless the whole value fits.
    pub fn assign(&mut self, value: &Indexed) -> ClassicalResult<()> {
        let element = self.array.ty.element;
        let mismatch = || ClassicalError::ShapeMismatch {
            expected: describe(element, &self.shape),
            got: value.describe(),
        };
        let values: Vec<ScalarValue> = match value {
            Indexed::Scalar(v) if self.shape.is_empty() && v.scalar_type() == element => {
                vec![v.clone()]
            }
            Indexed::Bits(bits)
                if self.shape.is_empty() && element == ScalarType::Bit(bits.len() as u32) =>
            {
                vec![ScalarValue::Bit(bits.clone())]
            }
            Indexed::Array(a) if a.ty.element == element && a.ty.shape == self.shape => {
                a.data.clone()
            }
            _ => return Err(mismatch()),
        };
        for (&offset, v) in self.offsets.iter().zip(values) {
            self.array.data[offset] = v;
        }
        Ok(())
    }

    /// Copy the current contents of the view.
    pub fn to_indexed(&self) -> Indexed {
        if self.shape.is_empty() {
            return Indexed::Scalar(self.array.data[self.offsets[0]].clone());
        }
        Indexed::Array(ArrayValue {
            ty: ArrayType {
                element: self.array.ty.element,
                shape: self.shape.clone(),
            },
            data: self
                .offsets
                .iter()
                .map(|&o| self.array.data[o].clone())
                .collect(),
        })
    }
}

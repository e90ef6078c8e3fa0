// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Core tensor type: storage, addressing and wildcard slicing.

use crate::{DType, Element, Shape, TensorError};

/// An owned, n-dimensional numeric tensor stored in contiguous memory.
///
/// # Memory Layout
/// Values live in a flat buffer in row-major (C) order: the **last** index
/// varies fastest. The buffer length always equals the product of the sizes.
///
/// # Equality
/// `==` compares element counts and then values under
/// [`Element::epsilon_eq`]; it ignores how the elements are arranged. Use
/// [`Tensor::same_shape`] for the stricter shape check.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Tensor<E> {
    #[serde(rename = "sizes")]
    shape: Shape,
    content: Vec<E>,
}

impl<E: Element> Tensor<E> {
    /// Creates a new tensor filled with zeros.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Shape, Tensor};
    /// let t = Tensor::<f32>::zeros(Shape::matrix(2, 3)).unwrap();
    /// assert_eq!(t.num_elements(), 6);
    /// ```
    pub fn zeros(shape: Shape) -> Result<Self, TensorError> {
        Self::full(shape, E::zero())
    }

    /// Creates a tensor with every element set to `value`.
    pub fn full(shape: Shape, value: E) -> Result<Self, TensorError> {
        shape.validate()?;
        let content = vec![value; shape.num_elements()];
        Ok(Self { shape, content })
    }

    /// Creates a single-element tensor of shape `[1]`.
    pub fn scalar(value: E) -> Self {
        Self {
            shape: Shape::scalar(),
            content: vec![value],
        }
    }

    /// Creates a tensor from a flat row-major buffer.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Shape, Tensor};
    /// let t = Tensor::from_vec(Shape::vector(3), vec![1.0f32, 2.0, 3.0]).unwrap();
    /// assert_eq!(t.content(), &[1.0, 2.0, 3.0]);
    /// ```
    ///
    /// # Errors
    /// [`TensorError::InvalidShape`] for an empty or zero-sized shape,
    /// [`TensorError::BufferSizeMismatch`] if the buffer length is wrong.
    pub fn from_vec(shape: Shape, content: Vec<E>) -> Result<Self, TensorError> {
        shape.validate()?;
        let expected = shape.num_elements();
        if content.len() != expected {
            return Err(TensorError::BufferSizeMismatch {
                shape,
                expected,
                actual: content.len(),
            });
        }
        Ok(Self { shape, content })
    }

    /// Creates a rank-2 tensor from equally long rows.
    pub fn from_rows<R: AsRef<[E]>>(rows: &[R]) -> Result<Self, TensorError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut content = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            content.extend_from_slice(row.as_ref());
        }
        Self::from_vec(Shape::matrix(rows.len(), cols), content)
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Number of dimensions.
    pub fn arity(&self) -> usize {
        self.shape.rank()
    }

    /// Size of dimension `dim`, or `None` past the last dimension.
    pub fn size(&self, dim: usize) -> Option<usize> {
        self.shape.dim(dim)
    }

    /// Total number of elements.
    pub fn num_elements(&self) -> usize {
        self.content.len()
    }

    /// Returns the element width.
    pub fn dtype(&self) -> DType {
        E::DTYPE
    }

    /// The flat row-major buffer.
    pub fn content(&self) -> &[E] {
        &self.content
    }

    /// Mutable access to the flat buffer. The length cannot change.
    pub fn content_mut(&mut self) -> &mut [E] {
        &mut self.content
    }

    /// Reads the element at a full coordinate vector.
    pub fn get(&self, indices: &[usize]) -> Result<E, TensorError> {
        let offset = self.shape.offset_of(indices)?;
        Ok(self.content[offset])
    }

    /// Writes the element at a full coordinate vector.
    pub fn set(&mut self, indices: &[usize], value: E) -> Result<(), TensorError> {
        let offset = self.shape.offset_of(indices)?;
        self.content[offset] = value;
        Ok(())
    }

    /// Copies every element matching `pattern` into `target`, in row-major order.
    ///
    /// `None` in the pattern is a wildcard matching every coordinate of that
    /// dimension. Returns the number of elements copied.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::Tensor;
    /// let t = Tensor::from_rows(&[[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
    /// let mut column = [0.0; 2];
    /// t.read_slice(&[None, Some(1)], &mut column).unwrap();
    /// assert_eq!(column, [2.0, 5.0]);
    /// ```
    ///
    /// # Errors
    /// [`TensorError::SliceBufferTooShort`] if `target` cannot hold every match.
    pub fn read_slice(
        &self,
        pattern: &[Option<usize>],
        target: &mut [E],
    ) -> Result<usize, TensorError> {
        let offsets = self.slice_offsets(pattern)?;
        check_slice_buffer(offsets.len(), target.len())?;
        for (dst, &offset) in target.iter_mut().zip(&offsets) {
            *dst = self.content[offset];
        }
        Ok(offsets.len())
    }

    /// Writes consecutive values from `source` into every position matching `pattern`.
    ///
    /// Nothing is written unless `source` is long enough for every match.
    pub fn write_slice(
        &mut self,
        pattern: &[Option<usize>],
        source: &[E],
    ) -> Result<usize, TensorError> {
        let offsets = self.slice_offsets(pattern)?;
        check_slice_buffer(offsets.len(), source.len())?;
        for (&offset, &value) in offsets.iter().zip(source) {
            self.content[offset] = value;
        }
        Ok(offsets.len())
    }

    /// Sets every position matching `pattern` to `value`.
    pub fn fill(&mut self, pattern: &[Option<usize>], value: E) -> Result<usize, TensorError> {
        let offsets = self.slice_offsets(pattern)?;
        for &offset in &offsets {
            self.content[offset] = value;
        }
        Ok(offsets.len())
    }

    /// Deep copy. Mutating the copy never affects `self`.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Applies `f` to every element in place.
    pub fn map_in_place(&mut self, mut f: impl FnMut(E) -> E) -> &mut Self {
        for x in self.content.iter_mut() {
            *x = f(*x);
        }
        self
    }

    /// Elementwise comparison with an explicit tolerance.
    pub fn approx_eq(&self, other: &Self, epsilon: E) -> bool {
        self.content.len() == other.content.len()
            && self
                .content
                .iter()
                .zip(&other.content)
                .all(|(&a, &b)| (a - b).abs() <= epsilon)
    }

    /// Returns `true` if both tensors have identical sizes.
    pub fn same_shape(&self, other: &Self) -> bool {
        self.shape == other.shape
    }

    /// Replaces the size metadata, keeping the buffer untouched.
    pub(crate) fn reinterpret(&mut self, shape: Shape) {
        debug_assert_eq!(shape.num_elements(), self.content.len());
        self.shape = shape;
    }

    /// Replaces shape and buffer together.
    pub(crate) fn replace(&mut self, shape: Shape, content: Vec<E>) {
        debug_assert_eq!(shape.num_elements(), content.len());
        self.shape = shape;
        self.content = content;
    }

    /// Flat offsets of every position matching `pattern`, row-major.
    fn slice_offsets(&self, pattern: &[Option<usize>]) -> Result<Vec<usize>, TensorError> {
        self.shape.check_arity(pattern.len())?;
        let dims = self.shape.dims();
        for (dim, (coord, &size)) in pattern.iter().zip(dims).enumerate() {
            if let Some(index) = *coord {
                if index >= size {
                    return Err(TensorError::IndexOutOfRange { dim, index, size });
                }
            }
        }

        let mut offsets = vec![0usize];
        for ((coord, &size), stride) in pattern.iter().zip(dims).zip(self.shape.strides()) {
            let range = match *coord {
                Some(index) => index..index + 1,
                None => 0..size,
            };
            offsets = offsets
                .iter()
                .flat_map(|&base| range.clone().map(move |i| base + i * stride))
                .collect();
        }
        Ok(offsets)
    }
}

fn check_slice_buffer(needed: usize, actual: usize) -> Result<(), TensorError> {
    if actual < needed {
        return Err(TensorError::SliceBufferTooShort { needed, actual });
    }
    Ok(())
}

impl<E: Element> PartialEq for Tensor<E> {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, E::epsilon_eq())
    }
}

#[derive(serde::Deserialize)]
struct TensorRepr<E> {
    sizes: Shape,
    content: Vec<E>,
}

impl<'de, E> serde::Deserialize<'de> for Tensor<E>
where
    E: Element + serde::Deserialize<'de>,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = TensorRepr::<E>::deserialize(deserializer)?;
        Tensor::from_vec(repr.sizes, repr.content).map_err(serde::de::Error::custom)
    }
}

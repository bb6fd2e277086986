//! # Tensor Module
//!
//! This module defines the `Tensor` value type the optimizers work on: an
//! n-dimensional `ndarray::ArrayD` of a single floating-point scalar type with
//! elementwise arithmetic.

use ndarray::{ArrayD, IxDyn}; // Using ndarray for underlying storage and ops
use rand::Rng;

// --- Submodules ---
pub mod ops;

// --- Error Handling ---
#[derive(thiserror::Error, Debug)]
pub enum TensorError {
    #[error("Shape mismatch for '{key}': expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        key: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("Incompatible shapes for operation {op}: {shape1:?} and {shape2:?}")]
    IncompatibleShapes {
        op: String,
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },
    #[error("Missing key '{0}'")]
    MissingKey(String),
    #[error("Unexpected key '{0}'")]
    UnexpectedKey(String),
    #[error("Empty scalar tensor")]
    EmptyScalar,
    #[error("ndarray error: {0}")]
    Ndarray(#[from] ndarray::ShapeError),
    #[error("Generic error: {0}")]
    Generic(String),
}

// The scalar type of every tensor in the crate.
pub type TensorData = f32;

/// # Tensor
///
/// An n-dimensional array of `TensorData`. Arithmetic produces new tensors;
/// `data_mut` gives in-place access for accumulator slots.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    data: ArrayD<TensorData>,
}

impl Tensor {
    /// Creates a new Tensor from an ndarray::ArrayD.
    pub fn new(data: ArrayD<TensorData>) -> Self {
        Tensor { data }
    }

    /// Creates a tensor from a flat row-major buffer and a shape.
    pub fn from_vec(data: Vec<TensorData>, shape: &[usize]) -> Result<Self, TensorError> {
        let array = ArrayD::from_shape_vec(IxDyn(shape), data)?;
        Ok(Tensor::new(array))
    }

    /// Creates a rank-0 tensor holding `value`.
    pub fn scalar(value: TensorData) -> Self {
        Tensor::new(ArrayD::from_elem(IxDyn(&[]), value))
    }

    /// A zero tensor with the same shape as `self`.
    pub fn zeros_like(&self) -> Self {
        zeros(self.shape())
    }

    /// Returns the shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Returns the number of dimensions.
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Returns the total number of elements.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Checks if the tensor represents a single scalar value.
    pub fn is_scalar(&self) -> bool {
        self.size() == 1
    }

    /// Provides read-only access to the underlying data.
    pub fn data(&self) -> &ArrayD<TensorData> {
        &self.data
    }

    /// Provides mutable access to the underlying data.
    pub fn data_mut(&mut self) -> &mut ArrayD<TensorData> {
        &mut self.data
    }

    pub fn into_inner(self) -> ArrayD<TensorData> {
        self.data
    }

    /// The single value of a one-element tensor.
    pub fn item(&self) -> Result<TensorData, TensorError> {
        if !self.is_scalar() {
            return Err(TensorError::Generic(format!(
                "item() needs a one-element tensor, got shape {:?}",
                self.shape()
            )));
        }
        self.data.first().copied().ok_or(TensorError::EmptyScalar)
    }

    /// Sum of all elements.
    pub fn sum(&self) -> TensorData {
        self.data.sum()
    }

    /// Euclidean (L2) norm over all elements.
    pub fn norm(&self) -> TensorData {
        self.data.iter().map(|x| x * x).sum::<TensorData>().sqrt()
    }

    /// Flat row-major copy of the elements.
    pub fn to_vec(&self) -> Vec<TensorData> {
        self.data.iter().copied().collect()
    }
}

impl From<ArrayD<TensorData>> for Tensor {
    fn from(data: ArrayD<TensorData>) -> Self {
        Tensor::new(data)
    }
}

// --- Traits Implementation (Basic Arithmetic) ---
// Using Rust's operator overloading traits
use std::ops::{Add, Div, Mul, Neg, Sub};

// Tensor + Tensor
impl Add<&Tensor> for &Tensor {
    type Output = Result<Tensor, TensorError>;

    fn add(self, other: &Tensor) -> Self::Output {
        ops::add(self, other) // Delegate to ops module
    }
}

// Tensor - Tensor
impl Sub<&Tensor> for &Tensor {
    type Output = Result<Tensor, TensorError>;

    fn sub(self, other: &Tensor) -> Self::Output {
        ops::sub(self, other)
    }
}

// Tensor * Tensor (Element-wise multiplication)
impl Mul<&Tensor> for &Tensor {
    type Output = Result<Tensor, TensorError>;

    fn mul(self, other: &Tensor) -> Self::Output {
        ops::mul(self, other)
    }
}

// Tensor / Tensor (Element-wise division)
impl Div<&Tensor> for &Tensor {
    type Output = Result<Tensor, TensorError>;

    fn div(self, other: &Tensor) -> Self::Output {
        ops::div(self, other)
    }
}

impl Neg for &Tensor {
    type Output = Tensor;

    fn neg(self) -> Tensor {
        ops::neg(self)
    }
}

// --- Helper functions ---

/// Helper to create a tensor filled with zeros.
pub fn zeros(shape: &[usize]) -> Tensor {
    Tensor::new(ArrayD::zeros(IxDyn(shape)))
}

/// Helper to create a tensor filled with ones.
pub fn ones(shape: &[usize]) -> Tensor {
    Tensor::new(ArrayD::ones(IxDyn(shape)))
}

/// Helper to create a tensor filled with `value`.
pub fn full(shape: &[usize], value: TensorData) -> Tensor {
    Tensor::new(ArrayD::from_elem(IxDyn(shape), value))
}

/// Helper to create a tensor with values drawn uniformly from `[low, high)`.
///
/// # Panics
/// If `low >= high` (the range is empty) or either bound is not finite.
pub fn rand_uniform<R: Rng>(shape: &[usize], low: TensorData, high: TensorData, rng: &mut R) -> Tensor {
    let data = ArrayD::from_shape_simple_fn(IxDyn(shape), || rng.gen_range(low..high));
    Tensor::new(data)
}

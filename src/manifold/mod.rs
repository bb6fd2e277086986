//! # Manifolds
//!
//! Capability traits for models whose parameters live on a curved space.
//! A `Manifold` turns a cotangent (the loss gradient) into a tangent vector
//! and knows how to move along a tangent vector; `RiemannSgd` only talks to
//! these two operations.
//!
//! `ParameterSet` is the flat (Euclidean) instance: tangent vectors are
//! parameter sets and moving is elementwise addition.

use crate::nn::{GradientSet, ParameterSet};
use crate::tensor::{ops, Tensor, TensorData};

pub mod sphere;
pub use sphere::Sphere;

/// The arithmetic a tangent vector needs. Operands must be aligned (same
/// shape / same keys); mixing unaligned vectors is a caller bug and panics.
pub trait VectorSpace: Clone {
    /// The zero vector of the same shape.
    fn zeros_like(&self) -> Self;

    fn add_vector(&self, other: &Self) -> Self;

    fn sub_vector(&self, other: &Self) -> Self;

    fn scaled(&self, factor: TensorData) -> Self;
}

/// A point on a differentiable manifold.
pub trait Manifold: Sized {
    type TangentVector: VectorSpace;
    type Cotangent: ?Sized;

    /// Converts a gradient into the tangent vector at this point.
    fn tangent_vector_from(&self, cotangent: &Self::Cotangent) -> Self::TangentVector;

    /// The point reached by moving from `self` along `direction`
    /// (a retraction or exponential-map step).
    fn moved_along(&self, direction: &Self::TangentVector) -> Self;

    /// In-place form of `moved_along`.
    fn move_along(&mut self, direction: &Self::TangentVector) {
        *self = self.moved_along(direction);
    }
}

// --- Tensor ---

#[track_caller]
fn elementwise(a: &Tensor, b: &Tensor, f: impl Fn(TensorData, TensorData) -> TensorData) -> Tensor {
    match ops::zip_map(a, b, f) {
        Ok(t) => t,
        Err(e) => panic!("tangent vectors are not aligned: {e}"),
    }
}

impl VectorSpace for Tensor {
    fn zeros_like(&self) -> Self {
        Tensor::zeros_like(self)
    }

    fn add_vector(&self, other: &Self) -> Self {
        elementwise(self, other, |x, y| x + y)
    }

    fn sub_vector(&self, other: &Self) -> Self {
        elementwise(self, other, |x, y| x - y)
    }

    fn scaled(&self, factor: TensorData) -> Self {
        ops::mul_scalar(self, factor)
    }
}

// --- ParameterSet (Euclidean) ---

#[track_caller]
fn keywise(a: &ParameterSet, b: &ParameterSet, f: impl Fn(TensorData, TensorData) -> TensorData + Copy) -> ParameterSet {
    match a.zip_with(b, |x, y| ops::zip_map(x, y, f)) {
        Ok(set) => set,
        Err(e) => panic!("tangent vectors are not aligned: {e}"),
    }
}

impl VectorSpace for ParameterSet {
    fn zeros_like(&self) -> Self {
        ParameterSet::zeros_like(self)
    }

    fn add_vector(&self, other: &Self) -> Self {
        keywise(self, other, |x, y| x + y)
    }

    fn sub_vector(&self, other: &Self) -> Self {
        keywise(self, other, |x, y| x - y)
    }

    fn scaled(&self, factor: TensorData) -> Self {
        self.map(|t| ops::mul_scalar(t, factor))
    }
}

impl Manifold for ParameterSet {
    type TangentVector = ParameterSet;
    type Cotangent = GradientSet;

    /// Flat space: the gradient already is a tangent vector.
    fn tangent_vector_from(&self, cotangent: &GradientSet) -> ParameterSet {
        self.assert_aligned(cotangent, "gradient");
        cotangent.clone()
    }

    fn moved_along(&self, direction: &ParameterSet) -> Self {
        self.add_vector(direction)
    }

    fn move_along(&mut self, direction: &ParameterSet) {
        self.assert_aligned(direction, "tangent vector");
        for ((_, p), (_, d)) in self.iter_mut().zip(direction.iter()) {
            *p.data_mut() += d.data();
        }
    }
}

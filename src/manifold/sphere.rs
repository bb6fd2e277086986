//! Unit sphere S^(n-1) embedded in R^n.

use super::Manifold;
use crate::tensor::{ops, Tensor, TensorData, TensorError};

/// A point on the unit sphere, stored as a 1-D tensor of norm 1.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    point: Tensor,
}

impl Sphere {
    /// Projects `point` onto the sphere by normalizing it.
    pub fn new(point: Tensor) -> Result<Self, TensorError> {
        if point.ndim() != 1 {
            return Err(TensorError::Generic(format!(
                "Sphere points must be 1-D, got shape {:?}",
                point.shape()
            )));
        }
        let norm = point.norm();
        if !(norm > 0.0) || !norm.is_finite() {
            return Err(TensorError::Generic(
                "Cannot place a zero or non-finite vector on the sphere".to_string(),
            ));
        }
        Ok(Sphere {
            point: ops::mul_scalar(&point, 1.0 / norm),
        })
    }

    pub fn point(&self) -> &Tensor {
        &self.point
    }

    /// Ambient dimension n.
    pub fn dim(&self) -> usize {
        self.point.size()
    }

    /// Removes the radial component of `v`: `v - <v, x> x`.
    pub fn project_tangent(&self, v: &Tensor) -> Result<Tensor, TensorError> {
        let radial = ops::dot(v, &self.point)?;
        ops::zip_map(v, &self.point, |vi, xi| vi - radial * xi)
    }
}

impl Manifold for Sphere {
    type TangentVector = Tensor;
    type Cotangent = Tensor;

    /// Riemannian gradient: the Euclidean gradient projected onto the tangent
    /// space at this point.
    fn tangent_vector_from(&self, cotangent: &Tensor) -> Tensor {
        match self.project_tangent(cotangent) {
            Ok(t) => t,
            Err(e) => panic!("gradient does not match the sphere point: {e}"),
        }
    }

    /// Retraction `(x + v) / |x + v|`.
    fn moved_along(&self, direction: &Tensor) -> Self {
        let stepped = match ops::zip_map(&self.point, direction, |x, v| x + v) {
            Ok(t) => t,
            Err(e) => panic!("tangent vector does not match the sphere point: {e}"),
        };
        let norm: TensorData = stepped.norm();
        // x + v == 0 only for a non-tangent direction; stay put.
        if !(norm > 0.0) {
            return self.clone();
        }
        Sphere {
            point: ops::mul_scalar(&stepped, 1.0 / norm),
        }
    }
}

//! # Neural Network Functional Interface (`nn::functional`)
//!
//! Stateless forward and backward functions for the reference layer and loss.
//! Gradients are derived by hand; they stand in for an autograd engine when
//! driving an optimizer from tests and benchmarks.

use crate::tensor::{ops, Tensor, TensorData, TensorError};
use ndarray::{Axis, Ix1, Ix2};

// --- Linear ---

/// `input @ weight.T + bias` for a 2-D `(batch, in_features)` input.
pub fn linear(input: &Tensor, weight: &Tensor, bias: Option<&Tensor>) -> Result<Tensor, TensorError> {
    let x = input.data().view().into_dimensionality::<Ix2>()?;
    let w = weight.data().view().into_dimensionality::<Ix2>()?;
    if x.ncols() != w.ncols() {
        return Err(TensorError::IncompatibleShapes {
            op: "linear".to_string(),
            shape1: input.shape().to_vec(),
            shape2: weight.shape().to_vec(),
        });
    }

    let mut out = x.dot(&w.t());
    if let Some(bias) = bias {
        let b = bias.data().view().into_dimensionality::<Ix1>()?;
        if b.len() != out.ncols() {
            return Err(TensorError::IncompatibleShapes {
                op: "linear_bias".to_string(),
                shape1: out.shape().to_vec(),
                shape2: bias.shape().to_vec(),
            });
        }
        out += &b; // broadcast over the batch axis
    }
    Ok(Tensor::new(out.into_dyn()))
}

/// Gradients of a linear layer given `dL/d(output)`.
///
/// Returns `(dL/dweight, dL/dbias)` with `dL/dweight = grad_output.T @ input`
/// and `dL/dbias` the column sums of `grad_output`.
pub fn linear_backward(input: &Tensor, grad_output: &Tensor) -> Result<(Tensor, Tensor), TensorError> {
    let x = input.data().view().into_dimensionality::<Ix2>()?;
    let g = grad_output.data().view().into_dimensionality::<Ix2>()?;
    if x.nrows() != g.nrows() {
        return Err(TensorError::IncompatibleShapes {
            op: "linear_backward".to_string(),
            shape1: input.shape().to_vec(),
            shape2: grad_output.shape().to_vec(),
        });
    }

    let grad_weight = g.t().dot(&x);
    let grad_bias = g.sum_axis(Axis(0));
    Ok((Tensor::new(grad_weight.into_dyn()), Tensor::new(grad_bias.into_dyn())))
}

// --- Loss Functions ---

/// Mean squared error: `mean((prediction - target)^2)`.
pub fn mse_loss(prediction: &Tensor, target: &Tensor) -> Result<TensorData, TensorError> {
    let diff = ops::zip_map(prediction, target, |p, t| p - t)?;
    let n = diff.size().max(1) as TensorData;
    Ok(ops::powf(&diff, 2.0).sum() / n)
}

/// Gradient of `mse_loss` w.r.t. the prediction: `2 * (prediction - target) / N`.
pub fn mse_loss_backward(prediction: &Tensor, target: &Tensor) -> Result<Tensor, TensorError> {
    let diff = ops::zip_map(prediction, target, |p, t| p - t)?;
    let n = diff.size().max(1) as TensorData;
    Ok(ops::mul_scalar(&diff, 2.0 / n))
}

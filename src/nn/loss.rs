//! # Loss Functions
//!
//! Loss structs wrap the functional implementations. They take
//! `(prediction, target)` pairs, so they sit beside `Module` rather than
//! implementing it.

use crate::nn::functional as F;
use crate::tensor::{Tensor, TensorData, TensorError};

// --- Mean Squared Error Loss ---

/// Measures the mean squared error (squared L2 norm) between each element in
/// the prediction `x` and target `y`: `mean((x_i - y_i)^2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MSELoss;

impl MSELoss {
    pub fn new() -> Self {
        MSELoss
    }

    /// Calculates the loss. Expects prediction and target of the same shape.
    pub fn forward(&self, prediction: &Tensor, target: &Tensor) -> Result<TensorData, TensorError> {
        F::mse_loss(prediction, target)
    }

    /// Gradient of the loss with respect to `prediction`.
    pub fn backward(&self, prediction: &Tensor, target: &Tensor) -> Result<Tensor, TensorError> {
        F::mse_loss_backward(prediction, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mse_loss_zero_at_target() {
        let x = Tensor::from_vec(vec![1.0, -2.0, 3.0], &[3, 1]).unwrap();
        let loss = MSELoss::new();
        assert_eq!(loss.forward(&x, &x).unwrap(), 0.0);
        assert!(loss.backward(&x, &x).unwrap().data().iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_mse_loss_shape_mismatch() {
        let x = Tensor::from_vec(vec![1.0, 2.0], &[2]).unwrap();
        let y = Tensor::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        assert!(MSELoss::new().forward(&x, &y).is_err());
    }
}

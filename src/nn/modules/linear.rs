//! # Linear Layer Module

use crate::nn::functional as F;
use crate::nn::{GradientSet, Module, ParameterSet, Parameterized};
use crate::tensor::{rand_uniform, Tensor, TensorData, TensorError};
use rand::Rng;

const WEIGHT: &str = "weight";
const BIAS: &str = "bias";

/// Applies a linear transformation to the incoming data: `y = xA^T + b`.
///
/// Input shape: `(N, in_features)`. Output shape: `(N, out_features)`.
/// Parameters live under the keys `"weight"` `(out_features, in_features)` and,
/// when enabled, `"bias"` `(out_features)`.
#[derive(Debug, Clone)]
pub struct Linear {
    params: ParameterSet,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// Creates a new Linear module.
    ///
    /// # Arguments
    /// * `in_features`: Size of each input sample.
    /// * `out_features`: Size of each output sample.
    /// * `bias`: Whether to include a bias term.
    /// * `rng`: Source of randomness for initialization.
    ///
    /// Weight and bias are drawn from uniform(-k, k) with k = 1/sqrt(in_features)
    /// (similar to PyTorch defaults).
    pub fn new<R: Rng>(in_features: usize, out_features: usize, bias: bool, rng: &mut R) -> Self {
        let k = (1.0 / in_features.max(1) as TensorData).sqrt();
        let mut params = ParameterSet::new();
        params.insert(WEIGHT, rand_uniform(&[out_features, in_features], -k, k, rng));
        if bias {
            params.insert(BIAS, rand_uniform(&[out_features], -k, k, rng));
        }

        Linear {
            params,
            in_features,
            out_features,
        }
    }

    /// Builds a layer from explicit weight (and optional bias) tensors.
    pub fn from_parts(weight: Tensor, bias: Option<Tensor>) -> Result<Self, TensorError> {
        let (out_features, in_features) = match *weight.shape() {
            [out_features, in_features] => (out_features, in_features),
            _ => {
                return Err(TensorError::Generic(format!(
                    "Linear weight must be 2-D, got shape {:?}",
                    weight.shape()
                )))
            }
        };
        if let Some(ref b) = bias {
            if b.shape() != [out_features] {
                return Err(TensorError::ShapeMismatch {
                    key: BIAS.to_string(),
                    expected: vec![out_features],
                    got: b.shape().to_vec(),
                });
            }
        }

        let mut params = ParameterSet::new();
        params.insert(WEIGHT, weight);
        if let Some(b) = bias {
            params.insert(BIAS, b);
        }
        Ok(Linear {
            params,
            in_features,
            out_features,
        })
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }

    pub fn weight(&self) -> Result<&Tensor, TensorError> {
        self.params
            .get(WEIGHT)
            .ok_or_else(|| TensorError::MissingKey(WEIGHT.to_string()))
    }

    pub fn bias(&self) -> Option<&Tensor> {
        self.params.get(BIAS)
    }

    /// Computes the gradient set of this layer for one batch, given the input
    /// that produced the output and `dL/d(output)`. Keys and shapes match
    /// `parameters()`.
    pub fn backward(&self, input: &Tensor, grad_output: &Tensor) -> Result<GradientSet, TensorError> {
        let (grad_weight, grad_bias) = F::linear_backward(input, grad_output)?;
        let mut grads = GradientSet::new();
        grads.insert(WEIGHT, grad_weight);
        if self.bias().is_some() {
            grads.insert(BIAS, grad_bias);
        }
        Ok(grads)
    }
}

impl Parameterized for Linear {
    fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut ParameterSet {
        &mut self.params
    }
}

impl Module for Linear {
    /// Performs the forward pass: `input @ weight.T + bias`.
    fn forward(&self, input: &Tensor) -> Result<Tensor, TensorError> {
        F::linear(input, self.weight()?, self.bias())
    }
}

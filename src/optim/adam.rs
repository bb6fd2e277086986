//! # Adam Optimizer

use super::{decayed_learning_rate, non_negative, unit_interval, OptimError, Optimizer};
use crate::nn::{GradientSet, ParameterSet, Parameterized};
use crate::tensor::TensorData;
use log::{debug, trace};
use ndarray::Zip;
use serde::{Deserialize, Serialize};

/// Hyperparameters for [`Adam`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdamConfig {
    /// Learning rate (default: 1e-3).
    pub learning_rate: TensorData,
    /// Decay rate of the first moment estimate (default: 0.9).
    pub beta1: TensorData,
    /// Decay rate of the second moment estimate (default: 0.999).
    pub beta2: TensorData,
    /// Term added to the denominator to improve numerical stability (default: 1e-8).
    pub epsilon: TensorData,
    /// Time-based learning-rate decay (default: 0).
    pub decay: TensorData,
}

impl Default for AdamConfig {
    fn default() -> Self {
        AdamConfig {
            learning_rate: 1e-3,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            decay: 0.0,
        }
    }
}

impl AdamConfig {
    /// Checks every bound. `beta1 = 1` passes, but makes the first bias
    /// correction zero, so every step produces non-finite parameters.
    /// `epsilon = 0` passes too; a slot with a zero gradient and zero second
    /// moment then computes `0 / 0` and the parameter becomes NaN.
    pub fn validate(&self) -> Result<(), OptimError> {
        non_negative("learning_rate", self.learning_rate)?;
        unit_interval("beta1", self.beta1)?;
        unit_interval("beta2", self.beta2)?;
        non_negative("epsilon", self.epsilon)?;
        non_negative("decay", self.decay)?;
        Ok(())
    }
}

/// Implements the Adam algorithm.
/// Reference: Adam: A Method for Stochastic Optimization - https://arxiv.org/abs/1412.6980
///
/// One step counter `t` is shared by every parameter and advances once per
/// `fit` call:
///
/// ```text
/// m = beta1 * m + (1 - beta1) * g
/// v = beta2 * v + (1 - beta2) * g^2
/// step_size = lr * sqrt(1 - beta2^t) / (1 - beta1^t)
/// param -= step_size * m / (sqrt(v) + epsilon)
/// ```
#[derive(Debug, Clone)]
pub struct Adam {
    config: AdamConfig,
    first_moment: ParameterSet,  // m_t
    second_moment: ParameterSet, // v_t
    step: u64,
}

impl Adam {
    pub fn new<M: Parameterized + ?Sized>(model: &M, config: AdamConfig) -> Result<Self, OptimError> {
        config.validate()?;
        let first_moment = model.parameters().zeros_like();
        let second_moment = first_moment.clone();
        debug!(
            "Adam: constructed for {} parameter tensors ({} elements), {:?}",
            first_moment.len(),
            first_moment.element_count(),
            config
        );
        Ok(Adam {
            config,
            first_moment,
            second_moment,
            step: 0,
        })
    }

    pub fn config(&self) -> &AdamConfig {
        &self.config
    }

    pub fn first_moment(&self) -> &ParameterSet {
        &self.first_moment
    }

    pub fn second_moment(&self) -> &ParameterSet {
        &self.second_moment
    }

    /// Number of completed `fit` calls; the bias-correction exponent of the
    /// last step.
    pub fn step_count(&self) -> u64 {
        self.step
    }

    pub fn effective_learning_rate(&self) -> TensorData {
        decayed_learning_rate(self.config.learning_rate, self.config.decay, self.step)
    }
}

// powi takes an i32; beta^t has long underflowed to 0 by then anyway
fn exponent(step: u64) -> i32 {
    i32::try_from(step).unwrap_or(i32::MAX)
}

impl<M: Parameterized + ?Sized> Optimizer<M> for Adam {
    type Gradient = GradientSet;

    fn fit(&mut self, model: &mut M, gradient: &GradientSet) {
        let params = model.parameters_mut();
        params.assert_aligned(gradient, "gradient");
        params.assert_aligned(&self.first_moment, "Adam first moment");
        params.assert_aligned(&self.second_moment, "Adam second moment");

        let lr = self.effective_learning_rate();
        self.step += 1;
        let beta1 = self.config.beta1;
        let beta2 = self.config.beta2;
        let eps = self.config.epsilon;

        // Bias correction terms
        let t = exponent(self.step);
        let bias_correction1 = 1.0 - beta1.powi(t);
        let bias_correction2 = 1.0 - beta2.powi(t);
        let step_size = lr * bias_correction2.sqrt() / bias_correction1;
        trace!("Adam: step {} with step size {}", self.step, step_size);

        let slots = params
            .iter_mut()
            .zip(self.first_moment.iter_mut())
            .zip(self.second_moment.iter_mut())
            .zip(gradient.iter());
        for ((((_, param), (_, m)), (_, v)), (_, grad)) in slots {
            Zip::from(param.data_mut())
                .and(m.data_mut())
                .and(v.data_mut())
                .and(grad.data())
                .for_each(|p, m, v, &g| {
                    *m = beta1 * *m + (1.0 - beta1) * g;
                    *v = beta2 * *v + (1.0 - beta2) * g * g;
                    *p -= step_size * *m / (v.sqrt() + eps);
                });
        }
    }

    fn learning_rate(&self) -> TensorData {
        self.config.learning_rate
    }
}

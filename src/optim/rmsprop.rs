//! # RMSProp Optimizer

use super::{decayed_learning_rate, non_negative, unit_interval, OptimError, Optimizer};
use crate::nn::{GradientSet, ParameterSet, Parameterized};
use crate::tensor::TensorData;
use log::{debug, trace};
use ndarray::Zip;
use serde::{Deserialize, Serialize};

/// Hyperparameters for [`RmsProp`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RmsPropConfig {
    pub learning_rate: TensorData,
    /// Smoothing constant for the running mean of squared gradients.
    pub rho: TensorData,
    pub epsilon: TensorData,
    pub decay: TensorData,
}

impl Default for RmsPropConfig {
    fn default() -> Self {
        RmsPropConfig {
            learning_rate: 0.001,
            rho: 0.9,
            epsilon: 1e-8,
            decay: 0.0,
        }
    }
}

impl RmsPropConfig {
    /// Checks every bound. `epsilon = 0` passes, but then a slot whose
    /// gradient and mean square are both zero computes `0 / 0` and the
    /// parameter becomes NaN for good.
    pub fn validate(&self) -> Result<(), OptimError> {
        non_negative("learning_rate", self.learning_rate)?;
        unit_interval("rho", self.rho)?;
        non_negative("epsilon", self.epsilon)?;
        non_negative("decay", self.decay)?;
        Ok(())
    }
}

/// Divides each step by a running root-mean-square of recent gradients:
///
/// ```text
/// mean_square = rho * mean_square + (1 - rho) * g^2
/// param      -= lr * g / (sqrt(mean_square) + epsilon)
/// ```
#[derive(Debug, Clone)]
pub struct RmsProp {
    config: RmsPropConfig,
    mean_square: ParameterSet,
    iterations: u64,
}

impl RmsProp {
    pub fn new<M: Parameterized + ?Sized>(model: &M, config: RmsPropConfig) -> Result<Self, OptimError> {
        config.validate()?;
        let mean_square = model.parameters().zeros_like();
        debug!(
            "RmsProp: constructed for {} parameter tensors, {:?}",
            mean_square.len(),
            config
        );
        Ok(RmsProp {
            config,
            mean_square,
            iterations: 0,
        })
    }

    pub fn config(&self) -> &RmsPropConfig {
        &self.config
    }

    /// Running average of squared gradients, keyed like the parameters.
    pub fn mean_square(&self) -> &ParameterSet {
        &self.mean_square
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn effective_learning_rate(&self) -> TensorData {
        decayed_learning_rate(self.config.learning_rate, self.config.decay, self.iterations)
    }
}

impl<M: Parameterized + ?Sized> Optimizer<M> for RmsProp {
    type Gradient = GradientSet;

    fn fit(&mut self, model: &mut M, gradient: &GradientSet) {
        let params = model.parameters_mut();
        params.assert_aligned(gradient, "gradient");
        params.assert_aligned(&self.mean_square, "RMSProp mean square");

        let lr = self.effective_learning_rate();
        let rho = self.config.rho;
        let eps = self.config.epsilon;
        trace!("RmsProp: step {} with lr {}", self.iterations + 1, lr);

        let slots = params.iter_mut().zip(self.mean_square.iter_mut()).zip(gradient.iter());
        for (((_, param), (_, mean_square)), (_, grad)) in slots {
            Zip::from(param.data_mut())
                .and(mean_square.data_mut())
                .and(grad.data())
                .for_each(|p, ms, &g| {
                    *ms = rho * *ms + (1.0 - rho) * g * g;
                    *p -= lr * g / (ms.sqrt() + eps);
                });
        }

        self.iterations += 1;
    }

    fn learning_rate(&self) -> TensorData {
        self.config.learning_rate
    }
}

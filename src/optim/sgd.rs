//! # Stochastic Gradient Descent (SGD) Optimizer

use super::{decayed_learning_rate, non_negative, OptimError, Optimizer};
use crate::nn::{GradientSet, ParameterSet, Parameterized};
use crate::tensor::TensorData;
use log::{debug, trace};
use ndarray::Zip;
use serde::{Deserialize, Serialize};

/// Hyperparameters for [`Sgd`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SgdConfig {
    /// Learning rate (default: 0.01).
    pub learning_rate: TensorData,
    /// Momentum factor (default: 0).
    pub momentum: TensorData,
    /// Time-based learning-rate decay (default: 0).
    pub decay: TensorData,
    /// Enables Nesterov momentum (default: false).
    pub nesterov: bool,
}

impl Default for SgdConfig {
    fn default() -> Self {
        SgdConfig {
            learning_rate: 0.01,
            momentum: 0.0,
            decay: 0.0,
            nesterov: false,
        }
    }
}

impl SgdConfig {
    pub fn validate(&self) -> Result<(), OptimError> {
        non_negative("learning_rate", self.learning_rate)?;
        non_negative("momentum", self.momentum)?;
        non_negative("decay", self.decay)?;
        Ok(())
    }
}

/// Implements the Stochastic Gradient Descent optimizer with optional
/// (Nesterov) momentum.
///
/// Per element, with `g` the gradient:
///
/// ```text
/// velocity = momentum * velocity - lr * g
/// param   += velocity                            (classic)
/// param   += momentum * velocity - lr * g        (nesterov)
/// ```
#[derive(Debug, Clone)]
pub struct Sgd {
    config: SgdConfig,
    // State for momentum buffers (one per parameter key)
    velocity: ParameterSet,
    iterations: u64,
}

impl Sgd {
    /// Creates a new SGD optimizer for `model`, with zeroed velocity.
    pub fn new<M: Parameterized + ?Sized>(model: &M, config: SgdConfig) -> Result<Self, OptimError> {
        config.validate()?;
        let velocity = model.parameters().zeros_like();
        debug!(
            "Sgd: constructed for {} parameter tensors ({} elements), {:?}",
            velocity.len(),
            velocity.element_count(),
            config
        );
        Ok(Sgd {
            config,
            velocity,
            iterations: 0,
        })
    }

    /// Simplified constructor with only the learning rate.
    pub fn simple<M: Parameterized + ?Sized>(model: &M, learning_rate: TensorData) -> Result<Self, OptimError> {
        Self::new(
            model,
            SgdConfig {
                learning_rate,
                ..SgdConfig::default()
            },
        )
    }

    pub fn config(&self) -> &SgdConfig {
        &self.config
    }

    pub fn velocity(&self) -> &ParameterSet {
        &self.velocity
    }

    /// Number of completed `fit` calls.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Learning rate the next `fit` call will use.
    pub fn effective_learning_rate(&self) -> TensorData {
        decayed_learning_rate(self.config.learning_rate, self.config.decay, self.iterations)
    }
}

impl<M: Parameterized + ?Sized> Optimizer<M> for Sgd {
    type Gradient = GradientSet;

    fn fit(&mut self, model: &mut M, gradient: &GradientSet) {
        let params = model.parameters_mut();
        params.assert_aligned(gradient, "gradient");
        params.assert_aligned(&self.velocity, "SGD velocity");

        let lr = self.effective_learning_rate();
        let momentum = self.config.momentum;
        let nesterov = self.config.nesterov;
        trace!("Sgd: step {} with lr {}", self.iterations + 1, lr);

        let slots = params.iter_mut().zip(self.velocity.iter_mut()).zip(gradient.iter());
        for (((_, param), (_, velocity)), (_, grad)) in slots {
            Zip::from(param.data_mut())
                .and(velocity.data_mut())
                .and(grad.data())
                .for_each(|p, v, &g| {
                    *v = momentum * *v - lr * g;
                    if nesterov {
                        *p += momentum * *v - lr * g;
                    } else {
                        *p += *v;
                    }
                });
        }

        self.iterations += 1;
    }

    fn learning_rate(&self) -> TensorData {
        self.config.learning_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::{full, zeros, Tensor};
    use approx::assert_relative_eq;

    fn params(values: Vec<TensorData>) -> ParameterSet {
        let n = values.len();
        let mut p = ParameterSet::new();
        p.insert("w", Tensor::from_vec(values, &[n]).unwrap());
        p
    }

    fn w(p: &ParameterSet) -> Vec<TensorData> {
        p.get("w").unwrap().to_vec()
    }

    #[test]
    fn test_defaults() {
        let c = SgdConfig::default();
        assert_eq!(c.learning_rate, 0.01);
        assert_eq!(c.momentum, 0.0);
        assert_eq!(c.decay, 0.0);
        assert!(!c.nesterov);
    }

    #[test]
    fn test_invalid_hyperparameters() {
        let p = params(vec![1.0]);
        for config in [
            SgdConfig { learning_rate: -0.1, ..Default::default() },
            SgdConfig { momentum: -0.5, ..Default::default() },
            SgdConfig { decay: -1.0, ..Default::default() },
        ] {
            assert!(matches!(
                Sgd::new(&p, config),
                Err(OptimError::InvalidHyperparameter { .. })
            ));
        }
    }

    #[test]
    fn test_velocity_starts_at_zero() {
        let p = params(vec![1.0, 2.0]);
        let sgd = Sgd::simple(&p, 0.1).unwrap();
        assert_eq!(sgd.velocity(), &p.zeros_like());
        assert_eq!(sgd.iterations(), 0);
        assert_eq!(Optimizer::<ParameterSet>::learning_rate(&sgd), 0.1);
    }

    #[test]
    fn test_zero_gradient_without_momentum_is_noop() {
        let mut p = params(vec![1.0, -2.0, 3.0]);
        let before = p.clone();
        let mut sgd = Sgd::simple(&p, 0.3).unwrap();
        let g = p.zeros_like();
        sgd.fit(&mut p, &g);
        assert_eq!(p, before);
    }

    #[test]
    fn test_plain_step() {
        let mut p = params(vec![1.0, 2.0]);
        let mut sgd = Sgd::simple(&p, 0.5).unwrap();
        let g = params(vec![1.0, -2.0]);
        sgd.fit(&mut p, &g);
        assert_eq!(w(&p), vec![0.5, 3.0]);
        assert_eq!(sgd.iterations(), 1);
    }

    #[test]
    fn test_momentum_carries_over() {
        let config = SgdConfig {
            learning_rate: 0.1,
            momentum: 0.9,
            ..Default::default()
        };
        let g = params(vec![1.0]);

        let mut p = params(vec![0.0]);
        let mut sgd = Sgd::new(&p, config).unwrap();
        sgd.fit(&mut p, &g);
        let first_delta = w(&p)[0];
        sgd.fit(&mut p, &g);
        let second_delta = w(&p)[0] - first_delta;

        // velocity: -0.1, then 0.9 * -0.1 - 0.1 = -0.19
        assert_relative_eq!(first_delta, -0.1, epsilon = 1e-6);
        assert_relative_eq!(second_delta, -0.19, epsilon = 1e-6);
        assert_relative_eq!(w(sgd.velocity())[0], -0.19, epsilon = 1e-6);

        // a fresh instance fed the same gradient takes the first-step delta again
        let mut fresh_p = params(vec![0.0]);
        let mut fresh = Sgd::new(&fresh_p, config).unwrap();
        fresh.fit(&mut fresh_p, &g);
        assert_ne!(w(&fresh_p)[0], second_delta);
        assert_eq!(w(&fresh_p)[0], first_delta);
    }

    #[test]
    fn test_nesterov_step() {
        let config = SgdConfig {
            learning_rate: 0.1,
            momentum: 0.9,
            nesterov: true,
            ..Default::default()
        };
        let mut p = params(vec![0.0]);
        let mut sgd = Sgd::new(&p, config).unwrap();
        let g = params(vec![1.0]);
        sgd.fit(&mut p, &g);
        // v = -0.1; p += 0.9 * -0.1 - 0.1
        assert_relative_eq!(w(&p)[0], -0.19, epsilon = 1e-6);
        assert_relative_eq!(w(sgd.velocity())[0], -0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_decay_shrinks_later_steps() {
        let config = SgdConfig {
            learning_rate: 1.0,
            decay: 1.0,
            ..Default::default()
        };
        let mut p = params(vec![0.0]);
        let mut sgd = Sgd::new(&p, config).unwrap();
        let g = params(vec![1.0]);
        sgd.fit(&mut p, &g);
        assert_eq!(w(&p)[0], -1.0);
        assert_eq!(sgd.effective_learning_rate(), 0.5);
        sgd.fit(&mut p, &g);
        assert_eq!(w(&p)[0], -1.5);
        assert_eq!(Optimizer::<ParameterSet>::learning_rate(&sgd), 1.0);
    }

    #[test]
    #[should_panic(expected = "gradient does not match")]
    fn test_mismatched_gradient_panics() {
        let mut p = params(vec![1.0, 2.0]);
        let mut sgd = Sgd::simple(&p, 0.1).unwrap();
        let mut g = ParameterSet::new();
        g.insert("w", zeros(&[3]));
        sgd.fit(&mut p, &g);
    }

    #[test]
    fn test_multiple_keys_update_independently() {
        let mut p = ParameterSet::new();
        p.insert("a", full(&[2], 1.0));
        p.insert("b", full(&[2, 2], 2.0));
        let mut sgd = Sgd::simple(&p, 1.0).unwrap();
        let mut g = ParameterSet::new();
        g.insert("a", full(&[2], 0.5));
        g.insert("b", full(&[2, 2], -1.0));
        sgd.fit(&mut p, &g);
        assert!(p.get("a").unwrap().data().iter().all(|&x| x == 0.5));
        assert!(p.get("b").unwrap().data().iter().all(|&x| x == 3.0));
    }
}

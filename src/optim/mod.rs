//! # Optimization Algorithms (`optim`)
//!
//! Update rules that mutate a model's parameters given a gradient set.
//! Every optimizer is an independent type implementing [`Optimizer`]; each one
//! owns its accumulator state, shaped like the model's parameters and zeroed
//! at construction.
//!
//! ```
//! use rtorch_optim::nn::{GradientSet, ParameterSet};
//! use rtorch_optim::optim::{Optimizer, Sgd, SgdConfig};
//! use rtorch_optim::tensor::{full, ones};
//!
//! let mut params = ParameterSet::new();
//! params.insert("w", ones(&[3]));
//!
//! let mut sgd = Sgd::new(&params, SgdConfig { learning_rate: 0.5, ..Default::default() }).unwrap();
//!
//! let mut grads = GradientSet::new();
//! grads.insert("w", full(&[3], 1.0));
//! sgd.fit(&mut params, &grads);
//!
//! assert_eq!(params.get("w").unwrap().to_vec(), vec![0.5, 0.5, 0.5]);
//! ```

use crate::tensor::TensorData;

// --- Submodules ---
pub mod adam;
pub mod config;
pub mod riemann;
pub mod rmsprop;
pub mod sgd;

// Re-export optimizers
pub use adam::{Adam, AdamConfig};
pub use config::OptimizerSpec;
pub use riemann::{RiemannSgd, RiemannSgdConfig};
pub use rmsprop::{RmsProp, RmsPropConfig};
pub use sgd::{Sgd, SgdConfig};

// --- Errors ---

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum OptimError {
    #[error("Invalid {name} value {value}: {reason}")]
    InvalidHyperparameter {
        name: &'static str,
        value: TensorData,
        reason: &'static str,
    },
}

// --- Optimizer Trait ---

/// The update rule shared by every algorithm.
///
/// `M` is the model type. Flat optimizers accept any
/// [`Parameterized`](crate::nn::Parameterized) model with a
/// [`GradientSet`](crate::nn::GradientSet); [`RiemannSgd`] accepts any
/// [`Manifold`](crate::manifold::Manifold) with its cotangent type.
pub trait Optimizer<M: ?Sized> {
    type Gradient: ?Sized;

    /// Applies one update step to `model` in place and advances the
    /// optimizer's own state.
    ///
    /// # Panics
    /// If `gradient` does not have exactly the keys and shapes of the model's
    /// parameters. The model is left untouched in that case.
    fn fit(&mut self, model: &mut M, gradient: &Self::Gradient);

    /// The configured (base) learning rate.
    fn learning_rate(&self) -> TensorData;
}

// --- Hyperparameter validation ---

pub(crate) fn non_negative(name: &'static str, value: TensorData) -> Result<(), OptimError> {
    // NaN fails the comparison and is rejected too
    if value >= 0.0 {
        Ok(())
    } else {
        Err(OptimError::InvalidHyperparameter {
            name,
            value,
            reason: "must be >= 0",
        })
    }
}

pub(crate) fn unit_interval(name: &'static str, value: TensorData) -> Result<(), OptimError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(OptimError::InvalidHyperparameter {
            name,
            value,
            reason: "must be in [0, 1]",
        })
    }
}

/// Time-based decay: the rate used by the call that follows `iterations`
/// completed calls.
pub(crate) fn decayed_learning_rate(learning_rate: TensorData, decay: TensorData, iterations: u64) -> TensorData {
    learning_rate / (1.0 + decay * iterations as TensorData)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative() {
        assert!(non_negative("lr", 0.0).is_ok());
        assert!(non_negative("lr", 1.5).is_ok());
        assert_eq!(
            non_negative("lr", -0.1),
            Err(OptimError::InvalidHyperparameter {
                name: "lr",
                value: -0.1,
                reason: "must be >= 0"
            })
        );
        assert!(non_negative("lr", TensorData::NAN).is_err());
    }

    #[test]
    fn test_unit_interval() {
        assert!(unit_interval("beta1", 0.0).is_ok());
        assert!(unit_interval("beta1", 1.0).is_ok());
        assert!(unit_interval("beta1", -0.01).is_err());
        assert!(unit_interval("beta1", 1.01).is_err());
        assert!(unit_interval("beta1", TensorData::NAN).is_err());
    }

    #[test]
    fn test_decay_schedule() {
        assert_eq!(decayed_learning_rate(0.1, 0.0, 1000), 0.1);
        assert_eq!(decayed_learning_rate(1.0, 0.5, 0), 1.0);
        assert_eq!(decayed_learning_rate(1.0, 0.5, 2), 0.5);
    }

    #[test]
    fn test_error_message() {
        let err = unit_interval("rho", 2.0).unwrap_err();
        assert_eq!(err.to_string(), "Invalid rho value 2: must be in [0, 1]");
    }
}

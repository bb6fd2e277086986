//! Serializable optimizer selection, for picking an algorithm and its
//! hyperparameters from a config file.

use super::{Adam, AdamConfig, OptimError, Optimizer, RmsProp, RmsPropConfig, Sgd, SgdConfig};
use crate::nn::{GradientSet, Parameterized};
use log::debug;
use serde::{Deserialize, Serialize};

/// Which flat-space optimizer to build, and with what hyperparameters.
///
/// ```json
/// { "adam": { "learning_rate": 0.01, "beta1": 0.8 } }
/// ```
///
/// Omitted fields take the algorithm's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerSpec {
    Sgd(SgdConfig),
    #[serde(rename = "rmsprop")]
    RmsProp(RmsPropConfig),
    Adam(AdamConfig),
}

impl OptimizerSpec {
    pub fn name(&self) -> &'static str {
        match self {
            OptimizerSpec::Sgd(_) => "sgd",
            OptimizerSpec::RmsProp(_) => "rmsprop",
            OptimizerSpec::Adam(_) => "adam",
        }
    }

    /// Validates the hyperparameters and builds the optimizer with state
    /// shaped like `model`'s parameters.
    pub fn build<M: Parameterized + ?Sized>(
        &self,
        model: &M,
    ) -> Result<Box<dyn Optimizer<M, Gradient = GradientSet>>, OptimError> {
        debug!("building {} optimizer", self.name());
        let optimizer: Box<dyn Optimizer<M, Gradient = GradientSet>> = match *self {
            OptimizerSpec::Sgd(config) => Box::new(Sgd::new(model, config)?),
            OptimizerSpec::RmsProp(config) => Box::new(RmsProp::new(model, config)?),
            OptimizerSpec::Adam(config) => Box::new(Adam::new(model, config)?),
        };
        Ok(optimizer)
    }
}

impl Default for OptimizerSpec {
    fn default() -> Self {
        OptimizerSpec::Sgd(SgdConfig::default())
    }
}

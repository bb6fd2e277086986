//! # Riemannian SGD
//!
//! Gradient descent on a model that is a point on a manifold. The optimizer
//! holds no accumulators: it turns the gradient into a tangent vector, negates
//! and scales it, and asks the model to move along the result.

use super::{non_negative, OptimError, Optimizer};
use crate::manifold::{Manifold, VectorSpace};
use crate::tensor::TensorData;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiemannSgdConfig {
    pub learning_rate: TensorData,
}

impl Default for RiemannSgdConfig {
    fn default() -> Self {
        RiemannSgdConfig { learning_rate: 0.01 }
    }
}

impl RiemannSgdConfig {
    pub fn validate(&self) -> Result<(), OptimError> {
        non_negative("learning_rate", self.learning_rate)
    }
}

/// `model = model.moved_along(lr * (0 - tangent_vector_from(gradient)))`
#[derive(Debug, Clone)]
pub struct RiemannSgd {
    config: RiemannSgdConfig,
    iterations: u64,
}

impl RiemannSgd {
    pub fn new(config: RiemannSgdConfig) -> Result<Self, OptimError> {
        config.validate()?;
        debug!("RiemannSgd: constructed, {:?}", config);
        Ok(RiemannSgd { config, iterations: 0 })
    }

    pub fn config(&self) -> &RiemannSgdConfig {
        &self.config
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}

impl<M: Manifold> Optimizer<M> for RiemannSgd {
    type Gradient = M::Cotangent;

    fn fit(&mut self, model: &mut M, gradient: &M::Cotangent) {
        let tangent = model.tangent_vector_from(gradient);
        let direction = tangent.zeros_like().sub_vector(&tangent).scaled(self.config.learning_rate);
        model.move_along(&direction);
        self.iterations += 1;
        trace!("RiemannSgd: step {}", self.iterations);
    }

    fn learning_rate(&self) -> TensorData {
        self.config.learning_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifold::Sphere;
    use crate::nn::ParameterSet;
    use crate::optim::Sgd;
    use crate::tensor::{ops, Tensor};
    use approx::assert_relative_eq;

    fn sample() -> ParameterSet {
        let mut p = ParameterSet::new();
        p.insert("w", Tensor::from_vec(vec![0.5, -1.25, 3.0], &[3]).unwrap());
        p.insert("b", Tensor::from_vec(vec![0.1], &[1]).unwrap());
        p
    }

    fn gradient() -> ParameterSet {
        let mut g = ParameterSet::new();
        g.insert("w", Tensor::from_vec(vec![0.3, 0.7, -2.0], &[3]).unwrap());
        g.insert("b", Tensor::from_vec(vec![-0.9], &[1]).unwrap());
        g
    }

    #[test]
    fn test_negative_learning_rate_rejected() {
        assert!(RiemannSgd::new(RiemannSgdConfig { learning_rate: -1.0 }).is_err());
        assert_eq!(RiemannSgd::new(RiemannSgdConfig::default()).unwrap().config().learning_rate, 0.01);
    }

    #[test]
    fn test_matches_plain_sgd_on_flat_parameters() {
        let lr = 0.05;
        let mut flat = sample();
        let mut curved = sample();
        let mut sgd = Sgd::simple(&flat, lr).unwrap();
        let mut riemann = RiemannSgd::new(RiemannSgdConfig { learning_rate: lr }).unwrap();

        for _ in 0..5 {
            let g = gradient();
            sgd.fit(&mut flat, &g);
            riemann.fit(&mut curved, &g);
            assert_eq!(flat, curved);
        }
        assert_eq!(riemann.iterations(), 5);
    }

    #[test]
    fn test_sphere_step_stays_on_sphere() {
        let mut point = Sphere::new(Tensor::from_vec(vec![1.0, 0.0, 0.0], &[3]).unwrap()).unwrap();
        let mut opt = RiemannSgd::new(RiemannSgdConfig { learning_rate: 0.1 }).unwrap();
        let g = Tensor::from_vec(vec![1.0, -2.0, 0.5], &[3]).unwrap();
        for _ in 0..10 {
            opt.fit(&mut point, &g);
            assert_relative_eq!(point.point().norm(), 1.0, epsilon = 1e-5);
        }
        // descending along -g moves towards +y
        assert!(ops::dot(point.point(), &g).unwrap() < 1.0);
    }

    #[test]
    #[should_panic(expected = "gradient does not match")]
    fn test_unaligned_gradient_panics() {
        let mut p = sample();
        let mut g = gradient();
        g.insert("extra", Tensor::scalar(1.0));
        RiemannSgd::new(RiemannSgdConfig::default()).unwrap().fit(&mut p, &g);
    }
}

//! # RTorch Optim
//!
//! First-order optimizers for models whose trainable state is a keyed
//! collection of tensors: SGD (with momentum and Nesterov), RMSProp, Adam,
//! and a Riemannian SGD for models that live on a manifold.
//!
//! Gradients come from outside (no autograd here); an optimizer is built
//! once per model and then `fit` once per training step.

pub mod manifold;
pub mod nn;
pub mod optim;
pub mod tensor;
pub mod utils;

pub mod prelude {
    pub use crate::manifold::{Manifold, Sphere, VectorSpace};
    pub use crate::nn::{GradientSet, Module, ParameterSet, Parameterized};
    pub use crate::optim::{
        Adam, AdamConfig, OptimError, Optimizer, OptimizerSpec, RiemannSgd, RiemannSgdConfig, RmsProp, RmsPropConfig,
        Sgd, SgdConfig,
    };
    pub use crate::tensor::{Tensor, TensorData, TensorError};
}

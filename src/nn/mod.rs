//! # Neural Network Module (`nn`)
//!
//! The model side of the optimizer contract: keyed parameter collections, the
//! traversal trait optimizers consume, and a small reference layer and loss
//! used to drive optimizers end to end.

use crate::tensor::{Tensor, TensorError};
use std::fmt::Debug;

// --- Submodules ---
pub mod functional;
pub mod loss;
pub mod modules;
pub mod params;

// Re-export common items
pub use loss::MSELoss;
pub use modules::Linear;
pub use params::{GradientSet, ParameterSet};

// --- Core Traits ---

/// Anything that owns a `ParameterSet` and lets an optimizer update it in place.
///
/// The returned set must keep the same keys and shapes for the lifetime of
/// any optimizer built from it.
pub trait Parameterized {
    fn parameters(&self) -> &ParameterSet;

    fn parameters_mut(&mut self) -> &mut ParameterSet;
}

/// A bare parameter set is its own model.
impl Parameterized for ParameterSet {
    fn parameters(&self) -> &ParameterSet {
        self
    }

    fn parameters_mut(&mut self) -> &mut ParameterSet {
        self
    }
}

/// Base trait for neural network modules (layers, containers, etc.).
pub trait Module: Parameterized + Debug {
    /// Performs the forward pass of the module.
    ///
    /// # Arguments
    /// * `input`: The input tensor to the module.
    ///
    /// # Returns
    /// * `Result<Tensor, TensorError>`: The output tensor of the module.
    fn forward(&self, input: &Tensor) -> Result<Tensor, TensorError>;
}

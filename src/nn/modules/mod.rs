//! # Neural Network Layer Modules
//!
//! Contains the layer implementations used as reference models.

// --- Re-export Layer Implementations ---
pub mod linear;
pub use linear::Linear;

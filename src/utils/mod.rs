//! # Utility Functions (`utils`)
//!
//! Provides helpers for saving and restoring parameter snapshots.

pub mod serialization;

pub use serialization::{load, load_into, save, SerializationError};

//! # Parameter Snapshot Utilities
//!
//! Functions for saving and loading a model's parameters.
//! Uses `serde` for serialization and `bincode` as the binary format.
//! Optimizer state is never persisted.
//!
//! Snapshots sit outside the optimizers: nothing in `optim` reads or writes
//! them, and an optimizer built on a restored model starts from zeroed state.

use crate::nn::ParameterSet;
use crate::tensor::{Tensor, TensorData, TensorError};

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

// --- Error Type ---
#[derive(thiserror::Error, Debug)]
pub enum SerializationError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization Error (Bincode): {0}")]
    Bincode(#[from] bincode::Error),
    #[error("Invalid tensor '{key}': {source}")]
    Tensor {
        key: String,
        #[source]
        source: TensorError,
    },
    #[error("Tensor shape mismatch during loading: key '{key}', expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        key: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("Missing key in state dict during loading: '{0}'")]
    MissingKey(String),
    #[error("Unexpected key in state dict during loading: '{0}'")]
    UnexpectedKey(String),
}

// --- Serializable Tensor Wrapper ---
// Shape plus row-major data; ndarray's own serde support is not enabled.

#[derive(Serialize, Deserialize, Debug)]
struct SerializableTensor {
    shape: Vec<usize>,
    data: Vec<TensorData>,
}

impl SerializableTensor {
    fn from_tensor(tensor: &Tensor) -> Self {
        SerializableTensor {
            shape: tensor.shape().to_vec(),
            data: tensor.to_vec(),
        }
    }

    fn into_tensor(self, key: &str) -> Result<Tensor, SerializationError> {
        Tensor::from_vec(self.data, &self.shape).map_err(|source| SerializationError::Tensor {
            key: key.to_string(),
            source,
        })
    }
}

// BTreeMap keeps the byte output stable for a given parameter set.
type StateDict = BTreeMap<String, SerializableTensor>;

fn state_dict(params: &ParameterSet) -> StateDict {
    params
        .iter()
        .map(|(key, tensor)| (key.clone(), SerializableTensor::from_tensor(tensor)))
        .collect()
}

fn into_parameters(state: StateDict) -> Result<ParameterSet, SerializationError> {
    let mut params = ParameterSet::new();
    for (key, tensor) in state {
        let tensor = tensor.into_tensor(&key)?;
        params.insert(key, tensor);
    }
    Ok(params)
}

// --- In-memory ---

/// Encodes `params` as bytes. Equal parameter sets always encode to equal bytes.
pub fn to_bytes(params: &ParameterSet) -> Result<Vec<u8>, SerializationError> {
    Ok(bincode::serialize(&state_dict(params))?)
}

pub fn from_bytes(bytes: &[u8]) -> Result<ParameterSet, SerializationError> {
    let state: StateDict = bincode::deserialize(bytes)?;
    into_parameters(state)
}

// --- Files ---

/// Saves `params` to a file, replacing any existing content.
pub fn save<P: AsRef<Path>>(params: &ParameterSet, path: P) -> Result<(), SerializationError> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    bincode::serialize_into(writer, &state_dict(params))?;
    Ok(())
}

/// Reads a parameter set saved by [`save`].
pub fn load<P: AsRef<Path>>(path: P) -> Result<ParameterSet, SerializationError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let state: StateDict = bincode::deserialize_from(reader)?;
    into_parameters(state)
}

/// Loads a snapshot from `path` and copies it into `params`.
///
/// # Arguments
/// * `params`: The parameters to overwrite. Keys and shapes are never changed.
/// * `path`: The file written by [`save`].
/// * `strict`: If `true`, the snapshot's keys must exactly match `params`'
///   keys. If `false`, keys missing from either side are skipped with a
///   warning.
///
/// A shape mismatch on a shared key is always an error. Nothing is written
/// unless the whole snapshot is accepted.
pub fn load_into<P: AsRef<Path>>(params: &mut ParameterSet, path: P, strict: bool) -> Result<(), SerializationError> {
    let loaded = load(path)?;

    for (key, current) in params.iter() {
        match loaded.get(key) {
            Some(tensor) if tensor.shape() != current.shape() => {
                return Err(SerializationError::ShapeMismatch {
                    key: key.clone(),
                    expected: current.shape().to_vec(),
                    got: tensor.shape().to_vec(),
                });
            }
            Some(_) => {}
            None if strict => return Err(SerializationError::MissingKey(key.clone())),
            None => warn!("Key '{}' not found in snapshot, keeping current value", key),
        }
    }
    for key in loaded.keys() {
        if !params.contains_key(key) {
            if strict {
                return Err(SerializationError::UnexpectedKey(key.to_string()));
            }
            warn!("Snapshot key '{}' has no matching parameter, ignoring", key);
        }
    }

    for (key, tensor) in loaded {
        if let Some(slot) = params.get_mut(&key) {
            *slot = tensor;
        }
    }
    Ok(())
}

//! # Parameter Collections
//!
//! `ParameterSet` is an ordered, keyed collection of tensors. Keys are kept in
//! a `BTreeMap` so every traversal (parameters, gradients, optimizer
//! accumulators) visits slots in the same order.

use crate::tensor::{Tensor, TensorError};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// A model's trainable state: parameter name -> tensor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterSet {
    tensors: BTreeMap<String, Tensor>,
}

/// Loss gradients, one tensor per parameter key. Same key space and shapes as
/// the `ParameterSet` they were computed for.
pub type GradientSet = ParameterSet;

impl ParameterSet {
    pub fn new() -> Self {
        ParameterSet { tensors: BTreeMap::new() }
    }

    /// Inserts a tensor under `key`, returning the tensor previously stored there.
    pub fn insert(&mut self, key: impl Into<String>, tensor: Tensor) -> Option<Tensor> {
        self.tensors.insert(key.into(), tensor)
    }

    pub fn get(&self, key: &str) -> Option<&Tensor> {
        self.tensors.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Tensor> {
        self.tensors.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.tensors.contains_key(key)
    }

    /// Number of tensors (not elements).
    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// Total number of scalar elements across all tensors.
    pub fn element_count(&self) -> usize {
        self.tensors.values().map(Tensor::size).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tensors.keys().map(String::as_str)
    }

    /// Iterates `(key, tensor)` pairs in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Tensor> {
        self.tensors.iter()
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, String, Tensor> {
        self.tensors.iter_mut()
    }

    /// A set with the same keys and shapes, every element zero. Optimizer
    /// accumulators start from this.
    pub fn zeros_like(&self) -> Self {
        self.map(Tensor::zeros_like)
    }

    /// Applies `f` to every tensor, keeping keys.
    pub fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Tensor) -> Tensor,
    {
        self.tensors.iter().map(|(k, t)| (k.clone(), f(t))).collect()
    }

    /// Combines two aligned sets key by key.
    pub fn zip_with<F>(&self, other: &ParameterSet, mut f: F) -> Result<Self, TensorError>
    where
        F: FnMut(&Tensor, &Tensor) -> Result<Tensor, TensorError>,
    {
        self.check_aligned(other)?;
        let mut out = ParameterSet::new();
        for ((key, a), b) in self.tensors.iter().zip(other.tensors.values()) {
            out.insert(key.clone(), f(a, b)?);
        }
        Ok(out)
    }

    /// Checks that `other` has exactly the same keys as `self` and that every
    /// corresponding tensor has the same shape.
    pub fn check_aligned(&self, other: &ParameterSet) -> Result<(), TensorError> {
        for (key, tensor) in &self.tensors {
            let other_tensor = other
                .tensors
                .get(key)
                .ok_or_else(|| TensorError::MissingKey(key.clone()))?;
            if tensor.shape() != other_tensor.shape() {
                return Err(TensorError::ShapeMismatch {
                    key: key.clone(),
                    expected: tensor.shape().to_vec(),
                    got: other_tensor.shape().to_vec(),
                });
            }
        }
        if let Some(extra) = other.tensors.keys().find(|k| !self.tensors.contains_key(*k)) {
            return Err(TensorError::UnexpectedKey(extra.clone()));
        }
        Ok(())
    }

    /// Like `check_aligned`, but a mismatch is a caller bug and panics.
    #[track_caller]
    pub fn assert_aligned(&self, other: &ParameterSet, what: &str) {
        if let Err(e) = self.check_aligned(other) {
            panic!("{what} does not match the parameter set: {e}");
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Tensor)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, Tensor)>>(iter: I) -> Self {
        ParameterSet {
            tensors: iter.into_iter().map(|(k, t)| (k.into(), t)).collect(),
        }
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, Tensor);
    type IntoIter = btree_map::IntoIter<String, Tensor>;

    fn into_iter(self) -> Self::IntoIter {
        self.tensors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = (&'a String, &'a Tensor);
    type IntoIter = btree_map::Iter<'a, String, Tensor>;

    fn into_iter(self) -> Self::IntoIter {
        self.tensors.iter()
    }
}

impl<'a> IntoIterator for &'a mut ParameterSet {
    type Item = (&'a String, &'a mut Tensor);
    type IntoIter = btree_map::IterMut<'a, String, Tensor>;

    fn into_iter(self) -> Self::IntoIter {
        self.tensors.iter_mut()
    }
}

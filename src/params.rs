use crate::error::KinematicsError;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named real-valued parameters of a single model component
///
/// This is the keyword-argument mapping model profiles are evaluated with, e.g.
/// `{"theta_E": 1.0, "e1": 0.1, "e2": 0.1, "center_x": 0.0, "center_y": 0.0}` for an SIE.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ParamMap(BTreeMap<String, f64>);

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a required parameter, `context` names the owner in the error message
    pub fn require(&self, key: &str, context: &'static str) -> Result<f64, KinematicsError> {
        self.0
            .get(key)
            .copied()
            .ok_or_else(|| KinematicsError::missing(key, context))
    }

    /// Value of an optional parameter falling back to `default`
    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.0.get(key).copied().unwrap_or(default)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(key.into(), value)
    }

    /// Copies all entries of `other` into `self`, overwriting existing keys
    pub fn extend_from(&mut self, other: &ParamMap) {
        self.0
            .extend(other.0.iter().map(|(key, &value)| (key.clone(), value)));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(key, &value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks every key of `keys` is present
    pub fn require_all(&self, keys: &[&str], context: &'static str) -> Result<(), KinematicsError> {
        match keys.iter().find(|key| !self.contains(key)) {
            Some(key) => Err(KinematicsError::missing(key, context)),
            None => Ok(()),
        }
    }
}

impl<K> FromIterator<(K, f64)> for ParamMap
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K, const N: usize> From<[(K, f64); N]> for ParamMap
where
    K: Into<String>,
{
    fn from(pairs: [(K, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Returns the `index`-th parameter map of a multi-profile model
pub(crate) fn profile_params(
    kwargs: &[ParamMap],
    index: usize,
) -> Result<&ParamMap, KinematicsError> {
    kwargs
        .get(index)
        .ok_or(KinematicsError::ProfileIndexOutOfRange {
            index,
            len: kwargs.len(),
        })
}

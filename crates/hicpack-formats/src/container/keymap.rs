//! Key to index mapping stored after the container header
//!
//! The key map is serialized as a JSON object (`{"A":0,"B":1}`). Indices
//! are exactly `0..len`, and the index order is the order in which matrix
//! pairs are laid out in the payload.

use crate::container::error::{ContainerError, Result};
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered, closed set of keys with dense indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    keys: Vec<String>,
    index: HashMap<String, usize>,
}

impl KeyMap {
    /// Build a key map; each key's index is its position in `keys`
    pub fn new<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Err(ContainerError::EmptyKeySet);
        }
        if u32::try_from(keys.len()).is_err() {
            return Err(ContainerError::TooManyKeys(keys.len()));
        }

        let mut index = HashMap::with_capacity(keys.len());
        for (idx, key) in keys.iter().enumerate() {
            if index.insert(key.clone(), idx).is_some() {
                return Err(ContainerError::DuplicateKey(key.clone()));
            }
        }

        Ok(Self { keys, index })
    }

    /// Rebuild a key map from explicit `key -> index` assignments
    ///
    /// The indices must be a permutation of `0..len`.
    pub fn from_indices<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        let entries: Vec<(String, u64)> = entries.into_iter().collect();
        let count = entries.len();
        if count == 0 {
            return Err(ContainerError::EmptyKeySet);
        }

        let mut slots: Vec<Option<String>> = vec![None; count];
        for (key, idx) in entries {
            let slot = usize::try_from(idx)
                .ok()
                .and_then(|i| slots.get_mut(i))
                .ok_or_else(|| {
                    ContainerError::InvalidKeyMap(format!(
                        "index {idx} for key '{key}' is out of range for {count} keys"
                    ))
                })?;
            if let Some(existing) = slot.as_ref() {
                return Err(ContainerError::InvalidKeyMap(format!(
                    "index {idx} assigned to both '{existing}' and '{key}'"
                )));
            }
            *slot = Some(key);
        }

        // Every slot is filled: count entries went into count distinct slots
        Self::new(slots.into_iter().flatten())
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false for a constructed map; present for API symmetry
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of matrix pairs a container with this key map holds
    pub fn pair_count(&self) -> usize {
        self.keys.len() * self.keys.len()
    }

    /// Index of `key`
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Index of `key`, or `UnknownKey`
    pub fn require_index(&self, key: &str) -> Result<usize> {
        self.index_of(key)
            .ok_or_else(|| ContainerError::UnknownKey(key.to_string()))
    }

    /// Key at `index`
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(String::as_str)
    }

    /// Keys in index order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Iterate `(index, key)` in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.keys.iter().enumerate().map(|(i, k)| (i, k.as_str()))
    }

    /// Iterate all `(row, col)` index pairs in payload order
    /// (row outer, column inner)
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.keys.len();
        (0..n).flat_map(move |i| (0..n).map(move |j| (i, j)))
    }

    /// Serialize to compact JSON bytes with keys in index order
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse JSON bytes produced by [`KeyMap::to_json_bytes`] or any JSON
    /// object mapping keys to dense indices
    pub fn from_json_bytes(data: &[u8]) -> Result<Self> {
        let raw: HashMap<String, u64> = serde_json::from_slice(data)?;
        Self::from_indices(raw)
    }
}

impl Serialize for KeyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for (idx, key) in self.keys.iter().enumerate() {
            map.serialize_entry(key, &idx)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for KeyMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = HashMap::<String, u64>::deserialize(deserializer)?;
        Self::from_indices(raw).map_err(serde::de::Error::custom)
    }
}

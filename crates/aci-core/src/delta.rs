//! Snapshot / delta resolution.
//!
//! A [`Snapshot`] is an ordered map of canonical attribute strings --
//! either the values the caller asked for (proposed) or the values read
//! from the controller (existing). [`diff`] computes the explicit list
//! of changed fields; [`Snapshot::merged_with`] produces the complete
//! attribute set to commit (delta values overlaid on existing ones, so
//! unchanged attributes are resent alongside changed ones).

use std::collections::BTreeMap;

use serde::Serialize;

use aci_api::Mo;

/// An ordered attribute snapshot with canonical string values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<String, String>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a managed object, taking only the listed keys.
    ///
    /// Attributes the controller reports but the operation does not manage
    /// (`dn`, `status`, timestamps, ...) are deliberately excluded so they
    /// can never appear in a delta.
    pub fn from_mo(mo: &Mo, keys: &[&str]) -> Self {
        let mut snap = Self::new();
        for key in keys {
            if let Some(value) = mo.attr(key) {
                snap.set(*key, value);
            }
        }
        snap
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert only when the caller actually supplied a value.
    pub fn set_opt(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlay a delta on this (existing) snapshot: the complete attribute
    /// set to commit. For a net-new object this is just the delta.
    pub fn merged_with(&self, delta: &Delta) -> Snapshot {
        let mut merged = self.clone();
        for change in &delta.changes {
            merged.set(change.key.clone(), change.value.clone());
        }
        merged
    }
}

/// One changed field: the proposed key/value pair that differs from existing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub key: String,
    pub value: String,
}

/// The explicit list of fields that differ between proposed and existing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Delta {
    changes: Vec<Change>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.changes.iter().any(|c| c.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.changes
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.value.as_str())
    }
}

/// Compute the delta: every `(key, value)` pair in `proposed` whose exact
/// pair is not present in `existing`. A differing value and an absent key
/// both count; keys only in `existing` never appear (attributes the caller
/// didn't set are never cleared).
pub fn diff(proposed: &Snapshot, existing: &Snapshot) -> Delta {
    let changes = proposed
        .iter()
        .filter(|(key, value)| existing.get(key) != Some(value))
        .map(|(key, value)| Change {
            key: key.to_string(),
            value: value.to_string(),
        })
        .collect();
    Delta { changes }
}

//! Payloads collected during a run.

use super::TaskName;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Ordered mapping from task name to raw response payload.
///
/// Only successful tasks have an entry; a failed task is absent rather than
/// mapped to `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedResults {
    entries: Vec<(TaskName, Value)>,
}

impl CollectedResults {
    /// Collects payloads from `(name, payload)` pairs, skipping absent
    /// payloads and repeated names.
    #[must_use]
    pub fn from_payloads(pairs: impl IntoIterator<Item = (TaskName, Option<Value>)>) -> Self {
        let mut results = Self::default();
        for (name, payload) in pairs {
            let Some(value) = payload else { continue };
            if !results.contains(name.as_str()) {
                results.entries.push((name, value));
            }
        }
        results
    }

    /// Returns the payload recorded for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(entry, _)| entry.as_str() == name)
            .map(|(_, value)| value)
    }

    /// Returns `true` when `name` has a payload.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&TaskName, &Value)> {
        self.entries.iter().map(|(name, value)| (name, value))
    }

    /// Iterates the names that have a payload.
    pub fn names(&self) -> impl Iterator<Item = &TaskName> {
        self.entries.iter().map(|(name, _)| name)
    }

    /// Returns the number of recorded payloads.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for CollectedResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(name, value)| (name, value)))
    }
}

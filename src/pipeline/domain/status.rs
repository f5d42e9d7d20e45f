//! Task status values and the per-run status map.

use super::{ParseTaskStatusError, TaskName};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Lifecycle status of one source task within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// The run has started but the task has not.
    Pending,
    /// The task's request is in flight.
    Loading,
    /// The task settled with a payload.
    Success,
    /// The task settled without a payload.
    Error,
}

impl TaskStatus {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// Returns `true` for `success` and `error`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    /// Returns whether a run may move a task from this status to `next`.
    ///
    /// Statuses only advance: `pending`, then `loading`, then one terminal
    /// status. A terminal status never changes.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        self.rank() < next.rank()
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Loading => 1,
            Self::Success | Self::Error => 2,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, ParseTaskStatusError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "loading" => Ok(Self::Loading),
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Ordered mapping from task name to status.
///
/// The key set is fixed when the map is created; entries are overwritten and
/// never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMap {
    entries: Vec<(TaskName, TaskStatus)>,
}

impl StatusMap {
    /// Creates a map with every name `pending`, in the given order.
    ///
    /// Repeated names keep their first position.
    #[must_use]
    pub fn pending<'a>(names: impl IntoIterator<Item = &'a TaskName>) -> Self {
        let mut map = Self::default();
        for name in names {
            if map.get(name.as_str()).is_none() {
                map.entries.push((name.clone(), TaskStatus::Pending));
            }
        }
        map
    }

    /// Creates a map from explicit entries, keeping the first of any
    /// repeated names.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (TaskName, TaskStatus)>) -> Self {
        let mut map = Self::default();
        for (name, status) in entries {
            if map.get(name.as_str()).is_none() {
                map.entries.push((name, status));
            }
        }
        map
    }

    /// Returns the status recorded for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<TaskStatus> {
        self.entries
            .iter()
            .find(|(entry, _)| entry.as_str() == name)
            .map(|(_, status)| *status)
    }

    /// Overwrites the status for an existing key.
    ///
    /// Returns the previous status, or `None` without inserting when the key
    /// is unknown.
    pub fn set(&mut self, name: &str, status: TaskStatus) -> Option<TaskStatus> {
        self.entries
            .iter_mut()
            .find(|(entry, _)| entry.as_str() == name)
            .map(|(_, slot)| std::mem::replace(slot, status))
    }

    /// Iterates entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&TaskName, TaskStatus)> {
        self.entries.iter().map(|(name, status)| (name, *status))
    }

    /// Iterates task names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &TaskName> {
        self.entries.iter().map(|(name, _)| name)
    }

    /// Returns the number of tracked tasks.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no tasks are tracked.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns how many tasks currently have `status`.
    #[must_use]
    pub fn count(&self, status: TaskStatus) -> usize {
        self.entries
            .iter()
            .filter(|(_, entry)| *entry == status)
            .count()
    }

    /// Returns `true` when every tracked task is terminal.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.entries.iter().all(|(_, status)| status.is_terminal())
    }
}

impl Serialize for StatusMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(name, status)| (name, status)))
    }
}

//! Validated, ordered collection of task definitions.

use super::{CatalogError, TaskDefinition, TaskKind, TaskName};
use std::collections::HashSet;

/// Ordered set of task definitions for one pipeline.
///
/// A catalog always contains exactly one prerequisite and unique names.
/// Catalog order is the order statuses and results are presented in.
#[derive(Debug, Clone)]
pub struct TaskCatalog {
    prerequisite: TaskDefinition,
    fan_out: Vec<TaskDefinition>,
    order: Vec<TaskName>,
}

impl TaskCatalog {
    /// Validates and assembles a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateName`] when two definitions share a
    /// name, [`CatalogError::MultiplePrerequisites`] when more than one is a
    /// prerequisite, and [`CatalogError::MissingPrerequisite`] when none is.
    pub fn new(
        definitions: impl IntoIterator<Item = TaskDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut found_prerequisite: Option<TaskDefinition> = None;
        let mut fan_out = Vec::new();

        for definition in definitions {
            if !seen.insert(definition.name().clone()) {
                return Err(CatalogError::DuplicateName(definition.name().clone()));
            }
            order.push(definition.name().clone());

            if definition.kind() != TaskKind::Prerequisite {
                fan_out.push(definition);
                continue;
            }
            if let Some(first) = &found_prerequisite {
                return Err(CatalogError::MultiplePrerequisites {
                    first: first.name().clone(),
                    second: definition.name().clone(),
                });
            }
            found_prerequisite = Some(definition);
        }

        let prerequisite = found_prerequisite.ok_or(CatalogError::MissingPrerequisite)?;
        Ok(Self {
            prerequisite,
            fan_out,
            order,
        })
    }

    /// Returns the prerequisite definition.
    #[must_use]
    pub const fn prerequisite(&self) -> &TaskDefinition {
        &self.prerequisite
    }

    /// Returns the definitions launched concurrently after the prerequisite.
    #[must_use]
    pub fn fan_out(&self) -> &[TaskDefinition] {
        &self.fan_out
    }

    /// Iterates every task name in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &TaskName> {
        self.order.iter()
    }

    /// Returns the definition called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TaskDefinition> {
        std::iter::once(&self.prerequisite)
            .chain(&self.fan_out)
            .find(|definition| definition.name().as_str() == name)
    }

    /// Returns the number of definitions.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` when the catalog holds no definitions.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

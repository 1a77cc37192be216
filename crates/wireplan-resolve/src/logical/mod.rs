//! Logical constraint checks over container definitions.
//!
//! Each check inspects a [`ContainerDefinition`] under a set of active
//! [`Profiles`] and reports problems as violations instead of failing.
//! Callers decide what to do with them; critical violations are
//! conventionally treated as build-blocking.

mod duplicate_delegate;
mod duplicate_inject;
mod duplicate_prepare;
mod duplicate_service;
mod multiple_primary;
mod non_public;
pub mod violation;

use std::collections::HashMap;
use std::hash::Hash;

use wireplan_definition::container::ContainerDefinition;
use wireplan_definition::profiles::Profiles;

pub use duplicate_delegate::DuplicateServiceDelegate;
pub use duplicate_inject::DuplicateInjectProfiles;
pub use duplicate_prepare::DuplicateServicePrepare;
pub use duplicate_service::{DuplicateServiceName, DuplicateServiceType};
pub use multiple_primary::MultiplePrimaryForAbstractService;
pub use non_public::{NonPublicServiceDelegate, NonPublicServicePrepare};
pub use violation::{LogicalConstraintViolation, LogicalConstraintViolationCollection, Severity};

/// A single independent check.
pub trait LogicalConstraint: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Returns every violation of this constraint in `definition`.
    fn constraint_violations(
        &self,
        definition: &ContainerDefinition,
        profiles: &Profiles,
    ) -> LogicalConstraintViolationCollection;
}

/// Runs a set of checks and merges their violations.
pub struct LogicalConstraintValidator {
    constraints: Vec<Box<dyn LogicalConstraint>>,
}

impl std::fmt::Debug for LogicalConstraintValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.constraints.iter().map(|c| c.name()).collect();
        f.debug_struct("LogicalConstraintValidator")
            .field("constraints", &names)
            .finish()
    }
}

impl LogicalConstraintValidator {
    /// Creates a validator without any check.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }

    /// Adds a check.
    #[must_use]
    pub fn with_constraint(mut self, constraint: impl LogicalConstraint + 'static) -> Self {
        self.constraints.push(Box::new(constraint));
        self
    }

    /// Returns the number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns `true` if no check is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Runs every check in registration order.
    #[must_use]
    pub fn validate(
        &self,
        definition: &ContainerDefinition,
        profiles: &Profiles,
    ) -> LogicalConstraintViolationCollection {
        tracing::info!(checks = self.constraints.len(), %profiles, "running logical constraint checks");
        let mut violations = LogicalConstraintViolationCollection::new();
        for constraint in &self.constraints {
            let found = constraint.constraint_violations(definition, profiles);
            tracing::debug!(check = constraint.name(), violations = found.len(), "check finished");
            violations.merge(found);
        }
        if violations.has_critical() {
            tracing::warn!(
                critical = violations.with_severity(Severity::Critical).len(),
                total = violations.len(),
                "critical logical constraint violations found"
            );
        }
        violations
    }
}

impl Default for LogicalConstraintValidator {
    fn default() -> Self {
        Self::empty()
            .with_constraint(DuplicateServiceDelegate)
            .with_constraint(DuplicateServicePrepare)
            .with_constraint(NonPublicServicePrepare)
            .with_constraint(NonPublicServiceDelegate)
            .with_constraint(MultiplePrimaryForAbstractService)
            .with_constraint(DuplicateServiceType)
            .with_constraint(DuplicateServiceName)
            .with_constraint(DuplicateInjectProfiles)
    }
}

/// Groups `items` by `key`, keeping first-seen order of groups and items.
fn group_in_order<'a, T, K, F>(
    items: impl IntoIterator<Item = &'a T>,
    key: F,
) -> Vec<(K, Vec<&'a T>)>
where
    T: 'a,
    K: Eq + Hash + Clone,
    F: Fn(&'a T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();
    for item in items {
        let k = key(item);
        if let Some(&i) = index.get(&k) {
            groups[i].1.push(item);
        } else {
            let _ = index.insert(k.clone(), groups.len());
            groups.push((k, vec![item]));
        }
    }
    groups
}

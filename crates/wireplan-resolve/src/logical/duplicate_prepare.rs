//! Duplicate prepare methods on one service.

use std::fmt::Write as _;

use wireplan_definition::container::ContainerDefinition;
use wireplan_definition::profiles::Profiles;

use super::{
    LogicalConstraint, LogicalConstraintViolation, LogicalConstraintViolationCollection,
    group_in_order,
};

/// Flags prepare methods declared more than once for the same service.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateServicePrepare;

impl LogicalConstraint for DuplicateServicePrepare {
    fn name(&self) -> &'static str {
        "duplicate_service_prepare"
    }

    fn constraint_violations(
        &self,
        definition: &ContainerDefinition,
        _profiles: &Profiles,
    ) -> LogicalConstraintViolationCollection {
        group_in_order(definition.service_prepare_definitions(), |p| {
            (p.service_type(), p.method())
        })
        .into_iter()
        .filter(|(_, prepares)| prepares.len() > 1)
        .map(|((service, method), prepares)| {
            let mut message = format!(
                "The method \"{service}::{method}\" has been defined as a prepare multiple times!\n\n"
            );
            for prepare in prepares {
                let _ = writeln!(message, "- {}", prepare.origin());
            }
            message.push_str(
                "\nThe method is invoked once. \
                 Please remove the duplicate prepare definitions.",
            );
            LogicalConstraintViolation::warning(message)
        })
        .collect()
    }
}

//! Services that share a type or a name.

use std::fmt::Write as _;

use wireplan_definition::container::ContainerDefinition;
use wireplan_definition::profiles::Profiles;

use super::{
    LogicalConstraint, LogicalConstraintViolation, LogicalConstraintViolationCollection,
    group_in_order,
};

/// Flags types defined as a service more than once.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateServiceType;

impl LogicalConstraint for DuplicateServiceType {
    fn name(&self) -> &'static str {
        "duplicate_service_type"
    }

    fn constraint_violations(
        &self,
        definition: &ContainerDefinition,
        _profiles: &Profiles,
    ) -> LogicalConstraintViolationCollection {
        group_in_order(definition.service_definitions(), |s| s.service_type())
            .into_iter()
            .filter(|(_, services)| services.len() > 1)
            .map(|(service, services)| {
                let mut message = format!(
                    "The type \"{service}\" has been defined as a service multiple times!\n\n"
                );
                for definition in services {
                    let _ = writeln!(message, "- {}", definition.origin());
                }
                message.push_str(
                    "\nOnly one definition of a service type can be used. \
                     Please remove all but one definition.",
                );
                LogicalConstraintViolation::critical(message)
            })
            .collect()
    }
}

/// Flags active services sharing a name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateServiceName;

impl LogicalConstraint for DuplicateServiceName {
    fn name(&self) -> &'static str {
        "duplicate_service_name"
    }

    fn constraint_violations(
        &self,
        definition: &ContainerDefinition,
        profiles: &Profiles,
    ) -> LogicalConstraintViolationCollection {
        let named = definition
            .service_definitions()
            .iter()
            .filter(|s| s.name().is_some() && profiles.is_any_active(s.profiles()));
        group_in_order(named, |s| s.name().unwrap_or_default())
            .into_iter()
            .filter(|(_, services)| services.len() > 1)
            .map(|(name, services)| {
                let mut message =
                    format!("There are multiple services with the name \"{name}\"!\n\n");
                for service in services {
                    let _ = writeln!(message, "- {} {}", service.service_type(), service.origin());
                }
                message.push_str(
                    "\nA name must identify exactly one service. \
                     Please rename or remove the conflicting services.",
                );
                LogicalConstraintViolation::critical(message)
            })
            .collect()
    }
}

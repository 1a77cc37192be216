//! Duplicate delegates registered for one service.

use std::fmt::Write as _;

use wireplan_definition::container::ContainerDefinition;
use wireplan_definition::profiles::Profiles;

use super::{
    LogicalConstraint, LogicalConstraintViolation, LogicalConstraintViolationCollection,
    group_in_order,
};

/// Flags services constructed by more than one delegate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateServiceDelegate;

impl LogicalConstraint for DuplicateServiceDelegate {
    fn name(&self) -> &'static str {
        "duplicate_service_delegate"
    }

    fn constraint_violations(
        &self,
        definition: &ContainerDefinition,
        _profiles: &Profiles,
    ) -> LogicalConstraintViolationCollection {
        group_in_order(definition.service_delegate_definitions(), |d| d.service_type())
            .into_iter()
            .filter(|(_, delegates)| delegates.len() > 1)
            .map(|(service, delegates)| {
                let mut message =
                    format!("There are multiple delegates for the service \"{service}\"!\n\n");
                for delegate in delegates {
                    let _ = writeln!(
                        message,
                        "- {}::{} {}",
                        delegate.delegate_type(),
                        delegate.delegate_method(),
                        delegate.origin()
                    );
                }
                message.push_str(
                    "\nThe delegate used to construct the service is undefined. \
                     Please remove all but one delegate for this service.",
                );
                LogicalConstraintViolation::warning(message)
            })
            .collect()
    }
}

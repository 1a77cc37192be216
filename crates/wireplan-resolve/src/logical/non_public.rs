//! Prepare and delegate methods that are not public.

use wireplan_definition::container::ContainerDefinition;
use wireplan_definition::profiles::Profiles;

use super::{LogicalConstraint, LogicalConstraintViolation, LogicalConstraintViolationCollection};

/// Flags prepare methods the container cannot call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonPublicServicePrepare;

impl LogicalConstraint for NonPublicServicePrepare {
    fn name(&self) -> &'static str {
        "non_public_service_prepare"
    }

    fn constraint_violations(
        &self,
        definition: &ContainerDefinition,
        _profiles: &Profiles,
    ) -> LogicalConstraintViolationCollection {
        definition
            .service_prepare_definitions()
            .iter()
            .filter(|p| !p.visibility().is_public())
            .map(|p| {
                LogicalConstraintViolation::critical(format!(
                    "A {} method, {}::{}, is marked as a service prepare. \
                     Service prepare methods MUST be marked public.",
                    p.visibility(),
                    p.service_type(),
                    p.method()
                ))
            })
            .collect()
    }
}

/// Flags delegate methods the container cannot call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonPublicServiceDelegate;

impl LogicalConstraint for NonPublicServiceDelegate {
    fn name(&self) -> &'static str {
        "non_public_service_delegate"
    }

    fn constraint_violations(
        &self,
        definition: &ContainerDefinition,
        _profiles: &Profiles,
    ) -> LogicalConstraintViolationCollection {
        definition
            .service_delegate_definitions()
            .iter()
            .filter(|d| !d.visibility().is_public())
            .map(|d| {
                LogicalConstraintViolation::critical(format!(
                    "A {} method, {}::{}, is marked as a service delegate. \
                     Service delegate methods MUST be marked public.",
                    d.visibility(),
                    d.delegate_type(),
                    d.delegate_method()
                ))
            })
            .collect()
    }
}

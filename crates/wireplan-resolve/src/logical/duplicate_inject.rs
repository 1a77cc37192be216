//! Injects for one parameter that share a profile set.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use wireplan_definition::container::ContainerDefinition;
use wireplan_definition::profiles::Profiles;

use super::{
    LogicalConstraint, LogicalConstraintViolation, LogicalConstraintViolationCollection,
    group_in_order,
};

/// Flags injects for one parameter that share an identical profile set.
///
/// Such injects can never be ranked against each other, so building a
/// container for any matching profile set fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateInjectProfiles;

impl LogicalConstraint for DuplicateInjectProfiles {
    fn name(&self) -> &'static str {
        "duplicate_inject_profiles"
    }

    fn constraint_violations(
        &self,
        definition: &ContainerDefinition,
        _profiles: &Profiles,
    ) -> LogicalConstraintViolationCollection {
        group_in_order(definition.inject_definitions(), |i| {
            (
                i.service_type(),
                i.target(),
                i.profiles().iter().map(String::as_str).collect::<BTreeSet<_>>(),
            )
        })
        .into_iter()
        .filter(|(_, injects)| injects.len() > 1)
        .map(|((service, target, profiles), injects)| {
            let scope = if profiles.is_empty() {
                "no profiles".to_owned()
            } else {
                format!("profiles {}", profiles.into_iter().collect::<Vec<_>>().join(", "))
            };
            let mut message =
                format!("There are multiple injects for {service}::{target} with {scope}!\n\n");
            for inject in injects {
                let _ = writeln!(message, "- {:?} {}", inject.value(), inject.origin());
            }
            message.push_str(
                "\nThe container cannot choose between them. \
                 Please remove all but one inject or give them distinct profiles.",
            );
            LogicalConstraintViolation::critical(message)
        })
        .collect()
    }
}

//! Abstract services with more than one primary concrete.

use std::fmt::Write as _;

use wireplan_definition::container::ContainerDefinition;
use wireplan_definition::profiles::Profiles;
use wireplan_definition::types::Type;

use super::{
    LogicalConstraint, LogicalConstraintViolation, LogicalConstraintViolationCollection,
    group_in_order,
};

/// Flags abstract services with more than one active primary implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiplePrimaryForAbstractService;

impl LogicalConstraint for MultiplePrimaryForAbstractService {
    fn name(&self) -> &'static str {
        "multiple_primary_for_abstract_service"
    }

    fn constraint_violations(
        &self,
        definition: &ContainerDefinition,
        profiles: &Profiles,
    ) -> LogicalConstraintViolationCollection {
        let is_active_primary = |ty: &Type| {
            definition
                .service_definition(ty)
                .is_some_and(|s| s.is_primary() && profiles.is_any_active(s.profiles()))
        };

        let mut violations = LogicalConstraintViolationCollection::new();
        for (abstract_service, aliases) in
            group_in_order(definition.alias_definitions(), |a| a.abstract_service())
        {
            let mut primaries: Vec<&Type> = Vec::new();
            for alias in aliases {
                let concrete = alias.concrete_service();
                if is_active_primary(concrete) && !primaries.contains(&concrete) {
                    primaries.push(concrete);
                }
            }
            if primaries.len() < 2 {
                continue;
            }

            let mut message = format!(
                "The abstract service \"{abstract_service}\" has multiple concrete services marked primary!\n\n"
            );
            for primary in primaries {
                let _ = writeln!(message, "- {primary}");
            }
            message.push_str(
                "\nThe abstract service cannot be resolved to a single implementation. \
                 Please mark only one concrete service as primary for the active profiles.",
            );
            violations.add(LogicalConstraintViolation::warning(message));
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use wireplan_definition::alias::AliasDefinition;
    use wireplan_definition::service::ServiceDefinitionBuilder;
    use wireplan_definition::types::TypeFactory;

    use super::*;
    use crate::logical::Severity;

    fn definition(second_profiles: &[&str]) -> ContainerDefinition {
        let mut types = TypeFactory::new();
        let cache = types.class("App\\Cache").expect("class");
        let redis = types.class("App\\RedisCache").expect("class");
        let file = types.class("App\\FileCache").expect("class");
        ContainerDefinition::builder()
            .with_service_definition(
                ServiceDefinitionBuilder::for_abstract(cache.clone()).build().expect("svc"),
            )
            .with_service_definition(
                ServiceDefinitionBuilder::for_concrete(redis.clone())
                    .primary()
                    .build()
                    .expect("svc"),
            )
            .with_service_definition(
                ServiceDefinitionBuilder::for_concrete(file.clone())
                    .primary()
                    .with_profiles(second_profiles.iter().copied())
                    .build()
                    .expect("svc"),
            )
            .with_alias_definition(AliasDefinition::new(cache.clone(), redis))
            .with_alias_definition(AliasDefinition::new(cache, file))
            .build()
    }

    #[test]
    fn two_active_primaries_warn() {
        let violations = MultiplePrimaryForAbstractService
            .constraint_violations(&definition(&["default"]), &Profiles::default_only());
        assert_eq!(violations.len(), 1);
        let violation = violations.iter().next().expect("violation");
        assert_eq!(violation.severity(), Severity::Warning);
        assert!(violation.message().contains("\"App\\Cache\""));
        assert!(violation.message().contains("- App\\RedisCache\n- App\\FileCache\n"));
    }

    #[test]
    fn inactive_primary_is_ignored() {
        let violations = MultiplePrimaryForAbstractService
            .constraint_violations(&definition(&["test"]), &Profiles::default_only());
        assert!(violations.is_empty());

        let test = Profiles::from_list(["test"]).expect("profiles");
        assert_eq!(
            MultiplePrimaryForAbstractService
                .constraint_violations(&definition(&["test"]), &test)
                .len(),
            1
        );
    }
}

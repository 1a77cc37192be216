//! Alias resolution for abstract services.
//!
//! Resolution is total: every abstract type yields a reason, and ambiguous
//! or misconfigured aliases come back as reasons rather than errors so the
//! caller decides how fatal they are.

use std::fmt;

use wireplan_definition::alias::AliasDefinition;
use wireplan_definition::container::ContainerDefinition;
use wireplan_definition::profiles::Profiles;
use wireplan_definition::types::Type;

/// Why an alias resolution ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AliasResolutionReason {
    /// No alias targets the abstract type.
    NoConcreteService,
    /// Exactly one alias targets the abstract type.
    SingleConcreteService,
    /// Several aliases target the abstract type and none is primary.
    MultipleConcreteService,
    /// Several aliases target the abstract type and one is primary.
    ConcreteServiceIsPrimary,
    /// Several aliases target the abstract type and more than one is primary.
    MultiplePrimaryService,
    /// A delegate constructs the abstract type; aliases are ignored.
    ServiceIsDelegated,
}

impl fmt::Display for AliasResolutionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NoConcreteService => "no concrete service",
            Self::SingleConcreteService => "single concrete service",
            Self::MultipleConcreteService => "multiple concrete services",
            Self::ConcreteServiceIsPrimary => "concrete service is primary",
            Self::MultiplePrimaryService => "multiple primary services",
            Self::ServiceIsDelegated => "service is delegated",
        };
        f.write_str(text)
    }
}

/// The outcome of resolving one abstract type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDefinitionResolution {
    reason: AliasResolutionReason,
    alias: Option<AliasDefinition>,
}

impl AliasDefinitionResolution {
    const fn unresolved(reason: AliasResolutionReason) -> Self {
        Self {
            reason,
            alias: None,
        }
    }

    const fn resolved(reason: AliasResolutionReason, alias: AliasDefinition) -> Self {
        Self {
            reason,
            alias: Some(alias),
        }
    }

    /// Returns the resolution reason.
    #[must_use]
    pub const fn reason(&self) -> AliasResolutionReason {
        self.reason
    }

    /// Returns the chosen alias, if one was chosen.
    #[must_use]
    pub const fn alias_definition(&self) -> Option<&AliasDefinition> {
        self.alias.as_ref()
    }

    /// Returns the chosen concrete type, if one was chosen.
    #[must_use]
    pub fn concrete_service(&self) -> Option<&Type> {
        self.alias.as_ref().map(AliasDefinition::concrete_service)
    }
}

/// Picks the concrete implementation bound to an abstract type.
pub trait AliasDefinitionResolver: Send + Sync {
    /// Resolves `abstract_service` against `definition`.
    fn resolve_alias(
        &self,
        definition: &ContainerDefinition,
        profiles: &Profiles,
        abstract_service: &Type,
    ) -> AliasDefinitionResolution;
}

/// Resolves aliases by count and primary flags.
///
/// Profiles are accepted for API symmetry but do not take part: they decide
/// upstream which services are in `definition` at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAliasDefinitionResolver;

impl AliasDefinitionResolver for StandardAliasDefinitionResolver {
    fn resolve_alias(
        &self,
        definition: &ContainerDefinition,
        _profiles: &Profiles,
        abstract_service: &Type,
    ) -> AliasDefinitionResolution {
        if definition
            .service_delegate_definition(abstract_service)
            .is_some()
        {
            tracing::debug!(service = %abstract_service, "abstract service is delegated");
            return AliasDefinitionResolution::unresolved(AliasResolutionReason::ServiceIsDelegated);
        }

        let mut candidates: Vec<&AliasDefinition> = Vec::new();
        for alias in definition.alias_definitions() {
            if alias.abstract_service() == abstract_service
                && !candidates
                    .iter()
                    .any(|c| c.concrete_service() == alias.concrete_service())
            {
                candidates.push(alias);
            }
        }

        let resolution = match candidates.as_slice() {
            [] => AliasDefinitionResolution::unresolved(AliasResolutionReason::NoConcreteService),
            [single] => AliasDefinitionResolution::resolved(
                AliasResolutionReason::SingleConcreteService,
                (*single).clone(),
            ),
            many => {
                let primaries: Vec<&&AliasDefinition> = many
                    .iter()
                    .filter(|alias| is_primary(definition, alias.concrete_service()))
                    .collect();
                match primaries.as_slice() {
                    [] => AliasDefinitionResolution::unresolved(
                        AliasResolutionReason::MultipleConcreteService,
                    ),
                    [primary] => AliasDefinitionResolution::resolved(
                        AliasResolutionReason::ConcreteServiceIsPrimary,
                        (**primary).clone(),
                    ),
                    _ => AliasDefinitionResolution::unresolved(
                        AliasResolutionReason::MultiplePrimaryService,
                    ),
                }
            }
        };

        tracing::debug!(
            service = %abstract_service,
            reason = %resolution.reason(),
            concrete = resolution.concrete_service().map(Type::name),
            "resolved alias"
        );
        resolution
    }
}

fn is_primary(definition: &ContainerDefinition, concrete: &Type) -> bool {
    definition
        .service_definitions()
        .iter()
        .any(|s| s.service_type() == concrete && s.is_primary())
}

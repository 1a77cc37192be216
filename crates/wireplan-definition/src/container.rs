//! The immutable aggregate of every discovered definition.

use crate::alias::AliasDefinition;
use crate::delegate::ServiceDelegateDefinition;
use crate::inject::InjectDefinition;
use crate::prepare::ServicePrepareDefinition;
use crate::service::ServiceDefinition;
use crate::types::Type;

/// Every service, alias, delegate, prepare, and inject fact of a codebase,
/// in discovery order.
///
/// Instances are immutable. Use [`ContainerDefinition::to_builder`] to derive
/// a modified copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerDefinition {
    services: Vec<ServiceDefinition>,
    aliases: Vec<AliasDefinition>,
    delegates: Vec<ServiceDelegateDefinition>,
    prepares: Vec<ServicePrepareDefinition>,
    injects: Vec<InjectDefinition>,
}

impl ContainerDefinition {
    /// Starts an empty builder.
    #[must_use]
    pub fn builder() -> ContainerDefinitionBuilder {
        ContainerDefinitionBuilder::new()
    }

    /// Returns a builder pre-populated with this definition's facts.
    #[must_use]
    pub fn to_builder(&self) -> ContainerDefinitionBuilder {
        ContainerDefinitionBuilder {
            definition: self.clone(),
        }
    }

    /// Returns all service definitions.
    #[must_use]
    pub fn service_definitions(&self) -> &[ServiceDefinition] {
        &self.services
    }

    /// Returns all alias definitions.
    #[must_use]
    pub fn alias_definitions(&self) -> &[AliasDefinition] {
        &self.aliases
    }

    /// Returns all service delegate definitions.
    #[must_use]
    pub fn service_delegate_definitions(&self) -> &[ServiceDelegateDefinition] {
        &self.delegates
    }

    /// Returns all service prepare definitions.
    #[must_use]
    pub fn service_prepare_definitions(&self) -> &[ServicePrepareDefinition] {
        &self.prepares
    }

    /// Returns all inject definitions.
    #[must_use]
    pub fn inject_definitions(&self) -> &[InjectDefinition] {
        &self.injects
    }

    /// Returns the first service definition for `service_type`.
    #[must_use]
    pub fn service_definition(&self, service_type: &Type) -> Option<&ServiceDefinition> {
        self.services
            .iter()
            .find(|s| s.service_type() == service_type)
    }

    /// Returns the first delegate producing `service_type`.
    #[must_use]
    pub fn service_delegate_definition(
        &self,
        service_type: &Type,
    ) -> Option<&ServiceDelegateDefinition> {
        self.delegates
            .iter()
            .find(|d| d.service_type() == service_type)
    }

    /// Returns `true` if no fact of any kind was discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
            && self.aliases.is_empty()
            && self.delegates.is_empty()
            && self.prepares.is_empty()
            && self.injects.is_empty()
    }
}

/// Copy-on-write builder for [`ContainerDefinition`].
///
/// Every `with_*` call consumes the builder and returns the extended one.
#[derive(Debug, Clone, Default)]
pub struct ContainerDefinitionBuilder {
    definition: ContainerDefinition,
}

impl ContainerDefinitionBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a service definition.
    #[must_use]
    pub fn with_service_definition(mut self, service: ServiceDefinition) -> Self {
        self.definition.services.push(service);
        self
    }

    /// Appends an alias definition.
    #[must_use]
    pub fn with_alias_definition(mut self, alias: AliasDefinition) -> Self {
        self.definition.aliases.push(alias);
        self
    }

    /// Appends a service delegate definition.
    #[must_use]
    pub fn with_service_delegate_definition(mut self, delegate: ServiceDelegateDefinition) -> Self {
        self.definition.delegates.push(delegate);
        self
    }

    /// Appends a service prepare definition.
    #[must_use]
    pub fn with_service_prepare_definition(mut self, prepare: ServicePrepareDefinition) -> Self {
        self.definition.prepares.push(prepare);
        self
    }

    /// Appends an inject definition.
    #[must_use]
    pub fn with_inject_definition(mut self, inject: InjectDefinition) -> Self {
        self.definition.injects.push(inject);
        self
    }

    /// Drops every service definition for `service_type`.
    #[must_use]
    pub fn without_service_definition(mut self, service_type: &Type) -> Self {
        self.definition
            .services
            .retain(|s| s.service_type() != service_type);
        self
    }

    /// Finishes the definition.
    #[must_use]
    pub fn build(self) -> ContainerDefinition {
        tracing::debug!(
            services = self.definition.services.len(),
            aliases = self.definition.aliases.len(),
            delegates = self.definition.delegates.len(),
            prepares = self.definition.prepares.len(),
            injects = self.definition.injects.len(),
            "built container definition"
        );
        self.definition
    }
}

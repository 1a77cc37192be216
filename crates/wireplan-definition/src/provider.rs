//! Functional API for definition providers.
//!
//! The analyzer only finds annotated code. Third-party types, or services
//! that need explicit wiring, are contributed by a [`DefinitionProvider`]
//! through a [`DefinitionProviderContext`]. Definitions added this way
//! carry no attribute, so diagnostics report them as
//! `added with <call>()`.

use wireplan_common::error::Result;

use crate::alias::AliasDefinition;
use crate::container::{ContainerDefinition, ContainerDefinitionBuilder};
use crate::delegate::ServiceDelegateDefinition;
use crate::inject::InjectDefinition;
use crate::prepare::ServicePrepareDefinition;
use crate::service::{ServiceDefinition, ServiceDefinitionBuilder};
use crate::types::{Type, TypeFactory};

/// Contributes definitions the analyzer cannot discover.
pub trait DefinitionProvider {
    /// Stable identity of the provider, part of the definition cache key.
    fn identity(&self) -> &str;

    /// Adds definitions to `context`.
    ///
    /// # Errors
    ///
    /// Returns an error if a contributed definition is invalid.
    fn consume(&self, context: &mut DefinitionProviderContext, types: &mut TypeFactory) -> Result<()>;
}

/// Mutable view over a definition under construction.
#[derive(Debug, Default)]
pub struct DefinitionProviderContext {
    builder: ContainerDefinitionBuilder,
}

impl DefinitionProviderContext {
    /// Wraps a builder.
    #[must_use]
    pub const fn new(builder: ContainerDefinitionBuilder) -> Self {
        Self { builder }
    }

    fn update(&mut self, f: impl FnOnce(ContainerDefinitionBuilder) -> ContainerDefinitionBuilder) {
        self.builder = f(std::mem::take(&mut self.builder));
    }

    /// Adds a concrete service.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or a profile is empty.
    pub fn service(
        &mut self,
        service_type: Type,
        name: Option<&str>,
        profiles: &[&str],
        is_primary: bool,
    ) -> Result<()> {
        let mut builder = ServiceDefinitionBuilder::for_concrete(service_type)
            .with_profiles(profiles.iter().copied());
        if let Some(name) = name {
            builder = builder.with_name(name);
        }
        if is_primary {
            builder = builder.primary();
        }
        let service = builder.build()?;
        self.add_service_definition(service);
        Ok(())
    }

    /// Adds an abstract service.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or a profile is empty.
    pub fn abstract_service(
        &mut self,
        service_type: Type,
        name: Option<&str>,
        profiles: &[&str],
    ) -> Result<()> {
        let mut builder = ServiceDefinitionBuilder::for_abstract(service_type)
            .with_profiles(profiles.iter().copied());
        if let Some(name) = name {
            builder = builder.with_name(name);
        }
        let service = builder.build()?;
        self.add_service_definition(service);
        Ok(())
    }

    /// Adds an alias from `abstract_service` to `concrete_service`.
    pub fn alias(&mut self, abstract_service: Type, concrete_service: Type) {
        self.update(|b| b.with_alias_definition(AliasDefinition::new(abstract_service, concrete_service)));
    }

    /// Adds a delegate constructing `service_type` via `delegate_type::method`.
    ///
    /// # Errors
    ///
    /// Returns an error if the method name is empty.
    pub fn service_delegate(
        &mut self,
        service_type: Type,
        delegate_type: Type,
        method: &str,
    ) -> Result<()> {
        let delegate = ServiceDelegateDefinition::new(service_type, delegate_type, method)?;
        self.update(|b| b.with_service_delegate_definition(delegate));
        Ok(())
    }

    /// Adds a prepare calling `service_type::method` after construction.
    ///
    /// # Errors
    ///
    /// Returns an error if the method name is empty.
    pub fn service_prepare(&mut self, service_type: Type, method: &str) -> Result<()> {
        let prepare = ServicePrepareDefinition::new(service_type, method)?;
        self.update(|b| b.with_service_prepare_definition(prepare));
        Ok(())
    }

    /// Adds an inject definition.
    pub fn inject(&mut self, inject: InjectDefinition) {
        self.update(|b| b.with_inject_definition(inject));
    }

    /// Adds a prebuilt service definition.
    pub fn add_service_definition(&mut self, service: ServiceDefinition) {
        self.update(|b| b.with_service_definition(service));
    }

    /// Returns the extended builder.
    #[must_use]
    pub fn into_builder(self) -> ContainerDefinitionBuilder {
        self.builder
    }
}

/// Runs `provider` over `definition` and returns the extended definition.
///
/// # Errors
///
/// Returns the provider's error unchanged.
pub fn apply_provider(
    definition: &ContainerDefinition,
    provider: &dyn DefinitionProvider,
    types: &mut TypeFactory,
) -> Result<ContainerDefinition> {
    tracing::info!(provider = provider.identity(), "applying definition provider");
    let mut context = DefinitionProviderContext::new(definition.to_builder());
    provider.consume(&mut context, types)?;
    Ok(context.into_builder().build())
}

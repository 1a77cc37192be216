//! Per-service construction plans handed to the object construction
//! component.

use wireplan_definition::delegate::ServiceDelegateDefinition;
use wireplan_definition::prepare::ServicePrepareDefinition;
use wireplan_definition::service::ServiceDefinition;
use wireplan_definition::types::Type;

use crate::alias::AliasDefinitionResolution;
use crate::value::{ResolvedInjectDefinition, ResolvedInjectValue};

/// How a service instance comes into being.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceProvider<'a> {
    /// Call the service's own constructor.
    Constructor,
    /// Call a factory method.
    Delegate(&'a ServiceDelegateDefinition),
    /// Provide the concrete service chosen for an abstract one.
    Alias(AliasDefinitionResolution),
}

/// A prepare method together with the injects for its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparePlan<'a> {
    /// The prepare definition.
    pub prepare: &'a ServicePrepareDefinition,
    /// Selected injects for the prepare method's parameters.
    pub injects: &'a [ResolvedInjectDefinition],
}

/// Everything needed to construct and wire one service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConstructionPlan<'a> {
    /// The service being planned.
    pub service: &'a ServiceDefinition,
    /// How the instance is obtained.
    pub provider: ServiceProvider<'a>,
    /// Selected injects for constructor parameters.
    pub constructor_injects: &'a [ResolvedInjectDefinition],
    /// Selected injects for properties.
    pub property_injects: &'a [ResolvedInjectDefinition],
    /// Prepare methods in declaration order.
    pub prepares: Vec<PreparePlan<'a>>,
}

impl ServiceConstructionPlan<'_> {
    /// Returns the service type.
    #[must_use]
    pub const fn service_type(&self) -> &Type {
        self.service.service_type()
    }

    /// Returns every service this plan references directly.
    ///
    /// Includes container references of all injects, the factory type of a
    /// delegate, and the concrete type chosen for an alias.
    #[must_use]
    pub fn dependencies(&self) -> Vec<&Type> {
        let mut dependencies = Vec::new();
        match &self.provider {
            ServiceProvider::Constructor => {}
            ServiceProvider::Delegate(delegate) => dependencies.push(delegate.delegate_type()),
            ServiceProvider::Alias(resolution) => {
                dependencies.extend(resolution.concrete_service());
            }
        }
        let injects = self
            .constructor_injects
            .iter()
            .chain(self.property_injects)
            .chain(self.prepares.iter().flat_map(|p| p.injects));
        for inject in injects {
            if let ResolvedInjectValue::ContainerReference(ty) = inject.value() {
                dependencies.push(ty);
            }
        }
        dependencies
    }
}

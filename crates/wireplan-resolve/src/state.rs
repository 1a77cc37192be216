//! Per-profile container factory state.
//!
//! [`ContainerFactoryState`] narrows a [`ContainerDefinition`] to the
//! services active under one [`Profiles`] value, selects and wraps inject
//! values eagerly, and answers lookups for the object construction
//! component. Configuration errors surface from [`ContainerFactoryState::new`],
//! never from a later lookup.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use wireplan_common::constants::{CONSTRUCTOR_METHOD, PROPERTY_METHOD};
use wireplan_common::error::{Result, WireplanError};
use wireplan_definition::container::ContainerDefinition;
use wireplan_definition::delegate::ServiceDelegateDefinition;
use wireplan_definition::inject::InjectValue;
use wireplan_definition::prepare::ServicePrepareDefinition;
use wireplan_definition::profiles::Profiles;
use wireplan_definition::service::ServiceDefinition;
use wireplan_definition::types::{Type, TypeFactory};

use crate::alias::{AliasDefinitionResolution, AliasDefinitionResolver};
use crate::graph::ServiceDependencyGraph;
use crate::introspect::TypeIntrospector;
use crate::parameter_store::ParameterStoreMap;
use crate::plan::{PreparePlan, ServiceConstructionPlan, ServiceProvider};
use crate::prioritize::prioritize_injects;
use crate::value::{ResolvedInjectDefinition, ResolvedInjectValue, resolve_inject_value};

type MethodKey = (Type, String);

/// Resolved view of a container definition for one active profile set.
pub struct ContainerFactoryState {
    profiles: Profiles,
    definition: ContainerDefinition,
    alias_resolver: Arc<dyn AliasDefinitionResolver>,
    parameter_stores: ParameterStoreMap,
    injects: HashMap<MethodKey, Vec<ResolvedInjectDefinition>>,
}

impl std::fmt::Debug for ContainerFactoryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerFactoryState")
            .field("profiles", &self.profiles)
            .field("services", &self.definition.service_definitions().len())
            .field("parameter_stores", &self.parameter_stores.keys().collect::<Vec<_>>())
            .field("injects", &self.injects.len())
            .finish_non_exhaustive()
    }
}

impl ContainerFactoryState {
    /// Builds the state for `profiles`.
    ///
    /// # Errors
    ///
    /// Returns `MultipleInjectOnSameParameter` if two inject definitions tie
    /// for one parameter, `ParameterStoreNotFound` if an inject names an
    /// unknown store, and `InvalidInjectValue` for malformed store keys or
    /// service references.
    pub fn new(
        definition: &ContainerDefinition,
        profiles: Profiles,
        alias_resolver: Arc<dyn AliasDefinitionResolver>,
        parameter_stores: ParameterStoreMap,
        introspector: &dyn TypeIntrospector,
    ) -> Result<Self> {
        tracing::info!(%profiles, "building container factory state");
        let active = active_definition(definition, &profiles);

        let mut types = TypeFactory::new();
        let mut injects: HashMap<MethodKey, Vec<ResolvedInjectDefinition>> = HashMap::new();
        for key in method_keys(&active) {
            let selected = prioritize_injects(active.inject_definitions(), &profiles, &key.0, &key.1)?;
            let resolved = selected
                .into_iter()
                .map(|inject| {
                    resolve_inject_value(inject.clone(), &parameter_stores, introspector, &mut types)
                })
                .collect::<Result<Vec<_>>>()?;
            if !resolved.is_empty() {
                let _ = injects.insert(key, resolved);
            }
        }

        tracing::info!(
            services = active.service_definitions().len(),
            inject_targets = injects.len(),
            "container factory state ready"
        );
        Ok(Self {
            profiles,
            definition: active,
            alias_resolver,
            parameter_stores,
            injects,
        })
    }

    /// Returns the active profiles.
    #[must_use]
    pub const fn profiles(&self) -> &Profiles {
        &self.profiles
    }

    /// Returns the definition narrowed to the active profiles.
    #[must_use]
    pub const fn container_definition(&self) -> &ContainerDefinition {
        &self.definition
    }

    /// Returns the services active under the profiles, in discovery order.
    #[must_use]
    pub fn service_definitions(&self) -> &[ServiceDefinition] {
        self.definition.service_definitions()
    }

    /// Returns the selected injects for `service::method`.
    #[must_use]
    pub fn inject_definitions_for_method(
        &self,
        service: &Type,
        method: &str,
    ) -> &[ResolvedInjectDefinition] {
        self.injects
            .get(&(service.clone(), method.to_owned()))
            .map_or(&[], Vec::as_slice)
    }

    /// Returns the selected injects for `service`'s constructor parameters.
    #[must_use]
    pub fn constructor_inject_definitions_for_service_definition(
        &self,
        service: &Type,
    ) -> &[ResolvedInjectDefinition] {
        self.inject_definitions_for_method(service, CONSTRUCTOR_METHOD)
    }

    /// Returns the selected injects for `service`'s properties.
    #[must_use]
    pub fn property_inject_definitions_for_service_definition(
        &self,
        service: &Type,
    ) -> &[ResolvedInjectDefinition] {
        self.inject_definitions_for_method(service, PROPERTY_METHOD)
    }

    /// Returns `service`'s prepare methods in declaration order.
    ///
    /// A method declared as prepare more than once is listed once.
    #[must_use]
    pub fn service_prepare_definitions_for_service_definition(
        &self,
        service: &Type,
    ) -> Vec<&ServicePrepareDefinition> {
        let mut seen = HashSet::new();
        self.definition
            .service_prepare_definitions()
            .iter()
            .filter(|p| p.service_type() == service && seen.insert(p.method()))
            .collect()
    }

    /// Returns the delegate constructing `service`, if any.
    #[must_use]
    pub fn service_delegate_definition_for_service_definition(
        &self,
        service: &Type,
    ) -> Option<&ServiceDelegateDefinition> {
        self.definition.service_delegate_definition(service)
    }

    /// Resolves the concrete service bound to the abstract `service`.
    #[must_use]
    pub fn resolve_alias_definition_for_abstract_service(
        &self,
        service: &Type,
    ) -> AliasDefinitionResolution {
        self.alias_resolver
            .resolve_alias(&self.definition, &self.profiles, service)
    }

    /// Fetches a store-backed inject value.
    ///
    /// Returns `None` for injects whose value does not come from a store.
    ///
    /// # Errors
    ///
    /// Returns the store's fetch error, or `ParameterStoreNotFound`.
    pub fn fetch_parameter_store_value(
        &self,
        inject: &ResolvedInjectDefinition,
    ) -> Result<Option<InjectValue>> {
        let ResolvedInjectValue::ParameterStore { store, key } = inject.value() else {
            return Ok(None);
        };
        let Some(parameter_store) = self.parameter_stores.get(store) else {
            return Err(WireplanError::ParameterStoreNotFound {
                store: store.clone(),
            });
        };
        parameter_store
            .fetch(inject.definition().declared_type(), key)
            .map(Some)
    }

    /// Returns the construction plan of an active service.
    #[must_use]
    pub fn construction_plan(&self, service: &Type) -> Option<ServiceConstructionPlan<'_>> {
        self.definition
            .service_definition(service)
            .map(|definition| self.plan_for(definition))
    }

    /// Returns the construction plan of every active service, in discovery order.
    #[must_use]
    pub fn construction_plans(&self) -> Vec<ServiceConstructionPlan<'_>> {
        let mut seen = HashSet::new();
        self.service_definitions()
            .iter()
            .filter(|s| seen.insert(s.service_type()))
            .map(|s| self.plan_for(s))
            .collect()
    }

    /// Returns active service types ordered so that dependencies come first.
    ///
    /// # Errors
    ///
    /// Returns `CircularDependency` if services depend on each other in a cycle.
    pub fn instantiation_order(&self) -> Result<Vec<Type>> {
        ServiceDependencyGraph::from_plans(&self.construction_plans()).resolve_order()
    }

    fn plan_for<'a>(&'a self, service: &'a ServiceDefinition) -> ServiceConstructionPlan<'a> {
        let service_type = service.service_type();
        let provider = match self.service_delegate_definition_for_service_definition(service_type) {
            Some(delegate) => ServiceProvider::Delegate(delegate),
            None if service.is_abstract() => ServiceProvider::Alias(
                self.resolve_alias_definition_for_abstract_service(service_type),
            ),
            None => ServiceProvider::Constructor,
        };
        let prepares = self
            .service_prepare_definitions_for_service_definition(service_type)
            .into_iter()
            .map(|prepare| PreparePlan {
                prepare,
                injects: self.inject_definitions_for_method(service_type, prepare.method()),
            })
            .collect();
        ServiceConstructionPlan {
            service,
            provider,
            constructor_injects: self.constructor_inject_definitions_for_service_definition(service_type),
            property_injects: self.property_inject_definitions_for_service_definition(service_type),
            prepares,
        }
    }
}

/// Narrows `definition` to the facts that apply under `profiles`.
fn active_definition(definition: &ContainerDefinition, profiles: &Profiles) -> ContainerDefinition {
    let services: Vec<&ServiceDefinition> = definition
        .service_definitions()
        .iter()
        .filter(|s| profiles.is_any_active(s.profiles()))
        .collect();
    let active_types: HashSet<&Type> = services.iter().map(|s| s.service_type()).collect();

    let mut builder = ContainerDefinition::builder();
    for service in services.iter().copied() {
        builder = builder.with_service_definition(service.clone());
    }
    for alias in definition.alias_definitions() {
        if active_types.contains(alias.abstract_service())
            && active_types.contains(alias.concrete_service())
        {
            builder = builder.with_alias_definition(alias.clone());
        }
    }
    for delegate in definition.service_delegate_definitions() {
        if active_types.contains(delegate.service_type()) {
            builder = builder.with_service_delegate_definition(delegate.clone());
        }
    }
    for prepare in definition.service_prepare_definitions() {
        if active_types.contains(prepare.service_type()) {
            builder = builder.with_service_prepare_definition(prepare.clone());
        }
    }
    for inject in definition.inject_definitions() {
        if active_types.contains(inject.service_type()) {
            builder = builder.with_inject_definition(inject.clone());
        }
    }

    tracing::debug!(
        discovered = definition.service_definitions().len(),
        active = services.len(),
        "filtered services by active profiles"
    );
    builder.build()
}

/// Distinct `(service, method)` pairs with at least one inject, in order.
fn method_keys(definition: &ContainerDefinition) -> Vec<MethodKey> {
    let mut keys: Vec<MethodKey> = Vec::new();
    for inject in definition.inject_definitions() {
        let key = (inject.service_type().clone(), inject.method_name().to_owned());
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

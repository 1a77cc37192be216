//! Eager wrapping of raw inject values.

use wireplan_common::error::{Result, WireplanError};
use wireplan_definition::inject::{InjectDefinition, InjectValue, ListOf};
use wireplan_definition::types::{Type, TypeFactory};

use crate::introspect::{ClassKind, TypeIntrospector};
use crate::parameter_store::ParameterStoreMap;

/// How the construction component obtains an inject's value.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedInjectValue {
    /// Resolve this service from the container.
    ContainerReference(Type),
    /// Collect every service of a type into a collection.
    ServiceCollector(ListOf),
    /// Fetch `key` from the named parameter store.
    ParameterStore {
        /// Store name.
        store: String,
        /// Key within the store.
        key: String,
    },
    /// Use the value as is.
    Literal(InjectValue),
}

/// An inject definition selected for the active profiles, with its value
/// wrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInjectDefinition {
    definition: InjectDefinition,
    value: ResolvedInjectValue,
}

impl ResolvedInjectDefinition {
    /// Returns the selected definition.
    #[must_use]
    pub const fn definition(&self) -> &InjectDefinition {
        &self.definition
    }

    /// Returns the wrapped value.
    #[must_use]
    pub const fn value(&self) -> &ResolvedInjectValue {
        &self.value
    }

    /// Returns the target parameter or property name.
    #[must_use]
    pub fn parameter_name(&self) -> &str {
        self.definition.parameter_name()
    }
}

/// Wraps `definition`'s raw value.
///
/// Precedence: a string naming a service for a class- or interface-typed
/// target wins, then a service list, then a named store, then the literal
/// itself. A store is only consulted when neither of the first two apply.
///
/// # Errors
///
/// Returns `ParameterStoreNotFound` if the named store is not in `stores`,
/// and `InvalidInjectValue` if a store key or service reference is not a
/// valid string.
pub fn resolve_inject_value(
    definition: InjectDefinition,
    stores: &ParameterStoreMap,
    introspector: &dyn TypeIntrospector,
    types: &mut TypeFactory,
) -> Result<ResolvedInjectDefinition> {
    let value = match definition.value() {
        InjectValue::String(name) if targets_service(&definition, introspector) => {
            let service = types
                .class(name)
                .map_err(|e| invalid(&definition, &e.to_string()))?;
            ResolvedInjectValue::ContainerReference(service)
        }
        InjectValue::ServiceList(list) => ResolvedInjectValue::ServiceCollector(list.clone()),
        raw => match definition.store_name() {
            Some(store) => {
                if !stores.contains_key(store) {
                    return Err(WireplanError::ParameterStoreNotFound {
                        store: store.to_owned(),
                    });
                }
                let Some(key) = raw.as_str() else {
                    return Err(invalid(&definition, "a parameter store key must be a string"));
                };
                ResolvedInjectValue::ParameterStore {
                    store: store.to_owned(),
                    key: key.to_owned(),
                }
            }
            None => ResolvedInjectValue::Literal(raw.clone()),
        },
    };

    tracing::debug!(
        service = %definition.service_type(),
        target = %definition.target(),
        value = ?value,
        "resolved inject value"
    );
    Ok(ResolvedInjectDefinition { definition, value })
}

fn targets_service(definition: &InjectDefinition, introspector: &dyn TypeIntrospector) -> bool {
    definition
        .declared_type()
        .as_single()
        .filter(|ty| !ty.is_scalar())
        .and_then(|ty| introspector.kind_of(ty))
        .is_some_and(|kind| matches!(kind, ClassKind::Class | ClassKind::Interface))
}

fn invalid(definition: &InjectDefinition, message: &str) -> WireplanError {
    WireplanError::InvalidInjectValue {
        service: definition.service_type().to_string(),
        method: definition.method_name().to_owned(),
        parameter: definition.parameter_name().to_owned(),
        message: message.to_owned(),
    }
}

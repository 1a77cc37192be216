//! Inject definitions: explicit values for parameters and properties.
//!
//! Several inject definitions may target one parameter under different
//! profile sets; the factory state picks one per active profile set.

use std::collections::BTreeMap;
use std::fmt;

use wireplan_common::constants::{CONSTRUCTOR_METHOD, PROPERTY_METHOD};
use wireplan_common::error::{Result, WireplanError};

use crate::attribute::{InjectAttribute, Origin};
use crate::types::{DeclaredType, Type};

/// The collection a [`ListOf`] gathers services into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// A plain list.
    Array,
    /// An application-defined collection type constructed from the list.
    Collection(Type),
}

/// Marker value asking for every service of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListOf {
    service_type: Type,
    collection: CollectionKind,
}

impl ListOf {
    /// Collects every `service_type` service into `collection`.
    #[must_use]
    pub const fn new(service_type: Type, collection: CollectionKind) -> Self {
        Self {
            service_type,
            collection,
        }
    }

    /// Returns the element service type.
    #[must_use]
    pub const fn service_type(&self) -> &Type {
        &self.service_type
    }

    /// Returns the collection kind.
    #[must_use]
    pub const fn collection(&self) -> &CollectionKind {
        &self.collection
    }
}

/// A raw inject value as declared in source.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InjectValue {
    /// `null`.
    #[default]
    Null,
    /// A boolean literal.
    Bool(bool),
    /// An integer literal.
    Int(i64),
    /// A float literal.
    Float(f64),
    /// A string literal, a service type name, or a parameter store key.
    String(String),
    /// A list literal.
    List(Vec<InjectValue>),
    /// A string-keyed map literal.
    Map(BTreeMap<String, InjectValue>),
    /// Every service of a type, collected.
    ServiceList(ListOf),
}

impl InjectValue {
    /// Returns the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for InjectValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for InjectValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for InjectValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for InjectValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for InjectValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<ListOf> for InjectValue {
    fn from(value: ListOf) -> Self {
        Self::ServiceList(value)
    }
}

/// What an inject definition writes to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InjectTarget {
    /// A method parameter.
    MethodParameter {
        /// Method name.
        method: String,
        /// Parameter name.
        parameter: String,
    },
    /// A property.
    Property {
        /// Property name.
        name: String,
    },
}

impl InjectTarget {
    /// Returns the method name; properties report an empty pseudo method.
    #[must_use]
    pub fn method_name(&self) -> &str {
        match self {
            Self::MethodParameter { method, .. } => method,
            Self::Property { .. } => PROPERTY_METHOD,
        }
    }

    /// Returns the parameter or property name.
    #[must_use]
    pub fn parameter_name(&self) -> &str {
        match self {
            Self::MethodParameter { parameter, .. } => parameter,
            Self::Property { name } => name,
        }
    }
}

impl fmt::Display for InjectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MethodParameter { method, parameter } => write!(f, "{method}(${parameter})"),
            Self::Property { name } => write!(f, "${name}"),
        }
    }
}

/// An explicit value for one parameter or property of a service.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectDefinition {
    service: Type,
    target: InjectTarget,
    declared_type: DeclaredType,
    value: InjectValue,
    profiles: Vec<String>,
    store_name: Option<String>,
    attribute: Option<InjectAttribute>,
}

impl InjectDefinition {
    /// Returns the target service type.
    #[must_use]
    pub const fn service_type(&self) -> &Type {
        &self.service
    }

    /// Returns the injection target.
    #[must_use]
    pub const fn target(&self) -> &InjectTarget {
        &self.target
    }

    /// Returns the target method name.
    #[must_use]
    pub fn method_name(&self) -> &str {
        self.target.method_name()
    }

    /// Returns the target parameter or property name.
    #[must_use]
    pub fn parameter_name(&self) -> &str {
        self.target.parameter_name()
    }

    /// Returns the declared type of the target.
    #[must_use]
    pub const fn declared_type(&self) -> &DeclaredType {
        &self.declared_type
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> &InjectValue {
        &self.value
    }

    /// Returns the profiles this inject is scoped to; empty means unscoped.
    #[must_use]
    pub fn profiles(&self) -> &[String] {
        &self.profiles
    }

    /// Returns the parameter store the value is fetched from.
    #[must_use]
    pub fn store_name(&self) -> Option<&str> {
        self.store_name.as_deref()
    }

    /// Returns the annotation this inject was discovered from.
    #[must_use]
    pub const fn attribute(&self) -> Option<&InjectAttribute> {
        self.attribute.as_ref()
    }

    /// Returns where this definition came from.
    #[must_use]
    pub fn origin(&self) -> Origin<'_> {
        self.attribute
            .as_ref()
            .map_or(Origin::Api("inject"), |attr| Origin::Attribute(&attr.attribute))
    }
}

/// Incrementally assembles an [`InjectDefinition`].
#[derive(Debug, Clone)]
pub struct InjectDefinitionBuilder {
    service: Type,
    target: Option<(InjectTarget, DeclaredType)>,
    value: Option<InjectValue>,
    profiles: Vec<String>,
    store_name: Option<String>,
    attribute: Option<InjectAttribute>,
}

impl InjectDefinitionBuilder {
    /// Starts an inject for `service`.
    #[must_use]
    pub const fn for_service(service: Type) -> Self {
        Self {
            service,
            target: None,
            value: None,
            profiles: Vec::new(),
            store_name: None,
            attribute: None,
        }
    }

    /// Targets a parameter of `method`.
    #[must_use]
    pub fn with_method(
        mut self,
        method: impl Into<String>,
        parameter: impl Into<String>,
        declared_type: impl Into<DeclaredType>,
    ) -> Self {
        self.target = Some((
            InjectTarget::MethodParameter {
                method: method.into(),
                parameter: parameter.into(),
            },
            declared_type.into(),
        ));
        self
    }

    /// Targets a constructor parameter.
    #[must_use]
    pub fn with_constructor_parameter(
        self,
        parameter: impl Into<String>,
        declared_type: impl Into<DeclaredType>,
    ) -> Self {
        self.with_method(CONSTRUCTOR_METHOD, parameter, declared_type)
    }

    /// Targets a property.
    #[must_use]
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        declared_type: impl Into<DeclaredType>,
    ) -> Self {
        self.target = Some((InjectTarget::Property { name: name.into() }, declared_type.into()));
        self
    }

    /// Sets the raw value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<InjectValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Scopes the inject to profiles.
    #[must_use]
    pub fn with_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiles = profiles.into_iter().map(Into::into).collect();
        self
    }

    /// Fetches the value from a named parameter store.
    #[must_use]
    pub fn with_store(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = Some(store_name.into());
        self
    }

    /// Records the originating annotation.
    #[must_use]
    pub fn with_attribute(mut self, attribute: InjectAttribute) -> Self {
        self.attribute = Some(attribute);
        self
    }

    /// Finishes the definition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDefinition` if no target or value was set, if a name
    /// is empty, or if a profile or the store name is empty.
    pub fn build(self) -> Result<InjectDefinition> {
        let service = self.service;
        let Some((target, declared_type)) = self.target else {
            return Err(invalid(&service, "an inject requires a method parameter or property"));
        };
        let Some(value) = self.value else {
            return Err(invalid(&service, "an inject requires a value"));
        };
        if target.parameter_name().is_empty() {
            return Err(invalid(&service, "parameter and property names must not be empty"));
        }
        if matches!(&target, InjectTarget::MethodParameter { method, .. } if method.is_empty()) {
            return Err(invalid(&service, "method name must not be empty"));
        }
        if self.profiles.iter().any(String::is_empty) {
            return Err(invalid(&service, "profile names must not be empty"));
        }
        if self.store_name.as_deref().is_some_and(str::is_empty) {
            return Err(invalid(&service, "store name must not be empty"));
        }
        Ok(InjectDefinition {
            service,
            target,
            declared_type,
            value,
            profiles: self.profiles,
            store_name: self.store_name,
            attribute: self.attribute,
        })
    }
}

fn invalid(service: &Type, message: &str) -> WireplanError {
    WireplanError::InvalidDefinition {
        message: format!("inject for service {service}: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeFactory;

    #[test]
    fn constructor_inject() {
        let mut types = TypeFactory::new();
        let service = types.class("App\\Mailer").expect("class");
        let inject = InjectDefinitionBuilder::for_service(service.clone())
            .with_constructor_parameter("dsn", types.string())
            .with_value("smtp://localhost")
            .with_profiles(["dev"])
            .build()
            .expect("inject");
        assert_eq!(inject.service_type(), &service);
        assert_eq!(inject.method_name(), "__construct");
        assert_eq!(inject.parameter_name(), "dsn");
        assert_eq!(inject.value().as_str(), Some("smtp://localhost"));
        assert_eq!(inject.profiles(), ["dev"]);
        assert!(inject.store_name().is_none());
        assert_eq!(inject.origin(), Origin::Api("inject"));
        assert_eq!(inject.target().to_string(), "__construct($dsn)");
    }

    #[test]
    fn property_inject_uses_pseudo_method() {
        let mut types = TypeFactory::new();
        let service = types.class("App\\Config").expect("class");
        let inject = InjectDefinitionBuilder::for_service(service)
            .with_property("port", types.int())
            .with_value(8080_i64)
            .build()
            .expect("inject");
        assert_eq!(inject.method_name(), "");
        assert_eq!(inject.parameter_name(), "port");
        assert_eq!(inject.value(), &InjectValue::Int(8080));
        assert_eq!(inject.target().to_string(), "$port");
    }

    #[test]
    fn missing_target_is_rejected() {
        let mut types = TypeFactory::new();
        let service = types.class("App\\Config").expect("class");
        let err = InjectDefinitionBuilder::for_service(service)
            .with_value(1_i64)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("method parameter or property"), "got: {err}");
    }

    #[test]
    fn missing_value_is_rejected() {
        let mut types = TypeFactory::new();
        let service = types.class("App\\Config").expect("class");
        let err = InjectDefinitionBuilder::for_service(service)
            .with_property("port", types.int())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("requires a value"), "got: {err}");
    }

    #[test]
    fn empty_store_name_is_rejected() {
        let mut types = TypeFactory::new();
        let service = types.class("App\\Config").expect("class");
        assert!(
            InjectDefinitionBuilder::for_service(service)
                .with_property("port", types.int())
                .with_value("PORT")
                .with_store("")
                .build()
                .is_err()
        );
    }

    #[test]
    fn list_of_value() {
        let mut types = TypeFactory::new();
        let handler = types.class("App\\Handler").expect("class");
        let value = InjectValue::from(ListOf::new(handler.clone(), CollectionKind::Array));
        let InjectValue::ServiceList(list) = &value else {
            panic!("expected service list");
        };
        assert_eq!(list.service_type(), &handler);
        assert_eq!(list.collection(), &CollectionKind::Array);
        assert!(value.as_str().is_none());
    }
}

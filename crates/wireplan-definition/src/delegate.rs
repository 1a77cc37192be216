//! Service delegates: factory methods that construct a service.

use wireplan_common::error::{Result, WireplanError};

use crate::attribute::{Origin, ServiceDelegateAttribute};
use crate::method::MethodVisibility;
use crate::types::Type;

/// Records that `delegate_type::delegate_method` produces `service` instances
/// in place of the service's constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDelegateDefinition {
    service: Type,
    delegate_type: Type,
    delegate_method: String,
    visibility: MethodVisibility,
    attribute: Option<ServiceDelegateAttribute>,
}

impl ServiceDelegateDefinition {
    /// Creates a delegate for a public factory method.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDefinition` if the method name is empty.
    pub fn new(service: Type, delegate_type: Type, delegate_method: impl Into<String>) -> Result<Self> {
        let delegate_method = delegate_method.into();
        if delegate_method.trim().is_empty() {
            return Err(WireplanError::InvalidDefinition {
                message: format!("delegate for service {service}: method name must not be empty"),
            });
        }
        Ok(Self {
            service,
            delegate_type,
            delegate_method,
            visibility: MethodVisibility::Public,
            attribute: None,
        })
    }

    /// Sets the factory method's visibility as reported by the analyzer.
    #[must_use]
    pub const fn with_visibility(mut self, visibility: MethodVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Records the originating annotation.
    #[must_use]
    pub fn with_attribute(mut self, attribute: ServiceDelegateAttribute) -> Self {
        self.attribute = Some(attribute);
        self
    }

    /// Returns the produced service type.
    #[must_use]
    pub const fn service_type(&self) -> &Type {
        &self.service
    }

    /// Returns the type declaring the factory method.
    #[must_use]
    pub const fn delegate_type(&self) -> &Type {
        &self.delegate_type
    }

    /// Returns the factory method name.
    #[must_use]
    pub fn delegate_method(&self) -> &str {
        &self.delegate_method
    }

    /// Returns the factory method's visibility.
    #[must_use]
    pub const fn visibility(&self) -> MethodVisibility {
        self.visibility
    }

    /// Returns the annotation this delegate was discovered from.
    #[must_use]
    pub const fn attribute(&self) -> Option<&ServiceDelegateAttribute> {
        self.attribute.as_ref()
    }

    /// Returns where this definition came from.
    #[must_use]
    pub fn origin(&self) -> Origin<'_> {
        self.attribute
            .as_ref()
            .map_or(Origin::Api("service_delegate"), |attr| {
                Origin::Attribute(&attr.attribute)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeFactory;

    #[test]
    fn delegate_records_factory() {
        let mut types = TypeFactory::new();
        let service = types.class("App\\Client").expect("class");
        let factory = types.class("App\\ClientFactory").expect("class");
        let delegate = ServiceDelegateDefinition::new(service.clone(), factory.clone(), "create")
            .expect("delegate")
            .with_visibility(MethodVisibility::Protected);
        assert_eq!(delegate.service_type(), &service);
        assert_eq!(delegate.delegate_type(), &factory);
        assert_eq!(delegate.delegate_method(), "create");
        assert_eq!(delegate.visibility(), MethodVisibility::Protected);
        assert_eq!(delegate.origin(), Origin::Api("service_delegate"));
    }

    #[test]
    fn empty_method_is_rejected() {
        let mut types = TypeFactory::new();
        let service = types.class("App\\Client").expect("class");
        assert!(ServiceDelegateDefinition::new(service.clone(), service, " ").is_err());
    }
}

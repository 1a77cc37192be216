//! Service prepares: methods invoked after construction.

use wireplan_common::error::{Result, WireplanError};

use crate::attribute::{Origin, ServicePrepareAttribute};
use crate::method::MethodVisibility;
use crate::types::Type;

/// Records that `service::method` must run after the service is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePrepareDefinition {
    service: Type,
    method: String,
    visibility: MethodVisibility,
    attribute: Option<ServicePrepareAttribute>,
}

impl ServicePrepareDefinition {
    /// Creates a prepare for a public method.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDefinition` if the method name is empty.
    pub fn new(service: Type, method: impl Into<String>) -> Result<Self> {
        let method = method.into();
        if method.trim().is_empty() {
            return Err(WireplanError::InvalidDefinition {
                message: format!("prepare for service {service}: method name must not be empty"),
            });
        }
        Ok(Self {
            service,
            method,
            visibility: MethodVisibility::Public,
            attribute: None,
        })
    }

    /// Sets the method's visibility as reported by the analyzer.
    #[must_use]
    pub const fn with_visibility(mut self, visibility: MethodVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Records the originating annotation.
    #[must_use]
    pub fn with_attribute(mut self, attribute: ServicePrepareAttribute) -> Self {
        self.attribute = Some(attribute);
        self
    }

    /// Returns the prepared service type.
    #[must_use]
    pub const fn service_type(&self) -> &Type {
        &self.service
    }

    /// Returns the method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the method's visibility.
    #[must_use]
    pub const fn visibility(&self) -> MethodVisibility {
        self.visibility
    }

    /// Returns the annotation this prepare was discovered from.
    #[must_use]
    pub const fn attribute(&self) -> Option<&ServicePrepareAttribute> {
        self.attribute.as_ref()
    }

    /// Returns where this definition came from.
    #[must_use]
    pub fn origin(&self) -> Origin<'_> {
        self.attribute
            .as_ref()
            .map_or(Origin::Api("service_prepare"), |attr| {
                Origin::Attribute(&attr.attribute)
            })
    }
}

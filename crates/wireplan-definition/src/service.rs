//! Service definitions.

use wireplan_common::constants::DEFAULT_PROFILE;
use wireplan_common::error::{Result, WireplanError};

use crate::attribute::{Origin, ServiceAttribute};
use crate::types::Type;

/// One type the container can construct or provide.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDefinition {
    service_type: Type,
    name: Option<String>,
    profiles: Vec<String>,
    is_primary: bool,
    is_concrete: bool,
    attribute: Option<ServiceAttribute>,
}

impl ServiceDefinition {
    /// Returns the service type.
    #[must_use]
    pub const fn service_type(&self) -> &Type {
        &self.service_type
    }

    /// Returns the explicit service name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the profiles this service is registered under. Never empty.
    #[must_use]
    pub fn profiles(&self) -> &[String] {
        &self.profiles
    }

    /// Returns `true` if this is the preferred implementation among aliases.
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Returns `true` for concrete services.
    #[must_use]
    pub const fn is_concrete(&self) -> bool {
        self.is_concrete
    }

    /// Returns `true` for abstract services.
    #[must_use]
    pub const fn is_abstract(&self) -> bool {
        !self.is_concrete
    }

    /// Returns the annotation this service was discovered from.
    #[must_use]
    pub const fn attribute(&self) -> Option<&ServiceAttribute> {
        self.attribute.as_ref()
    }

    /// Returns where this definition came from.
    #[must_use]
    pub fn origin(&self) -> Origin<'_> {
        self.attribute.as_ref().map_or(
            Origin::Api(if self.is_concrete { "service" } else { "abstract_service" }),
            |attr| Origin::Attribute(&attr.attribute),
        )
    }
}

/// Incrementally assembles a [`ServiceDefinition`].
#[derive(Debug, Clone)]
pub struct ServiceDefinitionBuilder {
    service_type: Type,
    name: Option<String>,
    profiles: Vec<String>,
    is_primary: bool,
    is_concrete: bool,
    attribute: Option<ServiceAttribute>,
}

impl ServiceDefinitionBuilder {
    /// Starts a concrete service.
    #[must_use]
    pub fn for_concrete(service_type: Type) -> Self {
        Self {
            service_type,
            name: None,
            profiles: Vec::new(),
            is_primary: false,
            is_concrete: true,
            attribute: None,
        }
    }

    /// Starts an abstract service.
    #[must_use]
    pub fn for_abstract(service_type: Type) -> Self {
        Self {
            is_concrete: false,
            ..Self::for_concrete(service_type)
        }
    }

    /// Marks the service as primary.
    #[must_use]
    pub const fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    /// Sets the service name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the profiles. An empty list means `["default"]`.
    #[must_use]
    pub fn with_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiles = profiles.into_iter().map(Into::into).collect();
        self
    }

    /// Records the originating annotation.
    #[must_use]
    pub fn with_attribute(mut self, attribute: ServiceAttribute) -> Self {
        self.attribute = Some(attribute);
        self
    }

    /// Finishes the definition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDefinition` if the name or a profile is empty, or if
    /// an abstract service is marked primary.
    pub fn build(self) -> Result<ServiceDefinition> {
        if self.name.as_deref().is_some_and(str::is_empty) {
            return Err(invalid(&self.service_type, "service name must not be empty"));
        }
        if self.profiles.iter().any(String::is_empty) {
            return Err(invalid(&self.service_type, "profile names must not be empty"));
        }
        if !self.is_concrete && self.is_primary {
            return Err(invalid(&self.service_type, "an abstract service cannot be primary"));
        }
        let profiles = if self.profiles.is_empty() {
            vec![DEFAULT_PROFILE.to_owned()]
        } else {
            self.profiles
        };
        Ok(ServiceDefinition {
            service_type: self.service_type,
            name: self.name,
            profiles,
            is_primary: self.is_primary,
            is_concrete: self.is_concrete,
            attribute: self.attribute,
        })
    }
}

fn invalid(service_type: &Type, message: &str) -> WireplanError {
    WireplanError::InvalidDefinition {
        message: format!("service {service_type}: {message}"),
    }
}

//! Structured records of the annotations a definition was discovered from.
//!
//! Definitions added through the functional [`crate::provider`] API carry
//! no attribute; [`Origin`] renders either case for diagnostics.

use std::fmt;

use crate::inject::InjectValue;
use crate::types::Type;

/// Attribute class recorded for services discovered by the analyzer.
pub const SERVICE_ATTRIBUTE: &str = "Service";
/// Attribute class recorded for injects discovered by the analyzer.
pub const INJECT_ATTRIBUTE: &str = "Inject";
/// Attribute class recorded for prepares discovered by the analyzer.
pub const SERVICE_PREPARE_ATTRIBUTE: &str = "ServicePrepare";
/// Attribute class recorded for delegates discovered by the analyzer.
pub const SERVICE_DELEGATE_ATTRIBUTE: &str = "ServiceDelegate";

/// A service annotation and its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceAttribute {
    /// Attribute class name.
    pub attribute: String,
    /// Declared service name.
    pub name: Option<String>,
    /// Declared profiles.
    pub profiles: Vec<String>,
    /// Declared primary flag.
    pub is_primary: bool,
}

impl Default for ServiceAttribute {
    fn default() -> Self {
        Self {
            attribute: SERVICE_ATTRIBUTE.to_owned(),
            name: None,
            profiles: Vec::new(),
            is_primary: false,
        }
    }
}

/// An inject annotation and its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectAttribute {
    /// Attribute class name.
    pub attribute: String,
    /// Declared value.
    pub value: InjectValue,
    /// Declared profiles.
    pub profiles: Vec<String>,
    /// Declared parameter store.
    pub from: Option<String>,
}

impl Default for InjectAttribute {
    fn default() -> Self {
        Self {
            attribute: INJECT_ATTRIBUTE.to_owned(),
            value: InjectValue::Null,
            profiles: Vec::new(),
            from: None,
        }
    }
}

/// A prepare annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePrepareAttribute {
    /// Attribute class name.
    pub attribute: String,
}

impl Default for ServicePrepareAttribute {
    fn default() -> Self {
        Self {
            attribute: SERVICE_PREPARE_ATTRIBUTE.to_owned(),
        }
    }
}

/// A delegate annotation and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDelegateAttribute {
    /// Attribute class name.
    pub attribute: String,
    /// Explicit service type, when it differs from the method's return type.
    pub service: Option<Type>,
}

impl Default for ServiceDelegateAttribute {
    fn default() -> Self {
        Self {
            attribute: SERVICE_DELEGATE_ATTRIBUTE.to_owned(),
            service: None,
        }
    }
}

/// Where a definition came from, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin<'a> {
    /// Discovered from an annotation of the given attribute class.
    Attribute(&'a str),
    /// Added through the named functional API call.
    Api(&'static str),
}

impl fmt::Display for Origin<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute(class) => write!(f, "attributed with {class}"),
            Self::Api(call) => write!(f, "added with {call}()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_renders_attribute_class() {
        assert_eq!(
            Origin::Attribute(SERVICE_DELEGATE_ATTRIBUTE).to_string(),
            "attributed with ServiceDelegate"
        );
    }

    #[test]
    fn origin_renders_api_call() {
        assert_eq!(
            Origin::Api("service_delegate").to_string(),
            "added with service_delegate()"
        );
    }

    #[test]
    fn defaults_carry_attribute_class() {
        assert_eq!(ServiceAttribute::default().attribute, "Service");
        assert_eq!(InjectAttribute::default().attribute, "Inject");
        assert_eq!(ServicePrepareAttribute::default().attribute, "ServicePrepare");
        assert!(ServiceDelegateAttribute::default().service.is_none());
    }
}

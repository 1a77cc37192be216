//! Versioned JSON documents for container definitions.
//!
//! Every definition and attribute is written field by field so that a
//! document can be read back without any knowledge beyond this module.
//! Types are stored by name, declared types by their declaration string,
//! and re-interned through a [`TypeFactory`] on the way back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wireplan_common::constants::APP_NAME;
use wireplan_common::error::{Result, WireplanError};
use wireplan_definition::alias::AliasDefinition;
use wireplan_definition::attribute::{
    InjectAttribute, ServiceAttribute, ServiceDelegateAttribute, ServicePrepareAttribute,
};
use wireplan_definition::container::ContainerDefinition;
use wireplan_definition::delegate::ServiceDelegateDefinition;
use wireplan_definition::inject::{
    CollectionKind, InjectDefinition, InjectDefinitionBuilder, InjectTarget, InjectValue, ListOf,
};
use wireplan_definition::prepare::ServicePrepareDefinition;
use wireplan_definition::service::{ServiceDefinition, ServiceDefinitionBuilder};
use wireplan_definition::types::TypeFactory;

/// Version written into every document by this build.
pub const SERIALIZER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Top-level cache document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedContainerDefinition {
    /// Tool that wrote the document.
    pub generator: String,
    /// Serializer version that wrote the document.
    pub version: String,
    /// RFC 3339 timestamp of when the document was written.
    pub generated_at: String,
    /// Service definitions.
    #[serde(default)]
    pub services: Vec<SerializedService>,
    /// Alias definitions.
    #[serde(default)]
    pub aliases: Vec<SerializedAlias>,
    /// Service delegate definitions.
    #[serde(default)]
    pub delegates: Vec<SerializedDelegate>,
    /// Service prepare definitions.
    #[serde(default)]
    pub prepares: Vec<SerializedPrepare>,
    /// Inject definitions.
    #[serde(default)]
    pub injects: Vec<SerializedInject>,
}

/// A service definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedService {
    /// Service type name.
    #[serde(rename = "type")]
    pub service_type: String,
    /// Service name.
    pub name: Option<String>,
    /// Profiles.
    pub profiles: Vec<String>,
    /// Whether the service is primary.
    pub is_primary: bool,
    /// Whether the service is concrete.
    pub is_concrete: bool,
    /// Originating annotation.
    pub attribute: Option<SerializedServiceAttribute>,
}

/// A service annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedServiceAttribute {
    /// Attribute class name.
    pub attribute: String,
    /// Declared name.
    pub name: Option<String>,
    /// Declared profiles.
    pub profiles: Vec<String>,
    /// Declared primary flag.
    pub is_primary: bool,
}

/// An alias definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedAlias {
    /// Abstract type name.
    pub abstract_service: String,
    /// Concrete type name.
    pub concrete_service: String,
}

/// A service delegate definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedDelegate {
    /// Constructed service type name.
    pub service_type: String,
    /// Factory type name.
    pub delegate_type: String,
    /// Factory method.
    pub delegate_method: String,
    /// Factory method visibility.
    pub visibility: String,
    /// Originating annotation.
    pub attribute: Option<SerializedDelegateAttribute>,
}

/// A delegate annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedDelegateAttribute {
    /// Attribute class name.
    pub attribute: String,
    /// Explicit service type name.
    pub service: Option<String>,
}

/// A service prepare definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedPrepare {
    /// Service type name.
    pub service_type: String,
    /// Prepare method.
    pub method: String,
    /// Prepare method visibility.
    pub visibility: String,
    /// Attribute class name of the originating annotation.
    pub attribute: Option<String>,
}

/// An inject definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedInject {
    /// Service type name.
    pub service_type: String,
    /// Target method, absent for properties.
    pub method: Option<String>,
    /// Target parameter or property name.
    pub parameter: String,
    /// Declared type of the target.
    pub declared_type: String,
    /// Raw value.
    pub value: SerializedInjectValue,
    /// Profiles.
    pub profiles: Vec<String>,
    /// Parameter store name.
    pub store: Option<String>,
    /// Originating annotation.
    pub attribute: Option<SerializedInjectAttribute>,
}

/// An inject annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedInjectAttribute {
    /// Attribute class name.
    pub attribute: String,
    /// Declared value.
    pub value: SerializedInjectValue,
    /// Declared profiles.
    pub profiles: Vec<String>,
    /// Declared parameter store.
    pub from: Option<String>,
}

mod float_repr {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FloatRepr {
        Number(f64),
        Tagged(String),
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_nan() {
            serializer.serialize_str("NAN")
        } else if value.is_infinite() {
            serializer.serialize_str(if value.is_sign_negative() { "-INF" } else { "INF" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match FloatRepr::deserialize(deserializer)? {
            FloatRepr::Number(value) => Ok(value),
            FloatRepr::Tagged(tag) => match tag.as_str() {
                "INF" => Ok(f64::INFINITY),
                "-INF" => Ok(f64::NEG_INFINITY),
                "NAN" => Ok(f64::NAN),
                other => Err(<D::Error as serde::de::Error>::custom(format!(
                    "invalid float value `{other}`"
                ))),
            },
        }
    }
}

/// A raw inject value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum SerializedInjectValue {
    /// `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A float. Non-finite values are written as `"INF"`, `"-INF"` or `"NAN"`.
    Float(#[serde(with = "float_repr")] f64),
    /// A string.
    String(String),
    /// A list.
    List(Vec<SerializedInjectValue>),
    /// A string-keyed map.
    Map(BTreeMap<String, SerializedInjectValue>),
    /// Every service of a type.
    ServiceList {
        /// Element service type name.
        service_type: String,
        /// Collection type name, absent for a plain list.
        collection: Option<String>,
    },
}

#[derive(Deserialize)]
struct DocumentHeader {
    version: String,
}

/// Converts container definitions to and from cache documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDefinitionSerializer {
    version: String,
}

impl Default for ContainerDefinitionSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerDefinitionSerializer {
    /// Creates a serializer writing [`SERIALIZER_VERSION`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_version(SERIALIZER_VERSION)
    }

    /// Creates a serializer writing and accepting `version`.
    #[must_use]
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// Returns the version this serializer writes and accepts.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Renders `definition` as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if JSON rendering fails.
    pub fn serialize(&self, definition: &ContainerDefinition) -> Result<String> {
        let document = self.to_document(definition);
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Reads a JSON document back into a definition.
    ///
    /// # Errors
    ///
    /// Returns `MismatchedSerializerVersions` if the document was written by
    /// another version, `Serialization` for malformed JSON, and the
    /// definition errors of any invalid entry.
    pub fn deserialize(&self, input: &str, types: &mut TypeFactory) -> Result<ContainerDefinition> {
        let header: DocumentHeader = serde_json::from_str(input)?;
        self.check_version(&header.version)?;
        let document: SerializedContainerDefinition = serde_json::from_str(input)?;
        self.from_document(document, types)
    }

    /// Builds the document for `definition`.
    #[must_use]
    pub fn to_document(&self, definition: &ContainerDefinition) -> SerializedContainerDefinition {
        SerializedContainerDefinition {
            generator: APP_NAME.to_owned(),
            version: self.version.clone(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            services: definition.service_definitions().iter().map(service_to_document).collect(),
            aliases: definition
                .alias_definitions()
                .iter()
                .map(|a| SerializedAlias {
                    abstract_service: a.abstract_service().to_string(),
                    concrete_service: a.concrete_service().to_string(),
                })
                .collect(),
            delegates: definition
                .service_delegate_definitions()
                .iter()
                .map(delegate_to_document)
                .collect(),
            prepares: definition
                .service_prepare_definitions()
                .iter()
                .map(|p| SerializedPrepare {
                    service_type: p.service_type().to_string(),
                    method: p.method().to_owned(),
                    visibility: p.visibility().to_string(),
                    attribute: p.attribute().map(|a| a.attribute.clone()),
                })
                .collect(),
            injects: definition.inject_definitions().iter().map(inject_to_document).collect(),
        }
    }

    /// Rebuilds a definition from `document`.
    ///
    /// # Errors
    ///
    /// Returns `MismatchedSerializerVersions` if the document was written by
    /// another version, and the definition errors of any invalid entry.
    pub fn from_document(
        &self,
        document: SerializedContainerDefinition,
        types: &mut TypeFactory,
    ) -> Result<ContainerDefinition> {
        self.check_version(&document.version)?;
        let mut builder = ContainerDefinition::builder();
        for service in document.services {
            builder = builder.with_service_definition(service_from_document(service, types)?);
        }
        for alias in document.aliases {
            builder = builder.with_alias_definition(AliasDefinition::new(
                types.class(&alias.abstract_service)?,
                types.class(&alias.concrete_service)?,
            ));
        }
        for delegate in document.delegates {
            builder = builder.with_service_delegate_definition(delegate_from_document(delegate, types)?);
        }
        for prepare in document.prepares {
            let mut definition =
                ServicePrepareDefinition::new(types.class(&prepare.service_type)?, prepare.method)?
                    .with_visibility(prepare.visibility.parse()?);
            if let Some(attribute) = prepare.attribute {
                definition = definition.with_attribute(ServicePrepareAttribute { attribute });
            }
            builder = builder.with_service_prepare_definition(definition);
        }
        for inject in document.injects {
            builder = builder.with_inject_definition(inject_from_document(inject, types)?);
        }
        tracing::debug!(version = %document.version, generated_at = %document.generated_at, "read container definition document");
        Ok(builder.build())
    }

    fn check_version(&self, actual: &str) -> Result<()> {
        if actual == self.version {
            return Ok(());
        }
        Err(WireplanError::MismatchedSerializerVersions {
            expected: self.version.clone(),
            actual: actual.to_owned(),
        })
    }
}

fn service_to_document(service: &ServiceDefinition) -> SerializedService {
    SerializedService {
        service_type: service.service_type().to_string(),
        name: service.name().map(str::to_owned),
        profiles: service.profiles().to_vec(),
        is_primary: service.is_primary(),
        is_concrete: service.is_concrete(),
        attribute: service.attribute().map(|a| SerializedServiceAttribute {
            attribute: a.attribute.clone(),
            name: a.name.clone(),
            profiles: a.profiles.clone(),
            is_primary: a.is_primary,
        }),
    }
}

fn service_from_document(
    service: SerializedService,
    types: &mut TypeFactory,
) -> Result<ServiceDefinition> {
    let service_type = types.class(&service.service_type)?;
    let mut builder = if service.is_concrete {
        ServiceDefinitionBuilder::for_concrete(service_type)
    } else {
        ServiceDefinitionBuilder::for_abstract(service_type)
    }
    .with_profiles(service.profiles);
    if let Some(name) = service.name {
        builder = builder.with_name(name);
    }
    if service.is_primary {
        builder = builder.primary();
    }
    if let Some(attribute) = service.attribute {
        builder = builder.with_attribute(ServiceAttribute {
            attribute: attribute.attribute,
            name: attribute.name,
            profiles: attribute.profiles,
            is_primary: attribute.is_primary,
        });
    }
    builder.build()
}

fn delegate_to_document(delegate: &ServiceDelegateDefinition) -> SerializedDelegate {
    SerializedDelegate {
        service_type: delegate.service_type().to_string(),
        delegate_type: delegate.delegate_type().to_string(),
        delegate_method: delegate.delegate_method().to_owned(),
        visibility: delegate.visibility().to_string(),
        attribute: delegate.attribute().map(|a| SerializedDelegateAttribute {
            attribute: a.attribute.clone(),
            service: a.service.as_ref().map(ToString::to_string),
        }),
    }
}

fn delegate_from_document(
    delegate: SerializedDelegate,
    types: &mut TypeFactory,
) -> Result<ServiceDelegateDefinition> {
    let mut definition = ServiceDelegateDefinition::new(
        types.class(&delegate.service_type)?,
        types.class(&delegate.delegate_type)?,
        delegate.delegate_method,
    )?
    .with_visibility(delegate.visibility.parse()?);
    if let Some(attribute) = delegate.attribute {
        let service = attribute.service.map(|s| types.class(&s)).transpose()?;
        definition = definition.with_attribute(ServiceDelegateAttribute {
            attribute: attribute.attribute,
            service,
        });
    }
    Ok(definition)
}

fn inject_to_document(inject: &InjectDefinition) -> SerializedInject {
    let method = match inject.target() {
        InjectTarget::MethodParameter { method, .. } => Some(method.clone()),
        InjectTarget::Property { .. } => None,
    };
    SerializedInject {
        service_type: inject.service_type().to_string(),
        method,
        parameter: inject.parameter_name().to_owned(),
        declared_type: inject.declared_type().to_string(),
        value: value_to_document(inject.value()),
        profiles: inject.profiles().to_vec(),
        store: inject.store_name().map(str::to_owned),
        attribute: inject.attribute().map(|a| SerializedInjectAttribute {
            attribute: a.attribute.clone(),
            value: value_to_document(&a.value),
            profiles: a.profiles.clone(),
            from: a.from.clone(),
        }),
    }
}

fn inject_from_document(inject: SerializedInject, types: &mut TypeFactory) -> Result<InjectDefinition> {
    let declared_type = types.from_declaration(Some(inject.declared_type.as_str()))?;
    let mut builder = InjectDefinitionBuilder::for_service(types.class(&inject.service_type)?);
    builder = match inject.method {
        Some(method) => builder.with_method(method, inject.parameter, declared_type),
        None => builder.with_property(inject.parameter, declared_type),
    };
    builder = builder
        .with_value(value_from_document(inject.value, types)?)
        .with_profiles(inject.profiles);
    if let Some(store) = inject.store {
        builder = builder.with_store(store);
    }
    if let Some(attribute) = inject.attribute {
        builder = builder.with_attribute(InjectAttribute {
            attribute: attribute.attribute,
            value: value_from_document(attribute.value, types)?,
            profiles: attribute.profiles,
            from: attribute.from,
        });
    }
    builder.build()
}

fn value_to_document(value: &InjectValue) -> SerializedInjectValue {
    match value {
        InjectValue::Null => SerializedInjectValue::Null,
        InjectValue::Bool(b) => SerializedInjectValue::Bool(*b),
        InjectValue::Int(i) => SerializedInjectValue::Int(*i),
        InjectValue::Float(f) => SerializedInjectValue::Float(*f),
        InjectValue::String(s) => SerializedInjectValue::String(s.clone()),
        InjectValue::List(items) => {
            SerializedInjectValue::List(items.iter().map(value_to_document).collect())
        }
        InjectValue::Map(entries) => SerializedInjectValue::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), value_to_document(v)))
                .collect(),
        ),
        InjectValue::ServiceList(list) => SerializedInjectValue::ServiceList {
            service_type: list.service_type().to_string(),
            collection: match list.collection() {
                CollectionKind::Array => None,
                CollectionKind::Collection(ty) => Some(ty.to_string()),
            },
        },
    }
}

fn value_from_document(value: SerializedInjectValue, types: &mut TypeFactory) -> Result<InjectValue> {
    Ok(match value {
        SerializedInjectValue::Null => InjectValue::Null,
        SerializedInjectValue::Bool(b) => InjectValue::Bool(b),
        SerializedInjectValue::Int(i) => InjectValue::Int(i),
        SerializedInjectValue::Float(f) => InjectValue::Float(f),
        SerializedInjectValue::String(s) => InjectValue::String(s),
        SerializedInjectValue::List(items) => InjectValue::List(
            items
                .into_iter()
                .map(|v| value_from_document(v, types))
                .collect::<Result<_>>()?,
        ),
        SerializedInjectValue::Map(entries) => InjectValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| value_from_document(v, types).map(|v| (k, v)))
                .collect::<Result<_>>()?,
        ),
        SerializedInjectValue::ServiceList {
            service_type,
            collection,
        } => {
            let collection = match collection {
                Some(name) => CollectionKind::Collection(types.class(&name)?),
                None => CollectionKind::Array,
            };
            InjectValue::ServiceList(ListOf::new(types.class(&service_type)?, collection))
        }
    })
}

#[cfg(test)]
mod tests {
    use wireplan_definition::method::MethodVisibility;

    use super::*;

    fn sample(types: &mut TypeFactory) -> ContainerDefinition {
        let mailer = types.class("App\\Mailer").expect("class");
        let handler = types.class("App\\Handler").expect("class");
        let handlers = types.class("App\\HandlerCollection").expect("class");
        let factory = types.class("App\\MailerFactory").expect("class");
        let declared = types.from_declaration(Some("?App\\Transport")).expect("declared");
        ContainerDefinition::builder()
            .with_service_definition(
                ServiceDefinitionBuilder::for_concrete(mailer.clone())
                    .with_name("mailer")
                    .with_profiles(["prod"])
                    .with_attribute(ServiceAttribute {
                        name: Some("mailer".into()),
                        profiles: vec!["prod".into()],
                        ..ServiceAttribute::default()
                    })
                    .build()
                    .expect("svc"),
            )
            .with_service_delegate_definition(
                ServiceDelegateDefinition::new(mailer.clone(), factory, "create")
                    .expect("delegate")
                    .with_visibility(MethodVisibility::Protected)
                    .with_attribute(ServiceDelegateAttribute {
                        service: Some(mailer.clone()),
                        ..ServiceDelegateAttribute::default()
                    }),
            )
            .with_inject_definition(
                InjectDefinitionBuilder::for_service(mailer.clone())
                    .with_constructor_parameter("transport", declared)
                    .with_value(InjectValue::Null)
                    .build()
                    .expect("inject"),
            )
            .with_inject_definition(
                InjectDefinitionBuilder::for_service(mailer)
                    .with_property("handlers", types.array())
                    .with_value(ListOf::new(handler, CollectionKind::Collection(handlers)))
                    .with_profiles(["prod", "dev"])
                    .build()
                    .expect("inject"),
            )
            .build()
    }

    #[test]
    fn document_records_version_and_generator() {
        let mut types = TypeFactory::new();
        let document = ContainerDefinitionSerializer::new().to_document(&sample(&mut types));
        assert_eq!(document.generator, "wireplan");
        assert_eq!(document.version, SERIALIZER_VERSION);
        assert!(chrono::DateTime::parse_from_rfc3339(&document.generated_at).is_ok());
        assert_eq!(document.services.len(), 1);
        assert_eq!(document.delegates[0].visibility, "protected");
        assert_eq!(document.injects[0].declared_type, "App\\Transport|null");
        assert_eq!(document.injects[1].method, None);
    }

    #[test]
    fn deserialize_restores_definition() {
        let mut types = TypeFactory::new();
        let original = sample(&mut types);
        let serializer = ContainerDefinitionSerializer::new();
        let json = serializer.serialize(&original).expect("serialize");

        let mut fresh = TypeFactory::new();
        let restored = serializer.deserialize(&json, &mut fresh).expect("deserialize");
        assert_eq!(restored, original);
    }

    #[test]
    fn other_version_is_rejected() {
        let mut types = TypeFactory::new();
        let json = ContainerDefinitionSerializer::with_version("0.0.1")
            .serialize(&sample(&mut types))
            .expect("serialize");
        let err = ContainerDefinitionSerializer::with_version("0.0.2")
            .deserialize(&json, &mut types)
            .unwrap_err();
        assert!(
            matches!(
                &err,
                WireplanError::MismatchedSerializerVersions { expected, actual }
                    if expected == "0.0.2" && actual == "0.0.1"
            ),
            "got: {err}"
        );
    }

    fn float_inject(types: &mut TypeFactory, value: f64) -> ContainerDefinition {
        let service = types.class("App\\Clock").expect("class");
        ContainerDefinition::builder()
            .with_service_definition(
                ServiceDefinitionBuilder::for_concrete(service.clone()).build().expect("svc"),
            )
            .with_inject_definition(
                InjectDefinitionBuilder::for_service(service)
                    .with_constructor_parameter("drift", types.float())
                    .with_value(InjectValue::Float(value))
                    .build()
                    .expect("inject"),
            )
            .build()
    }

    #[test]
    fn non_finite_floats_survive_a_round_trip() {
        let serializer = ContainerDefinitionSerializer::new();
        for value in [f64::INFINITY, f64::NEG_INFINITY, -0.5, 1.0e300] {
            let mut types = TypeFactory::new();
            let original = float_inject(&mut types, value);
            let json = serializer.serialize(&original).expect("serialize");
            let restored = serializer.deserialize(&json, &mut TypeFactory::new()).expect("deserialize");
            assert_eq!(restored, original, "{value}");
        }
    }

    #[test]
    fn nan_float_survives_a_round_trip() {
        let serializer = ContainerDefinitionSerializer::new();
        let mut types = TypeFactory::new();
        let json = serializer
            .serialize(&float_inject(&mut types, f64::NAN))
            .expect("serialize");
        assert!(json.contains("\"NAN\""), "{json}");
        let restored = serializer.deserialize(&json, &mut TypeFactory::new()).expect("deserialize");
        assert!(
            matches!(restored.inject_definitions()[0].value(), InjectValue::Float(f) if f.is_nan()),
            "got: {:?}",
            restored.inject_definitions()[0].value()
        );
    }

    #[test]
    fn unknown_float_tag_is_rejected() {
        let value: std::result::Result<SerializedInjectValue, _> =
            serde_json::from_str(r#"{"kind": "float", "value": "HUGE"}"#);
        assert!(value.is_err());
        let value: SerializedInjectValue =
            serde_json::from_str(r#"{"kind": "float", "value": "-INF"}"#).expect("parse");
        assert_eq!(value, SerializedInjectValue::Float(f64::NEG_INFINITY));
    }

    #[test]
    fn malformed_document_is_a_serialization_error() {
        let mut types = TypeFactory::new();
        let err = ContainerDefinitionSerializer::new()
            .deserialize("{\"services\": []}", &mut types)
            .unwrap_err();
        assert!(matches!(err, WireplanError::Serialization { .. }));
    }
}

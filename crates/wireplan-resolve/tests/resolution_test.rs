//! Integration tests for the resolution engine.
//!
//! These tests drive a whole container definition through:
//! 1. Logical constraint checks
//! 2. Container factory state construction for several profile sets
//! 3. Construction plans and instantiation order

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;

use wireplan_common::error::WireplanError;
use wireplan_definition::alias::AliasDefinition;
use wireplan_definition::attribute::ServiceDelegateAttribute;
use wireplan_definition::container::ContainerDefinition;
use wireplan_definition::delegate::ServiceDelegateDefinition;
use wireplan_definition::inject::{InjectDefinitionBuilder, InjectValue};
use wireplan_definition::prepare::ServicePrepareDefinition;
use wireplan_definition::profiles::Profiles;
use wireplan_definition::provider::{DefinitionProvider, DefinitionProviderContext, apply_provider};
use wireplan_definition::service::ServiceDefinitionBuilder;
use wireplan_definition::types::{Type, TypeFactory};
use wireplan_resolve::alias::{AliasResolutionReason, StandardAliasDefinitionResolver};
use wireplan_resolve::introspect::ClassCatalog;
use wireplan_resolve::logical::{LogicalConstraintValidator, Severity};
use wireplan_resolve::parameter_store::{MapParameterStore, ParameterStore, parameter_store_map};
use wireplan_resolve::plan::ServiceProvider;
use wireplan_resolve::state::ContainerFactoryState;
use wireplan_resolve::value::ResolvedInjectValue;

struct App {
    types: TypeFactory,
    definition: ContainerDefinition,
}

impl App {
    fn ty(&mut self, name: &str) -> Type {
        self.types.class(name).expect("class")
    }

    fn state(&self, profiles: &[&str]) -> Result<ContainerFactoryState, WireplanError> {
        let stores = parameter_store_map([Arc::new(
            MapParameterStore::new("config").with_value("db.dsn", "postgres://app"),
        ) as Arc<dyn ParameterStore>]);
        ContainerFactoryState::new(
            &self.definition,
            Profiles::from_list(profiles.iter().copied()).expect("profiles"),
            Arc::new(StandardAliasDefinitionResolver),
            stores,
            &ClassCatalog::from_definition(&self.definition),
        )
    }
}

/// Registers the HTTP client, which the analyzer cannot see.
struct VendorProvider;

impl DefinitionProvider for VendorProvider {
    fn identity(&self) -> &str {
        "vendor"
    }

    fn consume(
        &self,
        context: &mut DefinitionProviderContext,
        types: &mut TypeFactory,
    ) -> wireplan_common::error::Result<()> {
        let client = types.class("Vendor\\HttpClient")?;
        context.service(client.clone(), Some("http"), &[], false)?;
        context.service_delegate(client, types.class("Vendor\\HttpClientFactory")?, "create")?;
        Ok(())
    }
}

/// A small application:
///
/// - `App\Logger` is abstract, implemented by `App\FileLogger` (primary)
///   and `App\NullLogger` (test only).
/// - `App\Repository` takes a store-backed DSN.
/// - `App\Controller` takes the logger, the repository, and a
///   profile-dependent page size.
fn app() -> App {
    let mut types = TypeFactory::new();
    let logger = types.class("App\\Logger").expect("class");
    let file_logger = types.class("App\\FileLogger").expect("class");
    let null_logger = types.class("App\\NullLogger").expect("class");
    let repository = types.class("App\\Repository").expect("class");
    let controller = types.class("App\\Controller").expect("class");

    let page_size = |value: i64, profiles: &[&str]| {
        InjectDefinitionBuilder::for_service(controller.clone())
            .with_constructor_parameter("pageSize", types.int())
            .with_value(value)
            .with_profiles(profiles.iter().copied())
            .build()
            .expect("inject")
    };

    let definition = ContainerDefinition::builder()
        .with_service_definition(
            ServiceDefinitionBuilder::for_abstract(logger.clone()).build().expect("svc"),
        )
        .with_service_definition(
            ServiceDefinitionBuilder::for_concrete(file_logger.clone())
                .primary()
                .build()
                .expect("svc"),
        )
        .with_service_definition(
            ServiceDefinitionBuilder::for_concrete(null_logger.clone())
                .with_profiles(["test"])
                .build()
                .expect("svc"),
        )
        .with_service_definition(
            ServiceDefinitionBuilder::for_concrete(repository.clone()).build().expect("svc"),
        )
        .with_service_definition(
            ServiceDefinitionBuilder::for_concrete(controller.clone()).build().expect("svc"),
        )
        .with_alias_definition(AliasDefinition::new(logger.clone(), file_logger))
        .with_alias_definition(AliasDefinition::new(logger.clone(), null_logger))
        .with_inject_definition(
            InjectDefinitionBuilder::for_service(repository.clone())
                .with_constructor_parameter("dsn", types.string())
                .with_value("db.dsn")
                .with_store("config")
                .build()
                .expect("inject"),
        )
        .with_inject_definition(
            InjectDefinitionBuilder::for_service(controller.clone())
                .with_constructor_parameter("logger", logger.clone())
                .with_value("App\\Logger")
                .build()
                .expect("inject"),
        )
        .with_inject_definition(
            InjectDefinitionBuilder::for_service(controller.clone())
                .with_constructor_parameter("repository", repository)
                .with_value("App\\Repository")
                .build()
                .expect("inject"),
        )
        .with_inject_definition(page_size(10, &[]))
        .with_inject_definition(page_size(50, &["prod"]))
        .with_inject_definition(page_size(1, &["test"]))
        .build();

    App { types, definition }
}

// ── Logical checks ───────────────────────────────────────────────────

#[test]
fn well_formed_application_has_no_violations() {
    let app = app();
    let violations =
        LogicalConstraintValidator::default().validate(&app.definition, &Profiles::default_only());
    assert!(violations.is_empty(), "{violations:?}");
}

#[test]
fn two_attributed_delegates_yield_one_warning_in_declaration_order() {
    let mut app = app();
    let client = app.ty("App\\Client");
    let first = app.ty("App\\ClientFactory");
    let second = app.ty("App\\LegacyClientFactory");
    app.definition = app
        .definition
        .to_builder()
        .with_service_definition(
            ServiceDefinitionBuilder::for_concrete(client.clone()).build().expect("svc"),
        )
        .with_service_delegate_definition(
            ServiceDelegateDefinition::new(client.clone(), first, "create")
                .expect("delegate")
                .with_attribute(ServiceDelegateAttribute::default()),
        )
        .with_service_delegate_definition(
            ServiceDelegateDefinition::new(client, second, "make")
                .expect("delegate")
                .with_attribute(ServiceDelegateAttribute::default()),
        )
        .build();

    let violations =
        LogicalConstraintValidator::default().validate(&app.definition, &Profiles::default_only());
    assert_eq!(violations.len(), 1);
    let warning = violations.with_severity(Severity::Warning)[0];
    let message = warning.message();
    let first_at = message
        .find("- App\\ClientFactory::create attributed with ServiceDelegate")
        .expect("first origin");
    let second_at = message
        .find("- App\\LegacyClientFactory::make attributed with ServiceDelegate")
        .expect("second origin");
    assert!(first_at < second_at, "got: {message}");
    assert!(!violations.has_critical());
}

// ── Factory state ────────────────────────────────────────────────────

#[test]
fn primary_implementation_wins_when_both_loggers_are_active() {
    let mut app = app();
    let logger = app.ty("App\\Logger");

    let default = app.state(&["default"]).expect("state");
    let resolution = default.resolve_alias_definition_for_abstract_service(&logger);
    assert_eq!(resolution.reason(), AliasResolutionReason::SingleConcreteService);

    let test = app.state(&["test"]).expect("state");
    let resolution = test.resolve_alias_definition_for_abstract_service(&logger);
    assert_eq!(resolution.reason(), AliasResolutionReason::ConcreteServiceIsPrimary);
    assert_eq!(resolution.concrete_service().map(Type::name), Some("App\\FileLogger"));
}

#[test]
fn injects_follow_the_active_profiles() {
    let mut app = app();
    let controller = app.ty("App\\Controller");
    let page_size = |state: &ContainerFactoryState| {
        state
            .constructor_inject_definitions_for_service_definition(&controller)
            .iter()
            .find(|i| i.parameter_name() == "pageSize")
            .map(|i| i.definition().value().clone())
    };

    assert_eq!(page_size(&app.state(&["default"]).expect("state")), Some(InjectValue::Int(10)));
    assert_eq!(page_size(&app.state(&["prod"]).expect("state")), Some(InjectValue::Int(50)));
    assert_eq!(page_size(&app.state(&["test"]).expect("state")), Some(InjectValue::Int(1)));
    assert!(matches!(
        app.state(&["prod", "test"]),
        Err(WireplanError::MultipleInjectOnSameParameter { .. })
    ));
}

#[test]
fn class_typed_injects_reference_services_and_stores_are_fetched() {
    let mut app = app();
    let controller = app.ty("App\\Controller");
    let repository = app.ty("App\\Repository");
    let state = app.state(&["prod"]).expect("state");

    let injects = state.constructor_inject_definitions_for_service_definition(&controller);
    let names: Vec<&str> = injects.iter().map(|i| i.parameter_name()).collect();
    assert_eq!(names, vec!["logger", "repository", "pageSize"]);
    assert!(matches!(
        injects[0].value(),
        ResolvedInjectValue::ContainerReference(ty) if ty.name() == "App\\Logger"
    ));

    let dsn = &state.constructor_inject_definitions_for_service_definition(&repository)[0];
    assert_eq!(
        state.fetch_parameter_store_value(dsn).expect("fetch"),
        Some(InjectValue::String("postgres://app".into()))
    );
    assert_eq!(state.fetch_parameter_store_value(&injects[0]).expect("fetch"), None);
}

#[test]
fn instantiation_order_puts_dependencies_first() {
    let app = app();
    let state = app.state(&["default"]).expect("state");
    let order: Vec<String> = state
        .instantiation_order()
        .expect("order")
        .iter()
        .map(ToString::to_string)
        .collect();
    let pos = |name: &str| order.iter().position(|n| n == name).expect(name);
    assert_eq!(order.len(), 4);
    assert!(pos("App\\FileLogger") < pos("App\\Logger"));
    assert!(pos("App\\Logger") < pos("App\\Controller"));
    assert!(pos("App\\Repository") < pos("App\\Controller"));
}

#[test]
fn circular_references_are_reported() {
    let mut app = app();
    let repository = app.ty("App\\Repository");
    let controller = app.ty("App\\Controller");
    app.definition = app
        .definition
        .to_builder()
        .with_service_prepare_definition(
            ServicePrepareDefinition::new(repository.clone(), "setController").expect("prepare"),
        )
        .with_inject_definition(
            InjectDefinitionBuilder::for_service(repository)
                .with_method("setController", "controller", controller)
                .with_value("App\\Controller")
                .build()
                .expect("inject"),
        )
        .build();

    let state = app.state(&["default"]).expect("state");
    let err = state.instantiation_order().unwrap_err();
    assert!(
        matches!(
            &err,
            WireplanError::CircularDependency { services }
                if services.contains(&"App\\Controller".to_owned())
                    && services.contains(&"App\\Repository".to_owned())
        ),
        "got: {err}"
    );
}

// ── Definition providers ─────────────────────────────────────────────

#[test]
fn provider_services_get_delegate_plans() {
    let mut app = app();
    let extended =
        apply_provider(&app.definition, &VendorProvider, &mut app.types).expect("provider");
    let client = app.ty("Vendor\\HttpClient");
    app.definition = extended;

    let state = app.state(&["default"]).expect("state");
    let plan = state.construction_plan(&client).expect("plan");
    let ServiceProvider::Delegate(delegate) = &plan.provider else {
        panic!("expected delegate provider, got {:?}", plan.provider);
    };
    assert_eq!(delegate.delegate_type().name(), "Vendor\\HttpClientFactory");
    assert_eq!(delegate.origin().to_string(), "added with service_delegate()");
    assert_eq!(plan.service.name(), Some("http"));
}

//! Tests for configuration-driven registration

#![cfg(feature = "config")]

use portico_di::config::ContainerConfig;
use portico_di::prelude::*;
use portico_di::registry::ServiceRegistry;
use std::sync::Arc;

#[derive(Debug)]
struct Notifier {
    channel: &'static str,
}

fn registry() -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();
    registry.register_factory("Notifier", |_: &Container| Notifier { channel: "email" });
    registry
}

#[test]
fn test_configured_bindings() {
    let config = ContainerConfig::from_toml(
        r#"
        [[bindings]]
        service_type = "Notifier"
        lifetime = "singleton"

        [[bindings]]
        service_type = "Notifier"
        name = "urgent"
        lifetime = "transient"

        [bindings.metadata.ExportMetadata]
        ContractName = "urgent"
        "#,
    )
    .unwrap();

    let mut builder = ContainerBuilder::new();
    config.apply_to_builder(&registry(), &mut builder).unwrap();
    let container = builder.build();

    let unnamed = container.resolve_arc::<Notifier>().unwrap();
    assert_eq!(unnamed.channel, "email");
    assert!(Arc::ptr_eq(&unnamed, &container.resolve_arc::<Notifier>().unwrap()));

    let urgent = container.resolve_named::<Notifier>("urgent").unwrap();
    assert!(!Arc::ptr_eq(&urgent, &container.resolve_named::<Notifier>("urgent").unwrap()));

    let bindings = container.bindings(std::any::TypeId::of::<Notifier>());
    assert_eq!(bindings.len(), 2);
    let metadata = bindings[1]
        .metadata()
        .get::<serde_json::Value>("ExportMetadata")
        .unwrap();
    assert_eq!(metadata["ContractName"], "urgent");
}

#[test]
fn test_unknown_type_leaves_builder_untouched() {
    let config = ContainerConfig::from_json(
        r#"{ "bindings": [
            { "service_type": "Notifier", "lifetime": "singleton" },
            { "service_type": "Pager", "lifetime": "singleton" }
        ] }"#,
    )
    .unwrap();

    let mut builder = ContainerBuilder::new();
    let result = config.apply_to_builder(&registry(), &mut builder);
    assert!(matches!(result, Err(DiError::ConfigError(_))));

    let container = builder.build();
    assert!(!container.has_service::<Notifier>());
}

//! Exports of bindings declared in configuration

use portico_di::config::ContainerConfig;
use portico_di::prelude::*;
use portico_di::registry::ServiceRegistry;
use portico_exports::prelude::*;
use portico_exports::metadata_view;

#[derive(Debug)]
struct Channel {
    kind: &'static str,
}

metadata_view! {
    #[derive(Debug)]
    struct ChannelView {
        contract: String = "ContractName";
        priority: u32 = "Priority" or 0;
    }
}

fn provider(config: &str) -> ExportProvider<Container> {
    let mut registry = ServiceRegistry::new();
    registry.register_factory("Email", |_: &Container| Channel { kind: "email" });
    registry.register_factory("Sms", |_: &Container| Channel { kind: "sms" });

    let mut builder = ContainerBuilder::new();
    ContainerConfig::from_json(config)
        .unwrap()
        .apply_to_builder(&registry, &mut builder)
        .unwrap();
    ExportProvider::with_views(builder.build(), ViewRegistry::new().with::<ChannelView>())
}

#[test]
fn test_configured_export_metadata() {
    let provider = provider(
        r#"{
            "bindings": [
                {
                    "service_type": "Email",
                    "name": "alerts",
                    "lifetime": "singleton",
                    "metadata": { "ExportMetadata": { "ContractName": "alerts", "Priority": 2 } }
                },
                {
                    "service_type": "Sms",
                    "name": "alerts",
                    "lifetime": "transient",
                    "metadata": { "ExportMetadata": { "ContractName": "alerts" } }
                }
            ]
        }"#,
    );

    let exports = provider
        .get_exports_with_view::<Channel, ChannelView>(Some("alerts"))
        .unwrap();
    assert_eq!(exports.len(), 2);

    assert_eq!(exports[0].metadata().contract, "alerts");
    assert_eq!(exports[0].metadata().priority, 2);
    assert_eq!(exports[0].value().unwrap().kind, "email");

    assert_eq!(exports[1].metadata().priority, 0);
    assert_eq!(exports[1].value().unwrap().kind, "sms");
}

#[test]
fn test_configured_binding_without_metadata() {
    let provider = provider(
        r#"{ "bindings": [ { "service_type": "Email", "lifetime": "transient" } ] }"#,
    );

    let exports = provider.get_exports::<Channel>(None).unwrap();
    assert_eq!(exports.len(), 1);
    assert!(exports[0].metadata().is_empty());
    assert_eq!(provider.get_exported_value::<Channel>(None).unwrap().kind, "email");
}

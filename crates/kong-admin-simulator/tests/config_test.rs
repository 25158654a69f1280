// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Simulator configuration: cascading deletes, config update mode, custom schemas.

mod common;

use std::io::Write;

use common::{create_consumer, create_route, route_plugins, simulator_with};
use kong_admin_sdk::{
    ConsumerAdmin, KeyAuthFields, KongAdmin, PluginAdmin, PluginConfigFields, ResourceAdmin,
};
use kong_admin_simulator::{
    ConfigError, ConfigUpdateMode, KongAdminSimulator, PluginSchemaRegistry, SimulatorConfig,
};
use serde_json::json;
use tempfile::NamedTempFile;

#[test]
fn test_cascade_route_delete() {
    let admin = simulator_with(SimulatorConfig::new().with_cascade_deletes(true));
    let route = create_route(&admin, "svc1");
    let other = create_route(&admin, "svc2");
    route_plugins(&admin, &route)
        .create(PluginConfigFields::new("cors"))
        .unwrap();
    route_plugins(&admin, &other)
        .create(PluginConfigFields::new("cors"))
        .unwrap();

    admin.routes().delete("svc1").unwrap();

    let survivors = route_plugins(&admin, &other);
    assert_eq!(survivors.count().unwrap(), 1);
    // Re-creating the route starts with no plugins.
    let route = create_route(&admin, "svc1");
    assert_eq!(route_plugins(&admin, &route).count().unwrap(), 0);
}

#[test]
fn test_cascade_consumer_delete() {
    let admin = simulator_with(SimulatorConfig::new().with_cascade_deletes(true));
    let route = create_route(&admin, "svc1");
    let consumer = create_consumer(&admin, "abc1234");
    let plugins = route_plugins(&admin, &route);
    plugins.create(PluginConfigFields::new("acl")).unwrap();
    plugins
        .create(PluginConfigFields::new("acl").with_consumer_id(&consumer.id))
        .unwrap();
    let keys = admin.consumers().key_auth("abc1234").unwrap();
    keys.create(KeyAuthFields::new().with_key("k1")).unwrap();

    admin.consumers().delete(&consumer.id).unwrap();

    assert_eq!(keys.count().unwrap(), 0);
    assert_eq!(plugins.count().unwrap(), 1);
    assert!(plugins.retrieve("acl").unwrap().consumer_id.is_none());

    // The key is free again.
    create_consumer(&admin, "def5678");
    admin
        .consumers()
        .key_auth("def5678")
        .unwrap()
        .create(KeyAuthFields::new().with_key("k1"))
        .unwrap();
}

#[test]
fn test_replace_config_update_mode() {
    let admin =
        simulator_with(SimulatorConfig::new().with_config_update(ConfigUpdateMode::Replace));
    let route = create_route(&admin, "svc1");
    let plugins = route_plugins(&admin, &route);
    let plugin = plugins
        .create(
            PluginConfigFields::new("rate-limiting")
                .with_config("second", 5)
                .with_config("minute", 20),
        )
        .unwrap();

    let updated = plugins
        .update(&plugin.id, PluginConfigFields::default().with_config("hour", 100))
        .unwrap();
    assert_eq!(serde_json::Value::Object(updated.config), json!({"hour": 100}));

    let updated = plugins
        .update(&plugin.id, PluginConfigFields::default().with_enabled(false))
        .unwrap();
    assert_eq!(serde_json::Value::Object(updated.config), json!({"hour": 100}));
    assert!(!updated.enabled);
}

#[test]
fn test_plugin_schemas_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "{}",
        json!({
            "audit": {"fields": {"level": {"type": "string"}, "sample": {"type": "number"}}},
            "cors": {"fields": {"origin": {"type": "string"}}},
        })
    )
    .unwrap();

    let admin = simulator_with(SimulatorConfig::new().with_plugin_schemas(file.path()));
    assert_eq!(
        admin.plugins().list().unwrap().enabled_plugins,
        vec!["audit", "cors"]
    );

    let route = create_route(&admin, "svc1");
    let plugins = route_plugins(&admin, &route);
    plugins
        .create(PluginConfigFields::new("audit").with_config("level", "debug"))
        .unwrap();
    assert!(
        plugins
            .create(PluginConfigFields::new("rate-limiting"))
            .unwrap_err()
            .is_invalid_argument()
    );
}

#[test]
fn test_plugin_schema_file_errors() {
    let missing = SimulatorConfig::new().with_plugin_schemas("/nonexistent/schemas.json");
    assert!(matches!(
        KongAdminSimulator::with_config(missing),
        Err(ConfigError::PluginSchemas { .. })
    ));

    let mut file = NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    let err = PluginSchemaRegistry::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid plugin schema file"));
}

#[test]
fn test_simulator_exposes_config() {
    let admin = simulator_with(SimulatorConfig::new().with_cascade_deletes(true));
    assert!(admin.config().cascade_deletes);
    assert_eq!(admin.schemas().len(), 16);
    assert_eq!(KongAdminSimulator::default().config().max_page_size, 1000);
}

#[test]
fn test_with_config_rejects_oversized_default_window() {
    let config = SimulatorConfig::new()
        .with_default_window_size(5000)
        .with_max_page_size(1000);
    assert!(matches!(
        KongAdminSimulator::with_config(config),
        Err(ConfigError::WindowSize {
            size: 5000,
            max: 1000
        })
    ));

    let config = SimulatorConfig::new().with_default_window_size(0);
    assert!(KongAdminSimulator::with_config(config).is_err());
}

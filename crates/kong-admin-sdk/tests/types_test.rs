// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Serialization and builder tests for kong-admin-sdk.

use chrono::{TimeZone, Utc};
use kong_admin_sdk::{
    ConsumerFields, EnabledPlugins, FieldKind, Filters, KeyAuthFields, ListOptions, OAuth2Fields,
    Page, PluginConfigFields, PluginConfiguration, PluginSchema, Route, RouteFields,
};
use serde_json::{Map, Value, json};

fn sample_route() -> Route {
    Route {
        id: "r-1".to_string(),
        created_at: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
        name: Some("svc1".to_string()),
        upstream_url: "http://x".to_string(),
        inbound_dns: Some("svc1.example.com".to_string()),
        path: None,
        strip_path: false,
    }
}

#[test]
fn test_route_serialization_omits_unset_fields() {
    let value = serde_json::to_value(sample_route()).unwrap();

    assert_eq!(value["id"], "r-1");
    assert_eq!(value["created_at"], 1_700_000_000_123_i64);
    assert_eq!(value["name"], "svc1");
    assert!(value.get("path").is_none());
}

#[test]
fn test_route_deserialization() {
    let route: Route = serde_json::from_value(json!({
        "id": "r-1",
        "created_at": 1_700_000_000_123_i64,
        "name": "svc1",
        "upstream_url": "http://x",
        "inbound_dns": "svc1.example.com",
    }))
    .unwrap();

    assert_eq!(route, sample_route());
}

#[test]
fn test_plugin_configuration_wire_names() {
    let plugin = PluginConfiguration {
        id: "p-1".to_string(),
        created_at: Utc.timestamp_millis_opt(0).unwrap(),
        route_id: "r-1".to_string(),
        consumer_id: None,
        plugin_name: "rate-limiting".to_string(),
        enabled: true,
        config: Map::new(),
    };
    let value = serde_json::to_value(&plugin).unwrap();

    assert_eq!(value["api_id"], "r-1");
    assert_eq!(value["name"], "rate-limiting");
    assert!(value.get("consumer_id").is_none());
    assert!(value.get("route_id").is_none());
}

#[test]
fn test_route_fields_builder() {
    let fields = RouteFields::new("http://x")
        .with_name("svc1")
        .with_path("/svc")
        .with_strip_path(true)
        .with_upstream_url("https://y");

    assert_eq!(fields.upstream_url.as_deref(), Some("https://y"));
    assert_eq!(fields.name.as_deref(), Some("svc1"));
    assert_eq!(fields.path.as_deref(), Some("/svc"));
    assert_eq!(fields.strip_path, Some(true));
    assert!(fields.inbound_dns.is_none());
}

#[test]
fn test_plugin_config_fields_keep_config_apart() {
    let fields = PluginConfigFields::new("rate-limiting")
        .with_enabled(false)
        .with_config("second", 20)
        .with_config("name", "not-the-plugin");

    assert_eq!(fields.name.as_deref(), Some("rate-limiting"));
    assert_eq!(fields.config["second"], 20);
    assert_eq!(fields.config["name"], "not-the-plugin");
}

#[test]
fn test_fields_from_json() {
    let fields = ConsumerFields::try_from(json!({"username": "abc1234"})).unwrap();
    assert_eq!(fields, ConsumerFields::new().with_username("abc1234"));

    let fields = PluginConfigFields::try_from(json!({
        "name": "cors",
        "config": {"origin": "*"},
    }))
    .unwrap();
    assert_eq!(fields.config["origin"], "*");

    assert!(KeyAuthFields::try_from(json!({"key": "k", "secret": "s"})).is_err());
    assert!(OAuth2Fields::try_from(json!({"name": 5})).is_err());
}

#[test]
fn test_field_kind_accepts() {
    assert!(FieldKind::Number.accepts(&json!(20)));
    assert!(!FieldKind::Number.accepts(&json!("20")));
    assert!(FieldKind::String.accepts(&json!("x")));
    assert!(FieldKind::Boolean.accepts(&json!(false)));
    assert!(FieldKind::Array.accepts(&json!(["GET"])));
    assert!(FieldKind::Table.accepts(&json!({"headers": []})));
    assert!(!FieldKind::Table.accepts(&json!([])));
    assert!(FieldKind::Any.accepts(&json!([1, "two"])));

    for kind in [FieldKind::String, FieldKind::Number, FieldKind::Table] {
        assert!(kind.accepts(&Value::Null));
    }
}

#[test]
fn test_plugin_schema_json_shape() {
    let schema: PluginSchema = serde_json::from_value(json!({
        "fields": {"second": {"type": "number"}, "anything": {}}
    }))
    .unwrap();

    assert!(schema.declares("second"));
    assert!(!schema.declares("weekly"));
    assert_eq!(schema.fields["anything"].kind, FieldKind::Any);
    assert_eq!(
        serde_json::to_value(&schema).unwrap()["fields"]["second"]["type"],
        "number"
    );
}

#[test]
fn test_enabled_plugins_shape() {
    let plugins = EnabledPlugins {
        enabled_plugins: vec!["acl".to_string(), "cors".to_string()],
    };
    assert_eq!(
        serde_json::to_value(&plugins).unwrap(),
        json!({"enabled_plugins": ["acl", "cors"]})
    );
}

#[test]
fn test_list_options_defaults_and_builders() {
    let options = ListOptions::default();
    assert_eq!(options.size, 100);
    assert!(options.offset.is_none());
    assert!(options.filters.is_empty());

    let options = ListOptions::new()
        .with_size(3)
        .with_offset("tok")
        .with_filter("name", "svc1");
    assert_eq!(options.size, 3);
    assert_eq!(options.offset.as_deref(), Some("tok"));
    assert_eq!(options.filters, Filters::new().with("name", "svc1"));
}

#[test]
fn test_filters_first_unknown() {
    let filters = Filters::new().with("name", "a").with("color", "red");
    assert_eq!(filters.first_unknown(&["id", "name"]), Some("color"));
    assert_eq!(filters.first_unknown(&["name", "color"]), None);
    assert_eq!(Filters::new().first_unknown(&[]), None);
}

#[test]
fn test_empty_page() {
    let page: Page<Route> = Page::empty(7);
    assert!(page.data.is_empty());
    assert!(page.next.is_none());
    assert_eq!(page.total, 7);
}

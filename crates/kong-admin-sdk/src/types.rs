// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Records and input fields for the gateway admin resources.
//!
//! Records are what the admin API returns; field structs are what callers
//! send. Field structs keep every attribute optional so one struct serves
//! both `create` (required attributes checked by the implementation) and
//! partial `update` (only supplied attributes change).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AdminError;

// ============================================================================
// Records
// ============================================================================

/// A route definition ("API"): an upstream target plus routing rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Unique route ID, assigned on creation.
    pub id: String,
    /// When the route was created.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Optional unique name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Target the gateway proxies to.
    pub upstream_url: String,
    /// Optional unique host the route is matched on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_dns: Option<String>,
    /// Optional request path prefix the route is matched on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Strip the matched path before proxying.
    #[serde(default)]
    pub strip_path: bool,
}

/// An identity on whose behalf requests are authenticated and rate-limited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumer {
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
}

/// A plugin attached to a route, optionally scoped to one consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfiguration {
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Owning route.
    #[serde(rename = "api_id")]
    pub route_id: String,
    /// Consumer override scope; `None` for the route-global configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_id: Option<String>,
    /// Registered plugin name (e.g. `rate-limiting`).
    #[serde(rename = "name")]
    pub plugin_name: String,
    pub enabled: bool,
    /// Plugin-specific settings, keyed by schema field name.
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// Basic-auth credential owned by a consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicAuthCredential {
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub consumer_id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// API-key credential owned by a consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyAuthCredential {
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub consumer_id: String,
    pub key: String,
}

/// OAuth2 application registered for a consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuth2Credential {
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub consumer_id: String,
    pub name: String,
    pub redirect_uri: String,
    pub client_id: String,
    pub client_secret: String,
}

// ============================================================================
// Input fields
// ============================================================================

/// Attributes of a route for `create` and partial `update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_dns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_path: Option<bool>,
}

impl RouteFields {
    /// Create route fields targeting the given upstream.
    pub fn new(upstream_url: impl Into<String>) -> Self {
        Self {
            upstream_url: Some(upstream_url.into()),
            ..Self::default()
        }
    }

    /// Set the upstream URL.
    pub fn with_upstream_url(mut self, upstream_url: impl Into<String>) -> Self {
        self.upstream_url = Some(upstream_url.into());
        self
    }

    /// Set the unique route name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the inbound host.
    pub fn with_inbound_dns(mut self, inbound_dns: impl Into<String>) -> Self {
        self.inbound_dns = Some(inbound_dns.into());
        self
    }

    /// Set the request path prefix.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Enable or disable path stripping.
    pub fn with_strip_path(mut self, strip_path: bool) -> Self {
        self.strip_path = Some(strip_path);
        self
    }
}

/// Attributes of a consumer for `create` and partial `update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumerFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
}

impl ConsumerFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }
}

/// Attributes of a plugin configuration.
///
/// `config` carries plugin-specific settings and is validated against the
/// plugin's schema; it is kept apart from the configuration's own attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginConfigFields {
    /// Plugin name; required on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_id: Option<String>,
    /// Defaults to `true` on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub config: Map<String, Value>,
}

impl PluginConfigFields {
    /// Create fields for the named plugin.
    pub fn new(plugin_name: impl Into<String>) -> Self {
        Self {
            name: Some(plugin_name.into()),
            ..Self::default()
        }
    }

    /// Scope the configuration to a single consumer.
    pub fn with_consumer_id(mut self, consumer_id: impl Into<String>) -> Self {
        self.consumer_id = Some(consumer_id.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Set one plugin config value.
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }
}

/// Attributes of a basic-auth credential.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BasicAuthFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl BasicAuthFields {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

/// Attributes of a key-auth credential. The key is generated when omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyAuthFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl KeyAuthFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Attributes of an OAuth2 application.
///
/// `client_id` and `client_secret` are generated when omitted on create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OAuth2Fields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl OAuth2Fields {
    pub fn new(name: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            redirect_uri: Some(redirect_uri.into()),
            ..Self::default()
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }
}

// Decoding an untyped payload rejects unrecognized keys as InvalidArgument.
macro_rules! fields_from_json {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = AdminError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    Ok(serde_json::from_value(value)?)
                }
            }
        )+
    };
}

fields_from_json!(
    RouteFields,
    ConsumerFields,
    PluginConfigFields,
    BasicAuthFields,
    KeyAuthFields,
    OAuth2Fields,
);

// ============================================================================
// Plugin catalog
// ============================================================================

/// Plugins available on the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledPlugins {
    pub enabled_plugins: Vec<String>,
}

/// Accepted configuration fields of one plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSchema {
    pub fields: BTreeMap<String, SchemaField>,
}

impl PluginSchema {
    /// Check whether the schema declares a field.
    pub fn declares(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}

/// Declaration of a single plugin config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
}

/// Value type accepted by a plugin config field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Array,
    Table,
    #[default]
    Any,
}

impl FieldKind {
    /// Check whether a value fits this kind. `null` fits every kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) | (FieldKind::Any, _) => true,
            (FieldKind::String, Value::String(_)) => true,
            (FieldKind::Number, Value::Number(_)) => true,
            (FieldKind::Boolean, Value::Bool(_)) => true,
            (FieldKind::Array, Value::Array(_)) => true,
            (FieldKind::Table, Value::Object(_)) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Boolean => write!(f, "boolean"),
            FieldKind::Array => write!(f, "array"),
            FieldKind::Table => write!(f, "table"),
            FieldKind::Any => write!(f, "any"),
        }
    }
}

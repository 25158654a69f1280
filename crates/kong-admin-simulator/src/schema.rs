// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Plugin schema registry.
//!
//! Maps each plugin name to the config fields it accepts. The registry is
//! built once when the simulator is constructed and never changes afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use kong_admin_sdk::FieldKind::{Array, Boolean, Number, String as Text, Table};
use kong_admin_sdk::{AdminError, FieldKind, PluginSchema, Result, SchemaField};
use serde_json::{Map, Value};

use crate::config::ConfigError;

type FieldTable = &'static [(&'static str, FieldKind)];

const BUILTIN_PLUGINS: &[(&str, FieldTable)] = &[
    (
        "rate-limiting",
        &[
            ("second", Number),
            ("minute", Number),
            ("hour", Number),
            ("day", Number),
            ("month", Number),
            ("year", Number),
            ("async", Boolean),
            ("continue_on_error", Boolean),
        ],
    ),
    ("request-size-limiting", &[("allowed_payload_size", Number)]),
    (
        "key-auth",
        &[("key_names", Array), ("hide_credentials", Boolean)],
    ),
    ("basic-auth", &[("hide_credentials", Boolean)]),
    (
        "oauth2",
        &[
            ("scopes", Array),
            ("mandatory_scope", Boolean),
            ("provision_key", Text),
            ("token_expiration", Number),
            ("enable_authorization_code", Boolean),
            ("enable_implicit_grant", Boolean),
            ("enable_client_credentials", Boolean),
            ("enable_password_grant", Boolean),
            ("hide_credentials", Boolean),
            ("accept_http_if_already_terminated", Boolean),
        ],
    ),
    ("acl", &[("whitelist", Array), ("blacklist", Array)]),
    (
        "cors",
        &[
            ("origin", Text),
            ("methods", Array),
            ("headers", Array),
            ("exposed_headers", Array),
            ("credentials", Boolean),
            ("max_age", Number),
            ("preflight_continue", Boolean),
        ],
    ),
    ("file-log", &[("path", Text)]),
    (
        "http-log",
        &[
            ("http_endpoint", Text),
            ("method", Text),
            ("timeout", Number),
            ("keepalive", Number),
        ],
    ),
    (
        "tcp-log",
        &[
            ("host", Text),
            ("port", Number),
            ("timeout", Number),
            ("keepalive", Number),
        ],
    ),
    (
        "udp-log",
        &[("host", Text), ("port", Number), ("timeout", Number)],
    ),
    ("ip-restriction", &[("whitelist", Array), ("blacklist", Array)]),
    (
        "request-transformer",
        &[
            ("add", Table),
            ("remove", Table),
            ("replace", Table),
            ("append", Table),
        ],
    ),
    (
        "response-transformer",
        &[
            ("add", Table),
            ("remove", Table),
            ("replace", Table),
            ("append", Table),
        ],
    ),
    (
        "correlation-id",
        &[
            ("header_name", Text),
            ("generator", Text),
            ("echo_downstream", Boolean),
        ],
    ),
    (
        "ssl",
        &[
            ("cert", Text),
            ("key", Text),
            ("only_https", Boolean),
            ("accept_http_if_already_terminated", Boolean),
        ],
    ),
];

/// Read-only mapping from plugin name to its accepted config fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginSchemaRegistry {
    schemas: BTreeMap<String, PluginSchema>,
}

impl PluginSchemaRegistry {
    /// The classic gateway plugin set.
    pub fn builtin() -> Self {
        let schemas = BUILTIN_PLUGINS
            .iter()
            .map(|(name, fields)| {
                let fields = fields
                    .iter()
                    .map(|(field, kind)| (field.to_string(), SchemaField { kind: *kind }))
                    .collect();
                (name.to_string(), PluginSchema { fields })
            })
            .collect();
        Self { schemas }
    }

    pub fn from_schemas(schemas: BTreeMap<String, PluginSchema>) -> Self {
        Self { schemas }
    }

    /// Parse a registry from JSON shaped as `{ plugin: { fields: { field: { type } } } }`.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self::from_schemas)
    }

    /// Load a registry from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let invalid = |reason: String| ConfigError::PluginSchemas {
            path: path.to_path_buf(),
            reason,
        };

        let json = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        Self::from_json(&json).map_err(|e| invalid(e.to_string()))
    }

    /// Registered plugin names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.schemas.keys().cloned().collect()
    }

    pub fn get(&self, plugin_name: &str) -> Option<&PluginSchema> {
        self.schemas.get(plugin_name)
    }

    pub fn contains(&self, plugin_name: &str) -> bool {
        self.schemas.contains_key(plugin_name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Check a config map against a plugin's schema.
    ///
    /// Fails with `InvalidArgument` for an unregistered plugin, an undeclared
    /// key, or a value of the wrong type.
    pub fn validate(&self, plugin_name: &str, config: &Map<String, Value>) -> Result<()> {
        let schema = self
            .get(plugin_name)
            .ok_or_else(|| AdminError::invalid(format!("unknown plugin '{plugin_name}'")))?;

        for (key, value) in config {
            let field = schema.fields.get(key).ok_or_else(|| {
                AdminError::invalid(format!(
                    "config.{key}: field not declared by plugin '{plugin_name}'"
                ))
            })?;
            if !field.kind.accepts(value) {
                return Err(AdminError::invalid(format!(
                    "config.{key}: expected {}",
                    field.kind
                )));
            }
        }
        Ok(())
    }
}

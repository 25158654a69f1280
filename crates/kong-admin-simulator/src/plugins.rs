// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Plugin configurations and the plugin catalog.
//!
//! A route carries at most one configuration per plugin for every consumer
//! scope: one global configuration (`consumer_id` unset) plus one override per
//! consumer. The scope is enforced through a composite unique index over
//! `(route, plugin, consumer)`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kong_admin_sdk::{
    AdminError, EnabledPlugins, PluginAdmin, PluginConfigFields, PluginConfiguration,
    PluginSchema, Result,
};
use serde_json::{Map, Value};

use crate::config::ConfigUpdateMode;
use crate::resource::{ResourceKind, Stores};
use crate::store::{Entity, EntityStore, UniqueIndex};

fn scope_key(route_id: &str, plugin_name: &str, consumer_id: Option<&str>) -> String {
    format!("{route_id}:{plugin_name}:{}", consumer_id.unwrap_or(""))
}

impl Entity for PluginConfiguration {
    const KIND: &'static str = "plugin configuration";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn stamp(&mut self, id: String, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.clone()),
            "name" => Some(self.plugin_name.clone()),
            "api_id" => Some(self.route_id.clone()),
            "consumer_id" => self.consumer_id.clone(),
            _ => None,
        }
    }

    fn unique_indexes() -> Vec<UniqueIndex<Self>> {
        // Looking up by plugin name resolves the route-global configuration.
        vec![
            UniqueIndex::new("name", |p: &PluginConfiguration| {
                Some(scope_key(
                    &p.route_id,
                    &p.plugin_name,
                    p.consumer_id.as_deref(),
                ))
            })
            .lookup(),
        ]
    }
}

/// Plugin configurations of one route.
#[derive(Debug, Clone)]
pub struct PluginConfigKind {
    route_id: String,
}

impl PluginConfigKind {
    pub(crate) fn new(route_id: String) -> Self {
        Self { route_id }
    }
}

impl ResourceKind for PluginConfigKind {
    type Record = PluginConfiguration;
    type Fields = PluginConfigFields;

    const FILTERS: &'static [&'static str] = &["id", "name", "api_id", "consumer_id"];

    fn store(stores: &Stores) -> &EntityStore<PluginConfiguration> {
        &stores.plugins
    }

    fn build(&self, stores: &Stores, fields: PluginConfigFields) -> Result<PluginConfiguration> {
        let plugin_name = fields
            .name
            .ok_or_else(|| AdminError::invalid("plugin configuration requires 'name'"))?;
        stores.schemas.validate(&plugin_name, &fields.config)?;
        if let Some(consumer_id) = &fields.consumer_id {
            require_consumer(stores, consumer_id)?;
        }

        let mut config = fields.config;
        config.retain(|_, value| !value.is_null());

        Ok(PluginConfiguration {
            id: String::new(),
            created_at: Utc::now(),
            route_id: self.route_id.clone(),
            consumer_id: fields.consumer_id,
            plugin_name,
            enabled: fields.enabled.unwrap_or(true),
            config,
        })
    }

    fn apply(
        &self,
        stores: &Stores,
        plugin: &mut PluginConfiguration,
        fields: PluginConfigFields,
    ) -> Result<()> {
        if let Some(plugin_name) = fields.name {
            plugin.plugin_name = plugin_name;
        }
        stores.schemas.validate(&plugin.plugin_name, &fields.config)?;

        if let Some(consumer_id) = fields.consumer_id {
            require_consumer(stores, &consumer_id)?;
            plugin.consumer_id = Some(consumer_id);
        }
        if let Some(enabled) = fields.enabled {
            plugin.enabled = enabled;
        }
        update_config(&mut plugin.config, fields.config, stores.config.config_update);

        // A renamed plugin must still accept every stored key.
        stores.schemas.validate(&plugin.plugin_name, &plugin.config)
    }

    fn in_scope(&self, plugin: &PluginConfiguration) -> bool {
        plugin.route_id == self.route_id
    }

    fn alternate_key(&self, key: &str) -> Option<String> {
        Some(scope_key(&self.route_id, key, None))
    }

    fn check_owner(&self, stores: &Stores) -> Result<()> {
        stores.require_route(&self.route_id)
    }
}

fn require_consumer(stores: &Stores, consumer_id: &str) -> Result<()> {
    stores
        .require_consumer(consumer_id)
        .map_err(|_| AdminError::invalid(format!("consumer_id '{consumer_id}' does not exist")))
}

fn update_config(
    stored: &mut Map<String, Value>,
    supplied: Map<String, Value>,
    mode: ConfigUpdateMode,
) {
    match mode {
        ConfigUpdateMode::Merge => {
            for (key, value) in supplied {
                if value.is_null() {
                    stored.remove(&key);
                } else {
                    stored.insert(key, value);
                }
            }
        }
        ConfigUpdateMode::Replace if !supplied.is_empty() => {
            *stored = supplied
                .into_iter()
                .filter(|(_, value)| !value.is_null())
                .collect();
        }
        ConfigUpdateMode::Replace => {}
    }
}

/// Read-only plugin catalog of the simulator.
pub struct PluginCatalog {
    stores: Arc<Stores>,
}

impl PluginCatalog {
    pub(crate) fn new(stores: Arc<Stores>) -> Self {
        Self { stores }
    }
}

impl std::fmt::Debug for PluginCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginCatalog")
            .field("plugins", &self.stores.schemas.len())
            .finish()
    }
}

impl PluginAdmin for PluginCatalog {
    fn list(&self) -> Result<EnabledPlugins> {
        Ok(EnabledPlugins {
            enabled_plugins: self.stores.schemas.names(),
        })
    }

    fn retrieve_schema(&self, plugin_name: &str) -> Result<PluginSchema> {
        self.stores
            .schemas
            .get(plugin_name)
            .cloned()
            .ok_or_else(|| AdminError::not_found("plugin", plugin_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_merge_keeps_siblings_and_drops_nulls() {
        let mut stored = map(json!({"second": 5, "minute": 20}));
        update_config(
            &mut stored,
            map(json!({"second": 10, "minute": null})),
            ConfigUpdateMode::Merge,
        );
        assert_eq!(Value::Object(stored), json!({"second": 10}));
    }

    #[test]
    fn test_replace_swaps_whole_map() {
        let mut stored = map(json!({"second": 5, "minute": 20}));
        update_config(&mut stored, map(json!({"hour": 100})), ConfigUpdateMode::Replace);
        assert_eq!(Value::Object(stored.clone()), json!({"hour": 100}));

        update_config(&mut stored, Map::new(), ConfigUpdateMode::Replace);
        assert_eq!(Value::Object(stored), json!({"hour": 100}));
    }

    #[test]
    fn test_scope_key_separates_consumers() {
        assert_eq!(scope_key("r", "acl", None), "r:acl:");
        assert_ne!(scope_key("r", "acl", None), scope_key("r", "acl", Some("c")));
    }
}

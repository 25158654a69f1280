// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The simulator façade.

use std::sync::Arc;

use kong_admin_sdk::KongAdmin;
use tracing::{info, instrument};

use crate::config::{ConfigError, SimulatorConfig};
use crate::consumers::{ConsumerKind, Consumers};
use crate::plugins::PluginCatalog;
use crate::resource::{InMemoryAdmin, Stores};
use crate::routes::{RouteKind, Routes};
use crate::schema::PluginSchemaRegistry;

/// In-memory stand-in for the gateway admin API.
///
/// Implements [`KongAdmin`], so code written against the contract runs
/// against it unchanged. All state lives in memory and is dropped with the
/// simulator. Handles obtained from it share the same state and may be used
/// from several threads.
pub struct KongAdminSimulator {
    stores: Arc<Stores>,
    routes: Routes,
    consumers: Consumers,
    plugins: PluginCatalog,
}

impl KongAdminSimulator {
    /// Create a simulator with default settings and the built-in plugin schemas.
    pub fn new() -> Self {
        Self::with_registry(SimulatorConfig::default(), PluginSchemaRegistry::builtin())
    }

    /// Create a simulator, loading plugin schemas from the configured file if any.
    ///
    /// Fails when the configuration does not validate or the schema file
    /// cannot be loaded.
    pub fn with_config(config: SimulatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = match &config.plugin_schemas {
            Some(path) => PluginSchemaRegistry::from_file(path)?,
            None => PluginSchemaRegistry::builtin(),
        };
        Ok(Self::with_registry(config, registry))
    }

    /// Create a simulator configured from `KONG_SIMULATOR_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_config(SimulatorConfig::from_env()?)
    }

    /// Create a simulator with an explicit plugin schema registry.
    #[instrument(skip(config, registry), fields(plugins = registry.len()))]
    pub fn with_registry(config: SimulatorConfig, registry: PluginSchemaRegistry) -> Self {
        info!(
            cascade_deletes = config.cascade_deletes,
            config_update = %config.config_update,
            "Starting admin simulator"
        );

        let stores = Arc::new(Stores::new(config, registry));
        Self {
            routes: InMemoryAdmin::new(Arc::clone(&stores), RouteKind),
            consumers: InMemoryAdmin::new(Arc::clone(&stores), ConsumerKind),
            plugins: PluginCatalog::new(Arc::clone(&stores)),
            stores,
        }
    }

    /// Get the simulator configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.stores.config
    }

    /// Get the plugin schema registry.
    pub fn schemas(&self) -> &PluginSchemaRegistry {
        &self.stores.schemas
    }
}

impl Default for KongAdminSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KongAdminSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KongAdminSimulator")
            .field("config", &self.stores.config)
            .field("routes", &self.routes)
            .field("consumers", &self.consumers)
            .field("plugins", &self.plugins)
            .finish()
    }
}

impl KongAdmin for KongAdminSimulator {
    type Routes = Routes;
    type Consumers = Consumers;
    type Plugins = PluginCatalog;

    fn routes(&self) -> &Routes {
        &self.routes
    }

    fn consumers(&self) -> &Consumers {
        &self.consumers
    }

    fn plugins(&self) -> &PluginCatalog {
        &self.plugins
    }
}

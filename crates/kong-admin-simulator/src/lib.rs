// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Kong Admin Simulator
//!
//! In-memory engine reproducing the gateway admin API's resource semantics:
//! unique-key enforcement, cursor pagination, create-or-update, nested
//! sub-resources, and plugin configuration validation against a schema
//! registry.
//!
//! [`KongAdminSimulator`] implements the [`kong_admin_sdk::KongAdmin`]
//! contract, so a test suite written against the contract can run here
//! without a live gateway.
//!
//! # Example
//!
//! ```
//! use kong_admin_sdk::{
//!     ConsumerFields, KongAdmin, PluginConfigFields, ResourceAdmin, RouteAdmin, RouteFields,
//! };
//! use kong_admin_simulator::KongAdminSimulator;
//!
//! let admin = KongAdminSimulator::new();
//!
//! let route = admin
//!     .routes()
//!     .create(RouteFields::new("http://x").with_name("svc1").with_inbound_dns("svc1.example.com"))
//!     .unwrap();
//! admin.consumers().create(ConsumerFields::new().with_username("abc1234")).unwrap();
//!
//! let plugin = admin
//!     .routes()
//!     .plugins(&route.id)
//!     .unwrap()
//!     .create(
//!         PluginConfigFields::new("rate-limiting")
//!             .with_enabled(false)
//!             .with_config("second", 20),
//!     )
//!     .unwrap();
//! assert_eq!(plugin.config["second"], 20);
//! assert!(!plugin.enabled);
//! ```
//!
//! # Configuration
//!
//! See [`SimulatorConfig`] for cascading deletes, the plugin config update
//! mode, window sizes, and custom plugin schemas.

mod config;
mod consumers;
mod credentials;
mod cursor;
mod plugins;
mod resource;
mod routes;
mod schema;
mod simulator;
mod store;

pub use config::{ConfigError, ConfigUpdateMode, MAX_PAGE_SIZE, SimulatorConfig};
pub use consumers::{
    BasicAuthCredentials, ConsumerKind, Consumers, KeyAuthCredentials, OAuth2Credentials,
};
pub use credentials::{BasicAuthKind, KeyAuthKind, OAuth2Kind};
pub use cursor::{PaginationCursor, Position};
pub use plugins::{PluginCatalog, PluginConfigKind};
pub use resource::{InMemoryAdmin, ResourceKind, Stores};
pub use routes::{RouteKind, RoutePlugins, Routes};
pub use schema::PluginSchemaRegistry;
pub use simulator::KongAdminSimulator;
pub use store::{Entity, EntityStore, Selector, UniqueIndex};

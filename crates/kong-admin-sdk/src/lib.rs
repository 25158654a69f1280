// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Kong Admin SDK
//!
//! Transport-agnostic contract for the gateway administration API.
//!
//! This crate defines the records, input fields, list/pagination types, and
//! error kinds of the admin API, plus the traits every backend implements.
//! Code written against [`KongAdmin`] runs unchanged against the in-memory
//! simulator (`kong-admin-simulator`) or a remote transport client.
//!
//! # Resources
//!
//! - Routes ("APIs") with per-route plugin configurations
//! - Consumers with basic-auth, key-auth, and OAuth2 credentials
//! - A read-only plugin catalog
//!
//! # Example
//!
//! ```no_run
//! use kong_admin_sdk::{AdminError, KongAdmin, ResourceAdmin, RouteFields};
//!
//! fn ensure_route<A: KongAdmin>(admin: &A) -> kong_admin_sdk::Result<String> {
//!     let fields = RouteFields::new("http://upstream.internal")
//!         .with_name("svc1")
//!         .with_inbound_dns("svc1.example.com");
//!
//!     match admin.routes().create(fields.clone()) {
//!         Ok(route) => Ok(route.id),
//!         // Already there: fall back to an update keyed by name.
//!         Err(AdminError::Conflict { .. }) => Ok(admin.routes().update("svc1", fields)?.id),
//!         Err(err) => Err(err),
//!     }
//! }
//! ```

mod contract;
mod error;
mod query;
mod types;

pub use contract::{
    ConsumerAdmin, KongAdmin, PluginAdmin, PluginConfigAdmin, ResourceAdmin, RouteAdmin,
};
pub use error::{AdminError, ConflictField, Result};
pub use query::{DEFAULT_PAGE_SIZE, Filters, ListOptions, Page, Pages};
pub use types::{
    BasicAuthCredential, BasicAuthFields, Consumer, ConsumerFields, EnabledPlugins, FieldKind,
    KeyAuthCredential, KeyAuthFields, OAuth2Credential, OAuth2Fields, PluginConfigFields,
    PluginConfiguration, PluginSchema, Route, RouteFields, SchemaField,
};

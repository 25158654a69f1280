// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Admin surfaces shared by every backend.
//!
//! The in-memory simulator and a remote transport client implement the same
//! traits, so test suites can be written once as generic functions over
//! [`KongAdmin`] and run against either.

use crate::error::Result;
use crate::query::{Filters, ListOptions, Page, Pages};
use crate::types::{
    BasicAuthCredential, BasicAuthFields, Consumer, ConsumerFields, EnabledPlugins,
    KeyAuthCredential, KeyAuthFields, OAuth2Credential, OAuth2Fields, PluginConfigFields,
    PluginConfiguration, PluginSchema, Route, RouteFields,
};

/// CRUD plus list/iterate/count over one resource kind.
pub trait ResourceAdmin {
    /// Record returned by the admin.
    type Record;
    /// Input attributes accepted by `create` and `update`.
    type Fields;

    /// Create a record. Fails with `Conflict` on a uniqueness violation and
    /// `InvalidArgument` when a required attribute is missing.
    fn create(&self, fields: Self::Fields) -> Result<Self::Record>;

    /// Merge the supplied attributes into an existing record.
    fn update(&self, id_or_key: &str, fields: Self::Fields) -> Result<Self::Record>;

    /// Create when `id` is `None`, update otherwise.
    fn create_or_update(&self, id: Option<&str>, fields: Self::Fields) -> Result<Self::Record> {
        match id {
            Some(id) => self.update(id, fields),
            None => self.create(fields),
        }
    }

    /// Remove a record.
    fn delete(&self, id_or_key: &str) -> Result<()>;

    /// Fetch a record by id or alternate key.
    fn retrieve(&self, id_or_key: &str) -> Result<Self::Record>;

    /// Fetch one window of matching records.
    fn list(&self, options: &ListOptions) -> Result<Page<Self::Record>>;

    /// Number of records matching the filters, ignoring pagination.
    fn count_matching(&self, filters: &Filters) -> Result<usize>;

    /// Number of records.
    fn count(&self) -> Result<usize> {
        self.count_matching(&Filters::new())
    }

    /// Lazily walk every matching record, `window_size` records per list call.
    fn iterate(&self, window_size: usize, filters: Filters) -> Pages<'_, Self> {
        Pages::new(
            self,
            ListOptions::new()
                .with_size(window_size)
                .with_filters(filters),
        )
    }
}

/// Plugin configurations of one route.
pub trait PluginConfigAdmin:
    ResourceAdmin<Record = PluginConfiguration, Fields = PluginConfigFields>
{
}

impl<T> PluginConfigAdmin for T where
    T: ResourceAdmin<Record = PluginConfiguration, Fields = PluginConfigFields>
{
}

/// Route definitions and their plugin configurations.
pub trait RouteAdmin: ResourceAdmin<Record = Route, Fields = RouteFields> {
    type Plugins: PluginConfigAdmin;

    /// Plugin configurations owned by a route, resolved by name or id.
    fn plugins(&self, route_name_or_id: &str) -> Result<Self::Plugins>;
}

/// Consumers and their credentials.
pub trait ConsumerAdmin: ResourceAdmin<Record = Consumer, Fields = ConsumerFields> {
    type BasicAuth: ResourceAdmin<Record = BasicAuthCredential, Fields = BasicAuthFields>;
    type KeyAuth: ResourceAdmin<Record = KeyAuthCredential, Fields = KeyAuthFields>;
    type OAuth2: ResourceAdmin<Record = OAuth2Credential, Fields = OAuth2Fields>;

    /// Basic-auth credentials of a consumer, resolved by username or id.
    fn basic_auth(&self, consumer_username_or_id: &str) -> Result<Self::BasicAuth>;

    /// Key-auth credentials of a consumer.
    fn key_auth(&self, consumer_username_or_id: &str) -> Result<Self::KeyAuth>;

    /// OAuth2 applications of a consumer.
    fn oauth2(&self, consumer_username_or_id: &str) -> Result<Self::OAuth2>;
}

/// Read-only plugin catalog.
pub trait PluginAdmin {
    /// Names of every plugin the gateway accepts.
    fn list(&self) -> Result<EnabledPlugins>;

    /// Declared config fields of a plugin.
    fn retrieve_schema(&self, plugin_name: &str) -> Result<PluginSchema>;
}

/// The complete admin surface: routes, consumers, and the plugin catalog.
pub trait KongAdmin {
    type Routes: RouteAdmin;
    type Consumers: ConsumerAdmin;
    type Plugins: PluginAdmin;

    fn routes(&self) -> &Self::Routes;

    fn consumers(&self) -> &Self::Consumers;

    fn plugins(&self) -> &Self::Plugins;
}

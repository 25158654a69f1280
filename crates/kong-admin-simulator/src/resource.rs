// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Generic in-memory admin over one [`EntityStore`].
//!
//! Every resource (routes, consumers, plugin configurations, credentials)
//! goes through [`InMemoryAdmin`]. What differs per resource is captured by
//! a [`ResourceKind`]: which store it lives in, how input fields become a
//! record, which records are visible through the handle, and what else goes
//! away when a record is deleted.

use std::fmt;
use std::sync::Arc;

use kong_admin_sdk::{
    AdminError, BasicAuthCredential, Consumer, Filters, KeyAuthCredential, ListOptions,
    OAuth2Credential, Page, Pages, PluginConfiguration, ResourceAdmin, Result, Route,
};
use tracing::{debug, instrument};

use crate::config::SimulatorConfig;
use crate::schema::PluginSchemaRegistry;
use crate::store::{Entity, EntityStore, Selector};

/// Every store of one simulator plus the settings they are run with.
pub struct Stores {
    pub(crate) routes: EntityStore<Route>,
    pub(crate) consumers: EntityStore<Consumer>,
    pub(crate) plugins: EntityStore<PluginConfiguration>,
    pub(crate) basic_auth: EntityStore<BasicAuthCredential>,
    pub(crate) key_auth: EntityStore<KeyAuthCredential>,
    pub(crate) oauth2: EntityStore<OAuth2Credential>,
    pub(crate) schemas: PluginSchemaRegistry,
    pub(crate) config: SimulatorConfig,
}

impl Stores {
    pub(crate) fn new(config: SimulatorConfig, schemas: PluginSchemaRegistry) -> Self {
        Self {
            routes: EntityStore::new(),
            consumers: EntityStore::new(),
            plugins: EntityStore::new(),
            basic_auth: EntityStore::new(),
            key_auth: EntityStore::new(),
            oauth2: EntityStore::new(),
            schemas,
            config,
        }
    }

    /// Fail with `NotFound` unless the route exists.
    pub(crate) fn require_route(&self, route_id: &str) -> Result<()> {
        if self.routes.any(&|route: &Route| route.id == route_id) {
            Ok(())
        } else {
            Err(AdminError::not_found(Route::KIND, route_id))
        }
    }

    /// Fail with `NotFound` unless the consumer exists.
    pub(crate) fn require_consumer(&self, consumer_id: &str) -> Result<()> {
        if self
            .consumers
            .any(&|consumer: &Consumer| consumer.id == consumer_id)
        {
            Ok(())
        } else {
            Err(AdminError::not_found(Consumer::KIND, consumer_id))
        }
    }
}

/// Per-resource behavior plugged into [`InMemoryAdmin`].
pub trait ResourceKind: Send + Sync + 'static {
    type Record: Entity;
    type Fields;

    /// Field names accepted as list/count filters.
    const FILTERS: &'static [&'static str];

    fn store(stores: &Stores) -> &EntityStore<Self::Record>;

    /// Build a new record from create input. Identity is assigned by the store.
    fn build(&self, stores: &Stores, fields: Self::Fields) -> Result<Self::Record>;

    /// Merge update input into a copy of the stored record.
    fn apply(&self, stores: &Stores, record: &mut Self::Record, fields: Self::Fields)
    -> Result<()>;

    /// Whether a record is reachable through this handle.
    fn in_scope(&self, _record: &Self::Record) -> bool {
        true
    }

    /// Alternate-key form of a lookup string, `None` when the resource has none.
    fn alternate_key(&self, key: &str) -> Option<String> {
        Some(key.to_string())
    }

    /// Check that the owner of this handle still exists.
    fn check_owner(&self, _stores: &Stores) -> Result<()> {
        Ok(())
    }

    /// Remove dependents of a deleted record when cascading is enabled.
    fn cascade(&self, _stores: &Stores, _record: &Self::Record) {}
}

/// [`ResourceAdmin`] backed by the simulator's in-memory stores.
pub struct InMemoryAdmin<K: ResourceKind> {
    pub(crate) stores: Arc<Stores>,
    pub(crate) kind: K,
}

impl<K: ResourceKind> fmt::Debug for InMemoryAdmin<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryAdmin")
            .field("resource", &<K::Record as Entity>::KIND)
            .field("records", &K::store(&self.stores).len())
            .finish()
    }
}

impl<K: ResourceKind> InMemoryAdmin<K> {
    pub(crate) fn new(stores: Arc<Stores>, kind: K) -> Self {
        Self { stores, kind }
    }

    /// List options using the configured default window size.
    pub fn default_list_options(&self) -> ListOptions {
        ListOptions::new().with_size(self.stores.config.default_window_size)
    }

    /// Walk every matching record using the configured default window size.
    pub fn iterate_all(&self, filters: Filters) -> Pages<'_, Self> {
        self.iterate(self.stores.config.default_window_size, filters)
    }

    fn store(&self) -> &EntityStore<K::Record> {
        K::store(&self.stores)
    }

    fn selector<'a>(
        &self,
        id_or_key: &'a str,
        scope: &'a (dyn Fn(&K::Record) -> bool + 'a),
    ) -> Selector<'a, K::Record> {
        Selector::id(id_or_key)
            .with_alternate(self.kind.alternate_key(id_or_key))
            .within(scope)
    }

    fn check_filters(&self, filters: &Filters) -> Result<()> {
        match filters.first_unknown(K::FILTERS) {
            Some(field) => Err(AdminError::invalid(format!(
                "unknown filter '{field}' for {}, expected one of: {}",
                <K::Record as Entity>::KIND,
                K::FILTERS.join(", ")
            ))),
            None => Ok(()),
        }
    }

    fn matcher<'a>(&'a self, filters: &'a Filters) -> impl Fn(&K::Record) -> bool + 'a {
        move |record| {
            self.kind.in_scope(record)
                && filters
                    .iter()
                    .all(|(field, value)| record.field(field).as_deref() == Some(value))
        }
    }
}

impl<K: ResourceKind> ResourceAdmin for InMemoryAdmin<K> {
    type Record = K::Record;
    type Fields = K::Fields;

    #[instrument(skip(self, fields), fields(resource = <K::Record as Entity>::KIND))]
    fn create(&self, fields: K::Fields) -> Result<K::Record> {
        self.kind.check_owner(&self.stores)?;
        let record = self.kind.build(&self.stores, fields)?;
        let record = self.store().insert(record)?;
        debug!(id = %record.id(), "Created record");
        Ok(record)
    }

    #[instrument(skip(self, fields), fields(resource = <K::Record as Entity>::KIND))]
    fn update(&self, id_or_key: &str, fields: K::Fields) -> Result<K::Record> {
        self.kind.check_owner(&self.stores)?;
        let scope = |record: &K::Record| self.kind.in_scope(record);
        let selector = self.selector(id_or_key, &scope);

        let record = self
            .store()
            .update(&selector, |record| self.kind.apply(&self.stores, record, fields))?;
        debug!(id = %record.id(), "Updated record");
        Ok(record)
    }

    #[instrument(skip(self), fields(resource = <K::Record as Entity>::KIND))]
    fn delete(&self, id_or_key: &str) -> Result<()> {
        let scope = |record: &K::Record| self.kind.in_scope(record);
        let selector = self.selector(id_or_key, &scope);

        let removed = self.store().delete(&selector)?;
        debug!(id = %removed.id(), "Deleted record");

        if self.stores.config.cascade_deletes {
            self.kind.cascade(&self.stores, &removed);
        }
        Ok(())
    }

    fn retrieve(&self, id_or_key: &str) -> Result<K::Record> {
        let scope = |record: &K::Record| self.kind.in_scope(record);
        self.store().get(&self.selector(id_or_key, &scope))
    }

    fn list(&self, options: &ListOptions) -> Result<Page<K::Record>> {
        let max = self.stores.config.max_page_size;
        if options.size == 0 || options.size > max {
            return Err(AdminError::invalid(format!(
                "size must be between 1 and {max}, got {}",
                options.size
            )));
        }
        self.check_filters(&options.filters)?;

        let matcher = self.matcher(&options.filters);
        Ok(self
            .store()
            .list(&matcher, options.size, options.offset.as_deref()))
    }

    fn count_matching(&self, filters: &Filters) -> Result<usize> {
        self.check_filters(filters)?;
        let matcher = self.matcher(filters);
        Ok(self.store().count(&matcher))
    }
}

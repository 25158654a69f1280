// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Route definitions ("APIs").

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kong_admin_sdk::{
    AdminError, PluginConfiguration, ResourceAdmin, Result, Route, RouteAdmin, RouteFields,
};
use tracing::debug;
use url::Url;

use crate::plugins::PluginConfigKind;
use crate::resource::{InMemoryAdmin, ResourceKind, Stores};
use crate::store::{Entity, EntityStore, UniqueIndex};

impl Entity for Route {
    const KIND: &'static str = "route";

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
            "name" => self.name.clone(),
            "upstream_url" => Some(self.upstream_url.clone()),
            "inbound_dns" => self.inbound_dns.clone(),
            "path" => self.path.clone(),
            _ => None,
        }
    }

    fn unique_indexes() -> Vec<UniqueIndex<Self>> {
        vec![
            UniqueIndex::new("name", |r: &Route| r.name.clone()).lookup(),
            UniqueIndex::new("inbound_dns", |r: &Route| r.inbound_dns.clone()),
        ]
    }
}

/// Top-level route collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteKind;

impl ResourceKind for RouteKind {
    type Record = Route;
    type Fields = RouteFields;

    const FILTERS: &'static [&'static str] = &["id", "name", "inbound_dns", "upstream_url"];

    fn store(stores: &Stores) -> &EntityStore<Route> {
        &stores.routes
    }

    fn build(&self, _stores: &Stores, fields: RouteFields) -> Result<Route> {
        let upstream_url = fields
            .upstream_url
            .ok_or_else(|| AdminError::invalid("route requires 'upstream_url'"))?;

        let route = Route {
            id: String::new(),
            created_at: Utc::now(),
            name: fields.name,
            upstream_url,
            inbound_dns: fields.inbound_dns,
            path: fields.path,
            strip_path: fields.strip_path.unwrap_or(false),
        };
        validate(&route)?;
        Ok(route)
    }

    fn apply(&self, _stores: &Stores, route: &mut Route, fields: RouteFields) -> Result<()> {
        if let Some(name) = fields.name {
            route.name = Some(name);
        }
        if let Some(upstream_url) = fields.upstream_url {
            route.upstream_url = upstream_url;
        }
        if let Some(inbound_dns) = fields.inbound_dns {
            route.inbound_dns = Some(inbound_dns);
        }
        if let Some(path) = fields.path {
            route.path = Some(path);
        }
        if let Some(strip_path) = fields.strip_path {
            route.strip_path = strip_path;
        }
        validate(route)
    }

    fn cascade(&self, stores: &Stores, route: &Route) {
        let removed = stores
            .plugins
            .remove_where(&|plugin: &PluginConfiguration| plugin.route_id == route.id);
        if !removed.is_empty() {
            debug!(route_id = %route.id, plugins = removed.len(), "Cascaded route delete");
        }
    }
}

fn validate(route: &Route) -> Result<()> {
    let upstream = Url::parse(&route.upstream_url).map_err(|e| {
        AdminError::invalid(format!("upstream_url '{}': {e}", route.upstream_url))
    })?;
    if !matches!(upstream.scheme(), "http" | "https") || upstream.host_str().is_none() {
        return Err(AdminError::invalid(format!(
            "upstream_url '{}' must be an http or https URL",
            route.upstream_url
        )));
    }

    if let Some(path) = route.path.as_deref().filter(|p| !p.starts_with('/')) {
        return Err(AdminError::invalid(format!(
            "path '{path}' must start with '/'"
        )));
    }

    if route.inbound_dns.is_none() && route.path.is_none() {
        return Err(AdminError::invalid(
            "route requires at least one of 'inbound_dns' or 'path'",
        ));
    }
    Ok(())
}

/// Route admin of the simulator.
pub type Routes = InMemoryAdmin<RouteKind>;

/// Plugin configurations of one route.
pub type RoutePlugins = InMemoryAdmin<PluginConfigKind>;

impl RouteAdmin for InMemoryAdmin<RouteKind> {
    type Plugins = RoutePlugins;

    fn plugins(&self, route_name_or_id: &str) -> Result<RoutePlugins> {
        let route = self.retrieve(route_name_or_id)?;
        Ok(InMemoryAdmin::new(
            Arc::clone(&self.stores),
            PluginConfigKind::new(route.id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(fields: RouteFields) -> Result<Route> {
        let stores = Stores::new(Default::default(), Default::default());
        RouteKind.build(&stores, fields)
    }

    #[test]
    fn test_build_defaults() {
        let route = route(RouteFields::new("http://x").with_inbound_dns("a.example.com")).unwrap();
        assert!(!route.strip_path);
        assert!(route.name.is_none());
        assert!(route.path.is_none());
    }

    #[test]
    fn test_build_rejects_bad_input() {
        assert!(route(RouteFields::default().with_path("/a")).is_err());
        assert!(route(RouteFields::new("http://x")).is_err());
        assert!(route(RouteFields::new("ftp://x").with_path("/a")).is_err());
        assert!(route(RouteFields::new("not a url").with_path("/a")).is_err());
        assert!(route(RouteFields::new("http://x").with_path("a")).is_err());
        assert!(route(RouteFields::new("https://x").with_path("/a")).is_ok());
    }

    #[test]
    fn test_filterable_fields() {
        let route = route(
            RouteFields::new("http://x")
                .with_name("svc")
                .with_inbound_dns("svc.example.com"),
        )
        .unwrap();

        assert_eq!(route.field("name").as_deref(), Some("svc"));
        assert_eq!(route.field("upstream_url").as_deref(), Some("http://x"));
        assert_eq!(route.field("path"), None);
        assert_eq!(route.field("strip_path"), None);
    }
}

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Shared helpers for the simulator integration tests.
//!
//! Contract checks are written against `KongAdmin` so they can run against
//! any implementation; the helpers here build the simulator and inputs.

#![allow(dead_code)]

use std::collections::HashSet;

use kong_admin_sdk::{
    Consumer, ConsumerFields, KongAdmin, ResourceAdmin, Route, RouteAdmin, RouteFields,
};
use kong_admin_simulator::{KongAdminSimulator, SimulatorConfig};
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once; honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn simulator() -> KongAdminSimulator {
    init_tracing();
    KongAdminSimulator::new()
}

pub fn simulator_with(config: SimulatorConfig) -> KongAdminSimulator {
    init_tracing();
    KongAdminSimulator::with_config(config).expect("valid simulator config")
}

/// Route fields with a host derived from `name`.
pub fn route_fields(name: &str) -> RouteFields {
    RouteFields::new("http://upstream.internal")
        .with_name(name)
        .with_inbound_dns(format!("{name}.example.com"))
}

pub fn create_route<A: KongAdmin>(admin: &A, name: &str) -> Route {
    admin
        .routes()
        .create(route_fields(name))
        .expect("route created")
}

pub fn create_consumer<A: KongAdmin>(admin: &A, username: &str) -> Consumer {
    admin
        .consumers()
        .create(ConsumerFields::new().with_username(username))
        .expect("consumer created")
}

/// Plugin configuration admin of a route.
pub fn route_plugins<A: KongAdmin>(
    admin: &A,
    route: &Route,
) -> <A::Routes as RouteAdmin>::Plugins {
    admin.routes().plugins(&route.id).expect("route exists")
}

pub fn unique<I: IntoIterator<Item = String>>(ids: I) -> HashSet<String> {
    ids.into_iter().collect()
}

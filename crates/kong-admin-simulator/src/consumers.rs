// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Consumers and access to their credentials.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kong_admin_sdk::{
    AdminError, BasicAuthCredential, Consumer, ConsumerAdmin, ConsumerFields, KeyAuthCredential,
    OAuth2Credential, PluginConfiguration, ResourceAdmin, Result,
};
use tracing::debug;

use crate::credentials::{BasicAuthKind, KeyAuthKind, OAuth2Kind};
use crate::resource::{InMemoryAdmin, ResourceKind, Stores};
use crate::store::{Entity, EntityStore, UniqueIndex};

impl Entity for Consumer {
    const KIND: &'static str = "consumer";

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
            "username" => self.username.clone(),
            "custom_id" => self.custom_id.clone(),
            _ => None,
        }
    }

    fn unique_indexes() -> Vec<UniqueIndex<Self>> {
        vec![
            UniqueIndex::new("username", |c: &Consumer| c.username.clone()).lookup(),
            UniqueIndex::new("custom_id", |c: &Consumer| c.custom_id.clone()),
        ]
    }
}

/// Top-level consumer collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsumerKind;

impl ResourceKind for ConsumerKind {
    type Record = Consumer;
    type Fields = ConsumerFields;

    const FILTERS: &'static [&'static str] = &["id", "custom_id", "username"];

    fn store(stores: &Stores) -> &EntityStore<Consumer> {
        &stores.consumers
    }

    fn build(&self, _stores: &Stores, fields: ConsumerFields) -> Result<Consumer> {
        let consumer = Consumer {
            id: String::new(),
            created_at: Utc::now(),
            username: fields.username,
            custom_id: fields.custom_id,
        };
        validate(&consumer)?;
        Ok(consumer)
    }

    fn apply(
        &self,
        _stores: &Stores,
        consumer: &mut Consumer,
        fields: ConsumerFields,
    ) -> Result<()> {
        if let Some(username) = fields.username {
            consumer.username = Some(username);
        }
        if let Some(custom_id) = fields.custom_id {
            consumer.custom_id = Some(custom_id);
        }
        validate(consumer)
    }

    fn cascade(&self, stores: &Stores, consumer: &Consumer) {
        let id = consumer.id.as_str();
        let basic = stores
            .basic_auth
            .remove_where(&|c: &BasicAuthCredential| c.consumer_id == id);
        let key = stores
            .key_auth
            .remove_where(&|c: &KeyAuthCredential| c.consumer_id == id);
        let oauth2 = stores
            .oauth2
            .remove_where(&|c: &OAuth2Credential| c.consumer_id == id);
        let plugins = stores
            .plugins
            .remove_where(&|p: &PluginConfiguration| p.consumer_id.as_deref() == Some(id));

        debug!(
            consumer_id = %id,
            credentials = basic.len() + key.len() + oauth2.len(),
            plugins = plugins.len(),
            "Cascaded consumer delete"
        );
    }
}

fn validate(consumer: &Consumer) -> Result<()> {
    if consumer.username.is_none() && consumer.custom_id.is_none() {
        return Err(AdminError::invalid(
            "consumer requires at least one of 'username' or 'custom_id'",
        ));
    }
    Ok(())
}

/// Consumer admin of the simulator.
pub type Consumers = InMemoryAdmin<ConsumerKind>;

pub type BasicAuthCredentials = InMemoryAdmin<BasicAuthKind>;
pub type KeyAuthCredentials = InMemoryAdmin<KeyAuthKind>;
pub type OAuth2Credentials = InMemoryAdmin<OAuth2Kind>;

impl InMemoryAdmin<ConsumerKind> {
    fn owner_id(&self, consumer_username_or_id: &str) -> Result<String> {
        self.retrieve(consumer_username_or_id).map(|c| c.id)
    }
}

impl ConsumerAdmin for InMemoryAdmin<ConsumerKind> {
    type BasicAuth = BasicAuthCredentials;
    type KeyAuth = KeyAuthCredentials;
    type OAuth2 = OAuth2Credentials;

    fn basic_auth(&self, consumer_username_or_id: &str) -> Result<BasicAuthCredentials> {
        let consumer_id = self.owner_id(consumer_username_or_id)?;
        Ok(InMemoryAdmin::new(
            Arc::clone(&self.stores),
            BasicAuthKind::new(consumer_id),
        ))
    }

    fn key_auth(&self, consumer_username_or_id: &str) -> Result<KeyAuthCredentials> {
        let consumer_id = self.owner_id(consumer_username_or_id)?;
        Ok(InMemoryAdmin::new(
            Arc::clone(&self.stores),
            KeyAuthKind::new(consumer_id),
        ))
    }

    fn oauth2(&self, consumer_username_or_id: &str) -> Result<OAuth2Credentials> {
        let consumer_id = self.owner_id(consumer_username_or_id)?;
        Ok(InMemoryAdmin::new(
            Arc::clone(&self.stores),
            OAuth2Kind::new(consumer_id),
        ))
    }
}

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Consumer credentials: basic-auth pairs, API keys, and OAuth2 applications.
//!
//! Each handle is bound to one consumer; records of other consumers are not
//! visible through it. Credentials have no alternate key.

use chrono::{DateTime, Utc};
use kong_admin_sdk::{
    AdminError, BasicAuthCredential, BasicAuthFields, KeyAuthCredential, KeyAuthFields,
    OAuth2Credential, OAuth2Fields, Result,
};
use url::Url;
use uuid::Uuid;

use crate::resource::{ResourceKind, Stores};
use crate::store::{Entity, EntityStore, UniqueIndex};

fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

// Credentials share identity handling and the consumer_id field.
macro_rules! credential_entity {
    (
        $record:ty,
        $kind:literal,
        { $($field:literal => $member:ident),* $(,)? },
        [$($index:expr),* $(,)?]
    ) => {
        impl Entity for $record {
            const KIND: &'static str = $kind;

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
                    "consumer_id" => Some(self.consumer_id.clone()),
                    $($field => Some(self.$member.clone()),)*
                    _ => None,
                }
            }

            fn unique_indexes() -> Vec<UniqueIndex<Self>> {
                vec![$($index),*]
            }
        }
    };
}

credential_entity!(
    BasicAuthCredential,
    "basic-auth credential",
    { "username" => username },
    []
);

credential_entity!(
    KeyAuthCredential,
    "key-auth credential",
    { "key" => key },
    [UniqueIndex::new("key", |c: &KeyAuthCredential| Some(c.key.clone()))]
);

credential_entity!(
    OAuth2Credential,
    "oauth2 application",
    {
        "name" => name,
        "client_id" => client_id,
    },
    [UniqueIndex::new("client_id", |c: &OAuth2Credential| Some(c.client_id.clone()))]
);

/// Basic-auth credentials of one consumer.
#[derive(Debug, Clone)]
pub struct BasicAuthKind {
    consumer_id: String,
}

impl BasicAuthKind {
    pub(crate) fn new(consumer_id: String) -> Self {
        Self { consumer_id }
    }
}

impl ResourceKind for BasicAuthKind {
    type Record = BasicAuthCredential;
    type Fields = BasicAuthFields;

    const FILTERS: &'static [&'static str] = &["id", "username", "consumer_id"];

    fn store(stores: &Stores) -> &EntityStore<BasicAuthCredential> {
        &stores.basic_auth
    }

    fn build(&self, _stores: &Stores, fields: BasicAuthFields) -> Result<BasicAuthCredential> {
        let username = fields
            .username
            .ok_or_else(|| AdminError::invalid("basic-auth credential requires 'username'"))?;

        Ok(BasicAuthCredential {
            id: String::new(),
            created_at: Utc::now(),
            consumer_id: self.consumer_id.clone(),
            username,
            password: fields.password,
        })
    }

    fn apply(
        &self,
        _stores: &Stores,
        credential: &mut BasicAuthCredential,
        fields: BasicAuthFields,
    ) -> Result<()> {
        if let Some(username) = fields.username {
            credential.username = username;
        }
        if let Some(password) = fields.password {
            credential.password = Some(password);
        }
        Ok(())
    }

    fn in_scope(&self, credential: &BasicAuthCredential) -> bool {
        credential.consumer_id == self.consumer_id
    }

    fn alternate_key(&self, _key: &str) -> Option<String> {
        None
    }

    fn check_owner(&self, stores: &Stores) -> Result<()> {
        stores.require_consumer(&self.consumer_id)
    }
}

/// API keys of one consumer.
#[derive(Debug, Clone)]
pub struct KeyAuthKind {
    consumer_id: String,
}

impl KeyAuthKind {
    pub(crate) fn new(consumer_id: String) -> Self {
        Self { consumer_id }
    }
}

impl ResourceKind for KeyAuthKind {
    type Record = KeyAuthCredential;
    type Fields = KeyAuthFields;

    const FILTERS: &'static [&'static str] = &["id", "key", "consumer_id"];

    fn store(stores: &Stores) -> &EntityStore<KeyAuthCredential> {
        &stores.key_auth
    }

    fn build(&self, _stores: &Stores, fields: KeyAuthFields) -> Result<KeyAuthCredential> {
        Ok(KeyAuthCredential {
            id: String::new(),
            created_at: Utc::now(),
            consumer_id: self.consumer_id.clone(),
            key: fields.key.unwrap_or_else(generate_token),
        })
    }

    fn apply(
        &self,
        _stores: &Stores,
        credential: &mut KeyAuthCredential,
        fields: KeyAuthFields,
    ) -> Result<()> {
        if let Some(key) = fields.key {
            credential.key = key;
        }
        Ok(())
    }

    fn in_scope(&self, credential: &KeyAuthCredential) -> bool {
        credential.consumer_id == self.consumer_id
    }

    fn alternate_key(&self, _key: &str) -> Option<String> {
        None
    }

    fn check_owner(&self, stores: &Stores) -> Result<()> {
        stores.require_consumer(&self.consumer_id)
    }
}

/// OAuth2 applications of one consumer.
#[derive(Debug, Clone)]
pub struct OAuth2Kind {
    consumer_id: String,
}

impl OAuth2Kind {
    pub(crate) fn new(consumer_id: String) -> Self {
        Self { consumer_id }
    }
}

impl ResourceKind for OAuth2Kind {
    type Record = OAuth2Credential;
    type Fields = OAuth2Fields;

    const FILTERS: &'static [&'static str] = &["id", "name", "client_id", "consumer_id"];

    fn store(stores: &Stores) -> &EntityStore<OAuth2Credential> {
        &stores.oauth2
    }

    fn build(&self, _stores: &Stores, fields: OAuth2Fields) -> Result<OAuth2Credential> {
        let name = fields
            .name
            .ok_or_else(|| AdminError::invalid("oauth2 application requires 'name'"))?;
        let redirect_uri = fields
            .redirect_uri
            .ok_or_else(|| AdminError::invalid("oauth2 application requires 'redirect_uri'"))?;
        validate_redirect_uri(&redirect_uri)?;

        Ok(OAuth2Credential {
            id: String::new(),
            created_at: Utc::now(),
            consumer_id: self.consumer_id.clone(),
            name,
            redirect_uri,
            client_id: fields.client_id.unwrap_or_else(generate_token),
            client_secret: fields.client_secret.unwrap_or_else(generate_token),
        })
    }

    fn apply(
        &self,
        _stores: &Stores,
        credential: &mut OAuth2Credential,
        fields: OAuth2Fields,
    ) -> Result<()> {
        if let Some(name) = fields.name {
            credential.name = name;
        }
        if let Some(redirect_uri) = fields.redirect_uri {
            validate_redirect_uri(&redirect_uri)?;
            credential.redirect_uri = redirect_uri;
        }
        if let Some(client_id) = fields.client_id {
            credential.client_id = client_id;
        }
        if let Some(client_secret) = fields.client_secret {
            credential.client_secret = client_secret;
        }
        Ok(())
    }

    fn in_scope(&self, credential: &OAuth2Credential) -> bool {
        credential.consumer_id == self.consumer_id
    }

    fn alternate_key(&self, _key: &str) -> Option<String> {
        None
    }

    fn check_owner(&self, stores: &Stores) -> Result<()> {
        stores.require_consumer(&self.consumer_id)
    }
}

fn validate_redirect_uri(redirect_uri: &str) -> Result<()> {
    Url::parse(redirect_uri)
        .map(|_| ())
        .map_err(|e| AdminError::invalid(format!("redirect_uri '{redirect_uri}': {e}")))
}

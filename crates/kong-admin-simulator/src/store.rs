// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Keyed in-memory record collection with unique secondary indices.
//!
//! Every operation takes the store lock for its whole duration, so the
//! uniqueness check and the mutation it guards are atomic with respect to
//! each other. Reads take the shared lock.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use chrono::{DateTime, Timelike, Utc};
use kong_admin_sdk::{AdminError, ConflictField, Page, Result};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::cursor::{PaginationCursor, Position};

/// A record the store can hold.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Resource name used in errors and logs.
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    /// Assign the store-owned identity.
    fn stamp(&mut self, id: String, created_at: DateTime<Utc>);

    /// String form of a filterable field, `None` when unset or unknown.
    fn field(&self, name: &str) -> Option<String>;

    /// Unique secondary indices enforced by the store.
    fn unique_indexes() -> Vec<UniqueIndex<Self>>;
}

/// A unique secondary index over one (possibly composite) field.
///
/// Records whose key is `None` are not indexed, so unset keys never collide.
pub struct UniqueIndex<T> {
    /// Field name reported on conflicts.
    pub field: &'static str,
    /// Whether lookups by alternate key consult this index.
    pub lookup: bool,
    pub key: fn(&T) -> Option<String>,
}

impl<T> UniqueIndex<T> {
    pub fn new(field: &'static str, key: fn(&T) -> Option<String>) -> Self {
        Self {
            field,
            lookup: false,
            key,
        }
    }

    /// Make the index resolve alternate keys in `get`/`update`/`delete`.
    pub fn lookup(mut self) -> Self {
        self.lookup = true;
        self
    }
}

/// Identifies one record: by id first, then by alternate key, restricted
/// to records accepted by `scope`.
pub struct Selector<'a, T> {
    pub key: &'a str,
    pub alternate: Option<String>,
    pub scope: Option<&'a (dyn Fn(&T) -> bool + 'a)>,
}

impl<'a, T> Selector<'a, T> {
    /// Select by id or by the same string as alternate key.
    pub fn key(key: &'a str) -> Self {
        Self {
            key,
            alternate: Some(key.to_string()),
            scope: None,
        }
    }

    /// Select by id only.
    pub fn id(id: &'a str) -> Self {
        Self {
            key: id,
            alternate: None,
            scope: None,
        }
    }

    pub fn with_alternate(mut self, alternate: Option<String>) -> Self {
        self.alternate = alternate;
        self
    }

    pub fn within(mut self, scope: &'a (dyn Fn(&T) -> bool + 'a)) -> Self {
        self.scope = Some(scope);
        self
    }

    fn admits(&self, record: &T) -> bool {
        self.scope.is_none_or(|scope| scope(record))
    }
}

struct State<T> {
    next_seq: u64,
    /// Records by creation sequence number.
    records: BTreeMap<u64, T>,
    ids: HashMap<String, u64>,
    /// One map per declared unique index: key -> sequence number.
    indexes: Vec<HashMap<String, u64>>,
}

/// Keyed record collection preserving creation order.
pub struct EntityStore<T: Entity> {
    indexes: Vec<UniqueIndex<T>>,
    state: RwLock<State<T>>,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        let indexes = T::unique_indexes();
        let maps = indexes.iter().map(|_| HashMap::new()).collect();
        Self {
            indexes,
            state: RwLock::new(State {
                next_seq: 1,
                records: BTreeMap::new(),
                ids: HashMap::new(),
                indexes: maps,
            }),
        }
    }

    /// Store a new record under a freshly assigned id and creation time.
    ///
    /// Every colliding unique field is reported, not just the first one.
    pub fn insert(&self, mut record: T) -> Result<T> {
        let mut state = self.state.write();

        let mut id = Uuid::new_v4().to_string();
        while state.ids.contains_key(&id) {
            id = Uuid::new_v4().to_string();
        }
        record.stamp(id.clone(), now_millis());

        let conflicts = self.conflicts(&state, &record, None);
        if !conflicts.is_empty() {
            return Err(AdminError::conflict(T::KIND, conflicts));
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        for (index, map) in self.indexes.iter().zip(state.indexes.iter_mut()) {
            if let Some(key) = (index.key)(&record) {
                map.insert(key, seq);
            }
        }
        state.ids.insert(id, seq);
        state.records.insert(seq, record.clone());

        Ok(record)
    }

    /// Fetch one record.
    pub fn get(&self, selector: &Selector<'_, T>) -> Result<T> {
        let state = self.state.read();
        let seq = self.resolve(&state, selector)?;
        state
            .records
            .get(&seq)
            .cloned()
            .ok_or_else(|| AdminError::not_found(T::KIND, selector.key))
    }

    /// Apply `patch` to a copy of a record, re-check uniqueness, then commit.
    ///
    /// Nothing changes when `patch` fails or a unique field collides with
    /// another record. The record's id and creation time are preserved.
    pub fn update<F>(&self, selector: &Selector<'_, T>, patch: F) -> Result<T>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let mut state = self.state.write();
        let seq = self.resolve(&state, selector)?;
        let current = state
            .records
            .get(&seq)
            .cloned()
            .ok_or_else(|| AdminError::not_found(T::KIND, selector.key))?;

        let mut updated = current.clone();
        patch(&mut updated)?;
        updated.stamp(current.id().to_string(), current.created_at());

        let conflicts = self.conflicts(&state, &updated, Some(seq));
        if !conflicts.is_empty() {
            return Err(AdminError::conflict(T::KIND, conflicts));
        }

        for (index, map) in self.indexes.iter().zip(state.indexes.iter_mut()) {
            let old_key = (index.key)(&current);
            let new_key = (index.key)(&updated);
            if old_key == new_key {
                continue;
            }
            if let Some(old_key) = old_key {
                map.remove(&old_key);
            }
            if let Some(new_key) = new_key {
                map.insert(new_key, seq);
            }
        }
        state.records.insert(seq, updated.clone());

        Ok(updated)
    }

    /// Remove one record and its index entries.
    pub fn delete(&self, selector: &Selector<'_, T>) -> Result<T> {
        let mut state = self.state.write();
        let seq = self.resolve(&state, selector)?;
        self.remove_seq(&mut state, seq)
            .ok_or_else(|| AdminError::not_found(T::KIND, selector.key))
    }

    /// Remove every record matching `predicate`, returning the removed records.
    pub fn remove_where(&self, predicate: &dyn Fn(&T) -> bool) -> Vec<T> {
        let mut state = self.state.write();
        let doomed: Vec<u64> = state
            .records
            .iter()
            .filter(|(_, record)| predicate(record))
            .map(|(seq, _)| *seq)
            .collect();

        doomed
            .into_iter()
            .filter_map(|seq| self.remove_seq(&mut state, seq))
            .collect()
    }

    /// One window of matching records in creation order.
    ///
    /// `total` counts every matching record. An undecodable or stale
    /// `offset` yields an empty window.
    pub fn list(
        &self,
        predicate: &dyn Fn(&T) -> bool,
        size: usize,
        offset: Option<&str>,
    ) -> Page<T> {
        let state = self.state.read();
        let total = state.records.values().filter(|r| predicate(r)).count();

        let start = match PaginationCursor::decode(offset) {
            Position::Start => Bound::Unbounded,
            Position::After(seq) => Bound::Excluded(seq),
            Position::Invalid => return Page::empty(total),
        };

        let mut matching = state
            .records
            .range((start, Bound::Unbounded))
            .filter(|(_, record)| predicate(record));

        let mut data = Vec::with_capacity(size.min(total));
        let mut last_seq = None;
        for (seq, record) in matching.by_ref().take(size) {
            data.push(record.clone());
            last_seq = Some(*seq);
        }

        let next = match (last_seq, matching.next()) {
            (Some(seq), Some(_)) => Some(PaginationCursor::encode(seq)),
            _ => None,
        };

        Page { data, next, total }
    }

    /// Number of records matching `predicate`.
    pub fn count(&self, predicate: &dyn Fn(&T) -> bool) -> usize {
        self.state
            .read()
            .records
            .values()
            .filter(|r| predicate(r))
            .count()
    }

    /// Check whether any record matches `predicate`.
    pub fn any(&self, predicate: &dyn Fn(&T) -> bool) -> bool {
        self.state.read().records.values().any(|r| predicate(r))
    }

    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn resolve(&self, state: &State<T>, selector: &Selector<'_, T>) -> Result<u64> {
        let admitted = |seq: u64| {
            state
                .records
                .get(&seq)
                .is_some_and(|record| selector.admits(record))
        };

        if let Some(seq) = state.ids.get(selector.key).copied().filter(|seq| admitted(*seq)) {
            return Ok(seq);
        }

        if let Some(alternate) = &selector.alternate {
            for (index, map) in self.indexes.iter().zip(&state.indexes) {
                if !index.lookup {
                    continue;
                }
                if let Some(seq) = map.get(alternate).copied().filter(|seq| admitted(*seq)) {
                    return Ok(seq);
                }
            }
        }

        Err(AdminError::not_found(T::KIND, selector.key))
    }

    fn conflicts(&self, state: &State<T>, record: &T, own_seq: Option<u64>) -> Vec<ConflictField> {
        self.indexes
            .iter()
            .zip(&state.indexes)
            .filter_map(|(index, map)| {
                let key = (index.key)(record)?;
                match map.get(&key) {
                    Some(seq) if Some(*seq) != own_seq => {
                        Some(ConflictField::new(index.field, key))
                    }
                    _ => None,
                }
            })
            .collect()
    }

    fn remove_seq(&self, state: &mut State<T>, seq: u64) -> Option<T> {
        let record = state.records.remove(&seq)?;
        state.ids.remove(record.id());
        for (index, map) in self.indexes.iter().zip(state.indexes.iter_mut()) {
            if let Some(key) = (index.key)(&record) {
                map.remove(&key);
            }
        }
        Some(record)
    }
}

/// Current time truncated to milliseconds, the precision records carry on the wire.
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(now.nanosecond() / 1_000_000 * 1_000_000)
        .unwrap_or(now)
}

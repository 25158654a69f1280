// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! List windows, filters, and lazy traversal.

use std::collections::BTreeMap;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::contract::ResourceAdmin;
use crate::error::Result;

/// Default number of records per list window.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Equality filters applied to a list, keyed by record field name.
///
/// Keys are validated by the admin against the resource's allowed filter
/// fields, mirroring strict query-parameter validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Return the first key not contained in `allowed`, if any.
    pub fn first_unknown(&self, allowed: &[&str]) -> Option<&str> {
        self.0
            .keys()
            .map(String::as_str)
            .find(|key| !allowed.contains(key))
    }
}

/// Options for listing a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Maximum number of records in the window.
    pub size: usize,
    /// Opaque token returned as `next` by a previous list call.
    pub offset: Option<String>,
    /// Equality filters.
    pub filters: Filters,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_PAGE_SIZE,
            offset: None,
            filters: Filters::default(),
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_offset(mut self, offset: impl Into<String>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters = self.filters.with(field, value);
        self
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }
}

/// One list window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records in creation order.
    pub data: Vec<T>,
    /// Token for the following window; `None` when nothing remains.
    pub next: Option<String>,
    /// Number of matching records irrespective of the window.
    pub total: usize,
}

impl<T> Page<T> {
    pub fn empty(total: usize) -> Self {
        Self {
            data: Vec::new(),
            next: None,
            total,
        }
    }
}

enum Position {
    Start,
    After(String),
    Done,
}

/// Lazy traversal of every matching record, one list window at a time.
///
/// Each traversal starts from the beginning and keeps no state shared with
/// other traversals. Records created while the traversal is in progress may
/// or may not be yielded.
pub struct Pages<'a, A: ResourceAdmin + ?Sized> {
    admin: &'a A,
    options: ListOptions,
    buffer: VecDeque<A::Record>,
    position: Position,
}

impl<'a, A: ResourceAdmin + ?Sized> Pages<'a, A> {
    pub fn new(admin: &'a A, options: ListOptions) -> Self {
        Self {
            admin,
            options,
            buffer: VecDeque::new(),
            position: Position::Start,
        }
    }

    fn fetch(&mut self) -> Result<()> {
        let mut options = self.options.clone();
        options.offset = match std::mem::replace(&mut self.position, Position::Done) {
            Position::Start => None,
            Position::After(token) => Some(token),
            Position::Done => return Ok(()),
        };

        let page = self.admin.list(&options)?;
        trace!(records = page.data.len(), has_next = page.next.is_some(), "Fetched window");

        if let Some(token) = page.next {
            self.position = Position::After(token);
        }
        self.buffer.extend(page.data);
        Ok(())
    }
}

impl<A: ResourceAdmin + ?Sized> Iterator for Pages<'_, A> {
    type Item = Result<A::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Some(Ok(record));
            }
            if matches!(self.position, Position::Done) {
                return None;
            }
            if let Err(err) = self.fetch() {
                self.position = Position::Done;
                return Some(Err(err));
            }
        }
    }
}

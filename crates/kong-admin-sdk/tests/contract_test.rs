// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Provided methods of the admin traits, exercised against a minimal backend.

use std::cell::{Cell, RefCell};

use kong_admin_sdk::{AdminError, Filters, ListOptions, Page, ResourceAdmin, Result};

/// Names in insertion order; the offset token is the index of the next name.
#[derive(Default)]
struct Names {
    names: RefCell<Vec<String>>,
    list_calls: Cell<usize>,
    fail_after: Option<usize>,
}

impl Names {
    fn with(names: &[&str]) -> Self {
        Self {
            names: RefCell::new(names.iter().map(|n| n.to_string()).collect()),
            ..Self::default()
        }
    }
}

impl ResourceAdmin for Names {
    type Record = String;
    type Fields = String;

    fn create(&self, name: String) -> Result<String> {
        self.names.borrow_mut().push(name.clone());
        Ok(name)
    }

    fn update(&self, id_or_key: &str, name: String) -> Result<String> {
        let mut names = self.names.borrow_mut();
        let slot = names
            .iter_mut()
            .find(|n| n.as_str() == id_or_key)
            .ok_or_else(|| AdminError::not_found("name", id_or_key))?;
        *slot = name.clone();
        Ok(name)
    }

    fn delete(&self, id_or_key: &str) -> Result<()> {
        self.names.borrow_mut().retain(|n| n != id_or_key);
        Ok(())
    }

    fn retrieve(&self, id_or_key: &str) -> Result<String> {
        self.names
            .borrow()
            .iter()
            .find(|n| n.as_str() == id_or_key)
            .cloned()
            .ok_or_else(|| AdminError::not_found("name", id_or_key))
    }

    fn list(&self, options: &ListOptions) -> Result<Page<String>> {
        let calls = self.list_calls.get() + 1;
        self.list_calls.set(calls);
        if self.fail_after.is_some_and(|limit| calls > limit) {
            return Err(AdminError::invalid("backend gone"));
        }

        let names = self.names.borrow();
        let start: usize = match &options.offset {
            Some(token) => token.parse().map_err(|_| AdminError::invalid("bad token"))?,
            None => 0,
        };
        let end = (start + options.size).min(names.len());
        Ok(Page {
            data: names[start..end].to_vec(),
            next: (end < names.len()).then(|| end.to_string()),
            total: names.len(),
        })
    }

    fn count_matching(&self, _filters: &Filters) -> Result<usize> {
        Ok(self.names.borrow().len())
    }
}

#[test]
fn test_iterate_walks_every_window() {
    let admin = Names::with(&["a", "b", "c", "d", "e"]);

    let seen: Vec<String> = admin
        .iterate(2, Filters::new())
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(seen, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(admin.list_calls.get(), 3);
}

#[test]
fn test_iterate_is_lazy_and_restartable() {
    let admin = Names::with(&["a", "b", "c"]);

    let mut pages = admin.iterate(1, Filters::new());
    assert_eq!(pages.next().unwrap().unwrap(), "a");
    assert_eq!(admin.list_calls.get(), 1);
    drop(pages);

    let again: Vec<String> = admin
        .iterate(10, Filters::new())
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(again, vec!["a", "b", "c"]);
}

#[test]
fn test_iterate_over_empty_collection() {
    let admin = Names::default();
    assert_eq!(admin.iterate(3, Filters::new()).count(), 0);
}

#[test]
fn test_iterate_stops_after_error() {
    let admin = Names {
        fail_after: Some(1),
        ..Names::with(&["a", "b", "c"])
    };

    let mut pages = admin.iterate(2, Filters::new());
    assert_eq!(pages.next().unwrap().unwrap(), "a");
    assert_eq!(pages.next().unwrap().unwrap(), "b");
    assert!(pages.next().unwrap().unwrap_err().is_invalid_argument());
    assert!(pages.next().is_none());
}

#[test]
fn test_create_or_update_dispatch() {
    let admin = Names::with(&["a"]);

    admin.create_or_update(None, "b".to_string()).unwrap();
    assert_eq!(admin.count().unwrap(), 2);

    admin.create_or_update(Some("a"), "z".to_string()).unwrap();
    assert_eq!(admin.count().unwrap(), 2);
    assert!(admin.retrieve("z").is_ok());
    assert!(
        admin
            .create_or_update(Some("missing"), "q".to_string())
            .unwrap_err()
            .is_not_found()
    );
}

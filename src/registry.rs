// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Declaration Registries
//!
//! A channel remembers every exchange and queue declared on it, keyed by
//! name. The first declaration of a name wins and later declarations get the
//! cached object back.
//!
//! The `Registry` trait is the seam for alternative storage. The provided
//! `LocalRegistry` is single-threaded, matching the rest of the mock.

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
};

/// Trait defining lookup-or-insert storage for declared objects.
pub trait Registry<T> {
    /// Returns the object registered under `name`, if any.
    fn lookup(&self, name: &str) -> Option<T>;

    /// Returns the object registered under `name`, registering the result of
    /// `declare` first when the name is unknown.
    ///
    /// # Parameters
    /// * `name` - The declaration name
    /// * `declare` - Builds the object on a cache miss; not called on a hit
    ///
    /// # Returns
    /// The cached or newly registered object
    fn get_or_declare(&self, name: &str, declare: Box<dyn FnOnce() -> T + '_>) -> T;

    /// All registered objects, ordered by name.
    fn entries(&self) -> BTreeMap<String, T>;
}

/// `RefCell` backed registry for single-threaded use.
#[derive(Debug)]
pub struct LocalRegistry<T> {
    entries: RefCell<HashMap<String, T>>,
}

impl<T> LocalRegistry<T> {
    pub fn new() -> LocalRegistry<T> {
        LocalRegistry {
            entries: RefCell::new(HashMap::default()),
        }
    }
}

impl<T> Default for LocalRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Registry<T> for LocalRegistry<T> {
    fn lookup(&self, name: &str) -> Option<T> {
        self.entries.borrow().get(name).cloned()
    }

    fn get_or_declare(&self, name: &str, declare: Box<dyn FnOnce() -> T + '_>) -> T {
        if let Some(existing) = self.lookup(name) {
            return existing;
        }

        // `declare` runs without the map borrowed
        let declared = declare();
        self.entries
            .borrow_mut()
            .insert(name.to_owned(), declared.clone());
        declared
    }

    fn entries(&self) -> BTreeMap<String, T> {
        self.entries
            .borrow()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

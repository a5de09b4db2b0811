//! Directory use-case service.
//!
//! # Responsibility
//! - Provide insert/update/delete/list entry points for the menu loop.
//! - Build entries from raw text before handing them to the store.
//!
//! # Invariants
//! - Service APIs never bypass store validation or position checks.
//! - The service stays storage-agnostic.

use crate::model::entry::Entry;
use crate::store::{DirectoryStore, Position, StoreResult};

/// Use-case wrapper over a [`DirectoryStore`].
pub struct DirectoryService<S: DirectoryStore> {
    store: S,
}

impl<S: DirectoryStore> DirectoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Appends an entry built from raw input and returns its position.
    ///
    /// Fields are trimmed and truncated as in [`Entry::new`].
    pub fn insert_entry(&mut self, name: &str, number: &str) -> StoreResult<Position> {
        self.store.insert(&Entry::new(name, number))
    }

    pub fn get_entry(&mut self, position: Position) -> StoreResult<Entry> {
        self.store.get(position)
    }

    /// Replaces the entry at `position` with one built from raw input.
    pub fn update_entry(&mut self, position: Position, name: &str, number: &str) -> StoreResult<()> {
        self.store.update(position, &Entry::new(name, number))
    }

    /// Deletes the entry at `position` and returns what was removed.
    pub fn delete_entry(&mut self, position: Position) -> StoreResult<Entry> {
        self.store.delete(position)
    }

    pub fn list_entries(&mut self) -> StoreResult<Vec<Entry>> {
        self.store.list()
    }

    pub fn entry_count(&self) -> usize {
        self.store.len()
    }

    /// Label for the next insert prompt.
    pub fn next_entry_number(&self) -> usize {
        self.store.session().next_entry_number
    }

    pub fn deletes_performed(&self) -> usize {
        self.store.session().deletes
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

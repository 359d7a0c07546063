//! Held collections.
//!
//! A [`Repository`] is the in-memory list of one entity type. It is mutated
//! only with rows a gateway has already accepted, and it is what pages filter
//! and render. [`SharedRepository`] is the single owned handle per entity type
//! that every page of a session reads and mutates, so two pages showing
//! employees can never disagree about the list.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::form::FormBinding;

/// Opaque numeric row identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted record managed by an entity page.
pub trait Entity: Clone + fmt::Debug {
    /// Field set of a candidate record, before an identifier is assigned.
    type Draft: FormBinding + Clone + fmt::Debug;

    /// Lower-case name used in messages ("employee").
    const KIND: &'static str;
    /// Title-case name used in labels ("Employee").
    const LABEL: &'static str;

    fn id(&self) -> RecordId;

    /// The current values of the record, as a draft.
    fn draft(&self) -> Self::Draft;

    /// Combines an identifier and a draft into a record. `previous` is the
    /// record being replaced, if any, so fields outside the draft survive.
    fn from_draft(id: RecordId, draft: Self::Draft, previous: Option<&Self>) -> Self;

    /// Text the list search box matches against.
    fn search_text(&self) -> String;
}

/// Case-insensitive substring match. An empty term matches everything.
#[must_use]
pub fn matches_search(text: &str, term: &str) -> bool {
    term.is_empty() || text.to_lowercase().contains(&term.to_lowercase())
}

#[derive(Clone, Debug)]
pub struct Repository<E> {
    items: Vec<E>,
}

impl<E> Default for Repository<E> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<E: Entity> Repository<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_items(items: Vec<E>) -> Self {
        Self { items }
    }

    /// Replaces the whole collection, e.g. after hydrating from a gateway.
    pub fn replace_all(&mut self, items: Vec<E>) {
        self.items = items;
    }

    #[must_use]
    pub fn items(&self) -> &[E] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&E> {
        self.items.iter().find(|e| e.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a record, replacing any record with the same identifier in place.
    pub fn insert(&mut self, entity: E) {
        if !self.replace(entity.clone()) {
            self.items.push(entity);
        }
    }

    /// Replaces the record with the same identifier. Returns `false` if absent.
    pub fn replace(&mut self, entity: E) -> bool {
        match self.items.iter_mut().find(|e| e.id() == entity.id()) {
            Some(slot) => {
                *slot = entity;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: RecordId) -> Option<E> {
        let index = self.items.iter().position(|e| e.id() == id)?;
        Some(self.items.remove(index))
    }

    /// Records whose search text contains `term`, in collection order.
    #[must_use]
    pub fn filter(&self, term: &str) -> Vec<&E> {
        self.items
            .iter()
            .filter(|e| matches_search(&e.search_text(), term))
            .collect()
    }
}

/// Shared, single-threaded handle to the one repository of an entity type.
///
/// Borrows are scoped to the closures passed to [`read`](Self::read) and
/// [`update`](Self::update) and never held across an `.await`.
pub struct SharedRepository<E>(Rc<RefCell<Repository<E>>>);

impl<E> Clone for SharedRepository<E> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<E> Default for SharedRepository<E> {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(Repository::default())))
    }
}

impl<E: fmt::Debug> fmt::Debug for SharedRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedRepository").field(&self.0.borrow()).finish()
    }
}

impl<E: Entity> SharedRepository<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read<R>(&self, f: impl FnOnce(&Repository<E>) -> R) -> R {
        f(&*self.0.borrow())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut Repository<E>) -> R) -> R {
        f(&mut *self.0.borrow_mut())
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<E> {
        self.read(|r| r.items().to_vec())
    }

    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<E> {
        self.read(|r| r.get(id).cloned())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read(Repository::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read(Repository::is_empty)
    }

    /// Owned copies of the records matching `term`.
    #[must_use]
    pub fn filtered(&self, term: &str) -> Vec<E> {
        self.read(|r| r.filter(term).into_iter().cloned().collect())
    }

    /// `true` when both handles point at the same repository.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

//! The persistence seam used by entity pages.
//!
//! [`Gateway`] is implemented by the remote employee gateway
//! ([`EmployeesApi`](crate::client::EmployeesApi)) and by [`LocalStore`], the
//! in-memory store behind the entities that have no remote table yet
//! (deductions, payroll cycles, hour entries).

use std::collections::HashSet;

use tokio::sync::RwLock;

use crate::error::{Error, FOREIGN_KEY_VIOLATION, Result, StoreError};
use crate::repository::{Entity, RecordId};

/// Row-level create/read/update/delete for one entity type.
#[allow(async_fn_in_trait)]
pub trait Gateway<E: Entity> {
    /// Persists a draft and returns the canonical record with its identifier.
    async fn create(&self, draft: &E::Draft) -> Result<E>;

    /// Every record, in store order.
    async fn list(&self) -> Result<Vec<E>>;

    /// Replaces every field of an existing record.
    async fn update(&self, id: RecordId, draft: &E::Draft) -> Result<E>;

    async fn delete(&self, id: RecordId) -> Result<()>;
}

impl<E: Entity, G: Gateway<E>> Gateway<E> for &G {
    async fn create(&self, draft: &E::Draft) -> Result<E> {
        (**self).create(draft).await
    }

    async fn list(&self) -> Result<Vec<E>> {
        (**self).list().await
    }

    async fn update(&self, id: RecordId, draft: &E::Draft) -> Result<E> {
        (**self).update(id, draft).await
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        (**self).delete(id).await
    }
}

#[derive(Debug)]
struct LocalRows<E> {
    rows: Vec<E>,
    next_id: i64,
    dependents: HashSet<RecordId>,
}

/// In-memory gateway with client-assigned sequential identifiers.
#[derive(Debug)]
pub struct LocalStore<E> {
    inner: RwLock<LocalRows<E>>,
    is_offline: bool,
}

impl<E: Entity> Default for LocalStore<E> {
    fn default() -> Self {
        Self::with_rows(Vec::new())
    }
}

impl<E: Entity> LocalStore<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store; new identifiers continue after the highest seeded one.
    #[must_use]
    pub fn with_rows(rows: Vec<E>) -> Self {
        let next_id = rows.iter().map(|r| r.id().0).max().unwrap_or(0) + 1;
        Self {
            inner: RwLock::new(LocalRows {
                rows,
                next_id,
                dependents: HashSet::new(),
            }),
            is_offline: false,
        }
    }

    /// Marks a record as referenced by other records; deleting it then fails
    /// with [`Error::DependencyConflict`].
    pub fn mark_dependent(&mut self, id: RecordId) {
        self.inner.get_mut().dependents.insert(id);
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    fn check_online(&self) -> Result<()> {
        if self.is_offline {
            return Err(Error::persistence(
                StoreError::new(format!("{} store offline", E::KIND)),
                None,
                None,
            ));
        }
        Ok(())
    }
}

impl<E: Entity> Gateway<E> for LocalStore<E> {
    #[instrument(skip(self, draft))]
    async fn create(&self, draft: &E::Draft) -> Result<E> {
        self.check_online()?;
        let mut guard = self.inner.write().await;
        let id = RecordId(guard.next_id);
        guard.next_id += 1;

        let entity = E::from_draft(id, draft.clone(), None);
        guard.rows.push(entity.clone());
        trace!(kind = E::KIND, %id, "stored local record");
        Ok(entity)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<E>> {
        self.check_online()?;
        Ok(self.inner.read().await.rows.clone())
    }

    #[instrument(skip(self, draft))]
    async fn update(&self, id: RecordId, draft: &E::Draft) -> Result<E> {
        self.check_online()?;
        let mut guard = self.inner.write().await;
        let Some(slot) = guard.rows.iter_mut().find(|r| r.id() == id) else {
            return Err(Error::persistence(StoreError::no_matching_row(E::KIND, id), None, None));
        };

        *slot = E::from_draft(id, draft.clone(), Some(&*slot));
        Ok(slot.clone())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: RecordId) -> Result<()> {
        self.check_online()?;
        let mut guard = self.inner.write().await;
        if guard.dependents.contains(&id) {
            warn!(kind = E::KIND, %id, "refusing to delete a referenced record");
            return Err(Error::DependencyConflict {
                entity: E::KIND,
                id,
                store: StoreError::new(format!("{} {id} is still referenced", E::KIND))
                    .with_code(FOREIGN_KEY_VIOLATION),
            });
        }

        let Some(index) = guard.rows.iter().position(|r| r.id() == id) else {
            return Err(Error::persistence(StoreError::no_matching_row(E::KIND, id), None, None));
        };
        guard.rows.remove(index);
        Ok(())
    }
}

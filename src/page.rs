//! The list + form state machine shared by every entity page.
//!
//! ```text
//! Loading ──ok──▶ Ready ──submit──▶ Submitting ──▶ Ready
//!    │              ▲  └─confirm──▶ Deleting ────▶ Ready
//!    └──err──▶ LoadError (empty list, still usable)
//! ```
//!
//! Every operation takes `&mut self`, so a page has at most one gateway call
//! in flight, and the held collection only changes once that call resolves.
//! Store failures end up as a dismissible [`Notification`]; validation
//! failures end up next to their fields and never reach the gateway.

use std::fmt;

use crate::error::{Error, Result};
use crate::form::{FormBinding, FormValues, ValidationErrors, bind};
use crate::gateway::Gateway;
use crate::repository::{Entity, RecordId, SharedRepository};

pub const BUSY_LABEL: &str = "Saving...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageState {
    Loading,
    Ready,
    LoadError,
    Submitting,
    Deleting,
}

impl PageState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::LoadError => "load error",
            Self::Submitting => "submitting",
            Self::Deleting => "deleting",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether submitting the form creates a record or updates one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    Edit(RecordId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient message shown after a gateway call resolves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

/// Holds a page in a busy state and puts it back to `Ready` when dropped,
/// including when the owning future is cancelled mid-call.
struct BusyGuard<'a> {
    state: &'a mut PageState,
}

impl<'a> BusyGuard<'a> {
    fn enter(state: &'a mut PageState, busy: PageState) -> Self {
        *state = busy;
        Self { state }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.state = PageState::Ready;
    }
}

pub struct EntityPage<E: Entity, G> {
    gateway: G,
    repository: SharedRepository<E>,
    state: PageState,
    mode: FormMode,
    form: FormValues,
    field_errors: ValidationErrors,
    search: String,
    pending_delete: Option<RecordId>,
    notification: Option<Notification>,
}

impl<E: Entity, G: fmt::Debug> fmt::Debug for EntityPage<E, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityPage")
            .field("kind", &E::KIND)
            .field("gateway", &self.gateway)
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("search", &self.search)
            .field("pending_delete", &self.pending_delete)
            .field("notification", &self.notification)
            .finish_non_exhaustive()
    }
}

impl<E: Entity, G: Gateway<E>> EntityPage<E, G> {
    /// A page in the `Loading` state; call [`load`](Self::load) to hydrate it.
    #[must_use]
    pub fn new(gateway: G, repository: SharedRepository<E>) -> Self {
        Self {
            gateway,
            repository,
            state: PageState::Loading,
            mode: FormMode::Create,
            form: FormValues::new(),
            field_errors: ValidationErrors::default(),
            search: String::new(),
            pending_delete: None,
            notification: None,
        }
    }

    /// Hydrates the held collection from the gateway.
    ///
    /// A failure empties the collection, shows an error notification and
    /// leaves the page usable in [`PageState::LoadError`]; calling `load`
    /// again retries.
    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn load(&mut self) -> PageState {
        self.state = PageState::Loading;
        match self.gateway.list().await {
            Ok(items) => {
                debug!(count = items.len(), "page hydrated");
                self.repository.update(|r| r.replace_all(items));
                self.state = PageState::Ready;
            }
            Err(e) => {
                warn!(error = %e, "failed to load records");
                self.repository.update(|r| r.replace_all(Vec::new()));
                self.notification =
                    Some(Notification::error(format!("Failed to load records: {e}")));
                self.state = PageState::LoadError;
            }
        }
        self.state
    }

    #[must_use]
    pub fn state(&self) -> PageState {
        self.state
    }

    /// `true` when the page accepts a submit or a delete confirmation.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        matches!(self.state, PageState::Ready | PageState::LoadError)
    }

    #[must_use]
    pub fn is_form_disabled(&self) -> bool {
        !self.can_submit()
    }

    #[must_use]
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    #[must_use]
    pub fn submit_label(&self) -> String {
        match (self.state, self.mode) {
            (PageState::Submitting, _) => BUSY_LABEL.to_string(),
            (_, FormMode::Create) => format!("Add {}", E::LABEL),
            (_, FormMode::Edit(_)) => format!("Update {}", E::LABEL),
        }
    }

    #[must_use]
    pub fn form(&self) -> &FormValues {
        &self.form
    }

    /// Sets one input control.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Replaces every input control at once.
    pub fn fill(&mut self, values: FormValues) {
        self.form = values;
    }

    #[must_use]
    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field)
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// The held records matching the search term, in collection order.
    #[must_use]
    pub fn visible(&self) -> Vec<E> {
        self.repository.filtered(&self.search)
    }

    #[must_use]
    pub fn repository(&self) -> &SharedRepository<E> {
        &self.repository
    }

    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    /// Pre-fills the form with the record's current values and switches
    /// submit to update. Returns `false` if the record is not held.
    pub fn begin_edit(&mut self, id: RecordId) -> bool {
        let Some(record) = self.repository.get(id) else {
            return false;
        };
        self.form = record.draft().to_values();
        self.field_errors.clear();
        self.mode = FormMode::Edit(id);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.form.clear();
        self.field_errors.clear();
        self.mode = FormMode::Create;
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.can_submit() {
            Ok(())
        } else {
            Err(Error::PageBusy {
                state: self.state.as_str(),
            })
        }
    }

    /// Validates the form and sends it to the gateway.
    ///
    /// Field errors are kept on the page and returned as
    /// [`Error::Validation`] without calling the gateway. Gateway failures
    /// are returned and also shown as an error notification.
    #[instrument(skip(self), fields(kind = E::KIND, mode = ?self.mode))]
    pub async fn submit(&mut self) -> Result<E> {
        self.ensure_idle()?;

        let draft = match bind::<E::Draft>(&self.form) {
            Ok(draft) => draft,
            Err(errors) => {
                debug!(failing = errors.len(), "form rejected");
                self.field_errors = errors.clone();
                return Err(Error::Validation(errors));
            }
        };
        self.field_errors.clear();

        let outcome = {
            let _busy = BusyGuard::enter(&mut self.state, PageState::Submitting);
            match self.mode {
                FormMode::Create => self.gateway.create(&draft).await,
                FormMode::Edit(id) => self.gateway.update(id, &draft).await,
            }
        };

        match outcome {
            Ok(record) => {
                let verb = match self.mode {
                    FormMode::Create => "created",
                    FormMode::Edit(_) => "updated",
                };
                self.repository.update(|r| r.insert(record.clone()));
                self.form.clear();
                self.mode = FormMode::Create;
                self.notification = Some(Notification::success(format!(
                    "{} {verb} successfully",
                    E::LABEL
                )));
                info!(id = %record.id(), "record {verb}");
                Ok(record)
            }
            Err(Error::Validation(errors)) => {
                self.field_errors = errors.clone();
                Err(Error::Validation(errors))
            }
            Err(e) => {
                warn!(error = %e, "gateway rejected the form");
                self.notification = Some(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Opens the delete confirmation for `id`. Nothing is deleted yet.
    pub fn request_delete(&mut self, id: RecordId) -> Result<()> {
        self.ensure_idle()?;
        self.pending_delete = Some(id);
        Ok(())
    }

    /// Closes the confirmation without side effects.
    pub fn dismiss_delete(&mut self) {
        self.pending_delete = None;
    }

    #[must_use]
    pub fn pending_delete(&self) -> Option<RecordId> {
        self.pending_delete
    }

    /// Deletes the record awaiting confirmation.
    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn confirm_delete(&mut self) -> Result<()> {
        self.ensure_idle()?;
        let id = self.pending_delete.take().ok_or(Error::NoPendingDelete)?;

        let outcome = {
            let _busy = BusyGuard::enter(&mut self.state, PageState::Deleting);
            self.gateway.delete(id).await
        };

        match outcome {
            Ok(()) => {
                self.repository.update(|r| r.remove(id));
                if self.mode == FormMode::Edit(id) {
                    self.cancel_edit();
                }
                self.notification = Some(Notification::success(format!(
                    "{} deleted successfully",
                    E::LABEL
                )));
                info!(%id, "record deleted");
                Ok(())
            }
            Err(e) => {
                warn!(%id, error = %e, "delete failed");
                self.notification = Some(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }
}

//! User directory session: record store, pager and form buffer, plus the
//! rules for folding gateway outcomes back into them.
//!
//! Every operation exists in two shapes. The `async` methods (`load`,
//! `submit`, `delete`) await the gateway inline. The `begin_*` methods hand
//! out a request for the caller to run elsewhere, and [`Directory::apply`]
//! reconciles the matching [`Completion`] whenever it arrives.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::error::{ActionError, FieldError, TransportError};
use crate::form::{FormBuffer, FormMode, FormTicket, SubmitKind, SubmitRequest};
use crate::gateway::SyncGateway;
use crate::model::{UserId, UserRecord};
use crate::pager::Pager;
use crate::store::RecordStore;

/// Result of a gateway call, routed back to the directory.
#[derive(Debug)]
pub enum Completion {
    Loaded(Result<Vec<UserRecord>, TransportError>),
    Submitted {
        request: SubmitRequest,
        result: Result<UserRecord, TransportError>,
    },
    Deleted {
        id: UserId,
        result: Result<(), TransportError>,
    },
}

/// Last message worth showing to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Info(m) | Notice::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

#[derive(Debug, Default)]
pub struct Directory {
    store: RecordStore,
    pager: Pager,
    form: FormBuffer,
    notice: Option<Notice>,
    /// In-flight submits by form ticket, with the target id for updates.
    submitting: HashMap<FormTicket, Option<UserId>>,
    deleting: HashSet<UserId>,
}

impl Directory {
    pub fn new(page_size: usize) -> Self {
        Self { pager: Pager::new(page_size), ..Self::default() }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn form(&self) -> &FormBuffer {
        &self.form
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Records on the current page.
    pub fn visible(&self) -> &[UserRecord] {
        self.pager.slice(self.store.records())
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.store.len())
    }

    pub fn go_to(&mut self, page: usize) {
        self.pager.go_to(page);
    }

    pub fn next_page(&mut self) {
        self.pager.next_page(self.store.len());
    }

    pub fn prev_page(&mut self) {
        self.pager.prev_page(self.store.len());
    }

    /// Whether the open form has a submit in flight.
    pub fn is_submitting(&self) -> bool {
        self.form.ticket().is_some_and(|t| self.submitting.contains_key(&t))
    }

    pub fn is_deleting(&self, id: UserId) -> bool {
        self.deleting.contains(&id)
    }

    /// Whether an update for `id` is in flight, even from a form that has
    /// since been closed.
    pub fn is_updating(&self, id: UserId) -> bool {
        self.submitting.values().any(|target| *target == Some(id))
    }

    pub fn pending_requests(&self) -> usize {
        self.deleting.len() + self.submitting.len()
    }

    pub async fn load(&mut self, gateway: &dyn SyncGateway) -> Result<usize, TransportError> {
        let result = gateway.list().await;
        self.finish_load(result)
    }

    /// Populate the store from the initial list call. On failure the store
    /// stays empty.
    pub fn finish_load(
        &mut self,
        result: Result<Vec<UserRecord>, TransportError>,
    ) -> Result<usize, TransportError> {
        match result {
            Ok(records) => {
                self.store.load(records);
                self.pager.go_to(1);
                let count = self.store.len();
                info!(count, "loaded users");
                self.notice = Some(Notice::Info(format!("Loaded {count} users")));
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "error fetching users");
                self.notice = Some(Notice::Error(format!("Error fetching users: {err}")));
                Err(err)
            }
        }
    }

    pub fn open_for_create(&mut self) {
        self.form.open_for_create();
    }

    /// Open the form on a copy of the stored record. Returns `false` when the
    /// id is unknown or a delete for it is still in flight.
    pub fn open_for_edit(&mut self, id: UserId) -> bool {
        if self.deleting.contains(&id) {
            return false;
        }
        match self.store.get(id) {
            Some(record) => {
                self.form.open_for_edit(record);
                true
            }
            None => false,
        }
    }

    pub fn set_field(&mut self, path: &str, value: impl Into<String>) -> Result<(), FieldError> {
        self.form.set_field(path, value)
    }

    /// Close the form without contacting the gateway. Returns whether a
    /// form was open.
    pub fn cancel(&mut self) -> bool {
        let was_open = self.form.cancel();
        if was_open {
            info!("form cancelled");
        }
        was_open
    }

    /// Snapshot the form for the gateway. `None` while closed or while a
    /// submit from this form is already in flight.
    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        if self.is_submitting() {
            return None;
        }
        let request = self.form.submit_request()?;
        let target = match &request.kind {
            SubmitKind::Create(_) => None,
            SubmitKind::Update(id, _) => Some(*id),
        };
        self.submitting.insert(request.ticket, target);
        Some(request)
    }

    /// Fold a create/update response into the store and close the form that
    /// issued it. Failures leave the store alone and keep the form open.
    pub fn finish_submit(
        &mut self,
        request: SubmitRequest,
        result: Result<UserRecord, TransportError>,
    ) -> Result<UserId, TransportError> {
        self.submitting.remove(&request.ticket);
        let mode = request.mode();
        match result {
            Ok(echo) => {
                let record = match request.kind {
                    SubmitKind::Create(_) => echo.with_id(self.store.next_local_id()),
                    SubmitKind::Update(id, _) => echo.with_id(id),
                };
                let id = record.id;
                self.form.close_if(request.ticket);
                if mode == FormMode::Edit && self.store.position(id).is_none() {
                    // deleted while the update was in flight
                    debug!(%id, "dropping update for removed user");
                    return Ok(id);
                }
                self.store.upsert(record);
                let verb = match mode {
                    FormMode::Create => "Created",
                    FormMode::Edit => "Updated",
                };
                info!(%id, ?mode, "user saved");
                self.notice = Some(Notice::Info(format!("{verb} user {id}")));
                Ok(id)
            }
            Err(err) => {
                warn!(?mode, error = %err, "error saving user");
                self.form.record_failure(request.ticket, err.clone());
                self.notice = Some(Notice::Error(format!("Error saving user: {err}")));
                Err(err)
            }
        }
    }

    /// Submit the open form and wait for the gateway. `Ok(None)` when there
    /// was nothing to submit.
    pub async fn submit(&mut self, gateway: &dyn SyncGateway) -> Result<Option<UserId>, TransportError> {
        let Some(request) = self.begin_submit() else {
            return Ok(None);
        };
        let result = match &request.kind {
            SubmitKind::Create(record) => gateway.create(record).await,
            SubmitKind::Update(id, record) => gateway.update(*id, record).await,
        };
        self.finish_submit(request, result).map(Some)
    }

    /// Ask `confirm` about the record and, if accepted, mark it as being
    /// deleted. `Ok(None)` when there is nothing to delete or the record
    /// still has an update in flight.
    pub fn begin_delete<F>(&mut self, id: UserId, confirm: F) -> Result<Option<UserId>, ActionError>
    where
        F: FnOnce(&UserRecord) -> bool,
    {
        if self.deleting.contains(&id) {
            return Ok(None);
        }
        if self.is_updating(id) {
            info!(%id, "delete refused; update in flight");
            self.notice = Some(Notice::Info(format!("User {id} is still being saved")));
            return Ok(None);
        }
        let Some(record) = self.store.get(id) else {
            return Ok(None);
        };
        if !confirm(record) {
            info!(%id, "delete declined");
            return Err(ActionError::UserCancelled);
        }
        self.deleting.insert(id);
        Ok(Some(id))
    }

    pub fn finish_delete(&mut self, id: UserId, result: Result<(), TransportError>) -> Result<(), TransportError> {
        self.deleting.remove(&id);
        match result {
            Ok(()) => {
                if self.store.remove(id).is_some() {
                    info!(%id, "user deleted");
                    self.notice = Some(Notice::Info(format!("Deleted user {id}")));
                } else {
                    debug!(%id, "delete completed for user no longer in store");
                }
                Ok(())
            }
            Err(err) => {
                warn!(%id, error = %err, "error deleting user");
                self.notice = Some(Notice::Error(format!("Error deleting user {id}: {err}")));
                Err(err)
            }
        }
    }

    /// Delete after an explicit confirmation. Returns whether a record was
    /// removed.
    pub async fn delete<F>(&mut self, gateway: &dyn SyncGateway, id: UserId, confirm: F) -> Result<bool, ActionError>
    where
        F: FnOnce(&UserRecord) -> bool,
    {
        let Some(id) = self.begin_delete(id, confirm)? else {
            return Ok(false);
        };
        let result = gateway.delete(id).await;
        self.finish_delete(id, result)?;
        Ok(true)
    }

    pub fn apply(&mut self, completion: Completion) {
        // errors are already logged and surfaced through the notice
        match completion {
            Completion::Loaded(result) => {
                let _ = self.finish_load(result);
            }
            Completion::Submitted { request, result } => {
                let _ = self.finish_submit(request, result);
            }
            Completion::Deleted { id, result } => {
                let _ = self.finish_delete(id, result);
            }
        }
    }
}

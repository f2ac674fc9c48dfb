//! Form buffer: the scratch record behind the add/edit modal.
//!
//! The buffer owns a clone of the record it edits, so typing never touches
//! the store until a submit succeeds.

use crate::error::{FieldError, TransportError};
use crate::model::{FieldPath, UserId, UserRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Identifies one opening of the buffer. Completions carrying a stale ticket
/// must not close a form that was reopened in the meantime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FormTicket(u64);

/// Snapshot of the buffer handed to the gateway.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitRequest {
    pub ticket: FormTicket,
    pub kind: SubmitKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitKind {
    Create(UserRecord),
    Update(UserId, UserRecord),
}

impl SubmitRequest {
    pub fn mode(&self) -> FormMode {
        match self.kind {
            SubmitKind::Create(_) => FormMode::Create,
            SubmitKind::Update(..) => FormMode::Edit,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct OpenForm {
    mode: FormMode,
    record: UserRecord,
    ticket: FormTicket,
    last_error: Option<TransportError>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormBuffer {
    open: Option<OpenForm>,
    issued: u64,
}

impl FormBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_for_create(&mut self) -> FormTicket {
        self.open_with(FormMode::Create, UserRecord::zero())
    }

    pub fn open_for_edit(&mut self, record: &UserRecord) -> FormTicket {
        self.open_with(FormMode::Edit, record.clone())
    }

    fn open_with(&mut self, mode: FormMode, record: UserRecord) -> FormTicket {
        self.issued += 1;
        let ticket = FormTicket(self.issued);
        self.open = Some(OpenForm { mode, record, ticket, last_error: None });
        ticket
    }

    /// Set the field addressed by a dot-qualified path (`"email"`,
    /// `"company.name"`). Does nothing while the form is closed.
    pub fn set_field(&mut self, path: &str, value: impl Into<String>) -> Result<(), FieldError> {
        let path: FieldPath = path.parse()?;
        self.set(path, value);
        Ok(())
    }

    pub fn set(&mut self, path: FieldPath, value: impl Into<String>) {
        if let Some(form) = self.open.as_mut() {
            let record = std::mem::take(&mut form.record);
            form.record = record.with_field(path, value);
        }
    }

    /// Snapshot for the gateway. `None` when closed.
    pub fn submit_request(&self) -> Option<SubmitRequest> {
        let form = self.open.as_ref()?;
        let kind = match form.mode {
            FormMode::Create => SubmitKind::Create(form.record.clone()),
            FormMode::Edit => SubmitKind::Update(form.record.id, form.record.clone()),
        };
        Some(SubmitRequest { ticket: form.ticket, kind })
    }

    /// Keep the form open and remember why the submit failed.
    pub fn record_failure(&mut self, ticket: FormTicket, err: TransportError) -> bool {
        match self.open.as_mut() {
            Some(form) if form.ticket == ticket => {
                form.last_error = Some(err);
                true
            }
            _ => false,
        }
    }

    /// Close the form if `ticket` is still the open one.
    pub fn close_if(&mut self, ticket: FormTicket) -> bool {
        if self.ticket() == Some(ticket) {
            self.open = None;
            true
        } else {
            false
        }
    }

    /// Discard the buffer. Returns whether anything was open.
    pub fn cancel(&mut self) -> bool {
        self.open.take().is_some()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn mode(&self) -> Option<FormMode> {
        self.open.as_ref().map(|f| f.mode)
    }

    pub fn ticket(&self) -> Option<FormTicket> {
        self.open.as_ref().map(|f| f.ticket)
    }

    pub fn record(&self) -> Option<&UserRecord> {
        self.open.as_ref().map(|f| &f.record)
    }

    pub fn last_error(&self) -> Option<&TransportError> {
        self.open.as_ref().and_then(|f| f.last_error.as_ref())
    }
}

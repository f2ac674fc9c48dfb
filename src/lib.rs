//! Library crate for user-desk.
//!
//! This crate exposes the building blocks of the TUI:
//! - User records and field paths (`model`)
//! - Record store, pager and form buffer (`store`, `pager`, `form`)
//! - The session that reconciles gateway outcomes (`directory`)
//! - The remote user resource (`gateway`)
//! - Application state, key handling and the event loop (`app`)
//! - UI rendering (`ui`)
//! - Error types, configuration and logging (`error`, `config`, `logging`)
//!
//! It is used by the `user-desk` binary and by tests.
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod config;
pub mod directory;
pub mod error;
pub mod form;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod pager;
pub mod store;
pub mod ui;

/// Convenient re-exports of the types most callers need.
pub use directory::{Completion, Directory, Notice};
pub use error::{ActionError, TransportError};
pub use model::{FieldPath, UserId, UserRecord};

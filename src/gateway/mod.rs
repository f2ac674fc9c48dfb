//! Sync gateway: the remote side of the user list.
//!
//! The screen only ever talks to the backend through [`SyncGateway`], so the
//! reconciliation logic can be driven by an in-memory implementation in tests.

mod http;

pub use http::{DEFAULT_API_URL, HttpGateway};

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{UserId, UserRecord};

#[async_trait]
pub trait SyncGateway: Send + Sync {
    /// Fetch the full collection.
    async fn list(&self) -> Result<Vec<UserRecord>>;

    /// Create a record. The returned id must not be trusted for local uniqueness.
    async fn create(&self, record: &UserRecord) -> Result<UserRecord>;

    async fn update(&self, id: UserId, record: &UserRecord) -> Result<UserRecord>;

    /// `Ok` means the record no longer exists remotely.
    async fn delete(&self, id: UserId) -> Result<()>;
}

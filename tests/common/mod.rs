// Shared helpers for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;
use user_desk::error::{Result, TransportError};
use user_desk::gateway::SyncGateway;
use user_desk::model::{UserId, UserRecord};

pub fn user(id: u64) -> UserRecord {
    UserRecord {
        id: UserId(id),
        name: format!("User {id}"),
        username: format!("user{id}"),
        email: format!("user{id}@example.test"),
        ..UserRecord::zero()
    }
}

pub fn users(range: std::ops::RangeInclusive<u64>) -> Vec<UserRecord> {
    range.map(user).collect()
}

/// In-memory gateway that behaves like the placeholder API: writes are
/// echoed back but nothing is persisted, and creates always answer with the
/// same id.
pub struct ScriptedGateway {
    pub listing: Vec<UserRecord>,
    pub created_id: u64,
    pub failing: Mutex<Vec<&'static str>>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(listing: Vec<UserRecord>) -> Self {
        Self {
            listing,
            created_id: 99,
            failing: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make every later call of `op` ("list", "create", "update", "delete") fail.
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().push(op);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, op: &'static str, detail: String) -> Result<()> {
        self.calls.lock().unwrap().push(detail);
        if self.failing.lock().unwrap().contains(&op) {
            return Err(TransportError::Network(format!("{op} unreachable")));
        }
        Ok(())
    }
}

#[async_trait]
impl SyncGateway for ScriptedGateway {
    async fn list(&self) -> Result<Vec<UserRecord>> {
        self.enter("list", "GET".to_string())?;
        Ok(self.listing.clone())
    }

    async fn create(&self, record: &UserRecord) -> Result<UserRecord> {
        self.enter("create", "POST".to_string())?;
        Ok(record.clone().with_id(UserId(self.created_id)))
    }

    async fn update(&self, id: UserId, record: &UserRecord) -> Result<UserRecord> {
        self.enter("update", format!("PUT {id}"))?;
        Ok(record.clone().with_id(id))
    }

    async fn delete(&self, id: UserId) -> Result<()> {
        self.enter("delete", format!("DELETE {id}"))?;
        Ok(())
    }
}

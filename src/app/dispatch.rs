//! Running gateway calls off the UI thread.
//!
//! Requests are spawned onto the tokio runtime; each task sends its
//! [`Completion`] back over a channel that the event loop drains every tick.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use tokio::runtime::Handle;
use tracing::debug;

use crate::directory::Completion;
use crate::form::{SubmitKind, SubmitRequest};
use crate::gateway::SyncGateway;
use crate::model::UserId;

/// Where the key handler sends gateway work.
pub trait Dispatch {
    fn load(&mut self);
    fn submit(&mut self, request: SubmitRequest);
    fn delete(&mut self, id: UserId);
}

pub struct RuntimeDispatcher {
    handle: Handle,
    gateway: Arc<dyn SyncGateway>,
    tx: Sender<Completion>,
}

impl RuntimeDispatcher {
    pub fn new(handle: Handle, gateway: Arc<dyn SyncGateway>, tx: Sender<Completion>) -> Self {
        Self { handle, gateway, tx }
    }
}

impl Dispatch for RuntimeDispatcher {
    fn load(&mut self) {
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = gateway.list().await;
            // the receiver is gone only when the UI has quit
            let _ = tx.send(Completion::Loaded(result));
        });
    }

    fn submit(&mut self, request: SubmitRequest) {
        debug!(mode = ?request.mode(), "dispatching submit");
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = match &request.kind {
                SubmitKind::Create(record) => gateway.create(record).await,
                SubmitKind::Update(id, record) => gateway.update(*id, record).await,
            };
            let _ = tx.send(Completion::Submitted { request, result });
        });
    }

    fn delete(&mut self, id: UserId) {
        debug!(%id, "dispatching delete");
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = gateway.delete(id).await;
            let _ = tx.send(Completion::Deleted { id, result });
        });
    }
}

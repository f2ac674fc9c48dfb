use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

use super::SyncGateway;
use crate::error::{Result, TransportError};
use crate::model::{UserId, UserRecord};

pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// `SyncGateway` over a JSON REST collection (`GET/POST <base>`,
/// `PUT/DELETE <base>/<id>`).
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(%base_url, timeout_secs = timeout.as_secs(), "created HTTP gateway");
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn record_url(&self, id: UserId) -> String {
        format!("{}/{}", self.base_url, id)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

fn ensure_success(method: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TransportError::Status {
            method,
            url: response.url().to_string(),
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl SyncGateway for HttpGateway {
    async fn list(&self) -> Result<Vec<UserRecord>> {
        debug!(url = %self.base_url, "GET users");
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest("GET", e))?;
        Self::decode(ensure_success("GET", response)?).await
    }

    async fn create(&self, record: &UserRecord) -> Result<UserRecord> {
        debug!(url = %self.base_url, "POST user");
        let response = self
            .client
            .post(&self.base_url)
            .json(record)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest("POST", e))?;
        Self::decode(ensure_success("POST", response)?).await
    }

    async fn update(&self, id: UserId, record: &UserRecord) -> Result<UserRecord> {
        let url = self.record_url(id);
        debug!(%url, "PUT user");
        let response = self
            .client
            .put(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest("PUT", e))?;
        Self::decode(ensure_success("PUT", response)?).await
    }

    async fn delete(&self, id: UserId) -> Result<()> {
        let url = self.record_url(id);
        debug!(%url, "DELETE user");
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest("DELETE", e))?;
        ensure_success("DELETE", response).map(|_| ())
    }
}

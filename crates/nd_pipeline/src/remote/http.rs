use std::time::Duration;

use async_trait::async_trait;
use nd_core::{Error, Result};
use serde_json::Value;
use tracing::{debug, warn};

use super::{CommandRequest, RemoteExecutor};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Posts command requests to an executor gateway.
pub struct HttpExecutor {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpExecutor {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        url::Url::parse(&endpoint).map_err(|e| Error::InvalidUrl(format!("{}: {}", endpoint, e)))?;
        Ok(Self {
            endpoint,
            http: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    /// Accepts `{"Command":{"CommandId":..}}` or `{"command_id":..}`.
    fn command_id(body: &Value) -> Option<String> {
        body.pointer("/Command/CommandId")
            .or_else(|| body.get("command_id"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(String::from)
    }
}

#[async_trait]
impl RemoteExecutor for HttpExecutor {
    async fn send_command(&self, request: &CommandRequest) -> Result<String> {
        let resp = self.http.post(&self.endpoint).json(request).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Executor gateway returned non-success");
            return Err(Error::Dispatch(format!("executor gateway returned {}", status)));
        }

        let body: Value = resp.json().await?;
        debug!("Executor response: {}", body);
        Self::command_id(&body)
            .ok_or_else(|| Error::Dispatch("executor response carried no command id".to_string()))
    }
}

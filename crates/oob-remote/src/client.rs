//! Remote backend client.
//!
//! One request per step invocation, no retries, no fan-out. Connection
//! pooling lives inside reqwest; every call is independent and safe to
//! repeat at the protocol level.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use oob_core::{StepError, StepResult, TenantConfig};

use crate::request::RemoteRequest;
use crate::response::{RemoteFailure, RemoteReply, RemoteResponse};

/// Transport-level request timeout, independent of challenge expiry.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A synchronous-per-invocation channel to the risk backend.
///
/// Implementations must be safe to call repeatedly with identical
/// requests; the polling loop re-sends status checks with unchanged
/// identifiers.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Sends one request and decodes the reply.
    ///
    /// # Errors
    ///
    /// Returns `StepError::Transport` when the backend is unreachable or
    /// replies non-2xx without a decodable failure body, and
    /// `StepError::Decode` when a 2xx body does not match the expected
    /// shape.
    async fn send(&self, request: &RemoteRequest) -> StepResult<RemoteReply>;
}

/// HTTP implementation of [`RemoteClient`].
pub struct HttpRemoteClient {
    client: reqwest::Client,
    config: TenantConfig,
}

impl HttpRemoteClient {
    /// Creates a client for the given tenant.
    ///
    /// # Errors
    ///
    /// Returns `StepError::Transport` when the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: TenantConfig) -> StepResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| StepError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// The tenant configuration this client addresses.
    #[must_use]
    pub const fn config(&self) -> &TenantConfig {
        &self.config
    }

    fn url_for(&self, request: &RemoteRequest) -> String {
        format!(
            "{}{}",
            self.config.base_url,
            request.operation().endpoint_path()
        )
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn send(&self, request: &RemoteRequest) -> StepResult<RemoteReply> {
        let operation = request.operation();
        let correlation_id = Uuid::now_v7();
        tracing::debug!(%operation, %correlation_id, "sending backend request");

        let response = self
            .client
            .post(self.url_for(request))
            .header("X-Tenant-Id", &self.config.tenant_id)
            .header("X-Environment", self.config.environment.as_str())
            .header("X-Correlation-Id", correlation_id.to_string())
            .json(request)
            .send()
            .await
            .map_err(|e| StepError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let decoded: RemoteResponse = response
                .json()
                .await
                .map_err(|e| StepError::Decode(e.to_string()))?;
            return Ok(RemoteReply::Ok(decoded));
        }

        // A refusal with a decodable body is a protocol-level reply, not a
        // transport error.
        let body = response
            .text()
            .await
            .map_err(|e| StepError::Transport(e.to_string()))?;
        match serde_json::from_str::<RemoteFailure>(&body) {
            Ok(failure) if !failure.business_retcode.is_empty() || !failure.message.is_empty() => {
                tracing::warn!(%operation, status = status.as_u16(), "backend refused request");
                Ok(RemoteReply::Refused(failure))
            }
            _ => Err(StepError::Transport(format!("HTTP {status}: {body}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oob_core::context::keys;
    use oob_core::{Context, Environment, StepConfig};

    #[test]
    fn endpoint_urls_follow_the_operation() {
        let config = TenantConfig::new("acme", "https://risk.example.com/api/")
            .with_environment(Environment::Sandbox);
        let client = HttpRemoteClient::new(config).unwrap();

        let mut ctx = Context::new();
        ctx.set(keys::USERNAME, "tyler4");
        let request = RemoteRequest::check_activation(&ctx, &StepConfig::new()).unwrap();

        assert_eq!(
            client.url_for(&request),
            "https://risk.example.com/api/v1/devices/activation"
        );
        assert_eq!(client.config().environment, Environment::Sandbox);
    }
}

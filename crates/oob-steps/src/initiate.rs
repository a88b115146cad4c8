//! Initiation orchestrators: device registration and login.
//!
//! States: `Start → {Error, StepUp}`. A successful call leaves the
//! challenge identifiers, display message, and a fresh deadline in the
//! context and returns `StepUp`; any validation or remote failure returns
//! `Error` with the message stored at the well-known error key.

use std::sync::Arc;

use async_trait::async_trait;

use oob_core::{CollectedInput, Context, StepConfig, StepOutput, StepResult};
use oob_remote::{classify_initiation, RemoteClient, RemoteRequest, StatusMap};

use crate::step::{apply, fail, Step, StepKind};

/// Shared initiation shape: build, send, classify, apply.
///
/// The collected credential is forwarded to the request builder rather
/// than staged in the context, so a failed invocation leaves nothing
/// behind but the error key.
pub(crate) async fn run_initiation(
    client: &dyn RemoteClient,
    status_map: &StatusMap,
    config: &StepConfig,
    context: &mut Context,
    request: StepResult<RemoteRequest>,
) -> StepOutput {
    let request = match request {
        Ok(request) => request,
        Err(error) => return fail(context, &error),
    };
    match client.send(&request).await {
        Ok(reply) => apply(
            context,
            classify_initiation(&reply, status_map, config.timeout_seconds),
        ),
        Err(error) => fail(context, &error),
    }
}

/// Registers a mobile device for the user and issues the activation
/// challenge.
pub struct RegisterDeviceStep {
    config: StepConfig,
    status_map: StatusMap,
    client: Arc<dyn RemoteClient>,
}

impl RegisterDeviceStep {
    /// Creates the step with the default status map.
    #[must_use]
    pub fn new(config: StepConfig, client: Arc<dyn RemoteClient>) -> Self {
        Self {
            config,
            status_map: StatusMap::new(),
            client,
        }
    }

    /// Replaces the status-token mapping table.
    #[must_use]
    pub fn with_status_map(mut self, status_map: StatusMap) -> Self {
        self.status_map = status_map;
        self
    }
}

#[async_trait]
impl Step for RegisterDeviceStep {
    fn kind(&self) -> StepKind {
        StepKind::RegisterDevice
    }

    async fn process(&self, context: &mut Context, input: &CollectedInput) -> StepOutput {
        let request =
            RemoteRequest::register_device(context, &self.config, input.credential.as_deref());
        run_initiation(&*self.client, &self.status_map, &self.config, context, request).await
    }
}

/// Initiates a login challenge to the user's registered device.
pub struct LoginStep {
    config: StepConfig,
    status_map: StatusMap,
    client: Arc<dyn RemoteClient>,
}

impl LoginStep {
    /// Creates the step with the default status map.
    #[must_use]
    pub fn new(config: StepConfig, client: Arc<dyn RemoteClient>) -> Self {
        Self {
            config,
            status_map: StatusMap::new(),
            client,
        }
    }

    /// Replaces the status-token mapping table.
    #[must_use]
    pub fn with_status_map(mut self, status_map: StatusMap) -> Self {
        self.status_map = status_map;
        self
    }
}

#[async_trait]
impl Step for LoginStep {
    fn kind(&self) -> StepKind {
        StepKind::Login
    }

    async fn process(&self, context: &mut Context, input: &CollectedInput) -> StepOutput {
        let request = RemoteRequest::login(context, &self.config, input.credential.as_deref());
        run_initiation(&*self.client, &self.status_map, &self.config, context, request).await
    }
}

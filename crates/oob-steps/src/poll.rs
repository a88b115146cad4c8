//! Polling orchestrators: activation and challenge status.
//!
//! States: `Start → {Error, Timeout, Unknown, Pending, Success}`. The
//! expiry tracker is consulted BEFORE any remote call: an already-expired
//! challenge short-circuits to `Timeout` without contacting the backend,
//! which keeps timeouts deterministic even when the backend is down and
//! avoids wasted calls.

use std::sync::Arc;

use async_trait::async_trait;

use oob_core::{expiry, CollectedInput, Context, Outcome, StepConfig, StepOutput, StepResult};
use oob_remote::{classify_status, RemoteClient, RemoteRequest, StatusMap};

use crate::step::{apply, fail, Step, StepKind};

/// Message stored when a poll finds the deadline already passed.
const EXPIRED_MESSAGE: &str = "challenge expired before approval";

/// Shared polling shape: expiry check first, then build, send, classify.
async fn run_poll(
    client: &dyn RemoteClient,
    status_map: &StatusMap,
    config: &StepConfig,
    context: &mut Context,
    build: impl FnOnce(&Context, &StepConfig) -> StepResult<RemoteRequest>,
) -> StepOutput {
    if let Err(error) = context.require(&config.username_key) {
        return fail(context, &error);
    }
    match expiry::is_expired(context) {
        Err(error) => return fail(context, &error),
        Ok(true) => {
            context.set_error(EXPIRED_MESSAGE);
            return StepOutput::complete(Outcome::Timeout);
        }
        Ok(false) => {}
    }
    let request = match build(context, config) {
        Ok(request) => request,
        Err(error) => return fail(context, &error),
    };
    match client.send(&request).await {
        Ok(reply) => apply(
            context,
            classify_status(&reply, status_map, config.timeout_seconds),
        ),
        Err(error) => fail(context, &error),
    }
}

/// Polls the activation status of a registering device.
pub struct CheckActivationStep {
    config: StepConfig,
    status_map: StatusMap,
    client: Arc<dyn RemoteClient>,
}

impl CheckActivationStep {
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
impl Step for CheckActivationStep {
    fn kind(&self) -> StepKind {
        StepKind::CheckActivation
    }

    async fn process(&self, context: &mut Context, _input: &CollectedInput) -> StepOutput {
        run_poll(
            &*self.client,
            &self.status_map,
            &self.config,
            context,
            RemoteRequest::check_activation,
        )
        .await
    }
}

/// Polls the approval status of an issued challenge.
pub struct CheckSessionStatusStep {
    config: StepConfig,
    status_map: StatusMap,
    client: Arc<dyn RemoteClient>,
}

impl CheckSessionStatusStep {
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
impl Step for CheckSessionStatusStep {
    fn kind(&self) -> StepKind {
        StepKind::CheckSessionStatus
    }

    async fn process(&self, context: &mut Context, _input: &CollectedInput) -> StepOutput {
        run_poll(
            &*self.client,
            &self.status_map,
            &self.config,
            context,
            RemoteRequest::check_session_status,
        )
        .await
    }
}

//! Validation orchestrators: generic events and transactions.
//!
//! Same shape as login initiation, but the event type is either a fixed
//! configured string or read from the context, and domain attributes
//! (amount, currency, IBANs, ...) are merged into the request from
//! configured context key mappings.

use std::sync::Arc;

use async_trait::async_trait;

use oob_core::{CollectedInput, Context, StepConfig, StepOutput};
use oob_remote::{RemoteClient, RemoteRequest, StatusMap};

use crate::initiate::run_initiation;
use crate::step::{Step, StepKind};

/// Issues a validation challenge for a generic user event.
pub struct ValidateEventStep {
    config: StepConfig,
    status_map: StatusMap,
    client: Arc<dyn RemoteClient>,
}

impl ValidateEventStep {
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
impl Step for ValidateEventStep {
    fn kind(&self) -> StepKind {
        StepKind::ValidateEvent
    }

    async fn process(&self, context: &mut Context, _input: &CollectedInput) -> StepOutput {
        let request = RemoteRequest::validate_event(context, &self.config);
        run_initiation(&*self.client, &self.status_map, &self.config, context, request).await
    }
}

/// Issues a validation challenge for a transaction, forwarding the
/// configured transaction attributes for device display.
pub struct ValidateTransactionStep {
    config: StepConfig,
    status_map: StatusMap,
    client: Arc<dyn RemoteClient>,
}

impl ValidateTransactionStep {
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
impl Step for ValidateTransactionStep {
    fn kind(&self) -> StepKind {
        StepKind::ValidateTransaction
    }

    async fn process(&self, context: &mut Context, _input: &CollectedInput) -> StepOutput {
        let request = RemoteRequest::validate_transaction(context, &self.config);
        run_initiation(&*self.client, &self.status_map, &self.config, context, request).await
    }
}

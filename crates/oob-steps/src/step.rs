//! The step invocation contract and registry.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use oob_core::{CollectedInput, Context, Outcome, StepConfig, StepError, StepOutput};
use oob_remote::{Classification, RemoteClient};

use crate::collect::CollectStep;
use crate::initiate::{LoginStep, RegisterDeviceStep};
use crate::poll::{CheckActivationStep, CheckSessionStatusStep};
use crate::validate::{ValidateEventStep, ValidateTransactionStep};

/// The step variants, selected by pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    /// Device registration initiation.
    RegisterDevice,
    /// Login challenge initiation.
    Login,
    /// Generic event validation initiation.
    ValidateEvent,
    /// Transaction validation initiation.
    ValidateTransaction,
    /// Device activation polling.
    CheckActivation,
    /// Challenge approval polling.
    CheckSessionStatus,
    /// Pure local input collection.
    Collect,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RegisterDevice => "registerDevice",
            Self::Login => "login",
            Self::ValidateEvent => "validateEvent",
            Self::ValidateTransaction => "validateTransaction",
            Self::CheckActivation => "checkActivation",
            Self::CheckSessionStatus => "checkSessionStatus",
            Self::Collect => "collect",
        };
        write!(f, "{s}")
    }
}

/// One operation's request/response/expiry logic behind a single
/// invocation contract.
///
/// Implementations are stateless between calls except through the
/// externally persisted context, and must tolerate repeated invocation
/// with no side channel other than the context and the remote backend.
#[async_trait]
pub trait Step: Send + Sync {
    /// The variant this step implements.
    fn kind(&self) -> StepKind;

    /// Runs one invocation.
    ///
    /// Errors never cross this boundary: they are folded into an `Error`
    /// outcome with the message written at the well-known error key.
    async fn process(&self, context: &mut Context, input: &CollectedInput) -> StepOutput;
}

/// Builds the step orchestrator for a configured variant.
///
/// Dispatch by tagged variant rather than subclassing; the collector
/// variant never touches the client it is handed.
#[must_use]
pub fn step_for(
    kind: StepKind,
    config: StepConfig,
    client: Arc<dyn RemoteClient>,
) -> Box<dyn Step> {
    match kind {
        StepKind::RegisterDevice => Box::new(RegisterDeviceStep::new(config, client)),
        StepKind::Login => Box::new(LoginStep::new(config, client)),
        StepKind::ValidateEvent => Box::new(ValidateEventStep::new(config, client)),
        StepKind::ValidateTransaction => Box::new(ValidateTransactionStep::new(config, client)),
        StepKind::CheckActivation => Box::new(CheckActivationStep::new(config, client)),
        StepKind::CheckSessionStatus => Box::new(CheckSessionStatusStep::new(config, client)),
        StepKind::Collect => Box::new(CollectStep::new(config)),
    }
}

/// Folds a local error into an `Error` outcome, touching only the error
/// key.
pub(crate) fn fail(context: &mut Context, error: &StepError) -> StepOutput {
    tracing::debug!(%error, "step failed locally");
    context.set_error(error.to_string());
    StepOutput::complete(Outcome::Error)
}

/// Applies a classification atomically: all mutations, then the message
/// for non-advancing outcomes.
pub(crate) fn apply(context: &mut Context, classification: Classification) -> StepOutput {
    for (key, value) in classification.mutations {
        context.set(key, value);
    }
    if let Some(message) = classification.message {
        context.set_error(message);
    }
    StepOutput::complete(classification.outcome)
}

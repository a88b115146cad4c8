//! Response classification.
//!
//! Reduces a decoded backend reply to an outcome plus the set of context
//! mutations to apply. Mutations are returned, not applied, so the
//! orchestrator can apply them atomically: a step either applies its full
//! mutation set or leaves the context untouched.

use oob_core::context::keys;
use oob_core::expiry::compute_expiry;
use oob_core::Outcome;

use crate::response::{RemoteReply, RemoteResponse};
use crate::status::{StatusClass, StatusMap};

/// Outcome plus the context mutations it implies.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// The outcome label for this step invocation.
    pub outcome: Outcome,
    /// Context writes to apply as one unit.
    pub mutations: Vec<(String, String)>,
    /// User-visible message, written to the error key for non-advancing
    /// outcomes.
    pub message: Option<String>,
}

impl Classification {
    fn advance(outcome: Outcome, mutations: Vec<(String, String)>) -> Self {
        Self {
            outcome,
            mutations,
            message: None,
        }
    }

    fn halt(outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            outcome,
            mutations: Vec::new(),
            message: Some(message.into()),
        }
    }

    const fn pending() -> Self {
        Self {
            outcome: Outcome::Pending,
            mutations: Vec::new(),
            message: None,
        }
    }
}

/// Classifies the reply to an initiation operation (register, login,
/// validate event, validate transaction).
///
/// An accepted operation advances the attempt: the challenge identifiers
/// and display payload are written, and a fresh deadline of
/// `timeout_seconds` from now replaces any previous one.
#[must_use]
pub fn classify_initiation(
    reply: &RemoteReply,
    map: &StatusMap,
    timeout_seconds: i64,
) -> Classification {
    match reply {
        RemoteReply::Refused(failure) => {
            tracing::debug!(
                retcode = %failure.retcode,
                business_retcode = %failure.business_retcode,
                "initiation refused by backend"
            );
            Classification::halt(Outcome::Error, rejection_message(&failure.message))
        }
        RemoteReply::Ok(response) if map.is_success_retcode(&response.retcode) => {
            Classification::advance(Outcome::StepUp, advance_mutations(response, timeout_seconds))
        }
        RemoteReply::Ok(response) => Classification::halt(
            Outcome::Error,
            response
                .message
                .clone()
                .unwrap_or_else(|| format!("request rejected ({})", response.retcode)),
        ),
    }
}

/// Classifies the reply to a status-check operation (check activation,
/// check session status).
///
/// A non-success `retcode` takes priority over any session status: the
/// referenced session or username matches no live attempt, so the reply
/// is `Unknown` no matter what lifecycle token rides along. `Pending`
/// applies no mutations, leaving the stored deadline untouched so
/// subsequent polls keep the same one.
#[must_use]
pub fn classify_status(
    reply: &RemoteReply,
    map: &StatusMap,
    timeout_seconds: i64,
) -> Classification {
    match reply {
        RemoteReply::Refused(failure) if map.is_unmatched_retcode(&failure.business_retcode) => {
            Classification::halt(Outcome::Unknown, rejection_message(&failure.message))
        }
        RemoteReply::Refused(failure) => {
            Classification::halt(Outcome::Error, rejection_message(&failure.message))
        }
        RemoteReply::Ok(response) if !map.is_success_retcode(&response.retcode) => {
            tracing::debug!(retcode = %response.retcode, "status check rejected by backend");
            Classification::halt(
                Outcome::Unknown,
                response
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("request rejected ({})", response.retcode)),
            )
        }
        RemoteReply::Ok(response) => {
            let Some(status) = response.session_status.as_deref() else {
                return Classification::halt(
                    Outcome::Unknown,
                    "backend reply carried no session status",
                );
            };
            let class = map.classify_session_status(status);
            tracing::debug!(status, ?class, "classified session status");
            match class {
                StatusClass::Pending => Classification::pending(),
                StatusClass::Accepted => Classification::advance(
                    Outcome::Success,
                    advance_mutations(response, timeout_seconds),
                ),
                StatusClass::Refused => Classification::halt(
                    Outcome::Error,
                    response
                        .message
                        .clone()
                        .unwrap_or_else(|| "challenge refused".to_string()),
                ),
                StatusClass::Timeout => Classification::halt(
                    Outcome::Timeout,
                    "challenge expired before approval",
                ),
                StatusClass::Unmatched => Classification::halt(
                    Outcome::Unknown,
                    "no matching attempt for the referenced session",
                ),
                StatusClass::Unrecognized => Classification::halt(
                    Outcome::Unknown,
                    format!("unrecognized backend status: {status}"),
                ),
            }
        }
    }
}

/// The mutation set for an advancing reply.
///
/// Empty backend fields are skipped so they cannot clobber earlier state.
fn advance_mutations(response: &RemoteResponse, timeout_seconds: i64) -> Vec<(String, String)> {
    let mut mutations = Vec::new();
    let mut push = |key: &str, value: Option<String>| {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            mutations.push((key.to_string(), value));
        }
    };

    push(keys::SESSION_ID, response.session_id.clone());
    push(keys::REQUEST_ID, response.request_id.clone());
    push(keys::COMMAND, response.command.clone());
    push(keys::CHALLENGE_MESSAGE, response.challenge.clone());
    push(keys::DEVICE_STATUS, response.device_status.clone());
    let irm = response
        .risk_response_code
        .map(|code| code.to_string())
        .unwrap_or_else(|| response.retcode.clone());
    push(keys::IRM_RESPONSE, Some(irm));
    push(
        keys::EVENT_EXPIRY_DATE,
        Some(compute_expiry(timeout_seconds)),
    );
    mutations
}

fn rejection_message(message: &str) -> String {
    if message.is_empty() {
        "request rejected by backend".to_string()
    } else {
        message.to_string()
    }
}

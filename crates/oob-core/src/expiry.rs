//! Challenge expiry tracking.
//!
//! Deadlines are absolute epoch-millisecond timestamps stored in the
//! context as strings for transport fidelity. Every polling step checks
//! expiry BEFORE issuing a remote call, so timeouts stay deterministic
//! even when the backend is unreachable.

use chrono::Utc;

use crate::context::{keys, Context};
use crate::error::{StepError, StepResult};

/// Computes a fresh deadline `timeout_seconds` from now, as an
/// epoch-millisecond string.
#[must_use]
pub fn compute_expiry(timeout_seconds: i64) -> String {
    let deadline = Utc::now().timestamp_millis() + timeout_seconds * 1000;
    deadline.to_string()
}

/// Parses a stored deadline back to epoch milliseconds.
///
/// # Errors
///
/// Returns `StepError::Validation` when the value is not a well-formed
/// epoch-millisecond timestamp.
pub fn parse_deadline(value: &str) -> StepResult<i64> {
    value
        .parse::<i64>()
        .map_err(|_| StepError::Validation(keys::EVENT_EXPIRY_DATE.to_string()))
}

/// Checks whether the challenge deadline stored in the context has passed.
///
/// # Errors
///
/// Returns `StepError::Validation` when the context holds no deadline or
/// the stored value cannot be parsed; polling steps surface that as
/// `Error`, not `Timeout`.
pub fn is_expired(context: &Context) -> StepResult<bool> {
    let stored = context.require(keys::EVENT_EXPIRY_DATE)?;
    let deadline = parse_deadline(stored)?;
    Ok(Utc::now().timestamp_millis() >= deadline)
}

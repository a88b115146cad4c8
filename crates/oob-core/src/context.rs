//! Shared context store for one authentication attempt.
//!
//! The context is an insertion-ordered key-value bag accumulated across the
//! sequential steps of one attempt. It is created empty when the attempt
//! starts, mutated additively by each step invocation, persisted between
//! invocations by the pipeline, and discarded when the attempt terminates.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{StepError, StepResult};

/// A single context value: a scalar string or a structured JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    /// Scalar string value (the common case; all protocol fields are
    /// transported as strings).
    Text(String),
    /// Structured value (attribute maps, pass-through payloads).
    Structured(serde_json::Value),
}

impl ContextValue {
    /// Returns the scalar string form, if this is a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Structured(_) => None,
        }
    }

    /// Returns whether the value is empty (empty string or JSON null).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Structured(v) => v.is_null(),
        }
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<serde_json::Value> for ContextValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Structured(value)
    }
}

/// The accumulated key-value state of one authentication attempt.
///
/// Once a key has been written by an earlier step, later steps must not
/// silently overwrite it with an empty value; [`Context::set`] enforces
/// this, and [`Context::redefine`] exists for the explicit cases where an
/// attempt is being restarted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    entries: IndexMap<String, ContextValue>,
}

impl Context {
    /// Creates an empty context (attempt start).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.get(key)
    }

    /// Gets a scalar string value by key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(ContextValue::as_str)
    }

    /// Returns the non-empty scalar value for `key`, or a validation error
    /// naming the missing field.
    pub fn require(&self, key: &str) -> StepResult<&str> {
        match self.get_str(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(StepError::Validation(key.to_string())),
        }
    }

    /// Checks whether a key holds a non-empty value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|v| !v.is_empty())
    }

    /// Writes a value.
    ///
    /// An empty value never replaces an existing non-empty one; use
    /// [`Context::redefine`] when the attempt is explicitly being reset.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        let key = key.into();
        let value = value.into();
        if value.is_empty() && self.contains(&key) {
            return;
        }
        self.entries.insert(key, value);
    }

    /// Unconditionally writes a value, even an empty one over existing state.
    pub fn redefine(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Removes a key, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<ContextValue> {
        self.entries.shift_remove(key)
    }

    /// Writes the user-visible error message at the well-known error key.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.set(keys::ERROR_MESSAGE, message.into());
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the context holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Well-known context keys shared across steps.
pub mod keys {
    /// User being authenticated.
    pub const USERNAME: &str = "username";
    /// Backend session identifier for the current challenge.
    pub const SESSION_ID: &str = "sessionId";
    /// Backend request identifier for the current challenge.
    pub const REQUEST_ID: &str = "requestId";
    /// Absolute challenge deadline, epoch milliseconds as a string.
    pub const EVENT_EXPIRY_DATE: &str = "eventExpiryDate";
    /// Command echoed by the backend for the device.
    pub const COMMAND: &str = "command";
    /// Raw risk-backend status code.
    pub const IRM_RESPONSE: &str = "irmResponse";
    /// Encoded payload shown on the registered device.
    pub const CHALLENGE_MESSAGE: &str = "challengeMessage";
    /// User-visible error message from a failed step.
    pub const ERROR_MESSAGE: &str = "errorMessage";
    /// Dynamic event type source for event validation.
    pub const EVENT_TYPE: &str = "eventType";
    /// Raw device fingerprint collected by the login page.
    pub const FINGERPRINT_RAW: &str = "fingerprintRaw";
    /// Hashed device fingerprint collected by the login page.
    pub const FINGERPRINT_HASH: &str = "fingerprintHash";
    /// Device status reported by activation checks.
    pub const DEVICE_STATUS: &str = "deviceStatus";
}

//! Outbound request payloads and their validating builders.
//!
//! Building a request is a pure transform over context plus step
//! configuration; the builder never contacts the network. Each operation
//! has its own required-field set, and the first missing field fails the
//! build with a validation error naming it.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use oob_core::context::{keys, Context};
use oob_core::{EventType, StepConfig, StepError, StepResult};

/// Optional attribute map forwarded verbatim to the backend.
pub type Attributes = IndexMap<String, serde_json::Value>;

/// The backend operations this core can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemoteOperation {
    /// Register a mobile device for a user.
    #[serde(rename = "registerDevice")]
    RegisterDevice,
    /// Initiate a login challenge.
    #[serde(rename = "login")]
    Login,
    /// Initiate a generic event validation challenge.
    #[serde(rename = "validateEvent")]
    ValidateEvent,
    /// Initiate a transaction validation challenge.
    #[serde(rename = "validateTransaction")]
    ValidateTransaction,
    /// Poll the activation status of a registering device.
    #[serde(rename = "checkActivation")]
    CheckActivation,
    /// Poll the approval status of an issued challenge.
    #[serde(rename = "checkSessionStatus")]
    CheckSessionStatus,
}

impl RemoteOperation {
    /// Returns the wire token for this operation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RegisterDevice => "registerDevice",
            Self::Login => "login",
            Self::ValidateEvent => "validateEvent",
            Self::ValidateTransaction => "validateTransaction",
            Self::CheckActivation => "checkActivation",
            Self::CheckSessionStatus => "checkSessionStatus",
        }
    }

    /// Returns the endpoint path for this operation.
    #[must_use]
    pub const fn endpoint_path(&self) -> &'static str {
        match self {
            Self::RegisterDevice => "/v1/devices/register",
            Self::Login => "/v1/users/login",
            Self::ValidateEvent => "/v1/events/validate",
            Self::ValidateTransaction => "/v1/transactions/validate",
            Self::CheckActivation => "/v1/devices/activation",
            Self::CheckSessionStatus => "/v1/sessions/status",
        }
    }

    /// Returns whether this operation polls a previously issued challenge.
    #[must_use]
    pub const fn is_status_check(&self) -> bool {
        matches!(self, Self::CheckActivation | Self::CheckSessionStatus)
    }
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RemoteOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registerDevice" => Ok(Self::RegisterDevice),
            "login" => Ok(Self::Login),
            "validateEvent" => Ok(Self::ValidateEvent),
            "validateTransaction" => Ok(Self::ValidateTransaction),
            "checkActivation" => Ok(Self::CheckActivation),
            "checkSessionStatus" => Ok(Self::CheckSessionStatus),
            _ => Err(format!("unknown operation: {s}")),
        }
    }
}

/// Device registration payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDevicePayload {
    /// User registering the device.
    pub username: String,
    /// Activation password, when the step collects one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_password: Option<String>,
    /// Pass-through attributes.
    #[serde(skip_serializing_if = "Attributes::is_empty", default)]
    pub attributes: Attributes,
}

/// Login challenge payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    /// User logging in.
    pub username: String,
    /// Raw device fingerprint from the login page.
    pub fingerprint_raw: String,
    /// Hashed device fingerprint from the login page.
    pub fingerprint_hash: String,
    /// Collected credential, when the step is configured with one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    /// Pass-through attributes.
    #[serde(skip_serializing_if = "Attributes::is_empty", default)]
    pub attributes: Attributes,
}

/// Generic event validation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateEventPayload {
    /// User the event belongs to.
    pub username: String,
    /// Event type, fixed by configuration or read from the context.
    pub event_type: String,
    /// Pass-through attributes.
    #[serde(skip_serializing_if = "Attributes::is_empty", default)]
    pub attributes: Attributes,
}

/// Transaction validation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTransactionPayload {
    /// User the transaction belongs to.
    pub username: String,
    /// Transaction attributes (amount, currency, IBANs, ...), all required.
    pub attributes: Attributes,
}

/// Activation status poll payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckActivationPayload {
    /// User whose device activation is being polled.
    pub username: String,
}

/// Challenge status poll payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSessionStatusPayload {
    /// User whose challenge is being polled.
    pub username: String,
    /// Session identifier issued with the challenge.
    #[serde(rename = "sessionID")]
    pub session_id: String,
    /// Request identifier issued with the challenge.
    #[serde(rename = "requestID", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// A typed outbound request, one variant per operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RemoteRequest {
    /// Device registration.
    RegisterDevice(RegisterDevicePayload),
    /// Login challenge.
    Login(LoginPayload),
    /// Generic event validation challenge.
    ValidateEvent(ValidateEventPayload),
    /// Transaction validation challenge.
    ValidateTransaction(ValidateTransactionPayload),
    /// Activation status poll.
    CheckActivation(CheckActivationPayload),
    /// Challenge status poll.
    CheckSessionStatus(CheckSessionStatusPayload),
}

impl RemoteRequest {
    /// Returns the operation this request invokes.
    #[must_use]
    pub const fn operation(&self) -> RemoteOperation {
        match self {
            Self::RegisterDevice(_) => RemoteOperation::RegisterDevice,
            Self::Login(_) => RemoteOperation::Login,
            Self::ValidateEvent(_) => RemoteOperation::ValidateEvent,
            Self::ValidateTransaction(_) => RemoteOperation::ValidateTransaction,
            Self::CheckActivation(_) => RemoteOperation::CheckActivation,
            Self::CheckSessionStatus(_) => RemoteOperation::CheckSessionStatus,
        }
    }

    /// Builds a device registration request.
    ///
    /// A credential collected for this invocation is forwarded directly;
    /// it never lands in the context, so a failed invocation cannot
    /// persist it.
    ///
    /// # Errors
    ///
    /// Returns `StepError::Validation` naming the first missing required
    /// field.
    pub fn register_device(
        context: &Context,
        config: &StepConfig,
        credential: Option<&str>,
    ) -> StepResult<Self> {
        Ok(Self::RegisterDevice(RegisterDevicePayload {
            username: context.require(&config.username_key)?.to_string(),
            activation_password: credential_value(context, config, credential),
            attributes: optional_attributes(context, config),
        }))
    }

    /// Builds a login challenge request.
    ///
    /// A credential collected for this invocation is forwarded directly;
    /// it never lands in the context, so a failed invocation cannot
    /// persist it.
    ///
    /// # Errors
    ///
    /// Returns `StepError::Validation` naming the first missing required
    /// field (username, then the fingerprint fields).
    pub fn login(
        context: &Context,
        config: &StepConfig,
        credential: Option<&str>,
    ) -> StepResult<Self> {
        Ok(Self::Login(LoginPayload {
            username: context.require(&config.username_key)?.to_string(),
            fingerprint_raw: context.require(keys::FINGERPRINT_RAW)?.to_string(),
            fingerprint_hash: context.require(keys::FINGERPRINT_HASH)?.to_string(),
            credential: credential_value(context, config, credential),
            attributes: optional_attributes(context, config),
        }))
    }

    /// Builds a generic event validation request.
    ///
    /// # Errors
    ///
    /// Returns `StepError::Validation` when the username is missing, or
    /// when a context-sourced event type is absent.
    pub fn validate_event(context: &Context, config: &StepConfig) -> StepResult<Self> {
        let event_type = match &config.event_type {
            EventType::Fixed(value) => value.clone(),
            EventType::FromContext(key) => context.require(key)?.to_string(),
        };
        Ok(Self::ValidateEvent(ValidateEventPayload {
            username: context.require(&config.username_key)?.to_string(),
            event_type,
            attributes: optional_attributes(context, config),
        }))
    }

    /// Builds a transaction validation request.
    ///
    /// Every configured transaction attribute is required; the first one
    /// whose context key is absent fails the build.
    ///
    /// # Errors
    ///
    /// Returns `StepError::Validation` naming the first missing field.
    pub fn validate_transaction(context: &Context, config: &StepConfig) -> StepResult<Self> {
        let username = context.require(&config.username_key)?.to_string();
        if config.attribute_keys.is_empty() {
            return Err(StepError::Validation("transactionAttributes".to_string()));
        }
        let mut attributes = Attributes::new();
        for (field, context_key) in &config.attribute_keys {
            let value = context
                .get(context_key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| StepError::Validation(field.clone()))?;
            attributes.insert(field.clone(), context_value_to_json(value));
        }
        Ok(Self::ValidateTransaction(ValidateTransactionPayload {
            username,
            attributes,
        }))
    }

    /// Builds an activation status poll request.
    ///
    /// # Errors
    ///
    /// Returns `StepError::Validation` when the username is missing.
    pub fn check_activation(context: &Context, config: &StepConfig) -> StepResult<Self> {
        Ok(Self::CheckActivation(CheckActivationPayload {
            username: context.require(&config.username_key)?.to_string(),
        }))
    }

    /// Builds a challenge status poll request.
    ///
    /// # Errors
    ///
    /// Returns `StepError::Validation` when the username or the stored
    /// session identifier is missing.
    pub fn check_session_status(context: &Context, config: &StepConfig) -> StepResult<Self> {
        Ok(Self::CheckSessionStatus(CheckSessionStatusPayload {
            username: context.require(&config.username_key)?.to_string(),
            session_id: context.require(keys::SESSION_ID)?.to_string(),
            request_id: context.get_str(keys::REQUEST_ID).map(String::from),
        }))
    }
}

/// Resolves the configured optional attributes from the context.
///
/// Unknown keys pass through without validation; missing keys are omitted.
fn optional_attributes(context: &Context, config: &StepConfig) -> Attributes {
    let mut attributes = Attributes::new();
    for (field, context_key) in &config.attribute_keys {
        if let Some(value) = context.get(context_key).filter(|v| !v.is_empty()) {
            attributes.insert(field.clone(), context_value_to_json(value));
        }
    }
    attributes
}

/// Resolves the credential for a request: the value collected this
/// invocation wins, falling back to the configured context key. No
/// credential is sent unless the step is configured with one.
fn credential_value(
    context: &Context,
    config: &StepConfig,
    collected: Option<&str>,
) -> Option<String> {
    let key = config.credential_key.as_deref()?;
    collected
        .filter(|v| !v.is_empty())
        .map(String::from)
        .or_else(|| context.get_str(key).filter(|v| !v.is_empty()).map(String::from))
}

fn context_value_to_json(value: &oob_core::ContextValue) -> serde_json::Value {
    match value {
        oob_core::ContextValue::Text(s) => serde_json::Value::String(s.clone()),
        oob_core::ContextValue::Structured(v) => v.clone(),
    }
}

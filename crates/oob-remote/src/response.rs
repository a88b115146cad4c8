//! Backend reply decode models.
//!
//! A 2xx reply decodes into [`RemoteResponse`]; a non-2xx reply with a
//! decodable body becomes a [`RemoteFailure`]. Anything else is a
//! transport or decode error raised by the client. Known fields are
//! explicit; arbitrary extra fields pass through untouched.

use serde::{Deserialize, Serialize};

/// A successfully decoded backend reply.
///
/// All status codes are opaque tokens defined by the backend contract,
/// except `riskResponseCode` and `uafStatusCode`, which are plain integers
/// echoed back for downstream display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteResponse {
    /// Business status code.
    #[serde(default)]
    pub retcode: String,
    /// Human-readable backend message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Challenge/session lifecycle status token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_status: Option<String>,
    /// Request identifier issued for the challenge.
    #[serde(rename = "requestID", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Session identifier issued for the challenge.
    #[serde(rename = "sessionID", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Command for the registered device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Encoded device-display payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
    /// Risk engine response code, echoed for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_response_code: Option<i64>,
    /// UAF protocol status code, echoed for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uaf_status_code: Option<i64>,
    /// Activation variant reported during registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_type: Option<String>,
    /// Device status reported by activation checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_status: Option<String>,
    /// Device serial number, once activated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Registration identifier for the device being activated.
    #[serde(rename = "registrationID", skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<String>,
    /// One-time activation password issued during registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_password: Option<String>,
    /// Pass-through fields outside the known schema.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The distinguished failure shape accompanying a non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteFailure {
    /// Transport-level status code.
    #[serde(default)]
    pub retcode: String,
    /// Business status code.
    #[serde(default)]
    pub business_retcode: String,
    /// Human-readable failure message.
    #[serde(default)]
    pub message: String,
}

/// Decoded outcome of one backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteReply {
    /// The backend processed the request.
    Ok(RemoteResponse),
    /// The backend refused the request with a decodable failure body.
    Refused(RemoteFailure),
}

//! Status-token mapping table.
//!
//! The exact enumeration of backend status and retcode tokens is defined
//! by the external service contract, so the mapping is configuration data
//! with documented defaults rather than hard-coded assumptions. Tokens are
//! compared as opaque strings, case-insensitively for session statuses.

use serde::{Deserialize, Serialize};

/// How a session status token classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusClass {
    /// Challenge approved; the attempt may advance.
    Accepted,
    /// Challenge awaiting approval; the client must re-poll.
    Pending,
    /// Challenge rejected by the user or the backend.
    Refused,
    /// Challenge deadline passed on the backend side.
    Timeout,
    /// The referenced session or username matches no known attempt.
    Unmatched,
    /// Token outside the configured set.
    Unrecognized,
}

/// Configurable mapping from backend tokens to protocol meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMap {
    /// Retcodes indicating the backend accepted the operation.
    pub success_retcodes: Vec<String>,
    /// Session statuses meaning "awaiting approval".
    pub pending_statuses: Vec<String>,
    /// Session statuses meaning "approved".
    pub accepted_statuses: Vec<String>,
    /// Session statuses meaning "rejected".
    pub refused_statuses: Vec<String>,
    /// Session statuses meaning "expired on the backend".
    pub timeout_statuses: Vec<String>,
    /// Session statuses meaning "no matching attempt".
    pub unmatched_statuses: Vec<String>,
    /// Failure business retcodes meaning "no matching attempt" on status
    /// checks. Empty by default; deployments align this with the backend.
    pub unmatched_retcodes: Vec<String>,
}

impl Default for StatusMap {
    fn default() -> Self {
        Self {
            success_retcodes: vec!["0".to_string()],
            pending_statuses: vec!["pending".to_string()],
            accepted_statuses: vec!["accepted".to_string()],
            refused_statuses: vec!["refused".to_string(), "failed".to_string()],
            timeout_statuses: vec!["timeout".to_string()],
            unmatched_statuses: vec!["unknown".to_string()],
            unmatched_retcodes: Vec::new(),
        }
    }
}

impl StatusMap {
    /// Creates the default mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the success retcodes.
    #[must_use]
    pub fn with_success_retcodes(mut self, retcodes: Vec<String>) -> Self {
        self.success_retcodes = retcodes;
        self
    }

    /// Adds a failure business retcode that classifies as unmatched.
    #[must_use]
    pub fn with_unmatched_retcode(mut self, retcode: impl Into<String>) -> Self {
        self.unmatched_retcodes.push(retcode.into());
        self
    }

    /// Returns whether a retcode means the operation was accepted.
    #[must_use]
    pub fn is_success_retcode(&self, retcode: &str) -> bool {
        self.success_retcodes.iter().any(|t| t == retcode)
    }

    /// Returns whether a failure business retcode means "no matching
    /// attempt".
    #[must_use]
    pub fn is_unmatched_retcode(&self, retcode: &str) -> bool {
        self.unmatched_retcodes.iter().any(|t| t == retcode)
    }

    /// Classifies a session status token.
    #[must_use]
    pub fn classify_session_status(&self, status: &str) -> StatusClass {
        let token = status.to_ascii_lowercase();
        let matches = |set: &[String]| set.iter().any(|t| t.eq_ignore_ascii_case(&token));

        if matches(&self.pending_statuses) {
            StatusClass::Pending
        } else if matches(&self.accepted_statuses) {
            StatusClass::Accepted
        } else if matches(&self.refused_statuses) {
            StatusClass::Refused
        } else if matches(&self.timeout_statuses) {
            StatusClass::Timeout
        } else if matches(&self.unmatched_statuses) {
            StatusClass::Unmatched
        } else {
            StatusClass::Unrecognized
        }
    }
}

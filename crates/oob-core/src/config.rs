//! Step and tenant configuration.
//!
//! Configuration is resolved by the pipeline before each invocation and is
//! read-only to the core. There is no ambient global state; every step
//! instance receives its configuration explicitly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::context::keys;

/// Backend environment selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production tenant backend.
    #[default]
    Production,
    /// Sandbox tenant backend for integration testing.
    Sandbox,
    /// Staging tenant backend.
    Staging,
}

impl Environment {
    /// Returns the wire token sent in request headers.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Sandbox => "sandbox",
            Self::Staging => "staging",
        }
    }
}

/// Tenant-level settings shared by every step of a deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    /// Tenant identifier sent with every request.
    pub tenant_id: String,
    /// Which backend environment to address.
    pub environment: Environment,
    /// Backend base URL.
    pub base_url: String,
    /// Default challenge timeout in seconds.
    pub default_timeout_seconds: i64,
}

impl TenantConfig {
    /// Creates a tenant configuration with the default timeout.
    #[must_use]
    pub fn new(tenant_id: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            environment: Environment::Production,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_timeout_seconds: 300,
        }
    }

    /// Sets the backend environment.
    #[must_use]
    pub const fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the default challenge timeout.
    #[must_use]
    pub const fn with_default_timeout(mut self, seconds: i64) -> Self {
        self.default_timeout_seconds = seconds;
        self
    }
}

/// Where the event type for event validation comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "source", content = "value")]
pub enum EventType {
    /// A fixed event type configured on the step.
    Fixed(String),
    /// Event type read from a context key at invocation time.
    FromContext(String),
}

impl Default for EventType {
    fn default() -> Self {
        Self::FromContext(keys::EVENT_TYPE.to_string())
    }
}

/// Immutable per-step settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Context key holding the username.
    pub username_key: String,
    /// Context or input key holding the credential, when one is collected.
    pub credential_key: Option<String>,
    /// Extra request attributes: request field name mapped to the context
    /// key supplying its value. Missing optional keys are simply omitted.
    pub attribute_keys: IndexMap<String, String>,
    /// Challenge timeout in seconds.
    pub timeout_seconds: i64,
    /// Event type source for event validation steps.
    pub event_type: EventType,
    /// Input prompt names a collector step must gather.
    pub required_inputs: Vec<String>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            username_key: keys::USERNAME.to_string(),
            credential_key: None,
            attribute_keys: IndexMap::new(),
            timeout_seconds: 300,
            event_type: EventType::default(),
            required_inputs: Vec::new(),
        }
    }
}

impl StepConfig {
    /// Creates a step configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the context key holding the username.
    #[must_use]
    pub fn with_username_key(mut self, key: impl Into<String>) -> Self {
        self.username_key = key.into();
        self
    }

    /// Sets the credential key.
    #[must_use]
    pub fn with_credential_key(mut self, key: impl Into<String>) -> Self {
        self.credential_key = Some(key.into());
        self
    }

    /// Maps a request attribute to the context key supplying it.
    #[must_use]
    pub fn with_attribute(
        mut self,
        field: impl Into<String>,
        context_key: impl Into<String>,
    ) -> Self {
        self.attribute_keys.insert(field.into(), context_key.into());
        self
    }

    /// Sets the challenge timeout.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: i64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets a fixed event type.
    #[must_use]
    pub fn with_fixed_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = EventType::Fixed(event_type.into());
        self
    }

    /// Reads the event type from a context key at invocation time.
    #[must_use]
    pub fn with_event_type_from_context(mut self, context_key: impl Into<String>) -> Self {
        self.event_type = EventType::FromContext(context_key.into());
        self
    }

    /// Adds a required input prompt for collector steps.
    #[must_use]
    pub fn with_required_input(mut self, name: impl Into<String>) -> Self {
        self.required_inputs.push(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_config_strips_trailing_slash() {
        let config = TenantConfig::new("acme", "https://risk.example.com/api/");
        assert_eq!(config.base_url, "https://risk.example.com/api");
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn step_config_builders() {
        let config = StepConfig::new()
            .with_username_key("loginName")
            .with_attribute("amount", "txAmount")
            .with_attribute("currency", "txCurrency")
            .with_timeout(120)
            .with_fixed_event_type("LoginAttempt");

        assert_eq!(config.username_key, "loginName");
        assert_eq!(config.timeout_seconds, 120);
        assert_eq!(config.attribute_keys.get("amount"), Some(&"txAmount".to_string()));
        assert_eq!(config.event_type, EventType::Fixed("LoginAttempt".to_string()));
    }

    #[test]
    fn default_event_type_reads_the_context() {
        assert_eq!(
            EventType::default(),
            EventType::FromContext("eventType".to_string())
        );
    }
}

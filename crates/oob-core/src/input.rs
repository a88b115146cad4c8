//! Collected inputs, prompts, and the step output contract.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

/// Input values gathered by the pipeline from the user for one invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectedInput {
    /// Named field values.
    pub fields: IndexMap<String, String>,
    /// Collected credential, when the step asks for one.
    pub credential: Option<String>,
}

impl CollectedInput {
    /// Creates an empty input set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named field value.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Sets the credential.
    #[must_use]
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Gets a named field value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// A "more input needed" prompt re-emitted to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Field name the pipeline must collect.
    pub name: String,
    /// Whether the value is sensitive and must be masked.
    pub masked: bool,
}

impl Prompt {
    /// Creates a plain-text prompt.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            masked: false,
        }
    }

    /// Creates a masked (credential) prompt.
    #[must_use]
    pub fn credential(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            masked: true,
        }
    }
}

/// Result of one step invocation.
///
/// When `outcome` is unset the step is not yet satisfied; the pipeline
/// renders `prompts` and re-invokes the same step with the collected
/// values. The mutated context travels separately, by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutput {
    /// Outcome label, when the step has concluded.
    pub outcome: Option<Outcome>,
    /// Prompts to render when more input is needed.
    pub prompts: Vec<Prompt>,
}

impl StepOutput {
    /// A concluded step with the given outcome.
    #[must_use]
    pub const fn complete(outcome: Outcome) -> Self {
        Self {
            outcome: Some(outcome),
            prompts: Vec::new(),
        }
    }

    /// An unsatisfied step re-emitting its prompts.
    #[must_use]
    pub const fn needs_input(prompts: Vec<Prompt>) -> Self {
        Self {
            outcome: None,
            prompts,
        }
    }

    /// Whether the step concluded.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }
}

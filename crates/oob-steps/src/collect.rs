//! Pure local collector step.
//!
//! States: `AwaitingInput → outcome`. While the required inputs are not
//! all present, the full prompt set is re-emitted with the outcome left
//! unset, meaning "stay on this step". Once everything is present the
//! values are copied into the context and the generic advance label is
//! returned. This variant never calls the remote backend and never
//! expires.

use async_trait::async_trait;

use oob_core::{CollectedInput, Context, Outcome, Prompt, StepConfig, StepOutput};

use crate::step::{Step, StepKind};

/// Aggregates named inputs (and optionally a credential) into the context
/// without backend contact.
pub struct CollectStep {
    config: StepConfig,
}

impl CollectStep {
    /// Creates the collector for the configured input set.
    #[must_use]
    pub const fn new(config: StepConfig) -> Self {
        Self { config }
    }

    fn prompts(&self) -> Vec<Prompt> {
        let mut prompts: Vec<Prompt> = self
            .config
            .required_inputs
            .iter()
            .map(Prompt::field)
            .collect();
        if let Some(key) = &self.config.credential_key {
            prompts.push(Prompt::credential(key));
        }
        prompts
    }

    fn is_satisfied(&self, input: &CollectedInput) -> bool {
        let fields_present = self
            .config
            .required_inputs
            .iter()
            .all(|name| input.field(name).is_some_and(|v| !v.is_empty()));
        let credential_present = self.config.credential_key.is_none()
            || input.credential.as_deref().is_some_and(|v| !v.is_empty());
        fields_present && credential_present
    }
}

#[async_trait]
impl Step for CollectStep {
    fn kind(&self) -> StepKind {
        StepKind::Collect
    }

    async fn process(&self, context: &mut Context, input: &CollectedInput) -> StepOutput {
        if !self.is_satisfied(input) {
            return StepOutput::needs_input(self.prompts());
        }
        for name in &self.config.required_inputs {
            if let Some(value) = input.field(name) {
                context.set(name.clone(), value);
            }
        }
        if let (Some(key), Some(credential)) =
            (self.config.credential_key.as_deref(), input.credential.as_deref())
        {
            context.set(key.to_string(), credential);
        }
        StepOutput::complete(Outcome::Continue)
    }
}

//! # oob-core
//!
//! Core types for the out-of-band step-up approval protocol.
//!
//! This crate provides the shared substrate threaded through every step of
//! one authentication attempt:
//!
//! - Insertion-ordered context store with well-known key constants
//! - Step outcome labels and their wire tokens
//! - Challenge expiry computation and checking
//! - Step and tenant configuration
//! - Collected-input and prompt types for interactive steps
//! - The step error taxonomy
//!
//! The context is the only state shared between step invocations; the
//! pipeline persists it externally and re-invokes steps with it.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod context;
pub mod error;
pub mod expiry;
pub mod input;
pub mod outcome;

pub use config::{Environment, EventType, StepConfig, TenantConfig};
pub use context::{keys, Context, ContextValue};
pub use error::{StepError, StepResult};
pub use input::{CollectedInput, Prompt, StepOutput};
pub use outcome::Outcome;

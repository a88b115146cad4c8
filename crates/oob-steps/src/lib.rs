//! # oob-steps
//!
//! Step orchestrators for the out-of-band step-up approval protocol.
//!
//! Each orchestrator composes the request builder, one remote call, the
//! expiry tracker, and the response classifier into a single step
//! invocation: context in, outcome plus mutated context out. The pipeline
//! persists the context between invocations and re-invokes polling steps
//! until a terminal outcome is reached.
//!
//! Orchestrators never retry: every remote failure surfaces immediately
//! as an `Error` outcome, and `Pending`/`Timeout` are protocol states for
//! the external polling loop, not failures.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod collect;
pub mod initiate;
pub mod poll;
pub mod step;
pub mod validate;

pub use collect::CollectStep;
pub use initiate::{LoginStep, RegisterDeviceStep};
pub use poll::{CheckActivationStep, CheckSessionStatusStep};
pub use step::{step_for, Step, StepKind};
pub use validate::{ValidateEventStep, ValidateTransactionStep};

//! # oob-remote
//!
//! Remote backend contract for the out-of-band approval protocol.
//!
//! This crate covers everything between a step orchestrator and the risk
//! backend:
//!
//! - Typed per-operation request payloads with validating builders
//! - Response and failure decode models with pass-through extras
//! - The status-token mapping table (configuration data, not hard-coded
//!   assumptions)
//! - The response classifier reducing backend replies to outcomes plus
//!   context mutations
//! - The `RemoteClient` trait and its reqwest HTTP implementation
//!
//! The backend's internal scoring logic is opaque to this crate; replies
//! are classified purely by their status tokens.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod classify;
pub mod client;
pub mod request;
pub mod response;
pub mod status;

pub use classify::{classify_initiation, classify_status, Classification};
pub use client::{HttpRemoteClient, RemoteClient};
pub use request::{RemoteOperation, RemoteRequest};
pub use response::{RemoteFailure, RemoteReply, RemoteResponse};
pub use status::{StatusClass, StatusMap};

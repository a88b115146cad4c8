//! Step outcome labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome of one step invocation.
///
/// Always a returned value alongside the mutated context, never an
/// exception. `Pending` and `Timeout` are protocol states meant to be
/// revisited by the external polling loop, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Attempt complete; device or activation confirmed.
    #[serde(rename = "Success")]
    Success,

    /// Validation, transport, decode, or business failure.
    #[serde(rename = "Error")]
    Error,

    /// Challenge issued; more steps are required.
    #[serde(rename = "StepUp")]
    StepUp,

    /// Challenge awaiting approval; the client must re-poll.
    #[serde(rename = "Pending")]
    Pending,

    /// Challenge deadline passed before approval.
    #[serde(rename = "Timeout")]
    Timeout,

    /// Backend status token or identifier outside the known set.
    #[serde(rename = "Unknown")]
    Unknown,

    /// Generic advance label used by pure collector steps.
    #[serde(rename = "outcome")]
    Continue,
}

impl Outcome {
    /// Returns whether this outcome ends the polling loop.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "Success",
            Self::Error => "Error",
            Self::StepUp => "StepUp",
            Self::Pending => "Pending",
            Self::Timeout => "Timeout",
            Self::Unknown => "Unknown",
            Self::Continue => "outcome",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Success" => Ok(Self::Success),
            "Error" => Ok(Self::Error),
            "StepUp" => Ok(Self::StepUp),
            "Pending" => Ok(Self::Pending),
            "Timeout" => Ok(Self::Timeout),
            "Unknown" => Ok(Self::Unknown),
            "outcome" => Ok(Self::Continue),
            _ => Err(format!("unknown outcome label: {s}")),
        }
    }
}

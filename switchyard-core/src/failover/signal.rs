use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream conditions that make nginx move on to the next member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum FailureSignal {
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "timeout")]
    Timeout,
    #[serde(rename = "http_500")]
    Http500,
    #[serde(rename = "http_502")]
    Http502,
    #[serde(rename = "http_503")]
    Http503,
    #[serde(rename = "http_504")]
    Http504,
}

impl FailureSignal {
    pub const DEFAULT: [FailureSignal; 6] = [
        FailureSignal::Error,
        FailureSignal::Timeout,
        FailureSignal::Http500,
        FailureSignal::Http502,
        FailureSignal::Http503,
        FailureSignal::Http504,
    ];

    /// The `proxy_next_upstream` argument for this signal.
    pub fn directive_arg(self) -> &'static str {
        match self {
            FailureSignal::Error => "error",
            FailureSignal::Timeout => "timeout",
            FailureSignal::Http500 => "http_500",
            FailureSignal::Http502 => "http_502",
            FailureSignal::Http503 => "http_503",
            FailureSignal::Http504 => "http_504",
        }
    }

    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            500 => Some(FailureSignal::Http500),
            502 => Some(FailureSignal::Http502),
            503 => Some(FailureSignal::Http503),
            504 => Some(FailureSignal::Http504),
            _ => None,
        }
    }
}

impl fmt::Display for FailureSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive_arg())
    }
}

/// What happened when the proxy tried one upstream member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Responded { status: u16 },
    ConnectError,
    Timeout,
}

impl AttemptOutcome {
    pub fn signal(&self) -> Option<FailureSignal> {
        match self {
            AttemptOutcome::Responded { status } => FailureSignal::from_status(*status),
            AttemptOutcome::ConnectError => Some(FailureSignal::Error),
            AttemptOutcome::Timeout => Some(FailureSignal::Timeout),
        }
    }
}

// src/probe/outcome.rs
// =============================================================================
// What happened when we probed one candidate URL.
//
// The report mostly cares about one bit: "did the server hand the file out?"
// That bit is `is_exposed()`. The enum keeps a little more detail so that a
// 403/404 can be told apart from a host that never answered.
// =============================================================================

use reqwest::StatusCode;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// Server answered with a 2xx status
    Success { status: u16 },
    /// Server answered with anything else (3xx redirects included, they are never followed)
    Denied { status: u16 },
    /// Connection, DNS, TLS or other transport failure
    Unreachable,
    /// The request deadline expired before the response was fully read
    Timeout,
}

impl ProbeOutcome {
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_success() {
            ProbeOutcome::Success {
                status: status.as_u16(),
            }
        } else {
            ProbeOutcome::Denied {
                status: status.as_u16(),
            }
        }
    }

    // The boolean view used by the report
    pub fn is_exposed(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProbeOutcome::Success { .. } => "success",
            ProbeOutcome::Denied { .. } => "denied",
            ProbeOutcome::Unreachable => "unreachable",
            ProbeOutcome::Timeout => "timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_2xx_is_exposed() {
        assert!(ProbeOutcome::from_status(StatusCode::OK).is_exposed());
        assert!(ProbeOutcome::from_status(StatusCode::NO_CONTENT).is_exposed());
        assert!(!ProbeOutcome::from_status(StatusCode::MOVED_PERMANENTLY).is_exposed());
        assert!(!ProbeOutcome::from_status(StatusCode::FOUND).is_exposed());
        assert!(!ProbeOutcome::from_status(StatusCode::FORBIDDEN).is_exposed());
        assert!(!ProbeOutcome::from_status(StatusCode::NOT_FOUND).is_exposed());
        assert!(!ProbeOutcome::Unreachable.is_exposed());
        assert!(!ProbeOutcome::Timeout.is_exposed());
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(ProbeOutcome::Denied { status: 404 }).unwrap();
        assert_eq!(json["kind"], "denied");
        assert_eq!(json["status"], 404);

        let json = serde_json::to_value(ProbeOutcome::Timeout).unwrap();
        assert_eq!(json["kind"], "timeout");
    }
}

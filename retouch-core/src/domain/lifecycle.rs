//! Lifecycle state presented to callers

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::job::JobResult;

/// Where the current job stands
///
/// Exactly one value is live per controller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Idle,
    Submitting,
    Polling {
        task_id: String,
    },
    /// `result` is `None` when the service succeeded without returning any output
    Succeeded {
        result: Option<JobResult>,
    },
    Failed {
        reason: FailureReason,
    },
}

impl LifecycleState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LifecycleState::Succeeded { .. } | LifecycleState::Failed { .. }
        )
    }

    /// A job is being submitted or polled
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            LifecycleState::Submitting | LifecycleState::Polling { .. }
        )
    }

    pub fn task_id(&self) -> Option<&str> {
        match self {
            LifecycleState::Polling { task_id } => Some(task_id),
            _ => None,
        }
    }
}

/// Why a job ended in `Failed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// HTTP error status or network failure
    Transport(String),
    /// Successful response missing required fields
    MalformedResponse(String),
    /// Service reported FAILED
    RemoteFailed,
    /// Service reported CANCELED
    RemoteCanceled,
    /// Polling ran longer than the configured limit
    TimedOut(Duration),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Transport(detail) => write!(f, "transport: {}", detail),
            FailureReason::MalformedResponse(detail) => {
                write!(f, "malformed response: {}", detail)
            }
            FailureReason::RemoteFailed => f.write_str("remote: failed"),
            FailureReason::RemoteCanceled => f.write_str("remote: canceled"),
            FailureReason::TimedOut(limit) => {
                write!(f, "timeout: polling exceeded {}s", limit.as_secs())
            }
        }
    }
}

/// Notification emitted on every state transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub state: LifecycleState,
    pub at: chrono::DateTime<chrono::Utc>,
}

impl LifecycleEvent {
    pub fn now(state: LifecycleState) -> Self {
        Self {
            state,
            at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reason_messages() {
        assert_eq!(
            FailureReason::Transport("401".to_string()).to_string(),
            "transport: 401"
        );
        assert_eq!(FailureReason::RemoteFailed.to_string(), "remote: failed");
        assert_eq!(FailureReason::RemoteCanceled.to_string(), "remote: canceled");
        assert_eq!(
            FailureReason::TimedOut(Duration::from_secs(600)).to_string(),
            "timeout: polling exceeded 600s"
        );
    }

    #[test]
    fn test_state_predicates() {
        let polling = LifecycleState::Polling {
            task_id: "T1".to_string(),
        };
        assert!(polling.is_in_flight());
        assert!(!polling.is_terminal());
        assert_eq!(polling.task_id(), Some("T1"));

        let done = LifecycleState::Succeeded { result: None };
        assert!(done.is_terminal());
        assert_eq!(done.task_id(), None);

        assert_eq!(LifecycleState::default(), LifecycleState::Idle);
    }
}

//! Controller errors

use retouch_core::domain::job::ValidationError;
use thiserror::Error;

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Reasons a command to the controller was refused
///
/// Job failures are not errors here: they are reported as the `Failed` state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Input rejected before contacting the service
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another job is still being submitted or polled
    #[error("a job is already in progress")]
    JobInFlight,

    /// The controller task is gone
    #[error("lifecycle controller has stopped")]
    Stopped,
}

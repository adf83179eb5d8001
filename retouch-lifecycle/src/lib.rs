//! Retouch Lifecycle
//!
//! Owns the lifecycle of one image-editing job: submission, periodic status
//! polling, terminal-state detection and cleanup of the polling timer.
//!
//! Architecture:
//! - Configuration: polling interval and optional polling limit
//! - Controller: single-task state machine driving a [`retouch_client::JobService`]
//!
//! Callers send `start`/`reset` and observe [`LifecycleState`] changes through
//! a watch channel or a broadcast of [`LifecycleEvent`]s.
//!
//! [`LifecycleState`]: retouch_core::domain::lifecycle::LifecycleState
//! [`LifecycleEvent`]: retouch_core::domain::lifecycle::LifecycleEvent

pub mod config;
pub mod controller;
pub mod error;

pub use config::LifecycleConfig;
pub use controller::LifecycleController;
pub use error::{LifecycleError, Result};

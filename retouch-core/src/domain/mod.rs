//! Core domain types
//!
//! These types are shared between the HTTP client (which produces them from
//! service responses) and the lifecycle controller (which drives state from them).

pub mod catalog;
pub mod job;
pub mod lifecycle;

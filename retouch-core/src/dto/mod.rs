//! Data Transfer Objects for the remote image-editing service
//!
//! Request and response bodies exactly as the service expects and returns
//! them. Conversions into domain types live next to each DTO.

pub mod job;
pub mod task;

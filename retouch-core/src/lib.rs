//! Retouch Core
//!
//! Core types for the Retouch image-editing job client.
//!
//! This crate contains:
//! - Domain types: jobs, statuses, lifecycle state and the function catalog
//! - DTOs: wire formats of the remote image-editing service

pub mod domain;
pub mod dto;

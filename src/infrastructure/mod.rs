//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration and language pack loading
//! - Storage: Note persistence
//! - Http: Outbound requests for plugins

pub mod config;
pub mod http;
pub mod storage;

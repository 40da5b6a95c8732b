//! Domain layer - Core business logic
//!
//! This layer contains:
//! - Entities: Requests, responses and localized command catalogs
//! - Traits: Abstractions for plugins and infrastructure (Plugin, Store, Fetcher)

pub mod entities;
pub mod traits;

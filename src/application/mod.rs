//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Request handling from validation to escaped response
//! - Errors: Plugin, storage, config and validation errors
//! - Messaging: Command resolution, dispatching, aggregation

pub mod errors;
pub mod services;
pub mod messaging;

//! Domain traits - Abstractions for plugins and infrastructure implementations

pub mod fetcher;
pub mod plugin;
pub mod store;

pub use fetcher::{Fetched, Fetcher};
pub use plugin::{Invocation, Plugin};
pub use store::Store;

//! Message handling - Resolution, dispatching and aggregation

pub mod aggregator;
pub mod dispatcher;
pub mod resolver;

pub use aggregator::Aggregator;
pub use dispatcher::Dispatcher;
pub use resolver::{resolve, Resolution};

//! Tracing setup and in-process run metrics for creator analytics.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::*;
pub use tracing_setup::*;

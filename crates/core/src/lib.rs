//! Core records, timeframes, and validation for creator analytics.

pub mod content;
pub mod error;
pub mod ledger;
pub mod limits;
pub mod program;
pub mod snapshot;
pub mod timeframe;

pub use content::*;
pub use error::{Error, Result};
pub use ledger::*;
pub use program::*;
pub use snapshot::*;
pub use timeframe::*;

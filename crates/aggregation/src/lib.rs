//! Metrics aggregation engine for creator analytics dashboards.
//!
//! Pure functions over already-stored facts:
//! - Dedupe (latest snapshot per source per day)
//! - Series (daily cumulative totals and clamped deltas)
//! - Compare (trailing 7-day windows)
//! - Payout (earnings per program, CPM, paid/unpaid views)
//! - ROI (per-creator ranking)
//! - Dashboard (everything above for one timeframe)

pub mod activity;
pub mod compare;
pub mod dashboard;
pub mod dedupe;
pub mod payout;
pub mod period;
pub mod roi;
pub mod series;

pub use activity::*;
pub use compare::*;
pub use dashboard::*;
pub use dedupe::dedupe;
pub use payout::*;
pub use period::period_views;
pub use roi::*;
pub use series::*;

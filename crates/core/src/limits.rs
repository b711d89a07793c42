//! Reporting constants and input limits.
//!
//! The `#[validate]` derive macro requires literal values in attributes,
//! so identifier limits are duplicated on the record types. Keep both in
//! sync when modifying.

// === Reporting ===

/// Length of each trailing comparison window (current week vs. prior week).
pub const COMPARISON_WINDOW_DAYS: i64 = 7;

/// Views per CPM unit.
pub const CPM_VIEWS: f64 = 1000.0;

// === Input Limits ===

/// Maximum size of one input source in bytes (256MB).
///
/// Sources are read fully into memory before decoding.
pub const MAX_INPUT_BYTES: u64 = 256 * 1024 * 1024;

/// Program, creator, and record identifier max length.
pub const MAX_ID_LEN: usize = 128;

/// Creator display name max length.
pub const MAX_USERNAME_LEN: usize = 200;

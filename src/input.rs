//! Input record loading.
//!
//! Each source is a JSON array of records. The array itself must parse;
//! individual records that fail to decode or validate are dropped with a
//! warning and counted.

use std::path::Path;

use analytics_core::error::InputErrorCode;
use analytics_core::limits::MAX_INPUT_BYTES;
use analytics_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use validator::Validate;

/// Records decoded from one source.
#[derive(Debug)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    /// Entries that failed to decode or validate
    pub rejected: usize,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rejected: 0,
        }
    }
}

/// Loads `path` if configured, otherwise yields no records.
pub async fn load_optional<T>(path: Option<&Path>, kind: &'static str) -> Result<Loaded<T>>
where
    T: DeserializeOwned + Validate,
{
    match path {
        Some(path) => load_records(path, kind).await,
        None => {
            debug!(kind, "No input configured");
            Ok(Loaded::default())
        }
    }
}

/// Reads and decodes a JSON array of `kind` records from `path`.
pub async fn load_records<T>(path: &Path, kind: &'static str) -> Result<Loaded<T>>
where
    T: DeserializeOwned + Validate,
{
    let unreadable =
        |e: std::io::Error| Error::input(InputErrorCode::Unreadable, format!("{}: {e}", path.display()));

    let size = tokio::fs::metadata(path).await.map_err(unreadable)?.len();
    if size > MAX_INPUT_BYTES {
        return Err(Error::input(
            InputErrorCode::Unreadable,
            format!(
                "{} is {size} bytes, limit is {MAX_INPUT_BYTES}",
                path.display()
            ),
        ));
    }

    let bytes = tokio::fs::read(path).await.map_err(unreadable)?;
    let loaded = decode_records(&bytes, kind).map_err(|e| match e {
        Error::Input { code, message } => Error::Input {
            code,
            message: format!("{}: {message}", path.display()),
        },
        other => other,
    })?;

    debug!(
        kind,
        path = %path.display(),
        records = loaded.records.len(),
        rejected = loaded.rejected,
        "Loaded input"
    );
    Ok(loaded)
}

/// Decodes a JSON array, keeping the entries that decode and validate.
pub fn decode_records<T>(bytes: &[u8], kind: &'static str) -> Result<Loaded<T>>
where
    T: DeserializeOwned + Validate,
{
    let entries: Vec<Value> = serde_json::from_slice(bytes).map_err(|e| {
        Error::input(
            InputErrorCode::MalformedJson,
            format!("expected a JSON array of {kind} records: {e}"),
        )
    })?;

    let mut loaded = Loaded {
        records: Vec::with_capacity(entries.len()),
        rejected: 0,
    };
    for (index, entry) in entries.into_iter().enumerate() {
        match decode_one::<T>(entry) {
            Ok(record) => loaded.records.push(record),
            Err(e) => {
                warn!(kind, index, error = %e, "Skipping invalid record");
                loaded.rejected += 1;
            }
        }
    }
    Ok(loaded)
}

fn decode_one<T>(entry: Value) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let record: T = serde_json::from_value(entry)
        .map_err(|e| Error::input(InputErrorCode::InvalidRecord, e.to_string()))?;
    record.validate()?;
    Ok(record)
}

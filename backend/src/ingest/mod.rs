//! Bulk product ingestion from uploaded CSV files.
//!
//! - `parse`: CSV text to [`UploadRow`]s, with the lenient key and price rules.
//! - `worker`: the batch loop that upserts rows, advances progress and emits
//!   one notification per committed batch.

mod parse;
mod worker;

pub use parse::{parse_price, parse_rows, validate_header, UploadRow, KEY_COLUMN};
pub use worker::{IngestSummary, IngestionWorker};

/// Rows committed per transaction.
pub const BATCH_SIZE: usize = 1000;

//! crates/om_io/src/lib.rs
//! I/O crate for the medal board: everything that touches the filesystem.
//!
//! - `loader`: CSV → canonical `MedalTable` (the medal record store).
//! - `cache`: process-wide, read-only table cache with an invalidation hook.
//! - `hasher`: SHA-256 of raw source bytes and canonical JSON values.
//! - `canonical_json`: sorted-key JSON bytes + atomic artifact writes.
//!
//! Shared error type (`IoError`) with `From` conversions used across modules.

#![forbid(unsafe_code)]

use thiserror::Error;

pub mod cache;
pub mod canonical_json;
pub mod hasher;
pub mod loader;

/// Unified error for om_io. Every load failure is fatal at startup.
#[derive(Debug, Error)]
pub enum IoError {
    /// Source file missing or unreadable.
    #[error("read {path}: {msg}")]
    Read { path: String, msg: String },

    /// Artifact write failures (create_dir_all, rename, fsync...).
    #[error("write: {0}")]
    Write(String),

    /// Other filesystem / path errors.
    #[error("io/path error: {0}")]
    Path(String),

    /// Size guard on the source file.
    #[error("limit exceeded: {0}")]
    Limit(String),

    /// Malformed delimited input (ragged rows, bad UTF-8, ...).
    #[error("csv error: {0}")]
    Csv(String),

    /// A required header is absent after trimming.
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    /// Rows were read but no cell of a required numeric column parsed.
    #[error("column '{0}' has no numeric values")]
    NonCoercibleColumn(&'static str),

    /// Year present but not a whole number in i32 range.
    #[error("line {line}: invalid Year '{value}' (expected a whole year)")]
    InvalidYear { line: u64, value: String },

    /// Medal count present but negative, fractional, or too large.
    #[error("line {line}: invalid {column} '{value}' (expected a non-negative integer)")]
    InvalidCount { line: u64, column: &'static str, value: String },

    /// Two cleaned rows share (Country, Year).
    #[error("line {line}: duplicate row for ({country}, {year}), first seen at line {first_line}")]
    DuplicateKey { line: u64, first_line: u64, country: String, year: i32 },

    /// Medals != Golds + Silvers + Bronzes under `ConsistencyPolicy::Reject`.
    #[error("line {line}: {country} {year} has Medals {medals} but Golds+Silvers+Bronzes = {sum}")]
    Inconsistent { line: u64, country: String, year: i32, medals: u32, sum: u64 },

    /// JSON serialization errors.
    #[error("json error: {0}")]
    Json(String),

    /// Hashing / canonicalization errors.
    #[error("hash error: {0}")]
    Hash(String),
}

/// Name used at the API boundary for load failures.
pub type DataLoadError = IoError;

pub type IoResult<T> = Result<T, IoError>;

impl IoError {
    /// True for failures caused by the content of the source (vs. the filesystem).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            IoError::Csv(_)
                | IoError::MissingColumn(_)
                | IoError::NonCoercibleColumn(_)
                | IoError::InvalidYear { .. }
                | IoError::InvalidCount { .. }
                | IoError::DuplicateKey { .. }
                | IoError::Inconsistent { .. }
                | IoError::Json(_)
        )
    }
}

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json(e.to_string())
    }
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv(e.to_string())
    }
}

/* ---------------- Public prelude ----------------
   Lightweight re-exports so downstream crates can do:
     use om_io::prelude::*;
------------------------------------------------- */

pub mod prelude {
    pub use crate::{DataLoadError, IoError, IoResult};

    pub use crate::cache::{self, TableCache};
    pub use crate::canonical_json::{to_canonical_bytes, write_canonical_file};
    pub use crate::hasher::{sha256_canonical, sha256_hex};
    pub use crate::loader::{self, ConsistencyPolicy, LoadOptions, LoadReport, LoadedTable};
}

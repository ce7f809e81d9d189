//! Loader: read the local medal CSV, clean it, and return a canonical
//! `MedalTable` plus a `LoadReport`. No network I/O, no caching (see `cache`).
//!
//! Cleaning order (each step sees the output of the previous one):
//!   1. parse rows; trim header names
//!   2. numeric columns → number or "missing" (never an error by themselves)
//!   3. drop rows with an empty Country cell
//!   4. trim Country; drop placeholder spellings (nan / none / "" / n/a)
//!   5. drop rows missing Year or Medals
//!   6. Year must be a whole number
//! then count validation, the (Country, Year) uniqueness check and the
//! Medals-sum consistency policy.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use om_core::ids::SourceDigest;
use om_core::records::is_placeholder_country;
use om_core::{MedalRecord, MedalTable};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{hasher, IoError};

/// Upper bound on the source size; the real dataset is a few hundred KiB.
pub const MAX_SOURCE_BYTES: u64 = 64 * 1024 * 1024;

pub const COL_COUNTRY: &str = "Country";
pub const COL_YEAR: &str = "Year";
pub const COL_RANK: &str = "Rank";
pub const COL_GOLDS: &str = "Golds";
pub const COL_SILVERS: &str = "Silvers";
pub const COL_BRONZES: &str = "Bronzes";
pub const COL_MEDALS: &str = "Medals";

/// Columns the source must carry (after header trimming).
pub const REQUIRED_COLUMNS: [&str; 7] =
    [COL_COUNTRY, COL_YEAR, COL_RANK, COL_GOLDS, COL_SILVERS, COL_BRONZES, COL_MEDALS];

// ----------------------------- Options & report -----------------------------

/// What to do with rows where `Medals != Golds + Silvers + Bronzes`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyPolicy {
    /// Keep the row silently.
    Trust,
    /// Keep the row, record it in the report and log a warning.
    #[default]
    Warn,
    /// Fail the load.
    Reject,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    pub consistency: ConsistencyPolicy,
}

/// One row whose Medals total disagrees with its parts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InconsistentRow {
    pub line: u64,
    pub country: String,
    pub year: i32,
    pub medals: u32,
    pub parts_sum: u64,
}

/// Row accounting for one load. `rows_kept + dropped_* == rows_read`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub rows_read: u64,
    pub rows_kept: u64,
    pub dropped_missing_country: u64,
    pub dropped_placeholder_country: u64,
    pub dropped_missing_year_or_medals: u64,
    pub inconsistent: Vec<InconsistentRow>,
}

impl LoadReport {
    pub fn rows_dropped(&self) -> u64 {
        self.dropped_missing_country + self.dropped_placeholder_country + self.dropped_missing_year_or_medals
    }
}

/// Loaded, cleaned table with provenance.
#[derive(Clone, Debug)]
pub struct LoadedTable {
    pub table: MedalTable,
    pub report: LoadReport,
    pub digest: SourceDigest,
    pub source: PathBuf,
}

// ----------------------------- Entry points -----------------------------

/// Load with default options (`ConsistencyPolicy::Warn`).
pub fn load(path: &Path) -> Result<LoadedTable, IoError> {
    load_with(path, &LoadOptions::default())
}

/// Read the source (bounded), hash it, and clean it into a canonical table.
pub fn load_with(path: &Path, opts: &LoadOptions) -> Result<LoadedTable, IoError> {
    let bytes = read_source_with_limit(path)?;
    let digest = hasher::source_digest(&bytes)?;
    let (table, report) = parse_bytes(&bytes, opts)?;

    info!(
        source = %path.display(),
        digest = digest.short(),
        rows_read = report.rows_read,
        rows_kept = report.rows_kept,
        rows_dropped = report.rows_dropped(),
        inconsistent = report.inconsistent.len(),
        "loaded medal table"
    );

    Ok(LoadedTable { table, report, digest, source: path.to_path_buf() })
}

/// Clean delimited bytes into a canonical table.
pub fn parse_bytes(bytes: &[u8], opts: &LoadOptions) -> Result<(MedalTable, LoadReport), IoError> {
    parse_reader(bytes, opts)
}

/// Clean any reader of delimited text into a canonical table.
pub fn parse_reader<R: Read>(reader: R, opts: &LoadOptions) -> Result<(MedalTable, LoadReport), IoError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    // 1) headers, trimmed
    let headers = rdr.headers()?.clone();
    let cols = ColumnIndex::resolve(&headers)?;

    let mut report = LoadReport::default();
    let mut rows: Vec<MedalRecord> = Vec::new();
    let mut first_seen: BTreeMap<(String, i32), u64> = BTreeMap::new();
    let (mut any_year, mut any_medals) = (false, false);

    for result in rdr.records() {
        let rec = result?;
        report.rows_read += 1;
        let line = rec.position().map(|p| p.line()).unwrap_or(report.rows_read + 1);

        // 2) numeric coercion (missing on failure)
        let year = coerce_number(rec.get(cols.year));
        let medals = coerce_number(rec.get(cols.medals));
        let golds = coerce_number(rec.get(cols.golds));
        let silvers = coerce_number(rec.get(cols.silvers));
        let bronzes = coerce_number(rec.get(cols.bronzes));
        let rank = coerce_number(rec.get(cols.rank));
        any_year |= year.is_some();
        any_medals |= medals.is_some();

        // 3) true absence of Country
        let raw_country = rec.get(cols.country).unwrap_or("");
        if raw_country.is_empty() {
            report.dropped_missing_country += 1;
            continue;
        }

        // 4) trimmed + placeholder filter
        let country = raw_country.trim();
        if is_placeholder_country(country) {
            debug!(line, country = raw_country, "dropping placeholder country");
            report.dropped_placeholder_country += 1;
            continue;
        }

        // 5) Year and Medals are required downstream
        let (Some(year), Some(medals)) = (year, medals) else {
            report.dropped_missing_year_or_medals += 1;
            continue;
        };

        // 6) whole years only
        let year = whole_year(year).ok_or_else(|| IoError::InvalidYear {
            line,
            value: rec.get(cols.year).unwrap_or("").trim().to_string(),
        })?;

        let record = MedalRecord {
            country: country.to_string(),
            year,
            rank: rank.and_then(count_value),
            golds: required_count(golds, line, COL_GOLDS, rec.get(cols.golds))?,
            silvers: required_count(silvers, line, COL_SILVERS, rec.get(cols.silvers))?,
            bronzes: required_count(bronzes, line, COL_BRONZES, rec.get(cols.bronzes))?,
            medals: required_count(Some(medals), line, COL_MEDALS, rec.get(cols.medals))?,
        };

        if let Some(&first_line) = first_seen.get(&(record.country.clone(), record.year)) {
            return Err(IoError::DuplicateKey {
                line,
                first_line,
                country: record.country,
                year: record.year,
            });
        }
        first_seen.insert((record.country.clone(), record.year), line);

        if !record.is_consistent() {
            let parts_sum =
                u64::from(record.golds) + u64::from(record.silvers) + u64::from(record.bronzes);
            match opts.consistency {
                ConsistencyPolicy::Trust => {}
                ConsistencyPolicy::Warn => {
                    warn!(
                        line,
                        country = %record.country,
                        year = record.year,
                        medals = record.medals,
                        parts_sum,
                        "Medals total disagrees with Golds + Silvers + Bronzes"
                    );
                    report.inconsistent.push(InconsistentRow {
                        line,
                        country: record.country.clone(),
                        year: record.year,
                        medals: record.medals,
                        parts_sum,
                    });
                }
                ConsistencyPolicy::Reject => {
                    return Err(IoError::Inconsistent {
                        line,
                        country: record.country,
                        year: record.year,
                        medals: record.medals,
                        sum: parts_sum,
                    });
                }
            }
        }

        rows.push(record);
    }

    if report.rows_read > 0 {
        if !any_year {
            return Err(IoError::NonCoercibleColumn(COL_YEAR));
        }
        if !any_medals {
            return Err(IoError::NonCoercibleColumn(COL_MEDALS));
        }
    }

    report.rows_kept = rows.len() as u64;
    let table = MedalTable::new(rows).map_err(|e| IoError::Csv(e.to_string()))?;
    Ok((table, report))
}

// ----------------------------- Helpers -----------------------------

/// Positions of the required columns in the header row.
struct ColumnIndex {
    country: usize,
    year: usize,
    rank: usize,
    golds: usize,
    silvers: usize,
    bronzes: usize,
    medals: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, IoError> {
        let trimmed: Vec<&str> = headers.iter().map(str::trim).collect();
        let find = |name: &'static str| {
            trimmed.iter().position(|h| *h == name).ok_or(IoError::MissingColumn(name))
        };
        Ok(Self {
            country: find(COL_COUNTRY)?,
            year: find(COL_YEAR)?,
            rank: find(COL_RANK)?,
            golds: find(COL_GOLDS)?,
            silvers: find(COL_SILVERS)?,
            bronzes: find(COL_BRONZES)?,
            medals: find(COL_MEDALS)?,
        })
    }
}

/// Lenient numeric parse: anything that is not a finite number is "missing".
fn coerce_number(cell: Option<&str>) -> Option<f64> {
    let s = cell?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn whole_year(v: f64) -> Option<i32> {
    if v.fract() != 0.0 || v < f64::from(i32::MIN) || v > f64::from(i32::MAX) {
        return None;
    }
    Some(v as i32)
}

/// Non-negative whole number that fits in u32.
fn count_value(v: f64) -> Option<u32> {
    if v.fract() != 0.0 || v < 0.0 || v > f64::from(u32::MAX) {
        return None;
    }
    Some(v as u32)
}

/// Missing counts sum as zero; present counts must be valid.
fn required_count(
    v: Option<f64>,
    line: u64,
    column: &'static str,
    raw: Option<&str>,
) -> Result<u32, IoError> {
    match v {
        None => Ok(0),
        Some(x) => count_value(x).ok_or_else(|| IoError::InvalidCount {
            line,
            column,
            value: raw.unwrap_or("").trim().to_string(),
        }),
    }
}

/// Read a local file with a size guard.
fn read_source_with_limit(path: &Path) -> Result<Vec<u8>, IoError> {
    let read_err = |e: std::io::Error| IoError::Read { path: path.display().to_string(), msg: e.to_string() };
    let f = File::open(path).map_err(read_err)?;
    let len = f.metadata().map_err(read_err)?.len();
    if len > MAX_SOURCE_BYTES {
        return Err(IoError::Limit(format!(
            "{} is {len} bytes (max {MAX_SOURCE_BYTES})",
            path.display()
        )));
    }
    let mut buf = Vec::with_capacity(len as usize);
    f.take(MAX_SOURCE_BYTES + 1).read_to_end(&mut buf).map_err(read_err)?;
    Ok(buf)
}

// ----------------------------- Tests -----------------------------

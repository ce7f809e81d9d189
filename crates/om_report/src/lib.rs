//! om_report/src/lib.rs: Pure offline report model + renderers (JSON/HTML).
//!
//! Determinism rules:
//! - No network, no I/O here. Callers write the returned bytes.
//! - Percent strings use one-decimal formatting without float arithmetic.
//! - Stable section order and field names per variant.

#![deny(unsafe_code)]

use thiserror::Error;

pub mod render_html;
pub mod render_json;
pub mod structure;
pub mod variant;

pub use render_html::render_html;
pub use render_json::render_json;
pub use structure::{build_model, KpiCard, KpiValue, ReportMeta, ReportModel, Section, TrendSeries};
pub use variant::{Theme, Variant};

// ===== Errors =====
#[derive(Debug, Error)]
pub enum ReportError {
    /// The variant shows a view that was not computed.
    #[error("report section '{0}' is missing from the views")]
    MissingSection(&'static str),
    #[error("report serialization: {0}")]
    Serialize(String),
}

/// Pretty JSON bytes of the report (insertion-ordered keys, trailing LF).
pub fn report_json_bytes(m: &ReportModel) -> Result<Vec<u8>, ReportError> {
    let mut bytes = serde_json::to_vec_pretty(&render_json(m)).map_err(|e| ReportError::Serialize(e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

//! om_pipeline: the aggregation engine (canonical table + filters → dashboard views).
//! Pure reads over `MedalTable`; the only I/O entry point is `load_source`, which
//! goes through the process-wide cache in `om_io`.
//!
//! Stage order inside `apply`:
//!   check filters against the year domain → filter by year range →
//!   KPIs → top-N → composition → trend → scatter → heatmap →
//!   share-of-total (opt) → gold conversion (opt) → raw table

use std::path::Path;
use std::sync::Arc;

use om_core::{FilterParams, MedalRecord, MedalTable, MedalType, ParameterError, DEFAULT_MIN_MEDALS};
use om_io::cache;
use om_io::loader::{LoadOptions, LoadedTable};
use om_io::IoError;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub mod filter;
pub mod ranking;
pub mod summary;
pub mod views;

pub use filter::filter_by_year_range;
pub use ranking::{gold_conversion_rate, share_of_total, top_by_medal_type, ConversionRow, CountryValue, Ranking, ShareSlice};
pub use summary::{kpi_summary, raw_table, KpiSummary};
pub use views::{
    composition_for_top_countries, decade_heatmap, scatter_view, trend_over_time, CompositionRow, DecadeHeatmap,
    HeatmapRow, ScatterPoint, TrendPoint,
};

/// Default heatmap height (countries).
pub const DEFAULT_HEATMAP_SIZE: usize = 20;
/// Default pie size (slices).
pub const DEFAULT_SHARE_SIZE: usize = 10;

/// Single error surface for the engine entry points.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("invalid parameters: {0}")]
    Params(#[from] ParameterError),
}

/// Per-deployment knobs that are not user filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EngineOptions {
    /// Conversion-rate eligibility threshold on total Medals.
    pub min_medals: u64,
    pub scatter_excludes_zero_bronzes: bool,
    pub heatmap_size: usize,
    pub share_size: usize,
    pub include_share_of_total: bool,
    pub include_gold_conversion: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            min_medals: DEFAULT_MIN_MEDALS,
            scatter_excludes_zero_bronzes: false,
            heatmap_size: DEFAULT_HEATMAP_SIZE,
            share_size: DEFAULT_SHARE_SIZE,
            include_share_of_total: true,
            include_gold_conversion: true,
        }
    }
}

/// Filters as applied, echoed next to the views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AppliedFilters {
    pub year_min: i32,
    pub year_max: i32,
    pub top_n: usize,
    pub medal_type: MedalType,
    pub spotlight: Vec<String>,
    pub min_medals: u64,
}

/// Every derived table for one query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DashboardViews {
    pub filters: AppliedFilters,
    pub kpis: KpiSummary,
    pub top: Ranking,
    pub composition: Vec<CompositionRow>,
    pub trend: Vec<TrendPoint>,
    pub scatter: Vec<ScatterPoint>,
    pub heatmap: DecadeHeatmap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_of_total: Option<Vec<ShareSlice>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold_conversion: Option<Vec<ConversionRow>>,
    pub raw: Vec<MedalRecord>,
}

impl DashboardViews {
    /// SHA-256 of the canonical JSON form; identical queries give identical digests.
    pub fn digest(&self) -> Result<String, IoError> {
        om_io::hasher::sha256_canonical(self)
    }
}

/// Load (or reuse) the canonical table for `path` through the shared cache.
pub fn load_source(path: &Path, opts: &LoadOptions) -> Result<Arc<LoadedTable>, PipelineError> {
    Ok(cache::shared().get_or_load(path, opts)?)
}

/// Run every view for one set of filters.
///
/// Fails only when the year bounds are not years present in `table`.
pub fn apply(table: &MedalTable, filters: &FilterParams, opts: &EngineOptions) -> Result<DashboardViews, PipelineError> {
    filters.check_year_domain(&table.years())?;

    let range = filters.year_range();
    let n = filters.top_n().get();
    let medal_type = filters.medal_type();
    let dff = filter_by_year_range(table, range);
    debug!(year_min = range.min(), year_max = range.max(), rows = dff.len(), "filtered table");

    let views = DashboardViews {
        filters: AppliedFilters {
            year_min: range.min(),
            year_max: range.max(),
            top_n: n,
            medal_type,
            spotlight: filters.spotlight().iter().cloned().collect(),
            min_medals: opts.min_medals,
        },
        kpis: kpi_summary(&dff),
        top: top_by_medal_type(&dff, medal_type, n),
        composition: composition_for_top_countries(&dff, n),
        trend: trend_over_time(&dff, filters.spotlight(), medal_type),
        scatter: scatter_view(&dff, opts.scatter_excludes_zero_bronzes),
        heatmap: decade_heatmap(&dff, opts.heatmap_size),
        share_of_total: opts.include_share_of_total.then(|| share_of_total(&dff, medal_type, opts.share_size)),
        gold_conversion: opts.include_gold_conversion.then(|| gold_conversion_rate(&dff, opts.min_medals, n)),
        raw: raw_table(&dff),
    };

    debug!(
        top = views.top.len(),
        trend_points = views.trend.len(),
        heatmap_rows = views.heatmap.rows.len(),
        "views built"
    );
    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use om_core::{TopN, YearRange};

    fn table() -> MedalTable {
        let r = |c: &str, y: i32, g: u32, s: u32, b: u32| MedalRecord {
            country: c.into(),
            year: y,
            rank: Some(1),
            golds: g,
            silvers: s,
            bronzes: b,
            medals: g + s + b,
        };
        MedalTable::new(vec![r("USA", 2016, 46, 37, 38), r("USA", 2012, 46, 29, 29), r("CHN", 2016, 26, 18, 26)])
            .unwrap()
    }

    fn filters(min: i32, max: i32, n: usize) -> FilterParams {
        FilterParams::new(YearRange::new(min, max).unwrap(), TopN::new(n).unwrap(), ["USA"], MedalType::Medals)
    }

    #[test]
    fn year_bounds_must_be_in_domain() {
        let err = apply(&table(), &filters(2000, 2016, 5), &EngineOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Params(ParameterError::YearNotInDomain(2000))));
    }

    #[test]
    fn optional_views_follow_options() {
        let opts = EngineOptions { include_share_of_total: false, include_gold_conversion: false, ..Default::default() };
        let v = apply(&table(), &filters(2012, 2016, 5), &opts).unwrap();
        assert!(v.share_of_total.is_none() && v.gold_conversion.is_none());
        let v = apply(&table(), &filters(2012, 2016, 5), &EngineOptions::default()).unwrap();
        assert_eq!(v.share_of_total.map(|s| s.len()), Some(2));
    }

    #[test]
    fn digest_is_stable() {
        let a = apply(&table(), &filters(2012, 2016, 5), &EngineOptions::default()).unwrap();
        let b = apply(&table(), &filters(2012, 2016, 5), &EngineOptions::default()).unwrap();
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());
        let c = apply(&table(), &filters(2016, 2016, 5), &EngineOptions::default()).unwrap();
        assert_ne!(a.digest().unwrap(), c.digest().unwrap());
    }
}

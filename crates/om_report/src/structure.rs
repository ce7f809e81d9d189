//! crates/om_report/src/structure.rs
//! Report data model and the mapper from pipeline views.
//! No I/O, no recomputation, no floats. Section order is fixed per variant.

use om_core::{MedalRecord, MedalType, Percent1dp};
use om_pipeline::{CompositionRow, ConversionRow, CountryValue, DashboardViews, DecadeHeatmap, ScatterPoint, ShareSlice};

use crate::variant::Variant;
use crate::ReportError;

pub const TITLE: &str = "Summer Olympics Medal Dashboard";
pub const TREND_PLACEHOLDER: &str = "Select at least one country to view trends.";

// -------------------- Model root --------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportModel {
    pub variant: Variant,
    pub title: String,
    pub subtitle: String,
    pub kpis: Vec<KpiCard>,
    pub sections: Vec<Section>,
    pub integrity: ReportMeta,
}

/// Provenance supplied by the caller (CLI): where the data came from and
/// what the load did to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportMeta {
    pub source: String,
    pub source_sha256: String,
    pub views_sha256: String,
    pub rows_read: u64,
    pub rows_kept: u64,
    pub rows_dropped: u64,
    pub inconsistent_rows: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KpiCard {
    pub label: &'static str,
    pub value: KpiValue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KpiValue {
    Count(u64),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrendSeries {
    pub country: String,
    pub points: Vec<(i32, u64)>,
}

/// One chart block, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Section {
    /// Horizontal bars, smallest first (bottom-up).
    Ranking { title: String, medal_type: MedalType, bars: Vec<CountryValue> },
    Composition { title: String, rows: Vec<CompositionRow> },
    /// `placeholder` is set instead of series when no spotlight country is selected.
    Trend { title: String, medal_type: MedalType, series: Vec<TrendSeries>, placeholder: Option<&'static str> },
    Scatter { title: String, points: Vec<ScatterPoint> },
    Heatmap { title: String, heatmap: DecadeHeatmap },
    Share { title: String, medal_type: MedalType, slices: Vec<ShareSlice> },
    /// Smallest rate first, like the ranking bars.
    Conversion { title: String, min_medals: u64, bars: Vec<ConversionRow> },
    Raw { title: String, rows: Vec<MedalRecord> },
}

impl Section {
    /// Stable machine name, used as the JSON key and HTML anchor.
    pub fn key(&self) -> &'static str {
        match self {
            Section::Ranking { .. } => "top",
            Section::Composition { .. } => "composition",
            Section::Trend { .. } => "trend",
            Section::Scatter { .. } => "scatter",
            Section::Heatmap { .. } => "heatmap",
            Section::Share { .. } => "share_of_total",
            Section::Conversion { .. } => "gold_conversion",
            Section::Raw { .. } => "raw",
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Section::Ranking { title, .. }
            | Section::Composition { title, .. }
            | Section::Trend { title, .. }
            | Section::Scatter { title, .. }
            | Section::Heatmap { title, .. }
            | Section::Share { title, .. }
            | Section::Conversion { title, .. }
            | Section::Raw { title, .. } => title,
        }
    }
}

// -------------------- Mapper --------------------

/// Map pipeline views onto the report model for `variant`.
///
/// Fails when the variant shows a view the caller did not compute.
pub fn build_model(views: &DashboardViews, meta: ReportMeta, variant: Variant) -> Result<ReportModel, ReportError> {
    let f = &views.filters;
    let mt = f.medal_type;
    let n = f.top_n;

    let kpis = vec![
        KpiCard { label: "Olympic Games", value: KpiValue::Count(views.kpis.games as u64) },
        KpiCard { label: "Nations Competed", value: KpiValue::Count(views.kpis.nations as u64) },
        KpiCard { label: "Total Medals Awarded", value: KpiValue::Count(views.kpis.total_medals) },
        KpiCard {
            label: "All-Time Leader",
            value: KpiValue::Text(views.kpis.leader.as_ref().map_or_else(|| "n/a".to_string(), |l| l.country.clone())),
        },
    ];

    let mut sections = vec![
        Section::Ranking {
            title: format!("Top {n} Countries by Total {mt}"),
            medal_type: mt,
            bars: views.top.ascending().cloned().collect(),
        },
        Section::Composition { title: format!("Medal Breakdown: Top {n}"), rows: views.composition.clone() },
        trend_section(views),
        Section::Scatter { title: "Golds vs Total Medals (size = Bronzes)".into(), points: views.scatter.clone() },
        Section::Heatmap {
            title: format!("Medal Heatmap: Top {} Nations by Decade", views.heatmap.rows.len()),
            heatmap: views.heatmap.clone(),
        },
    ];

    let opts = variant.engine_options(Some(f.min_medals));
    if opts.include_share_of_total {
        let slices = views.share_of_total.clone().ok_or(ReportError::MissingSection("share_of_total"))?;
        sections.push(Section::Share { title: format!("{mt} Share: Top {}", opts.share_size), medal_type: mt, slices });
    }
    if opts.include_gold_conversion {
        let mut bars = views.gold_conversion.clone().ok_or(ReportError::MissingSection("gold_conversion"))?;
        bars.reverse();
        sections.push(Section::Conversion {
            title: "Gold Conversion Rate (Golds / Total Medals)".into(),
            min_medals: f.min_medals,
            bars,
        });
    }
    sections.push(Section::Raw { title: "Filtered Raw Data".into(), rows: views.raw.clone() });

    Ok(ReportModel {
        variant,
        title: TITLE.to_string(),
        subtitle: format!("{}-{} · {} · top {}", f.year_min, f.year_max, mt, n),
        kpis,
        sections,
        integrity: meta,
    })
}

fn trend_section(views: &DashboardViews) -> Section {
    let mt = views.filters.medal_type;
    let title = format!("{mt} Over Time");
    if views.filters.spotlight.is_empty() {
        return Section::Trend { title, medal_type: mt, series: Vec::new(), placeholder: Some(TREND_PLACEHOLDER) };
    }
    // Points arrive ordered by (year, country); regroup per country keeping year order.
    let mut series: Vec<TrendSeries> = views
        .filters
        .spotlight
        .iter()
        .map(|c| TrendSeries { country: c.clone(), points: Vec::new() })
        .collect();
    for p in &views.trend {
        if let Some(s) = series.iter_mut().find(|s| s.country == p.country) {
            s.points.push((p.year, p.value));
        }
    }
    Section::Trend { title, medal_type: mt, series, placeholder: None }
}

/// `40.9%`
pub(crate) fn pct(p: Percent1dp) -> String {
    format!("{p}%")
}

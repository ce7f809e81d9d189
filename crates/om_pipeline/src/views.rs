//! Multi-column views: composition breakdown, time trend, efficiency
//! scatter and the decade heatmap.

use std::collections::{BTreeMap, BTreeSet};

use om_core::determinism::top_n_desc;
use om_core::{MedalCounts, MedalTable, MedalType};
use serde::Serialize;

/// Names of the `n` countries with the most total Medals, largest first.
fn top_countries_by_medals(table: &MedalTable, n: usize) -> Vec<String> {
    let grouped: Vec<(&str, u64)> =
        table.totals_by_country().into_iter().map(|(c, m)| (c, m.medals)).collect();
    top_n_desc(grouped, n).into_iter().map(|(c, _)| c.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Composition (stacked bar)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompositionRow {
    pub country: String,
    pub golds: u64,
    pub silvers: u64,
    pub bronzes: u64,
}

/// Gold/Silver/Bronze sums for the top-`n` countries by total Medals,
/// ordered by Golds descending (ties by country name).
pub fn composition_for_top_countries(table: &MedalTable, n: usize) -> Vec<CompositionRow> {
    let top: BTreeSet<String> = top_countries_by_medals(table, n).into_iter().collect();
    let mut rows: Vec<CompositionRow> = table
        .totals_by_country()
        .into_iter()
        .filter(|(c, _)| top.contains(*c))
        .map(|(c, m)| CompositionRow { country: c.to_string(), golds: m.golds, silvers: m.silvers, bronzes: m.bronzes })
        .collect();
    rows.sort_by(|a, b| b.golds.cmp(&a.golds));
    rows
}

// ---------------------------------------------------------------------------
// Trend (line chart)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub country: String,
    pub value: u64,
}

/// Per-(Year, Country) sums of `medal_type` for the spotlight countries,
/// ordered by year then country. An empty spotlight yields no points.
pub fn trend_over_time(table: &MedalTable, countries: &BTreeSet<String>, medal_type: MedalType) -> Vec<TrendPoint> {
    if countries.is_empty() {
        return Vec::new();
    }
    let mut grouped: BTreeMap<(i32, &str), u64> = BTreeMap::new();
    for r in table.iter().filter(|r| countries.contains(&r.country)) {
        *grouped.entry((r.year, r.country.as_str())).or_default() += r.count(medal_type);
    }
    grouped
        .into_iter()
        .map(|((year, country), value)| TrendPoint { year, country: country.to_string(), value })
        .collect()
}

// ---------------------------------------------------------------------------
// Scatter (golds vs medals, sized by bronzes)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScatterPoint {
    pub country: String,
    pub golds: u64,
    pub silvers: u64,
    pub bronzes: u64,
    pub medals: u64,
}

impl ScatterPoint {
    fn from_counts(country: &str, c: &MedalCounts) -> Self {
        Self { country: country.to_string(), golds: c.golds, silvers: c.silvers, bronzes: c.bronzes, medals: c.medals }
    }
}

/// Per-country sums of all four columns, ascending by country. With
/// `exclude_zero_bronzes`, countries whose summed Bronzes is 0 are left out
/// (they would have no bubble).
pub fn scatter_view(table: &MedalTable, exclude_zero_bronzes: bool) -> Vec<ScatterPoint> {
    table
        .totals_by_country()
        .iter()
        .filter(|(_, c)| !exclude_zero_bronzes || c.bronzes > 0)
        .map(|(country, c)| ScatterPoint::from_counts(country, c))
        .collect()
}

// ---------------------------------------------------------------------------
// Decade heatmap
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeatmapRow {
    pub country: String,
    pub total: u64,
    /// One cell per entry of `DecadeHeatmap::decades`; absent combinations are 0.
    pub cells: Vec<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DecadeHeatmap {
    /// Decade start years present among the selected countries, ascending.
    pub decades: Vec<i32>,
    /// Ordered by total Medals descending.
    pub rows: Vec<HeatmapRow>,
}

impl DecadeHeatmap {
    pub fn cell(&self, country: &str, decade: i32) -> Option<u64> {
        let col = self.decades.iter().position(|d| *d == decade)?;
        let row = self.rows.iter().find(|r| r.country == country)?;
        row.cells.get(col).copied()
    }

    /// Column label, e.g. `1990s`.
    pub fn decade_label(decade: i32) -> String {
        format!("{decade}s")
    }
}

/// Medals per (Country, Decade) for the top-`n` countries by total Medals.
pub fn decade_heatmap(table: &MedalTable, n: usize) -> DecadeHeatmap {
    let top = top_countries_by_medals(table, n);
    let wanted: BTreeSet<&str> = top.iter().map(String::as_str).collect();

    let mut sums: BTreeMap<(&str, i32), u64> = BTreeMap::new();
    let mut decades: BTreeSet<i32> = BTreeSet::new();
    for r in table.iter().filter(|r| wanted.contains(r.country.as_str())) {
        decades.insert(r.decade());
        *sums.entry((r.country.as_str(), r.decade())).or_default() += u64::from(r.medals);
    }
    let decades: Vec<i32> = decades.into_iter().collect();

    let totals = table.totals_by_country();
    let rows = top
        .iter()
        .map(|country| HeatmapRow {
            country: country.clone(),
            total: totals.get(country.as_str()).map_or(0, |c| c.medals),
            cells: decades
                .iter()
                .map(|d| sums.get(&(country.as_str(), *d)).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    DecadeHeatmap { decades, rows }
}

//! KPI header cards and the raw-table view.

use std::cmp::Ordering;

use om_core::{MedalRecord, MedalTable};
use serde::Serialize;

use crate::ranking::CountryValue;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct KpiSummary {
    /// Distinct Olympic years in the filtered table.
    pub games: usize,
    /// Distinct countries in the filtered table.
    pub nations: usize,
    pub total_medals: u64,
    /// Country with the most Medals; first by name on ties. None when empty.
    pub leader: Option<CountryValue>,
}

pub fn kpi_summary(table: &MedalTable) -> KpiSummary {
    let mut leader: Option<CountryValue> = None;
    for (country, c) in table.totals_by_country() {
        if leader.as_ref().map_or(true, |l| c.medals > l.value) {
            leader = Some(CountryValue { country: country.to_string(), value: c.medals });
        }
    }
    KpiSummary {
        games: table.years().len(),
        nations: table.countries().len(),
        total_medals: table.total(om_core::MedalType::Medals),
        leader,
    }
}

/// Filtered rows ordered by Year, then Rank (unranked rows last); ties keep table order.
pub fn raw_table(table: &MedalTable) -> Vec<MedalRecord> {
    let mut rows = table.rows().to_vec();
    rows.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then_with(|| match (a.rank, b.rank) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
    rows
}

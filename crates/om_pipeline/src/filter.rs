//! Year-range filter, the first stage of every query.

use om_core::{MedalTable, YearRange};

/// Keep rows with `range.min() <= year <= range.max()`, in source order.
pub fn filter_by_year_range(table: &MedalTable, range: YearRange) -> MedalTable {
    table.retain_rows(|r| range.contains(r.year))
}

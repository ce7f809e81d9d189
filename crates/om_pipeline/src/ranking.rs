//! Country rankings: top-N by medal column, share-of-total (pie) and gold
//! conversion rate.
//!
//! All three group through `MedalTable::totals_by_country`, so equal values
//! keep ascending country order after the stable sort.

use om_core::determinism::{top_n_desc, top_n_desc_by};
use om_core::{MedalTable, MedalType, Percent1dp};
use serde::Serialize;

/// One ranked country and its summed value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CountryValue {
    pub country: String,
    pub value: u64,
}

/// Top-N countries for one medal column. Stored largest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ranking {
    pub medal_type: MedalType,
    pub entries: Vec<CountryValue>,
}

impl Ranking {
    /// Largest first.
    pub fn descending(&self) -> impl DoubleEndedIterator<Item = &CountryValue> {
        self.entries.iter()
    }

    /// Smallest first; the horizontal bar chart draws bottom-up in this order.
    pub fn ascending(&self) -> impl DoubleEndedIterator<Item = &CountryValue> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn top_by_medal_type(table: &MedalTable, medal_type: MedalType, n: usize) -> Ranking {
    let grouped: Vec<(&str, u64)> = table
        .totals_by_country()
        .into_iter()
        .map(|(c, counts)| (c, counts.get(medal_type)))
        .collect();
    let entries = top_n_desc(grouped, n)
        .into_iter()
        .map(|(c, v)| CountryValue { country: c.to_string(), value: v })
        .collect();
    Ranking { medal_type, entries }
}

/* ---------------------------- Share of total ---------------------------- */

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShareSlice {
    pub country: String,
    pub value: u64,
    /// Share of the displayed slices' total (not of the whole table).
    pub share: Percent1dp,
}

/// Top `n` countries by `medal_type`, each with its share of the slices shown.
pub fn share_of_total(table: &MedalTable, medal_type: MedalType, n: usize) -> Vec<ShareSlice> {
    let top = top_by_medal_type(table, medal_type, n);
    let shown: u64 = top.entries.iter().map(|e| e.value).sum();
    top.entries
        .into_iter()
        .map(|e| ShareSlice {
            share: Percent1dp::from_ratio(e.value, shown).unwrap_or_default(),
            country: e.country,
            value: e.value,
        })
        .collect()
}

/* ---------------------------- Gold conversion ---------------------------- */

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConversionRow {
    pub country: String,
    pub golds: u64,
    pub medals: u64,
    /// Golds / Medals, one decimal.
    pub gold_pct: Percent1dp,
}

/// Countries with at least `min_medals` total medals, ranked by gold share.
/// Countries with zero medals have no rate and never appear.
pub fn gold_conversion_rate(table: &MedalTable, min_medals: u64, n: usize) -> Vec<ConversionRow> {
    let eligible: Vec<ConversionRow> = table
        .totals_by_country()
        .into_iter()
        .filter(|(_, c)| c.medals >= min_medals)
        .filter_map(|(country, c)| {
            Percent1dp::from_ratio(c.golds, c.medals).map(|gold_pct| ConversionRow {
                country: country.to_string(),
                golds: c.golds,
                medals: c.medals,
                gold_pct,
            })
        })
        .collect();
    top_n_desc_by(eligible, n, |a, b| a.gold_pct.cmp(&b.gold_pct))
}

#[cfg(test)]
mod tests {
    use super::*;
    use om_core::MedalRecord;

    fn row(c: &str, y: i32, g: u32, s: u32, b: u32) -> MedalRecord {
        MedalRecord { country: c.into(), year: y, rank: None, golds: g, silvers: s, bronzes: b, medals: g + s + b }
    }

    fn sample() -> MedalTable {
        MedalTable::new(vec![
            row("USA", 2016, 46, 37, 38),
            row("USA", 2012, 46, 29, 29),
            row("CHN", 2016, 26, 18, 26),
        ])
        .unwrap()
    }

    #[test]
    fn top_one_by_medals() {
        let r = top_by_medal_type(&sample(), MedalType::Medals, 1);
        assert_eq!(r.entries, vec![CountryValue { country: "USA".into(), value: 225 }]);
    }

    #[test]
    fn ascending_reverses_descending() {
        let r = top_by_medal_type(&sample(), MedalType::Golds, 5);
        let down: Vec<_> = r.descending().map(|e| e.country.as_str()).collect();
        let up: Vec<_> = r.ascending().map(|e| e.country.as_str()).collect();
        assert_eq!(down, vec!["USA", "CHN"]);
        assert_eq!(up, vec!["CHN", "USA"]);
    }

    #[test]
    fn ties_break_by_country_name() {
        let t = MedalTable::new(vec![row("NOR", 2016, 5, 0, 0), row("BEL", 2016, 5, 0, 0), row("ZAF", 2016, 9, 0, 0)])
            .unwrap();
        let r = top_by_medal_type(&t, MedalType::Golds, 3);
        let names: Vec<_> = r.descending().map(|e| e.country.as_str()).collect();
        assert_eq!(names, vec!["ZAF", "BEL", "NOR"]);
    }

    #[test]
    fn conversion_scenario() {
        let rows = gold_conversion_rate(&sample(), 20, 10);
        let got: Vec<(&str, String)> = rows.iter().map(|r| (r.country.as_str(), r.gold_pct.to_string())).collect();
        assert_eq!(got, vec![("USA", "40.9".to_string()), ("CHN", "37.1".to_string())]);
        assert_eq!(gold_conversion_rate(&sample(), 20, 1)[0].country, "USA");
    }

    #[test]
    fn conversion_threshold_and_zero_medals() {
        let t = MedalTable::new(vec![row("AAA", 2016, 10, 5, 4), row("BBB", 2016, 0, 0, 0), row("CCC", 2016, 15, 5, 0)])
            .unwrap();
        let names: Vec<_> = gold_conversion_rate(&t, 20, 10).into_iter().map(|r| r.country).collect();
        assert_eq!(names, vec!["CCC"]);
        let names: Vec<_> = gold_conversion_rate(&t, 0, 10).into_iter().map(|r| r.country).collect();
        assert_eq!(names, vec!["CCC", "AAA"]);
    }

    #[test]
    fn shares_are_of_displayed_total() {
        let s = share_of_total(&sample(), MedalType::Medals, 10);
        assert_eq!(s.len(), 2);
        // 225 / 295 = 76.27..., 70 / 295 = 23.72...
        assert_eq!(s[0].share.to_string(), "76.3");
        assert_eq!(s[1].share.to_string(), "23.7");

        let only_usa = share_of_total(&sample(), MedalType::Medals, 1);
        assert_eq!(only_usa[0].share.to_string(), "100.0");
    }

    #[test]
    fn shares_of_all_zero_slices_are_zero() {
        let t = MedalTable::new(vec![row("AAA", 2016, 0, 0, 0)]).unwrap();
        let s = share_of_total(&t, MedalType::Golds, 10);
        assert_eq!(s[0].share, Percent1dp::from_tenths(0));
    }
}

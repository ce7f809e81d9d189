// Engine-level behavior over generated tables plus the small three-row scenario.

use std::collections::BTreeSet;
use std::fs;

use om_core::{FilterParams, MedalRecord, MedalTable, MedalType, TopN, YearRange};
use om_io::loader::LoadOptions;
use om_pipeline::*;
use proptest::prelude::*;

fn rec(c: &str, y: i32, rank: u32, g: u32, s: u32, b: u32, m: u32) -> MedalRecord {
    MedalRecord { country: c.into(), year: y, rank: Some(rank), golds: g, silvers: s, bronzes: b, medals: m }
}

fn scenario() -> MedalTable {
    MedalTable::new(vec![
        rec("USA", 2016, 1, 46, 37, 38, 121),
        rec("USA", 2012, 1, 46, 29, 29, 104),
        rec("CHN", 2016, 2, 26, 18, 26, 70),
    ])
    .unwrap()
}

#[test]
fn scenario_top_one_by_medals() {
    let r = top_by_medal_type(&scenario(), MedalType::Medals, 1);
    assert_eq!(r.entries, vec![CountryValue { country: "USA".into(), value: 225 }]);
}

#[test]
fn scenario_conversion() {
    let all: Vec<(String, String)> = gold_conversion_rate(&scenario(), 20, 10)
        .into_iter()
        .map(|r| (r.country, r.gold_pct.to_string()))
        .collect();
    assert_eq!(all, vec![("USA".into(), "40.9".into()), ("CHN".into(), "37.1".into())]);

    let top1 = gold_conversion_rate(&scenario(), 20, 1);
    assert_eq!(top1.len(), 1);
    assert_eq!(top1[0].country, "USA");
}

#[test]
fn scenario_full_apply() {
    let filters = FilterParams::new(
        YearRange::new(2012, 2016).unwrap(),
        TopN::new(1).unwrap(),
        Vec::<String>::new(),
        MedalType::Medals,
    );
    let v = apply(&scenario(), &filters, &EngineOptions::default()).unwrap();
    assert_eq!(v.kpis.games, 2);
    assert_eq!(v.kpis.nations, 2);
    assert_eq!(v.kpis.total_medals, 295);
    assert_eq!(v.top.entries[0].value, 225);
    assert!(v.trend.is_empty());
    assert_eq!(v.raw.len(), 3);
    assert_eq!(v.heatmap.cell("USA", 2010), Some(225));
}

#[test]
fn load_source_reads_through_shared_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("olympics.csv");
    fs::write(
        &path,
        "Country , Year ,Rank,Golds,Silvers,Bronzes,Medals\n\
         USA,2016,1,46,37,38,121\n\
         USA,2012,1,46,29,29,104\n\
         CHN,2016,2,26,18,26,70\n\
         nan,2016,3,1,1,1,3\n",
    )
    .unwrap();
    let a = load_source(&path, &LoadOptions::default()).unwrap();
    let b = load_source(&path, &LoadOptions::default()).unwrap();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
    assert_eq!(a.table, scenario());
    assert_eq!(a.report.dropped_placeholder_country, 1);
}

// ---------------------------------------------------------------------------
// Generated tables
// ---------------------------------------------------------------------------

const NAMES: [&str; 8] = ["ARG", "BRA", "CAN", "DEN", "EGY", "FRA", "GER", "HUN"];

fn table_strategy() -> impl Strategy<Value = MedalTable> {
    prop::collection::btree_map((0usize..NAMES.len(), 0i32..16), (0u32..40, 0u32..40, 0u32..40), 0..60).prop_map(
        |cells| {
            let rows = cells
                .into_iter()
                .map(|((c, y), (g, s, b))| rec(NAMES[c], 1896 + 4 * y, 1, g, s, b, g + s + b))
                .collect();
            MedalTable::new(rows).unwrap()
        },
    )
}

proptest! {
    #[test]
    fn top_n_is_bounded_and_non_increasing(t in table_strategy(), n in 1usize..12) {
        let r = top_by_medal_type(&t, MedalType::Medals, n);
        prop_assert_eq!(r.len(), n.min(t.countries().len()));
        let vals: Vec<u64> = r.descending().map(|e| e.value).collect();
        prop_assert!(vals.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn heatmap_cells_sum_the_decade(t in table_strategy()) {
        let h = decade_heatmap(&t, 20);
        for row in &h.rows {
            for (i, d) in h.decades.iter().enumerate() {
                let expected: u64 = t
                    .iter()
                    .filter(|r| r.country == row.country && r.year >= *d && r.year <= *d + 9)
                    .map(|r| u64::from(r.medals))
                    .sum();
                prop_assert_eq!(row.cells[i], expected);
            }
            prop_assert_eq!(row.cells.iter().sum::<u64>(), row.total);
        }
        let totals: Vec<u64> = h.rows.iter().map(|r| r.total).collect();
        prop_assert!(totals.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn year_filter_is_idempotent(t in table_strategy(), a in 0i32..16, b in 0i32..16) {
        let (lo, hi) = (1896 + 4 * a.min(b), 1896 + 4 * a.max(b));
        let range = YearRange::new(lo, hi).unwrap();
        let once = filter_by_year_range(&t, range);
        prop_assert_eq!(&filter_by_year_range(&once, range), &once);
        prop_assert!(once.iter().all(|r| r.year >= lo && r.year <= hi));
    }

    #[test]
    fn empty_spotlight_gives_no_trend(t in table_strategy()) {
        prop_assert!(trend_over_time(&t, &BTreeSet::new(), MedalType::Golds).is_empty());
    }

    #[test]
    fn conversion_respects_threshold(t in table_strategy(), min in 0u64..120) {
        let rows = gold_conversion_rate(&t, min, 10);
        prop_assert!(rows.len() <= 10);
        prop_assert!(rows.iter().all(|r| r.medals >= min && r.medals > 0));
        prop_assert!(rows.windows(2).all(|w| w[0].gold_pct >= w[1].gold_pct));
    }
}

//! render_json.rs
//! Report JSON renderer: meta → kpis → sections (display order) → integrity.
//!
//! Object key order is the insertion order of `serde_json::Map`; this crate
//! enables serde_json's `preserve_order` feature for that. Percents are
//! emitted as one-decimal strings ("40.9%") so no floats reach the output.

use serde_json::{json, Map as JsonMap, Value};

use crate::structure::{pct, KpiValue, ReportModel, Section};
use crate::variant::Variant;

pub fn render_json(m: &ReportModel) -> Value {
    let mut root = obj();

    let mut meta = obj();
    meta.insert("title".into(), Value::String(m.title.clone()));
    meta.insert("subtitle".into(), Value::String(m.subtitle.clone()));
    meta.insert("variant".into(), Value::String(m.variant.to_string()));
    root.insert("meta".into(), Value::Object(meta));

    let kpis: Vec<Value> = m
        .kpis
        .iter()
        .map(|k| {
            let mut o = obj();
            o.insert("label".into(), Value::String(k.label.to_string()));
            o.insert(
                "value".into(),
                match &k.value {
                    KpiValue::Count(n) => Value::from(*n),
                    KpiValue::Text(s) => Value::String(s.clone()),
                },
            );
            Value::Object(o)
        })
        .collect();
    root.insert("kpis".into(), Value::Array(kpis));

    let sections: Vec<Value> = m.sections.iter().map(|s| section_json(s, m.variant)).collect();
    root.insert("sections".into(), Value::Array(sections));

    let i = &m.integrity;
    let mut integrity = obj();
    integrity.insert("source".into(), Value::String(i.source.clone()));
    integrity.insert("source_sha256".into(), Value::String(i.source_sha256.clone()));
    integrity.insert("views_sha256".into(), Value::String(i.views_sha256.clone()));
    integrity.insert("rows_read".into(), Value::from(i.rows_read));
    integrity.insert("rows_kept".into(), Value::from(i.rows_kept));
    integrity.insert("rows_dropped".into(), Value::from(i.rows_dropped));
    integrity.insert("inconsistent_rows".into(), Value::from(i.inconsistent_rows));
    root.insert("integrity".into(), Value::Object(integrity));

    Value::Object(root)
}

/* ----------------------- sections ----------------------- */

fn section_json(s: &Section, variant: Variant) -> Value {
    let mut o = obj();
    o.insert("key".into(), Value::String(s.key().to_string()));
    o.insert("title".into(), Value::String(s.title().to_string()));

    match s {
        Section::Ranking { medal_type, bars, .. } => {
            o.insert("medal_type".into(), Value::String(medal_type.to_string()));
            let rows = bars.iter().map(|b| json!({ "country": b.country, "value": b.value })).collect();
            o.insert("bars_ascending".into(), Value::Array(rows));
        }
        Section::Composition { rows, .. } => {
            let rows = rows
                .iter()
                .map(|r| {
                    let mut x = obj();
                    x.insert("country".into(), Value::String(r.country.clone()));
                    x.insert("golds".into(), Value::from(r.golds));
                    x.insert("silvers".into(), Value::from(r.silvers));
                    x.insert("bronzes".into(), Value::from(r.bronzes));
                    Value::Object(x)
                })
                .collect();
            o.insert("rows".into(), Value::Array(rows));
        }
        Section::Trend { medal_type, series, placeholder, .. } => {
            o.insert("medal_type".into(), Value::String(medal_type.to_string()));
            if let Some(p) = placeholder {
                o.insert("placeholder".into(), Value::String(p.to_string()));
            }
            let series = series
                .iter()
                .map(|s| {
                    let pts: Vec<Value> = s.points.iter().map(|(y, v)| json!([y, v])).collect();
                    let mut x = obj();
                    x.insert("country".into(), Value::String(s.country.clone()));
                    x.insert("points".into(), Value::Array(pts));
                    Value::Object(x)
                })
                .collect();
            o.insert("series".into(), Value::Array(series));
        }
        Section::Scatter { points, .. } => {
            o.insert("excludes_zero_bronzes".into(), Value::Bool(variant.engine_options(None).scatter_excludes_zero_bronzes));
            let pts = points
                .iter()
                .map(|p| {
                    let mut x = obj();
                    x.insert("country".into(), Value::String(p.country.clone()));
                    x.insert("golds".into(), Value::from(p.golds));
                    x.insert("medals".into(), Value::from(p.medals));
                    x.insert("bronzes".into(), Value::from(p.bronzes));
                    Value::Object(x)
                })
                .collect();
            o.insert("points".into(), Value::Array(pts));
        }
        Section::Heatmap { heatmap, .. } => {
            let cols: Vec<Value> = heatmap
                .decades
                .iter()
                .map(|d| Value::String(om_pipeline::DecadeHeatmap::decade_label(*d)))
                .collect();
            o.insert("decades".into(), Value::Array(cols));
            let rows = heatmap
                .rows
                .iter()
                .map(|r| {
                    let mut x = obj();
                    x.insert("country".into(), Value::String(r.country.clone()));
                    x.insert("total".into(), Value::from(r.total));
                    x.insert("cells".into(), Value::Array(r.cells.iter().map(|c| Value::from(*c)).collect()));
                    Value::Object(x)
                })
                .collect();
            o.insert("rows".into(), Value::Array(rows));
        }
        Section::Share { medal_type, slices, .. } => {
            o.insert("medal_type".into(), Value::String(medal_type.to_string()));
            let rows = slices
                .iter()
                .map(|s| {
                    let mut x = obj();
                    x.insert("country".into(), Value::String(s.country.clone()));
                    x.insert("value".into(), Value::from(s.value));
                    x.insert("share".into(), Value::String(pct(s.share)));
                    Value::Object(x)
                })
                .collect();
            o.insert("slices".into(), Value::Array(rows));
        }
        Section::Conversion { min_medals, bars, .. } => {
            o.insert("min_medals".into(), Value::from(*min_medals));
            let rows = bars
                .iter()
                .map(|b| {
                    let mut x = obj();
                    x.insert("country".into(), Value::String(b.country.clone()));
                    x.insert("golds".into(), Value::from(b.golds));
                    x.insert("medals".into(), Value::from(b.medals));
                    x.insert("gold_pct".into(), Value::String(pct(b.gold_pct)));
                    Value::Object(x)
                })
                .collect();
            o.insert("bars_ascending".into(), Value::Array(rows));
        }
        Section::Raw { rows, .. } => {
            let rows = rows
                .iter()
                .map(|r| {
                    let mut x = obj();
                    x.insert("country".into(), Value::String(r.country.clone()));
                    x.insert("year".into(), Value::from(r.year));
                    x.insert("rank".into(), r.rank.map_or(Value::Null, Value::from));
                    x.insert("golds".into(), Value::from(r.golds));
                    x.insert("silvers".into(), Value::from(r.silvers));
                    x.insert("bronzes".into(), Value::from(r.bronzes));
                    x.insert("medals".into(), Value::from(r.medals));
                    Value::Object(x)
                })
                .collect();
            o.insert("rows".into(), Value::Array(rows));
        }
    }

    Value::Object(o)
}

/* ----------------------- helpers ----------------------- */

#[inline]
fn obj() -> JsonMap<String, Value> {
    JsonMap::new()
}

// crates/om_report/src/render_html.rs
//
// Deterministic, offline HTML renderer.
// • No external assets: inline CSS from the variant's theme, bars drawn as
//   sized <div>s, the heatmap as a shaded table.
// • Integers rendered with "," thousands separators; percents one decimal.
// • All data strings HTML-escaped.
// • Section order follows the model.

use std::fmt::Write as _;

use crate::structure::{pct, KpiValue, ReportModel, Section};
use crate::variant::Theme;

// ------------------------- formatting helpers -------------------------

/// Escape text for HTML (minimal, deterministic).
pub(crate) fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Format a non-negative integer with "," every three digits.
pub(crate) fn fmt_int<T: Into<u128>>(n: T) -> String {
    let digits = n.into().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Bar width in whole percent of the largest value (0..=100).
fn width_pct(v: u64, max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    (u128::from(v) * 100 / u128::from(max)) as u64
}

// ------------------------- HTML builder -------------------------

struct HtmlBuilder<'a> {
    theme: &'a Theme,
    buf: String,
}

impl<'a> HtmlBuilder<'a> {
    fn new(theme: &'a Theme) -> Self {
        Self { theme, buf: String::with_capacity(32 * 1024) }
    }

    fn begin(&mut self, title: &str) {
        let t = self.theme;
        let _ = write!(
            self.buf,
            "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n\
body{{background:{bg};color:{text};font-family:system-ui,sans-serif;margin:0;padding:24px}}\n\
h1{{margin:0 0 4px}} h2{{border-bottom:1px solid {grid};padding-bottom:4px}}\n\
.sub,.muted{{color:{muted}}}\n\
.kpis{{display:flex;gap:12px;margin:16px 0}}\n\
.kpi{{background:{card};border:1px solid {grid};border-radius:8px;padding:12px 16px;flex:1}}\n\
.kpi .v{{font-size:1.6em;font-weight:700;color:{gold}}}\n\
section{{background:{card};border-radius:8px;padding:12px 16px;margin:16px 0}}\n\
table{{border-collapse:collapse;width:100%}} td,th{{padding:4px 8px;border-bottom:1px solid {grid};text-align:left}}\n\
td.n,th.n{{text-align:right;font-variant-numeric:tabular-nums}}\n\
.bar{{height:14px;background:{accent};border-radius:3px}}\n\
.g{{background:{gold}}} .s{{background:{silver}}} .b{{background:{bronze}}}\n\
.stack{{display:flex;height:14px}}\n\
footer{{color:{muted};font-size:.85em;border-top:1px solid {grid};margin-top:24px;padding-top:8px}}\n\
aside{{background:{sidebar}}}\n\
</style>\n</head>\n<body>\n",
            esc(title),
            bg = t.background,
            text = t.text,
            grid = t.grid,
            muted = t.muted,
            card = t.card,
            gold = t.gold,
            accent = t.accent,
            silver = t.silver,
            bronze = t.bronze,
            sidebar = t.sidebar,
        );
    }

    fn end(&mut self) {
        self.buf.push_str("</body>\n</html>\n");
    }

    fn open_section(&mut self, key: &str, title: &str) {
        let _ = write!(self.buf, "<section id=\"{}\">\n<h2>{}</h2>\n", esc(key), esc(title));
    }

    fn close_section(&mut self) {
        self.buf.push_str("</section>\n");
    }

    fn bar_row(&mut self, label: &str, value_text: &str, width: u64) {
        let _ = writeln!(
            self.buf,
            "<tr><td>{}</td><td class=\"n\">{}</td><td style=\"width:60%\"><div class=\"bar\" style=\"width:{}%\"></div></td></tr>",
            esc(label),
            value_text,
            width
        );
    }
}

// ------------------------- public entry -------------------------

/// Render the full report as one self-contained HTML document.
pub fn render_html(m: &ReportModel, theme: &Theme) -> String {
    let mut h = HtmlBuilder::new(theme);
    h.begin(&m.title);

    let _ = write!(h.buf, "<h1>{}</h1>\n<p class=\"sub\">{}</p>\n", esc(&m.title), esc(&m.subtitle));

    h.buf.push_str("<div class=\"kpis\">\n");
    for k in &m.kpis {
        let v = match &k.value {
            KpiValue::Count(n) => fmt_int(*n),
            KpiValue::Text(s) => esc(s),
        };
        let _ = writeln!(h.buf, "<div class=\"kpi\"><div class=\"muted\">{}</div><div class=\"v\">{}</div></div>", esc(k.label), v);
    }
    h.buf.push_str("</div>\n");

    for s in &m.sections {
        h.open_section(s.key(), s.title());
        section_html(&mut h, s);
        h.close_section();
    }

    let i = &m.integrity;
    let _ = write!(
        h.buf,
        "<footer>\n<div>Source: {} (sha256 {})</div>\n<div>Rows read {}, kept {}, dropped {}, inconsistent {}</div>\n<div>Views sha256 {} · variant {}</div>\n</footer>\n",
        esc(&i.source),
        esc(&i.source_sha256),
        fmt_int(i.rows_read),
        fmt_int(i.rows_kept),
        fmt_int(i.rows_dropped),
        fmt_int(i.inconsistent_rows),
        esc(&i.views_sha256),
        m.variant,
    );

    h.end();
    h.buf
}

fn section_html(h: &mut HtmlBuilder<'_>, s: &Section) {
    match s {
        Section::Ranking { bars, .. } => {
            // Bars arrive smallest first; the table reads top-down, so flip.
            let max = bars.iter().map(|b| b.value).max().unwrap_or(0);
            h.buf.push_str("<table>\n");
            for b in bars.iter().rev() {
                h.bar_row(&b.country, &fmt_int(b.value), width_pct(b.value, max));
            }
            h.buf.push_str("</table>\n");
        }
        Section::Composition { rows, .. } => {
            let max = rows.iter().map(|r| r.golds + r.silvers + r.bronzes).max().unwrap_or(0);
            h.buf.push_str("<table>\n<tr><th>Country</th><th class=\"n\">Gold</th><th class=\"n\">Silver</th><th class=\"n\">Bronze</th><th></th></tr>\n");
            for r in rows {
                let _ = writeln!(
                    h.buf,
                    "<tr><td>{}</td><td class=\"n\">{}</td><td class=\"n\">{}</td><td class=\"n\">{}</td>\
<td style=\"width:40%\"><div class=\"stack\"><div class=\"g\" style=\"width:{}%\"></div><div class=\"s\" style=\"width:{}%\"></div><div class=\"b\" style=\"width:{}%\"></div></div></td></tr>",
                    esc(&r.country),
                    fmt_int(r.golds),
                    fmt_int(r.silvers),
                    fmt_int(r.bronzes),
                    width_pct(r.golds, max),
                    width_pct(r.silvers, max),
                    width_pct(r.bronzes, max),
                );
            }
            h.buf.push_str("</table>\n");
        }
        Section::Trend { series, placeholder, .. } => {
            if let Some(p) = placeholder {
                let _ = writeln!(h.buf, "<p class=\"muted\">{}</p>", esc(p));
                return;
            }
            let mut years: Vec<i32> = series.iter().flat_map(|s| s.points.iter().map(|(y, _)| *y)).collect();
            years.sort_unstable();
            years.dedup();
            h.buf.push_str("<table>\n<tr><th>Country</th>");
            for y in &years {
                let _ = write!(h.buf, "<th class=\"n\">{y}</th>");
            }
            h.buf.push_str("</tr>\n");
            for s in series {
                let _ = write!(h.buf, "<tr><td>{}</td>", esc(&s.country));
                for y in &years {
                    match s.points.iter().find(|(py, _)| py == y) {
                        Some((_, v)) => {
                            let _ = write!(h.buf, "<td class=\"n\">{}</td>", fmt_int(*v));
                        }
                        None => h.buf.push_str("<td class=\"n muted\">-</td>"),
                    }
                }
                h.buf.push_str("</tr>\n");
            }
            h.buf.push_str("</table>\n");
        }
        Section::Scatter { points, .. } => {
            h.buf.push_str("<table>\n<tr><th>Country</th><th class=\"n\">Golds</th><th class=\"n\">Medals</th><th class=\"n\">Bronzes</th></tr>\n");
            for p in points {
                let _ = writeln!(
                    h.buf,
                    "<tr><td>{}</td><td class=\"n\">{}</td><td class=\"n\">{}</td><td class=\"n\">{}</td></tr>",
                    esc(&p.country),
                    fmt_int(p.golds),
                    fmt_int(p.medals),
                    fmt_int(p.bronzes),
                );
            }
            h.buf.push_str("</table>\n");
        }
        Section::Heatmap { heatmap, .. } => {
            let max = heatmap.rows.iter().flat_map(|r| r.cells.iter().copied()).max().unwrap_or(0);
            let gold = h.theme.gold;
            h.buf.push_str("<table>\n<tr><th>Country</th>");
            for d in &heatmap.decades {
                let _ = write!(h.buf, "<th class=\"n\">{}</th>", om_pipeline::DecadeHeatmap::decade_label(*d));
            }
            h.buf.push_str("</tr>\n");
            for r in &heatmap.rows {
                let _ = write!(h.buf, "<tr><td>{}</td>", esc(&r.country));
                for c in &r.cells {
                    // opacity in hundredths, integer only
                    let alpha = width_pct(*c, max);
                    let _ = write!(
                        h.buf,
                        "<td class=\"n\" style=\"background:color-mix(in srgb, {gold} {alpha}%, transparent)\">{}</td>",
                        fmt_int(*c)
                    );
                }
                h.buf.push_str("</tr>\n");
            }
            h.buf.push_str("</table>\n");
        }
        Section::Share { slices, .. } => {
            let max = slices.iter().map(|s| s.value).max().unwrap_or(0);
            h.buf.push_str("<table>\n");
            for s in slices {
                let text = format!("{} ({})", fmt_int(s.value), pct(s.share));
                h.bar_row(&s.country, &text, width_pct(s.value, max));
            }
            h.buf.push_str("</table>\n");
        }
        Section::Conversion { min_medals, bars, .. } => {
            let _ = writeln!(h.buf, "<p class=\"muted\">Countries with at least {} medals.</p>", fmt_int(*min_medals));
            h.buf.push_str("<table>\n");
            for b in bars.iter().rev() {
                h.bar_row(&b.country, &pct(b.gold_pct), (b.gold_pct.tenths() / 10).min(100));
            }
            h.buf.push_str("</table>\n");
        }
        Section::Raw { rows, .. } => {
            h.buf.push_str("<table>\n<tr><th>Country</th><th class=\"n\">Year</th><th class=\"n\">Rank</th><th class=\"n\">Golds</th><th class=\"n\">Silvers</th><th class=\"n\">Bronzes</th><th class=\"n\">Medals</th></tr>\n");
            for r in rows {
                let rank = r.rank.map_or_else(String::new, |x| x.to_string());
                let _ = writeln!(
                    h.buf,
                    "<tr><td>{}</td><td class=\"n\">{}</td><td class=\"n\">{}</td><td class=\"n\">{}</td><td class=\"n\">{}</td><td class=\"n\">{}</td><td class=\"n\">{}</td></tr>",
                    esc(&r.country),
                    r.year,
                    rank,
                    fmt_int(r.golds),
                    fmt_int(r.silvers),
                    fmt_int(r.bronzes),
                    fmt_int(r.medals),
                );
            }
            h.buf.push_str("</table>\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{build_model, ReportMeta, TREND_PLACEHOLDER};
    use crate::variant::Variant;
    use om_core::{FilterParams, MedalRecord, MedalTable, MedalType, TopN, YearRange};

    fn model(variant: Variant, spotlight: &[&str]) -> ReportModel {
        let r = |c: &str, y: i32, g: u32, s: u32, b: u32| MedalRecord {
            country: c.into(),
            year: y,
            rank: Some(1),
            golds: g,
            silvers: s,
            bronzes: b,
            medals: g + s + b,
        };
        let t = MedalTable::new(vec![
            r("USA", 2016, 46, 37, 38),
            r("USA", 2012, 46, 29, 29),
            r("CHN", 2016, 26, 18, 26),
            r("<Côte d'Ivoire>", 2016, 1, 1, 0),
        ])
        .unwrap();
        let f = FilterParams::new(
            YearRange::new(2012, 2016).unwrap(),
            TopN::new(10).unwrap(),
            spotlight.iter().copied(),
            MedalType::Medals,
        );
        let v = om_pipeline::apply(&t, &f, &variant.engine_options(None)).unwrap();
        build_model(&v, ReportMeta { rows_read: 12345, ..Default::default() }, variant).unwrap()
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(fmt_int(0u64), "0");
        assert_eq!(fmt_int(999u64), "999");
        assert_eq!(fmt_int(1000u64), "1,000");
        assert_eq!(fmt_int(1234567u64), "1,234,567");
    }

    #[test]
    fn escapes_data_strings() {
        let html = render_html(&model(Variant::Classic, &[]), Variant::Classic.theme());
        assert!(html.contains("&lt;Côte d&#x27;Ivoire&gt;"));
        assert!(!html.contains("<Côte"));
    }

    #[test]
    fn themed_and_asset_free() {
        let html = render_html(&model(Variant::Slate, &["USA"]), Variant::Slate.theme());
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("#0f172a"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("http://") && !html.contains("https://"));
        assert!(html.contains("40.9%"));
        assert!(html.contains("12,345"));
        assert!(html.contains("id=\"gold_conversion\""));
    }

    #[test]
    fn trend_placeholder_when_no_spotlight() {
        let html = render_html(&model(Variant::Classic, &[]), Variant::Classic.theme());
        assert!(html.contains(TREND_PLACEHOLDER));
        let html = render_html(&model(Variant::Classic, &["USA"]), Variant::Classic.theme());
        assert!(!html.contains(TREND_PLACEHOLDER));
    }

    #[test]
    fn deterministic() {
        let m = model(Variant::Slate, &["USA", "CHN"]);
        assert_eq!(render_html(&m, Variant::Slate.theme()), render_html(&m, Variant::Slate.theme()));
    }
}

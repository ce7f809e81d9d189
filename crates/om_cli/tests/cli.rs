// End-to-end runs of the `medals` binary over small CSV fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const CSV: &str = "\
 Country ,Year,Rank,Golds,Silvers,Bronzes,Medals
United States,2016,1,46,37,38,121
United States,2012,1,46,29,29,104
China,2016,2,26,18,26,70
China,2012,2,38,31,22,91
Fiji,2016,54,1,0,0,1
nan,2016,99,1,1,1,3
";

fn fixture(dir: &Path, body: &str) -> PathBuf {
    let p = dir.join("medals.csv");
    fs::write(&p, body).unwrap();
    p
}

fn medals() -> Command {
    let mut cmd = Command::cargo_bin("medals").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn read_json(p: &Path) -> Value {
    serde_json::from_slice(&fs::read(p).unwrap()).unwrap()
}

#[test]
fn writes_views_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path(), CSV);
    let out = dir.path().join("out");

    medals()
        .args(["--csv", csv.to_str().unwrap(), "--out", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("views.json"));

    let v = read_json(&out.join("views.json"));
    assert_eq!(v["kpis"]["total_medals"], 387);
    assert_eq!(v["kpis"]["leader"]["country"], "United States");
    assert_eq!(v["top"]["entries"][0]["value"], 225);
    // default spotlight keeps only countries present in the data
    assert_eq!(v["filters"]["spotlight"], serde_json::json!(["China", "United States"]));
    assert!(v.get("share_of_total").is_none());
    assert!(!out.join("report.html").exists());
}

#[test]
fn slate_reports_with_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path(), CSV);
    let out = dir.path().join("out");

    medals()
        .args([
            "--csv", csv.to_str().unwrap(),
            "--out", out.to_str().unwrap(),
            "--variant", "slate",
            "--from", "2016", "--to", "2016",
            "--render", "json", "html",
            "--quiet",
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let report = read_json(&out.join("report.json"));
    let conv = report["sections"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["key"] == "gold_conversion")
        .cloned()
        .unwrap();
    // ascending reading: China 37.1% below United States 38.0%
    assert_eq!(conv["bars_ascending"][0]["country"], "China");
    assert_eq!(conv["bars_ascending"][0]["gold_pct"], "37.1%");
    assert_eq!(conv["bars_ascending"][1]["gold_pct"], "38.0%");

    let html = fs::read_to_string(out.join("report.html")).unwrap();
    assert!(html.contains("Gold Conversion Rate"));
    assert!(html.contains("#0f172a"));
}

#[test]
fn empty_spotlight_shows_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path(), CSV);
    let out = dir.path().join("out");

    medals()
        .args(["--csv", csv.to_str().unwrap(), "--out", out.to_str().unwrap(), "--no-spotlight", "--render", "html"])
        .assert()
        .success();

    let html = fs::read_to_string(out.join("report.html")).unwrap();
    assert!(html.contains("Select at least one country to view trends."));
}

#[test]
fn validate_only_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path(), CSV);
    let out = dir.path().join("out");

    medals()
        .args(["--csv", csv.to_str().unwrap(), "--out", out.to_str().unwrap(), "--validate-only"])
        .assert()
        .success()
        .stderr(predicate::str::contains("validate-only: source OK"));
    assert!(!out.exists());
}

#[test]
fn runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path(), CSV);
    let (a, b) = (dir.path().join("a"), dir.path().join("b"));
    for out in [&a, &b] {
        medals()
            .args(["--csv", csv.to_str().unwrap(), "--out", out.to_str().unwrap(), "--render", "json", "html"])
            .assert()
            .success();
    }
    for name in ["views.json", "report.html"] {
        assert_eq!(fs::read(a.join(name)).unwrap(), fs::read(b.join(name)).unwrap(), "{name}");
    }
}

#[test]
fn year_outside_domain_is_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path(), CSV);
    medals()
        .args(["--csv", csv.to_str().unwrap(), "--out", dir.path().to_str().unwrap(), "--from", "2000"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("year 2000 is not present"));
}

#[test]
fn top_n_outside_slider_is_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path(), CSV);
    medals()
        .args(["--csv", csv.to_str().unwrap(), "--out", dir.path().to_str().unwrap(), "--variant", "slate", "--top-n", "30"])
        .assert()
        .code(2);
}

#[test]
fn duplicate_rows_fail_validation() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path(), &format!("{CSV}United States,2016,1,1,1,1,3\n"));
    medals()
        .args(["--csv", csv.to_str().unwrap(), "--validate-only"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("duplicate row"));
}

#[test]
fn year_column_without_numbers_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path(), "Country,Year,Rank,Golds,Silvers,Bronzes,Medals\nUSA,abc,1,46,37,38,121\n");
    medals()
        .args(["--csv", csv.to_str().unwrap(), "--validate-only"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("column 'Year' has no numeric values"));
}

#[test]
fn reject_policy_fails_on_inconsistent_totals() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path(), &CSV.replace("26,18,26,70", "26,18,26,71"));
    medals()
        .args(["--csv", csv.to_str().unwrap(), "--validate-only", "--consistency", "reject"])
        .assert()
        .code(2);
    medals()
        .args(["--csv", csv.to_str().unwrap(), "--validate-only"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Medals total disagrees"));
}

#[test]
fn remote_csv_is_a_validation_error() {
    medals()
        .args(["--csv", "https://example.org/medals.csv"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("path must be local file"));
}

#[test]
fn missing_csv_is_an_io_error() {
    medals()
        .args(["--csv", "/definitely/not/here.csv"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("file not found"));
}

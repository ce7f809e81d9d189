// crates/om_cli/src/args.rs
//
// Offline CLI argument surface for the `medals` binary.
// - Local CSV only (reject any scheme:// like http/https/file)
// - Filters: --from/--to (years in the data), --top-n (variant slider bounds),
//   --country (repeatable spotlight), --medal-type
// - Output: --out dir, --render [json|html]*
// - --validate-only loads and cleans the CSV without running the engine
//
// Anything that needs the loaded table (year domain, default spotlight) is
// resolved in main.rs after the load.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use om_core::MedalType;
use om_io::loader::ConsistencyPolicy;
use om_report::Variant;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "medals",
    disable_help_subcommand = true,
    about = "Offline Summer Olympics medal board: CSV in, views and reports out"
)]
pub struct Args {
    // --- Input ---
    /// Medal records CSV (Country, Year, Rank, Golds, Silvers, Bronzes, Medals).
    #[arg(long)]
    pub csv: PathBuf,

    /// What to do with rows whose Medals differs from Golds + Silvers + Bronzes.
    #[arg(long, default_value = "warn", value_parser = parse_consistency)]
    pub consistency: ConsistencyPolicy,

    // --- Filters ---
    /// First year of the range (default: earliest year in the data).
    #[arg(long)]
    pub from: Option<i32>,
    /// Last year of the range (default: latest year in the data).
    #[arg(long)]
    pub to: Option<i32>,
    /// Ranking size; must fit the variant's slider (default 10).
    #[arg(long)]
    pub top_n: Option<usize>,
    /// Spotlight country for the trend view; repeat for several.
    #[arg(long = "country", value_name = "COUNTRY", conflicts_with = "no_spotlight")]
    pub countries: Vec<String>,
    /// Start with an empty spotlight instead of the default countries.
    #[arg(long)]
    pub no_spotlight: bool,
    /// Golds | Silvers | Bronzes | Medals (default Medals).
    #[arg(long, value_parser = parse_medal_type)]
    pub medal_type: Option<MedalType>,
    /// Minimum total medals for the gold conversion view (default 20).
    #[arg(long)]
    pub min_medals: Option<u64>,

    // --- Presentation & output ---
    /// Dashboard variant: classic | slate.
    #[arg(long, default_value = "classic", value_parser = parse_variant)]
    pub variant: Variant,
    /// Output directory (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
    /// Renderer(s) to emit. Choose up to 2 (json, html). Omit to write views.json only.
    #[arg(long, value_parser = ["json", "html"], num_args = 0..=2)]
    pub render: Vec<String>,

    // --- Control ---
    /// Load and clean the CSV only; do not run the engine or write artifacts.
    #[arg(long)]
    pub validate_only: bool,
    /// Only warnings and errors on stderr; no artifact listing on stdout.
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
    /// More logging (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Errors surfaced by argument validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
    BadCountry(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
            BadCountry(c) => write!(f, "invalid --country value: '{c}'"),
        }
    }
}
impl std::error::Error for CliError {}

pub fn parse_medal_type(s: &str) -> Result<MedalType, String> {
    s.parse::<MedalType>().map_err(|e| e.to_string())
}

pub fn parse_variant(s: &str) -> Result<Variant, String> {
    s.parse::<Variant>()
}

pub fn parse_consistency(s: &str) -> Result<ConsistencyPolicy, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trust" => Ok(ConsistencyPolicy::Trust),
        "warn" => Ok(ConsistencyPolicy::Warn),
        "reject" => Ok(ConsistencyPolicy::Reject),
        other => Err(format!("unknown consistency policy '{other}' (expected trust|warn|reject)")),
    }
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

/// Checks that need no data: local paths, existing CSV, trimmed spotlight names.
pub fn validate(mut args: Args) -> Result<Args, CliError> {
    ensure_local_path(&args.csv)?;
    ensure_local_path(&args.out)?;

    let meta = std::fs::metadata(&args.csv).map_err(|_| CliError::NotFound(format!("--csv {}", args.csv.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("--csv {}", args.csv.display())));
    }

    let mut countries = Vec::with_capacity(args.countries.len());
    for c in &args.countries {
        let t = c.trim();
        if t.is_empty() {
            return Err(CliError::BadCountry(c.clone()));
        }
        countries.push(t.to_string());
    }
    args.countries = countries;

    Ok(args)
}

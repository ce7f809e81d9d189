// crates/om_cli/src/main.rs
//
// Wires: exit codes, logging setup, typed error mapping, CLI parsing,
// the validate-only short-circuit and the full run
// (load via shared cache → filters → engine → views.json → optional reports).

mod args; // sibling module in this crate

mod exitcodes {
    pub const OK: i32 = 0;
    /// Bad flags, bad filter values, malformed or inconsistent CSV content.
    pub const VALIDATION: i32 = 2;
    /// Missing/unreadable source, artifact write failures.
    pub const IO: i32 = 4;
    /// Report model or rendering failures.
    pub const RENDER: i32 = 5;
}

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use args::{parse_and_validate as parse_cli, Args, CliError};
use om_core::{FilterParams, MedalTable, ParameterError, YearRange};
use om_io::canonical_json;
use om_io::loader::{self, LoadOptions, LoadedTable};
use om_pipeline::{DashboardViews, PipelineError};
use om_report::{ReportError, ReportMeta};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    Validation(String),
    Io(String),
    Render(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Render(m) => write!(f, "render: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("medals: error: {e}");
            return ExitCode::from(map_cli_err(&e) as u8);
        }
    };

    init_tracing(&args);

    let outcome = if args.validate_only { validate_only(&args) } else { run_once(&args) };
    let rc = match outcome {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("medals: error: {e}");
            map_error(&e)
        }
    };

    ExitCode::from(rc as u8)
}

/// stderr subscriber; RUST_LOG wins over the flags.
fn init_tracing(args: &Args) {
    let default_level = if args.quiet {
        "warn"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Validate-only path (no engine, no artifacts).
fn validate_only(args: &Args) -> Result<(), MainError> {
    let loaded = loader::load_with(&args.csv, &LoadOptions { consistency: args.consistency }).map_err(map_io_err)?;
    let r = &loaded.report;
    info!(
        rows_kept = r.rows_kept,
        rows_dropped = r.rows_dropped(),
        inconsistent = r.inconsistent.len(),
        "validate-only: source OK"
    );
    Ok(())
}

/// Full run: views.json always, report.json / report.html on request.
fn run_once(args: &Args) -> Result<(), MainError> {
    let opts = LoadOptions { consistency: args.consistency };
    let loaded = om_pipeline::load_source(&args.csv, &opts).map_err(map_pipeline_err)?;

    let filters = build_filters(args, &loaded.table)?;
    let engine = args.variant.engine_options(args.min_medals);
    let views = om_pipeline::apply(&loaded.table, &filters, &engine).map_err(map_pipeline_err)?;

    let out_dir = args.out.as_path();
    let mut written: Vec<PathBuf> = Vec::new();

    let views_path = out_dir.join("views.json");
    canonical_json::write_canonical_file(&views_path, &views).map_err(map_io_err)?;
    written.push(views_path);

    if !args.render.is_empty() {
        let meta = report_meta(&loaded, &views)?;
        let model = om_report::build_model(&views, meta, args.variant).map_err(map_report_err)?;
        for fmt in &args.render {
            let path = match fmt.as_str() {
                "json" => {
                    let bytes = om_report::report_json_bytes(&model).map_err(map_report_err)?;
                    write_artifact(out_dir, "report.json", &bytes)?
                }
                "html" => {
                    let html = om_report::render_html(&model, args.variant.theme());
                    write_artifact(out_dir, "report.html", html.as_bytes())?
                }
                other => return Err(MainError::Render(format!("unknown renderer: {other}"))),
            };
            written.push(path);
        }
    }

    for p in &written {
        info!(path = %p.display(), "wrote artifact");
        if !args.quiet {
            println!("{}", p.display());
        }
    }
    Ok(())
}

/// Resolve flags against the loaded table and the variant's defaults.
fn build_filters(args: &Args, table: &MedalTable) -> Result<FilterParams, MainError> {
    let years = table.years();
    let span = YearRange::spanning(&years).map_err(map_param_err)?;
    let range = YearRange::new(args.from.unwrap_or(span.min()), args.to.unwrap_or(span.max())).map_err(map_param_err)?;

    let variant = args.variant;
    let top_n = variant.top_n(args.top_n.unwrap_or(variant.default_top_n())).map_err(map_param_err)?;

    let spotlight = if args.no_spotlight {
        Vec::new()
    } else if args.countries.is_empty() {
        variant.default_spotlight(table)
    } else {
        args.countries.clone()
    };

    let filters = FilterParams::new(range, top_n, spotlight, args.medal_type.unwrap_or(variant.default_medal_type()));
    filters.check_year_domain(&years).map_err(map_param_err)?;
    Ok(filters)
}

fn report_meta(loaded: &LoadedTable, views: &DashboardViews) -> Result<ReportMeta, MainError> {
    let r = &loaded.report;
    Ok(ReportMeta {
        source: loaded.source.display().to_string(),
        source_sha256: loaded.digest.to_string(),
        views_sha256: views.digest().map_err(map_io_err)?,
        rows_read: r.rows_read,
        rows_kept: r.rows_kept,
        rows_dropped: r.rows_dropped(),
        inconsistent_rows: r.inconsistent.len() as u64,
    })
}

fn write_artifact(out_dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf, MainError> {
    let path = out_dir.join(name);
    canonical_json::write_atomic(&path, bytes).map_err(|e| MainError::Io(format!("write {name}: {e}")))?;
    Ok(path)
}

/// Map our typed errors to the exit-code table.
fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Render(_) => RENDER,
    }
}

/// A missing source is the same I/O failure the loader would report.
fn map_cli_err(e: &CliError) -> i32 {
    match e {
        CliError::NotFound(_) => exitcodes::IO,
        CliError::NonLocalPath(_) | CliError::BadCountry(_) => exitcodes::VALIDATION,
    }
}

/// Content problems are validation failures; everything else is I/O.
fn map_io_err(e: om_io::IoError) -> MainError {
    if e.is_validation() {
        MainError::Validation(e.to_string())
    } else {
        MainError::Io(e.to_string())
    }
}

fn map_param_err(e: ParameterError) -> MainError {
    MainError::Validation(e.to_string())
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Io(io) => map_io_err(io),
        PipelineError::Params(p) => map_param_err(p),
    }
}

fn map_report_err(e: ReportError) -> MainError {
    MainError::Render(e.to_string())
}

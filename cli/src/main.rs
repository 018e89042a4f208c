use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use openapi_mixin_core::{Skipped, check_document};
use openapi_mixin_loader::{
    DocumentFormat, MergeJob, MergeOutcome, MixinConfig, load_document, render_document,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI-specific document format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliDocumentFormat {
    Json,
    Yaml,
}

impl From<CliDocumentFormat> for DocumentFormat {
    fn from(fmt: CliDocumentFormat) -> Self {
        match fmt {
            CliDocumentFormat::Json => Self::Json,
            CliDocumentFormat::Yaml => Self::Yaml,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "openapi-mixin")]
#[command(about = "Merge partial OpenAPI documents into a primary document")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge mixin documents into a primary document.
    Merge(MergeArgs),
    /// Run a merge described by a YAML configuration file.
    Run(RunArgs),
    /// Check documents for duplicate operation IDs and tag names.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct MergeArgs {
    /// Primary document (JSON or YAML). Its entries always win.
    primary: PathBuf,
    /// Mixin documents, highest priority first.
    #[arg(required = true)]
    mixins: Vec<PathBuf>,
    /// Write the merged document here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Output format (default: from the output or primary file extension).
    #[arg(long)]
    format: Option<CliDocumentFormat>,
    /// Fail unless exactly this many entries are skipped.
    #[arg(long)]
    expect_collisions: Option<usize>,
    /// Write a JSON report of skipped entries to this path.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Do not print skipped entries to stderr.
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Path to the merge configuration YAML.
    #[arg(long)]
    config: PathBuf,
    /// Write a JSON report of skipped entries to this path.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Do not print skipped entries to stderr.
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Documents to check.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    debug!(command = ?cli.command, "parsed arguments");

    let result = match cli.command {
        Command::Merge(args) => run_merge(args),
        Command::Run(args) => run_config(args),
        Command::Check(args) => run_check(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so merged documents can be piped from stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_merge(args: MergeArgs) -> Result<(), String> {
    let mut builder = MergeJob::builder(args.primary).mixins(args.mixins);
    if let Some(output) = args.output {
        builder = builder.output(output);
    }
    if let Some(format) = args.format {
        builder = builder.format(format.into());
    }
    if let Some(expected) = args.expect_collisions {
        builder = builder.expect_collisions(expected);
    }
    execute(&builder.build(), args.report.as_deref(), args.quiet)
}

fn run_config(args: RunArgs) -> Result<(), String> {
    let config = MixinConfig::load(&args.config)
        .map_err(|e| format!("Failed to load config '{}': {e}", args.config.display()))?;
    let job = config.to_job().map_err(|e| e.to_string())?;
    execute(&job, args.report.as_deref(), args.quiet)
}

fn execute(job: &MergeJob, report: Option<&Path>, quiet: bool) -> Result<(), String> {
    let outcome = job.run().map_err(|e| e.to_string())?;

    if job.output().is_none() {
        let raw = render_document(&outcome.document, job.format())
            .map_err(|e| format!("Failed to render merged document: {e}"))?;
        print!("{raw}");
    }

    if !quiet {
        for message in outcome.messages() {
            eprintln!("skipped: {message}");
        }
    }

    if let Some(path) = report {
        write_report(path, job, &outcome)?;
    }

    match job.output() {
        Some(output) => eprintln!(
            "Merged {} mixin(s) into '{}' with {} collision(s).",
            job.mixins().len(),
            output.display(),
            outcome.collision_count()
        ),
        None => eprintln!(
            "Merged {} mixin(s) with {} collision(s).",
            job.mixins().len(),
            outcome.collision_count()
        ),
    }

    job.verify(&outcome).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// merge report
// ---------------------------------------------------------------------------

#[derive(serde::Serialize)]
struct MergeReport<'a> {
    tool_version: &'static str,
    generated_at: String,
    primary: &'a Path,
    mixins: &'a [PathBuf],
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a Path>,
    collisions: usize,
    by_category: BTreeMap<String, usize>,
    skipped: Vec<ReportEntry<'a>>,
}

#[derive(serde::Serialize)]
struct ReportEntry<'a> {
    #[serde(flatten)]
    entry: &'a Skipped,
    message: String,
}

fn write_report(path: &Path, job: &MergeJob, outcome: &MergeOutcome) -> Result<(), String> {
    let mut by_category = BTreeMap::new();
    for entry in &outcome.skipped {
        *by_category.entry(entry.category.to_string()).or_insert(0) += 1;
    }

    let report = MergeReport {
        tool_version: PACKAGE_VERSION,
        generated_at: chrono::Utc::now().to_rfc3339(),
        primary: job.primary(),
        mixins: job.mixins(),
        output: job.output(),
        collisions: outcome.collision_count(),
        by_category,
        skipped: outcome
            .skipped
            .iter()
            .map(|entry| ReportEntry {
                entry,
                message: entry.to_string(),
            })
            .collect(),
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create report directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }

    let raw = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("Failed to serialize merge report: {err}"))?;
    fs::write(path, raw).map_err(|err| format!("Failed to write '{}': {err}", path.display()))
}

// ---------------------------------------------------------------------------
// check command
// ---------------------------------------------------------------------------

fn run_check(args: CheckArgs) -> Result<(), String> {
    let mut failures = 0usize;

    for input in &args.inputs {
        let document = load_document(input).map_err(|e| e.to_string())?;
        let errors = check_document(&document);
        if errors.is_empty() {
            println!("ok: {}", input.display());
            continue;
        }
        for err in &errors {
            println!("{}: {err}", input.display());
        }
        failures += errors.len();
    }

    if failures > 0 {
        return Err(format!("{failures} consistency error(s) found"));
    }
    Ok(())
}

//! plansight CLI: inspect datasets, validate plans, run plans.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;
use thiserror::Error;

use plansight_core::config::EngineConfig;
use plansight_exec::{Engine, ExecError};
use plansight_planner::{parse_plan_document, validate, PlanError, PlanFormat};

#[derive(Parser)]
#[command(name = "plansight")]
#[command(about = "Validate and execute declarative analytics plans against CSV data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a CSV file and print its summary
    Inspect {
        /// Path to the CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Rows included in the preview (overrides config)
        #[arg(long)]
        preview_rows: Option<usize>,

        /// Field delimiter (overrides config)
        #[arg(long)]
        delimiter: Option<char>,
    },

    /// Validate a plan document (JSON or YAML)
    Validate {
        /// Path to the plan file
        #[arg(short, long)]
        plan: PathBuf,
    },

    /// Execute a plan against a CSV file
    Run {
        /// Path to the CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Path to the plan file
        #[arg(short, long)]
        plan: PathBuf,

        /// Skip chart rendering
        #[arg(long)]
        no_chart: bool,

        /// Pretty-print the result JSON
        #[arg(long)]
        pretty: bool,

        /// Field delimiter (overrides config)
        #[arg(long)]
        delimiter: Option<char>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error(transparent)]
    Config(#[from] plansight_core::error::Error),

    #[error("delimiter must be a single ASCII character, got {0:?}")]
    Delimiter(char),

    #[error("cannot encode output: {0}")]
    Output(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Inspect {
            data,
            preview_rows,
            delimiter,
        } => inspect(&data, preview_rows, delimiter),
        Commands::Validate { plan } => validate_plan(&plan),
        Commands::Run {
            data,
            plan,
            no_chart,
            pretty,
            delimiter,
        } => run(&data, &plan, no_chart, pretty, delimiter),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise only warnings reach stderr.
fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn config(delimiter: Option<char>) -> Result<EngineConfig, CliError> {
    let mut cfg = EngineConfig::from_env();
    if let Some(d) = delimiter {
        if !d.is_ascii() {
            return Err(CliError::Delimiter(d));
        }
        cfg.delimiter = d as u8;
    }
    Ok(cfg)
}

fn read_plan(path: &Path) -> Result<Value, CliError> {
    let src = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_plan_document(&src, PlanFormat::from_path(path))?)
}

fn inspect(data: &Path, preview_rows: Option<usize>, delimiter: Option<char>) -> Result<bool, CliError> {
    let mut cfg = config(delimiter)?;
    if let Some(n) = preview_rows {
        cfg.preview_rows = n;
    }
    cfg.validate()?;

    let mut engine = Engine::new(cfg);
    let summary = engine.load_path(data)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(true)
}

fn validate_plan(path: &Path) -> Result<bool, CliError> {
    let plan = read_plan(path)?;
    let verdict = validate(&plan);
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(verdict.valid)
}

fn run(
    data: &Path,
    plan_path: &Path,
    no_chart: bool,
    pretty: bool,
    delimiter: Option<char>,
) -> Result<bool, CliError> {
    let mut cfg = config(delimiter)?;
    if no_chart {
        cfg.charts_enabled = false;
    }
    cfg.validate()?;

    let plan = read_plan(plan_path)?;
    let mut engine = Engine::new(cfg);
    let summary = engine.load_path(data)?;
    tracing::info!(rows = summary.row_count, columns = summary.columns.len(), "dataset loaded");

    let result = engine.execute(&plan);
    let out = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", out);
    Ok(result.success)
}

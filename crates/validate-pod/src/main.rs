mod output;
mod settings;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pod_validation::{IntegerPolicy, ReportPolicy, validate_source};
use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use output::OutputFormat;
use settings::Settings;

/// Validate Pod manifests
#[derive(Parser, Debug)]
#[command(name = "validate-pod", version)]
#[command(about = "Validate Pod manifests against the Pod schema", long_about = None)]
struct Args {
    /// Manifests to validate
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// How diagnostics are printed
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Stop at the first diagnostic
    #[arg(long)]
    fail_fast: bool,

    /// Whether quoted integers satisfy integer fields
    #[arg(long, value_enum, value_name = "POLICY")]
    integer_policy: Option<IntegerPolicyArg>,

    /// TOML settings file overriding schema constants
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IntegerPolicyArg {
    Strict,
    Coerce,
}

impl From<IntegerPolicyArg> for IntegerPolicy {
    fn from(arg: IntegerPolicyArg) -> Self {
        match arg {
            IntegerPolicyArg::Strict => IntegerPolicy::Strict,
            IntegerPolicyArg::Coerce => IntegerPolicy::Coerce,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("validate_pod=debug,pod_validation=debug,pod_yaml=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "validate_pod=info".into())
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Validate every file; `Ok(true)` when none produced a diagnostic.
fn run(args: &Args) -> Result<bool> {
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let options = settings.options(args.fail_fast, args.integer_policy.map(Into::into));
    let config = settings
        .schema
        .clone()
        .into_config()
        .context("Invalid schema settings")?;

    // Read everything first so an unreadable file fails before any output.
    let sources = args
        .files
        .iter()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))
                .map(|content| (path.display().to_string(), content))
        })
        .collect::<Result<Vec<_>>>()?;

    let color = std::io::stderr().is_terminal();
    let mut json = Vec::new();
    let mut clean = true;

    for (file, content) in &sources {
        let diagnostics = validate_source(content, &config, options);
        tracing::debug!(file = %file, diagnostics = diagnostics.len(), "validated file");

        match args.format {
            OutputFormat::Text => eprint!("{}", output::render_text(file, &diagnostics)),
            OutputFormat::Json => json.extend(output::json_entries(file, &diagnostics)),
            OutputFormat::Pretty => {
                eprint!("{}", output::render_pretty(file, content, &diagnostics, color))
            }
        }

        if !diagnostics.is_empty() {
            clean = false;
            if options.policy == ReportPolicy::FailFast {
                break;
            }
        }
    }

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(clean)
}

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use cfgdiff::config::{FilePair, Settings};
use cfgdiff::loader::load_document;
use cfgdiff::report::{write_json, write_table};
use cfgdiff::{DiffBuilder, Path, TypeMismatchPolicy};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "cfgdiff")]
#[command(about = "Compare a JSON configuration file against a reference and list every differing key")]
#[command(version)]
struct Cli {
    #[arg(long, value_name = "FILE", default_value = "settings.json", env = "CFGDIFF_SETTINGS", help = "Settings file naming the files to compare (FilePaths:Userfile / FilePaths:Yoursample)")]
    settings: PathBuf,
    #[arg(long, value_name = "FILE", env = "CFGDIFF_REFERENCE", help = "Reference document, overrides FilePaths:Userfile")]
    reference: Option<PathBuf>,
    #[arg(long, value_name = "FILE", env = "CFGDIFF_SAMPLE", help = "Sample document, overrides FilePaths:Yoursample")]
    sample: Option<PathBuf>,
    #[arg(long, short, value_enum, default_value = "table", help = "Output format")]
    format: OutputFormat,
    #[arg(long, value_name = "PATTERN", help = "Skip values at this dotted path (`*` matches any key)")]
    ignore: Vec<String>,
    #[arg(long, value_name = "PATTERN", help = "Skip this dotted path even when it exists on one side only")]
    ignore_missing: Vec<String>,
    #[arg(long, value_name = "EPSILON", default_value_t = 0.0, help = "Tolerance for comparing non-integer numbers")]
    float_epsilon: f64,
    #[arg(long, value_name = "SECONDS", default_value_t = 0, help = "Tolerance for comparing RFC 3339 timestamps")]
    date_tolerance_secs: u64,
    #[arg(long, help = "Fail instead of reporting when a key is an object on one side only")]
    strict_types: bool,
    #[arg(long, short, action = ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(verbosity >= 2)
        .init();
}

fn file_pair(cli: &Cli) -> Result<FilePair> {
    let mut settings = match (&cli.reference, &cli.sample) {
        (Some(_), Some(_)) => Settings::default(),
        _ => Settings::load(&cli.settings)
            .with_context(|| format!("cannot read the file paths from {}", cli.settings.display()))?,
    };

    if let Some(reference) = &cli.reference {
        settings.file_paths.reference = Some(reference.to_string_lossy().into_owned());
    }
    if let Some(sample) = &cli.sample {
        settings.file_paths.sample = Some(sample.to_string_lossy().into_owned());
    }

    Ok(settings.file_pair()?)
}

fn check_patterns(cli: &Cli) -> Result<()> {
    for pattern in cli.ignore.iter().chain(&cli.ignore_missing) {
        Path::from_str(pattern).map_err(|reason| anyhow!("invalid ignore pattern `{}`: {}", pattern, reason))?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<ExitCode> {
    check_patterns(&cli)?;
    let pair = file_pair(&cli)?;
    info!(reference = %pair.reference.display(), sample = %pair.sample.display(), "comparing");

    let reference = load_document(&pair.reference).context("cannot load the reference document")?;
    let sample = load_document(&pair.sample).context("cannot load the sample document")?;

    let mut builder = DiffBuilder::default();
    for pattern in &cli.ignore {
        builder.ignore_path(pattern);
    }
    for pattern in &cli.ignore_missing {
        builder.ignore_path_with_missing(pattern, true);
    }
    builder
        .approx_float_eq_epsilon(cli.float_epsilon)
        .approx_date_time_eq_duration(Duration::from_secs(cli.date_tolerance_secs));
    if cli.strict_types {
        builder.type_mismatch(TypeMismatchPolicy::Reject);
    }
    let diff = builder.build().context("invalid comparison options")?;

    let differences = diff
        .compare(&reference, &sample)
        .context("cannot compare the documents")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Table => write_table(&mut out, &differences)?,
        OutputFormat::Json => write_json(&mut out, &differences)?,
    }
    out.flush()?;

    if differences.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

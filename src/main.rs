use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::parser::ValueSource;
use clap::{CommandFactory, FromArgMatches, Parser, ValueEnum};
use prodcheck::config::{ConfigSource, HarnessConfig, CONFIG_ENV};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

#[derive(Parser)]
#[command(
    name = "prodcheck",
    about = "Production smoke-test harness for a deployed backend and frontend",
    version,
    long_about = None
)]
struct Cli {
    /// Backend base URL [default: http://localhost:5000]
    #[arg(long)]
    backend: Option<String>,

    /// Frontend base URL [default: http://localhost:3000]
    #[arg(long)]
    frontend: Option<String>,

    /// Where to write the JSON report [default: test_report.json]
    #[arg(long)]
    report: Option<PathBuf>,

    /// TOML config file
    #[arg(long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Also print the JSON report to stdout
    #[arg(long)]
    json: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Install the subscriber before anything logs. Returns a handle for
/// applying `[logging] level` once the config is known, or `None` when
/// `RUST_LOG` already decides the filter.
fn init_tracing(format: LogFormat) -> Option<FilterHandle> {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new("info"), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    let (text, json) = match format {
        LogFormat::Text => (Some(fmt::layer().with_writer(std::io::stderr)), None),
        LogFormat::Json => (None, Some(fmt::layer().json().with_writer(std::io::stderr))),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();

    (!from_env).then_some(handle)
}

async fn run(cli: Cli, source: ConfigSource<'_>, filter: Option<FilterHandle>) -> Result<bool> {
    let mut config = HarnessConfig::resolve(source)?;
    if let Some(handle) = filter {
        handle.reload(EnvFilter::new(&config.logging.level))?;
    }

    if let Some(backend) = cli.backend {
        config.targets.backend = backend;
    }
    if let Some(frontend) = cli.frontend {
        config.targets.frontend = frontend;
    }
    if let Some(report) = cli.report {
        config.run.report_path = report;
    }

    let report = prodcheck::run(config).await?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(report.all_passed())
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };
    let filter = init_tracing(cli.log_format);

    let config_path = cli.config.clone();
    let source = match (&config_path, matches.value_source("config")) {
        (Some(path), Some(ValueSource::EnvVariable)) => ConfigSource::Env(path),
        (Some(path), _) => ConfigSource::Flag(path),
        (None, _) => ConfigSource::Defaults,
    };

    match run(cli, source, filter).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("prodcheck: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! `stride`: drive a configured adaptive stepper from the command line.

mod cli;
mod error_fmt;
mod run;

use std::path::Path;

use clap::Parser;
use eyre::WrapErr;
use stride_config::{Config, Logging};
use stride_core::error::BuildError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    // Pretty panic/error reports; a second install only fails in tests.
    let _ = color_eyre::install();

    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        tracing::error!(error = %err, "stride failed");
        std::process::exit(exit_code_for_error(&err));
    }
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(&cli.config)?;
    // held until return so the file writer flushes
    let _file_guard = init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), strategy = cfg.strategy.kind_name(), "config loaded");

    match cli.cmd {
        Commands::Run {
            width,
            error_scale,
            max_attempts,
            attempts,
        } => {
            let opts = run::RunOpts {
                width,
                error_scale,
                max_attempts,
                attempts,
            };
            run::run_stride(&cfg, opts, cli.json).map(|_| ())
        }
        Commands::Check => run::check(&cfg, cli.json),
    }
}

fn load_config(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config {}", path.display()))?;
    toml::from_str::<Config>(&text)
        .wrap_err(BuildError::InvalidConfig("config file is not valid TOML"))
}

/// Console logs go to stderr so stdout stays machine-readable.
fn init_tracing(
    json: bool,
    level: Option<&str>,
    logging: &Logging,
) -> eyre::Result<Option<WorkerGuard>> {
    let level = level.or(logging.level.as_deref()).unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_json = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let console_pretty = (!json).then(|| fmt::layer().with_writer(std::io::stderr));

    let mut guard = None;
    let file_layer = match logging.file.as_deref() {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file has no file name: {file}"))?;
            let appender = match logging.rotation.as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, g) = tracing_appender::non_blocking(appender);
            guard = Some(g);
            Some(fmt::layer().json().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_json)
        .with(console_pretty)
        .with(file_layer)
        .try_init()
        .map_err(|e| eyre::eyre!("init tracing: {e}"))?;
    Ok(guard)
}

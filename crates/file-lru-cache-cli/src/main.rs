//! file-lru-cache command line
//!
//! Opens a cache directory and runs a single operation against it.
//! Configuration comes from `CACHE_DIR`, `CACHE_CAPACITY` and
//! `CACHE_LOGGING`, overridable with command-line flags.

mod commands;
mod config;
mod error;

use crate::commands::{execute, Cli, Outcome};
use crate::config::load_config;
use crate::error::Result;
use clap::Parser;
use file_lru_cache::Cache;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{prelude::*, EnvFilter};

fn main() -> ExitCode {
    match run() {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Miss) => {
            eprintln!("not found");
            ExitCode::from(1)
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<Outcome> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut config = load_config()?;
    if let Some(dir) = cli.dir {
        config.cache_dir = dir;
    }
    if let Some(capacity) = cli.capacity {
        config.capacity = capacity;
    }
    config.logging |= cli.verbose;

    debug!("Cache dir: {:?}", config.cache_dir);
    debug!("Capacity: {} entries", config.capacity);

    let cache = Cache::with_config(config)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let outcome = execute(&cache, cli.command, &mut stdin.lock(), &mut stdout.lock())?;
    Ok(outcome)
}

fn init_logging(verbose: bool) -> Result<()> {
    let mut env_filter = EnvFilter::from_default_env();
    for directive in log_directives(verbose) {
        env_filter = env_filter.add_directive(directive.parse()?);
    }

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    };
    Ok(())
}

/// Default filter directives for the cache and this binary
fn log_directives(verbose: bool) -> [&'static str; 2] {
    if verbose {
        ["file_lru_cache=debug", "file_lru_cache_cli=debug"]
    } else {
        ["file_lru_cache=info", "file_lru_cache_cli=warn"]
    }
}

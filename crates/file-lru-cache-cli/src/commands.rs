//! Command definitions and execution against an open cache

use crate::error::Result;
use clap::{Parser, Subcommand};
use file_lru_cache::Cache;
use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;

/// Inspect and modify a file-lru-cache directory
#[derive(Debug, Parser)]
#[command(name = "file-lru-cache-cli", version)]
pub struct Cli {
    /// Cache directory (overrides CACHE_DIR)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Maximum number of entries (overrides CACHE_CAPACITY)
    #[arg(long, global = true)]
    pub capacity: Option<usize>,

    /// Emit cache diagnostics (same as CACHE_LOGGING=1)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the payload stored under a key
    Get {
        key: String,
        /// Write the payload to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Store a payload from an argument, a file, or stdin
    Set {
        key: String,
        value: Option<String>,
        #[arg(short, long, conflicts_with = "value")]
        file: Option<PathBuf>,
    },
    /// Delete the entry stored under a key
    Remove { key: String },
    /// Delete every entry
    Clear,
    /// List entries as JSON, least recently used first
    List,
    /// Print cache statistics as JSON
    Stats,
}

/// Result of a command that completed without error
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Miss,
}

/// Run one command. `input` feeds `set` when no value or file is given.
pub fn execute(
    cache: &Cache,
    command: Command,
    input: &mut impl Read,
    out: &mut impl Write,
) -> Result<Outcome> {
    match command {
        Command::Get { key, output } => {
            let data = match cache.get_vec(&key) {
                Ok(data) => data,
                Err(e) if e.is_not_found() => return Ok(Outcome::Miss),
                Err(e) => return Err(e.into()),
            };
            match output {
                Some(path) => fs::write(path, &data)?,
                None => out.write_all(&data)?,
            }
        }
        Command::Set { key, value, file } => {
            let data = match (value, file) {
                (Some(value), _) => value.into_bytes(),
                (None, Some(path)) => fs::read(path)?,
                (None, None) => {
                    let mut data = Vec::new();
                    input.read_to_end(&mut data)?;
                    data
                }
            };
            cache.set(&key, &data)?;
        }
        Command::Remove { key } => match cache.remove(&key) {
            Ok(()) => {}
            Err(e) if e.is_not_found() => return Ok(Outcome::Miss),
            Err(e) => return Err(e.into()),
        },
        Command::Clear => cache.clear()?,
        Command::List => {
            serde_json::to_writer_pretty(&mut *out, &cache.entries()?)?;
            writeln!(out)?;
        }
        Command::Stats => {
            serde_json::to_writer_pretty(&mut *out, &cache.stats()?)?;
            writeln!(out)?;
        }
    }
    Ok(Outcome::Done)
}

//! workboy entry point.
//!
//! # Responsibility
//! - Parse the command line and environment configuration.
//! - Short-circuit archive and backup maintenance before the JSON store loads.
//! - Run the command session over the loaded index and persist the outcome.
//!
//! # Invariants
//! - Maintenance commands copy raw bytes and never decode the datafile.
//! - The index is written back only when the session asks for a save.
//! - A corrupt datafile stops the program before any edit can happen.

mod paths;
mod store;

use std::io::ErrorKind;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;

use paths::DataPaths;
use workboy_core::{dates, default_log_level, init_logging, run_session, StdinSource};

const LOG_LEVEL_ENV_VAR: &str = "WORKBOY_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "workboy",
    version,
    about = "Personal job-application tracker",
    after_help = "Run `workboy help` for the full command reference."
)]
struct Cli {
    /// Command tokens, interpreted by the session loop.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.tokens) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(tokens: Vec<String>) -> Result<(), String> {
    let Some(data_paths) = DataPaths::resolve() else {
        return Err("Failed: could not determine a home directory for workboy data.".to_string());
    };
    data_paths.ensure_exists().map_err(|err| {
        format!(
            "Failed: could not create data directory `{}`: {err}",
            data_paths.root().display()
        )
    })?;

    let level =
        std::env::var(LOG_LEVEL_ENV_VAR).unwrap_or_else(|_| default_log_level().to_string());
    if let Err(error) = init_logging(&level, &data_paths.log_dir()) {
        // The tracker still works without logs; say so once and move on.
        eprintln!("workboy: logging disabled: {error}");
    }

    if run_maintenance(&tokens, &data_paths) {
        return Ok(());
    }

    let loaded = match store::load_index(&data_paths) {
        Ok(loaded) => loaded,
        Err(store::StoreError::Decode(err)) => {
            return Err(format!(
                "{err}\nFailed: datafile for workboy exists, but could not be read"
            ));
        }
        Err(err) => return Err(format!("Failed: {err}")),
    };

    log::info!(
        "event=session_start tokens={} companies={}",
        tokens.len(),
        loaded.index.len()
    );

    let mut source = StdinSource::default();
    let outcome = run_session(loaded.index, tokens, &mut source);

    if outcome.should_save {
        store::save_index(&data_paths, &outcome.index, &loaded.raw)
            .map_err(|err| format!("Failed: could not save datafile: {err}"))?;
    }
    Ok(())
}

/// Archive and backup commands, handled before the datafile is decoded.
///
/// Returns true when the first token named a maintenance command. Failures
/// are reported to the user but still count as handled; they end the run
/// without touching the session.
fn run_maintenance(tokens: &[String], data_paths: &DataPaths) -> bool {
    let Some(command) = tokens.first().map(String::as_str) else {
        return false;
    };
    match command {
        "restore-backup" => match store::restore_backup(data_paths) {
            Ok(()) => println!("Backup data restored."),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                println!("Failed: no backup file exists for workboy.");
            }
            Err(err) => println!("Failed: {err}"),
        },
        "archive" => match store::archive(data_paths, dates::today()) {
            Ok(target) => {
                println!("History archived at:");
                println!("    {}", target.display());
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                println!("Failed: no record to archive.");
            }
            Err(err) => println!("Failed: {err}"),
        },
        "restore-archive" => {
            let Some(day) = archive_day(tokens.get(1)) else {
                println!(
                    "Date input was malformed or did not exist. \
                     Could not identify which archive date to process."
                );
                return true;
            };
            match store::restore_archive(data_paths, day) {
                Ok(()) => println!("Archive restored."),
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    println!("Failed: no archive from date \"{day}\" exists.");
                }
                Err(err) => println!("Failed: {err}"),
            }
        }
        "display-archives" => display_archives(data_paths),
        "delete-archive" => {
            let Some(day) = archive_day(tokens.get(1)) else {
                println!(
                    "Date input was malformed or did not exist. \
                     Could not identify which archive data to delete."
                );
                return true;
            };
            match store::delete_archive(data_paths, day) {
                Ok(()) => println!("Archive removed."),
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    println!("Failed: no archive from date \"{day}\" exists.");
                }
                Err(err) => println!("Failed: {err}"),
            }
        }
        _ => return false,
    }
    true
}

/// Parses an archive date argument with the same flexible grammar log
/// entries use, so `Aug 1, 2026`, `8-1-26` and `2026-08-01` all work.
fn archive_day(arg: Option<&String>) -> Option<NaiveDate> {
    dates::parse_flexible(arg.map(String::as_str).unwrap_or_default())
}

fn display_archives(data_paths: &DataPaths) {
    match store::list_archives(data_paths) {
        Ok(files) if files.is_empty() => {
            println!();
            println!("No archived records.");
            println!();
        }
        Ok(files) => {
            println!();
            println!("Held archives:");
            println!();
            for file in files {
                println!("{file}");
            }
            println!();
        }
        Err(err) => println!("Failed: {err}"),
    }
}

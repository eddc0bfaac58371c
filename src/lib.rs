#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod helpers;
pub mod models;
pub mod output;
pub mod set;
pub mod table;

use std::path::Path;

use anyhow::{Context, Result, anyhow};

use cli::{Cli, Commands};
use output::Output;
use set::OutcomeSet;
use table::{ReadOptions, create_outcomes};

pub use error::OutcomeError;
pub use models::{
    Builtin, Function, Kind, NamedValues, Outcome, OutcomeBuilder, OutcomeDefinition, OutcomeType,
    OutputValue, Reducer, ScalarOutcome, TimeSeriesOutcome, VariableName, Variables,
};

pub const DEFINITIONS_EXTENSION: &str = "toml";

/// Loads an outcome set from a definitions file (`.toml`) or a delimited table.
pub fn load_outcome_set(path: &Path, delimiter: char) -> Result<OutcomeSet> {
    if path.extension().is_some_and(|ext| ext == DEFINITIONS_EXTENSION) {
        return OutcomeSet::from_toml_file(path)
            .with_context(|| format!("Failed to load outcome definitions from {}", path.display()));
    }

    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| anyhow!("Delimiter must be a single ASCII character, got '{delimiter}'"))?;
    let options = ReadOptions {
        delimiter,
        comment: Some(b'#'),
        trim: true,
        ..ReadOptions::default()
    };

    let outcomes = create_outcomes(path, &options)
        .with_context(|| format!("Failed to create outcomes from {}", path.display()))?;
    OutcomeSet::try_from(outcomes).context("Invalid outcome table")
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::List {
            table,
            delimiter,
            json,
        } => {
            let set = load_outcome_set(&table, delimiter)?;
            let outcomes = commands::list::run(&set);
            Output::new(json).outcome_list(&outcomes)
        }
        Commands::Process {
            table,
            run,
            delimiter,
            json,
        } => {
            let set = load_outcome_set(&table, delimiter)?;
            let report = commands::process::run(&set, &run)?;
            Output::new(json).process_report(&report)
        }
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::set::{Objective, OutcomeSet, ProcessedOutcome, read_run_output};

/// Processed values of one run, plus the objectives derived from them.
#[derive(Debug, Serialize)]
pub struct ProcessReport {
    outcomes: Vec<ProcessedOutcome>,
    objectives: Vec<Objective>,
}

impl ProcessReport {
    pub fn outcomes(&self) -> &[ProcessedOutcome] {
        &self.outcomes
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }
}

pub fn run(set: &OutcomeSet, run_path: &Path) -> Result<ProcessReport> {
    let run = read_run_output(run_path)
        .with_context(|| format!("Failed to load run output from {}", run_path.display()))?;

    let outcomes = set.process_run(&run)?;
    let objectives = set.objectives(&outcomes)?;

    Ok(ProcessReport {
        outcomes,
        objectives,
    })
}

use anyhow::Result;
use console::{Term, style};
use serde::Serialize;

use crate::commands::process::ProcessReport;
use crate::models::{OutcomeSummary, OutputValue};

/// Series longer than this are shortened in terminal output.
const SERIES_PREVIEW: usize = 6;

pub struct Output {
    term: Term,
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self {
            term: Term::stdout(),
            json,
        }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let output = serde_json::to_string_pretty(value)?;
        self.term.write_line(&output)?;
        Ok(())
    }

    pub fn outcome_list(&self, outcomes: &[OutcomeSummary]) -> Result<()> {
        if self.json {
            return self.print_json(outcomes);
        }

        if outcomes.is_empty() {
            self.term.write_line("No outcomes defined.")?;
            return Ok(());
        }

        for outcome in outcomes {
            self.term.write_line(&format!(
                "{} [{}]",
                style(&outcome.name).cyan().bold(),
                style(outcome.outcome_type.as_ref()).yellow()
            ))?;
            self.term
                .write_line(&format!("  Kind: {}", outcome.kind.as_ref()))?;
            self.term.write_line(&format!(
                "  Variables: {}",
                outcome.variable_name.join(", ")
            ))?;
            if outcome.has_function {
                self.term.write_line(&format!(
                    "  Function: {}",
                    style("(post-processed)").dim()
                ))?;
            }
            self.term.write_line("")?;
        }
        Ok(())
    }

    pub fn process_report(&self, report: &ProcessReport) -> Result<()> {
        if self.json {
            return self.print_json(report);
        }

        if report.outcomes().is_empty() {
            self.term.write_line("No outcomes defined.")?;
            return Ok(());
        }

        for processed in report.outcomes() {
            self.term.write_line(&format!(
                "{}: {}",
                style(&processed.name).cyan().bold(),
                format_value(&processed.value)
            ))?;
        }

        if !report.objectives().is_empty() {
            self.term.write_line("")?;
            self.term
                .write_line(&style("Objectives:").yellow().to_string())?;
            for objective in report.objectives() {
                self.term.write_line(&format!(
                    "  - {} ({}): {}",
                    style(&objective.name).cyan(),
                    objective.kind.as_ref(),
                    objective.value
                ))?;
            }
        }
        Ok(())
    }
}

fn format_value(value: &OutputValue) -> String {
    match value {
        OutputValue::Scalar(x) => x.to_string(),
        OutputValue::Series(series) if series.len() > SERIES_PREVIEW => {
            let head: Vec<String> = series[..SERIES_PREVIEW]
                .iter()
                .map(ToString::to_string)
                .collect();
            format!("[{}, ... ({} values)]", head.join(", "), series.len())
        }
        OutputValue::Series(series) => {
            let items: Vec<String> = series.iter().map(ToString::to_string).collect();
            format!("[{}]", items.join(", "))
        }
        OutputValue::Tuple(values) => {
            let items: Vec<String> = values.iter().map(format_value).collect();
            format!("({})", items.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::scalar(OutputValue::Scalar(0.5), "0.5")]
    #[case::series(OutputValue::Series(vec![1.0, 2.5]), "[1, 2.5]")]
    #[case::long_series(
        OutputValue::Series((0..10).map(f64::from).collect()),
        "[0, 1, 2, 3, 4, 5, ... (10 values)]"
    )]
    #[case::tuple(
        OutputValue::Tuple(vec![OutputValue::Scalar(1.0), OutputValue::Series(vec![2.0])]),
        "(1, [2])"
    )]
    fn format_value_renders_each_shape(#[case] value: OutputValue, #[case] expected: &str) {
        assert_eq!(format_value(&value), expected);
    }
}

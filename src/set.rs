use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::config;
use crate::error::{OutcomeError, Result};
use crate::models::{Kind, Outcome, OutcomeDefinition, OutputValue, Variables};

/// Raw values a model run produced, keyed by variable name.
pub type RunOutput = BTreeMap<String, OutputValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedOutcome {
    pub name: String,
    pub value: OutputValue,
}

/// Scalar value of a minimize/maximize outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Objective {
    pub name: String,
    pub kind: Kind,
    /// -1 to minimize, 1 to maximize.
    pub direction: i8,
    pub value: f64,
}

/// Ordered collection of outcomes with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutcomeSet {
    outcomes: Vec<Outcome>,
}

impl OutcomeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(src: &str) -> Result<Self> {
        Self::try_from(config::parse_definitions(src)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        Self::try_from(config::read_definitions(path)?)
    }

    pub fn push(&mut self, outcome: impl Into<Outcome>) -> Result<()> {
        let outcome = outcome.into();
        if self.get(outcome.name()).is_some() {
            return Err(OutcomeError::DuplicateName {
                name: outcome.name().to_owned(),
            });
        }
        self.outcomes.push(outcome);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.name() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Outcome> {
        self.outcomes.iter()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Processes every outcome against one run's raw output, in set order.
    ///
    /// Multi-variable outcomes receive a tuple holding one value per variable,
    /// in declared order.
    pub fn process_run(&self, run: &RunOutput) -> Result<Vec<ProcessedOutcome>> {
        debug!(outcomes = self.len(), variables = run.len(), "processing run output");

        self.outcomes
            .iter()
            .map(|outcome| {
                let values = gather(outcome, run)?;
                Ok(ProcessedOutcome {
                    name: outcome.name().to_owned(),
                    value: outcome.process(values)?,
                })
            })
            .collect()
    }

    /// Objective values for every minimize/maximize outcome in `processed`.
    pub fn objectives(&self, processed: &[ProcessedOutcome]) -> Result<Vec<Objective>> {
        let mut objectives = Vec::new();
        for entry in processed {
            let Some(outcome) = self.get(&entry.name) else {
                continue;
            };
            if !outcome.kind().is_objective() {
                continue;
            }

            let value = match outcome {
                Outcome::Scalar(_) => {
                    entry
                        .value
                        .as_scalar()
                        .ok_or_else(|| OutcomeError::NotAScalar {
                            outcome: entry.name.clone(),
                        })?
                }
                Outcome::TimeSeries(series) => series.reduce_value(&entry.value)?,
            };
            objectives.push(Objective {
                name: entry.name.clone(),
                kind: outcome.kind(),
                direction: outcome.kind().direction(),
                value,
            });
        }
        Ok(objectives)
    }
}

fn gather(outcome: &Outcome, run: &RunOutput) -> Result<OutputValue> {
    let lookup = |variable: &str| {
        run.get(variable)
            .cloned()
            .ok_or_else(|| OutcomeError::MissingVariable {
                outcome: outcome.name().to_owned(),
                variable: variable.to_owned(),
            })
    };

    match outcome.variable_name() {
        Variables::Single(variable) => lookup(variable),
        Variables::Multiple(variables) => variables
            .iter()
            .map(|v| lookup(v.as_str()))
            .collect::<Result<Vec<_>>>()
            .map(OutputValue::Tuple),
    }
}

impl TryFrom<Vec<Outcome>> for OutcomeSet {
    type Error = OutcomeError;

    fn try_from(outcomes: Vec<Outcome>) -> Result<Self> {
        let mut set = Self::new();
        for outcome in outcomes {
            set.push(outcome)?;
        }
        Ok(set)
    }
}

impl<'a> IntoIterator for &'a OutcomeSet {
    type Item = &'a Outcome;
    type IntoIter = std::slice::Iter<'a, Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

/// Reads one run's output from a JSON object of variable name to value.
pub fn read_run_output(path: &Path) -> Result<RunOutput> {
    let src = fs::read_to_string(path).map_err(|source| OutcomeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&src)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Builtin, Function, ScalarOutcome, TimeSeriesOutcome, VariableName};
    use anyhow::anyhow;
    use rstest::{fixture, rstest};

    /// Outcomes modelled on a flu run: a raw series, a peak derived from
    /// another variable, and a combination of two variables.
    #[fixture]
    fn flu_set() -> OutcomeSet {
        let mut set = OutcomeSet::new();
        set.push(TimeSeriesOutcome::new("deceased population"))
            .unwrap();
        set.push(
            TimeSeriesOutcome::builder("peak infected")
                .kind(Kind::Minimize)
                .variable_name("infected fraction")
                .function(Builtin::Max.function())
                .reduce(Builtin::Max.reducer())
                .time_series()
                .unwrap(),
        )
        .unwrap();
        set.push(
            ScalarOutcome::builder("total infected")
                .kind(Kind::Maximize)
                .variable_name(VariableName::multiple(["infected R1", "infected R2"]).unwrap())
                .function(Function::named(|values| {
                    let r1 = values["infected R1"]
                        .as_scalar()
                        .ok_or_else(|| anyhow!("R1"))?;
                    let r2 = values["infected R2"]
                        .as_scalar()
                        .ok_or_else(|| anyhow!("R2"))?;
                    Ok(OutputValue::Scalar(r1 + r2))
                }))
                .scalar()
                .unwrap(),
        )
        .unwrap();
        set
    }

    #[fixture]
    fn flu_run() -> RunOutput {
        RunOutput::from([
            ("deceased population".to_owned(), vec![0.0, 1.0, 3.0].into()),
            ("infected fraction".to_owned(), vec![0.1, 0.6, 0.2].into()),
            ("infected R1".to_owned(), 10.0.into()),
            ("infected R2".to_owned(), 5.0.into()),
        ])
    }

    #[rstest]
    fn push_rejects_duplicate_names(mut flu_set: OutcomeSet) {
        let err = flu_set.push(ScalarOutcome::new("peak infected")).unwrap_err();
        assert!(matches!(err, OutcomeError::DuplicateName { ref name } if name == "peak infected"));
        assert_eq!(flu_set.len(), 3);
    }

    #[test]
    fn try_from_rejects_duplicates() {
        let outcomes = vec![
            Outcome::from(ScalarOutcome::new("a")),
            Outcome::from(TimeSeriesOutcome::new("a")),
        ];
        assert!(OutcomeSet::try_from(outcomes).unwrap_err().is_configuration());
    }

    #[rstest]
    fn process_run_follows_set_order(flu_set: OutcomeSet, flu_run: RunOutput) {
        let processed = flu_set.process_run(&flu_run).unwrap();
        assert_eq!(
            processed,
            vec![
                ProcessedOutcome {
                    name: "deceased population".to_owned(),
                    value: OutputValue::Series(vec![0.0, 1.0, 3.0]),
                },
                ProcessedOutcome {
                    name: "peak infected".to_owned(),
                    value: OutputValue::Scalar(0.6),
                },
                ProcessedOutcome {
                    name: "total infected".to_owned(),
                    value: OutputValue::Scalar(15.0),
                },
            ]
        );
    }

    #[rstest]
    fn process_run_requires_every_variable(flu_set: OutcomeSet, mut flu_run: RunOutput) {
        flu_run.remove("infected R2");
        let err = flu_set.process_run(&flu_run).unwrap_err();
        assert!(matches!(
            err,
            OutcomeError::MissingVariable { ref outcome, ref variable }
                if outcome == "total infected" && variable == "infected R2"
        ));
    }

    #[rstest]
    fn objectives_cover_non_info_outcomes(flu_set: OutcomeSet, flu_run: RunOutput) {
        let processed = flu_set.process_run(&flu_run).unwrap();
        let objectives = flu_set.objectives(&processed).unwrap();

        assert_eq!(
            objectives,
            vec![
                Objective {
                    name: "peak infected".to_owned(),
                    kind: Kind::Minimize,
                    direction: -1,
                    value: 0.6,
                },
                Objective {
                    name: "total infected".to_owned(),
                    kind: Kind::Maximize,
                    direction: 1,
                    value: 15.0,
                },
            ]
        );
    }

    #[test]
    fn scalar_objective_must_be_scalar() {
        let mut set = OutcomeSet::new();
        set.push(
            ScalarOutcome::builder("cost")
                .kind(Kind::Minimize)
                .scalar()
                .unwrap(),
        )
        .unwrap();
        let run = RunOutput::from([("cost".to_owned(), vec![1.0, 2.0].into())]);

        let processed = set.process_run(&run).unwrap();
        assert!(matches!(
            set.objectives(&processed),
            Err(OutcomeError::NotAScalar { .. })
        ));
    }

    #[test]
    fn from_toml_str_builds_set() {
        let set = OutcomeSet::from_toml_str(
            "[[outcome]]\nname = \"a\"\ntype = \"scalar\"\n\n[[outcome]]\nname = \"b\"\ntype = \"timeseries\"",
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert!(matches!(set.get("b"), Some(Outcome::TimeSeries(_))));
        assert_eq!(set.iter().map(OutcomeDefinition::name).collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn read_run_output_parses_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{"a": 1.5, "b": [1, 2]}"#).unwrap();

        let run = read_run_output(&path).unwrap();
        assert_eq!(run["a"], OutputValue::Scalar(1.5));
        assert_eq!(run["b"], OutputValue::Series(vec![1.0, 2.0]));
    }
}

use serde::Serialize;
use tracing::warn;

use super::{
    Function, Kind, NamedValues, OutcomeType, OutputValue, Reducer, VariableName, Variables,
};
use crate::error::{OutcomeError, Result};

/// Fields shared by every outcome variant.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeCore {
    name: String,
    kind: Kind,
    variable_name: Option<VariableName>,
    function: Option<Function>,
}

impl OutcomeCore {
    fn new(
        name: String,
        kind: Kind,
        variable_name: Option<VariableName>,
        function: Option<Function>,
    ) -> Result<Self> {
        if let Some(variable_name) = &variable_name {
            variable_name.validate()?;
        }
        let core = Self {
            name,
            kind,
            variable_name,
            function,
        };
        core.check_convention()?;
        Ok(core)
    }

    /// Fails when the function cannot be called the way the variable names require.
    fn check_convention(&self) -> Result<()> {
        match (&self.function, self.variables()) {
            (Some(function @ Function::Named(_)), Variables::Single(_))
            | (Some(function @ Function::Single(_)), Variables::Multiple(_)) => {
                Err(self.convention_mismatch(function))
            }
            _ => Ok(()),
        }
    }

    fn convention_mismatch(&self, function: &Function) -> OutcomeError {
        OutcomeError::InvalidFunction {
            outcome: self.name.clone(),
            accepts: function.convention(),
        }
    }

    fn variables(&self) -> Variables<'_> {
        self.variable_name
            .as_ref()
            .map_or(Variables::Single(&self.name), VariableName::variables)
    }
}

/// Behavior common to scalar and time-series outcomes.
pub trait OutcomeDefinition {
    fn core(&self) -> &OutcomeCore;

    fn core_mut(&mut self) -> &mut OutcomeCore;

    fn name(&self) -> &str {
        &self.core().name
    }

    fn kind(&self) -> Kind {
        self.core().kind
    }

    /// The variable name(s) to read from model output; falls back to the outcome name.
    fn variable_name(&self) -> Variables<'_> {
        self.core().variables()
    }

    /// The variable name exactly as configured, `None` when it defaults to the name.
    fn raw_variable_name(&self) -> Option<&VariableName> {
        self.core().variable_name.as_ref()
    }

    /// Stores a new variable name as given. No validation happens here; names
    /// or a function that no longer fit are reported by `process`.
    fn set_variable_name(&mut self, variable_name: Option<VariableName>) {
        self.core_mut().variable_name = variable_name;
    }

    fn function(&self) -> Option<&Function> {
        self.core().function.as_ref()
    }

    /// Maps the raw value(s) retrieved for this outcome onto its reported value.
    ///
    /// With several variable names, `values` must hold exactly one element per
    /// name; elements are bound to names in order. Without a function the
    /// values are returned unchanged.
    fn process(&self, values: OutputValue) -> Result<OutputValue> {
        let core = self.core();
        if let Some(variable_name) = &core.variable_name {
            variable_name.validate()?;
        }

        if let Variables::Multiple(names) = core.variables() {
            let actual = values.len();
            if actual != Some(names.len()) {
                return Err(OutcomeError::ArityMismatch {
                    outcome: core.name.clone(),
                    expected: names.len(),
                    actual,
                });
            }
        }

        let Some(function) = &core.function else {
            return Ok(values);
        };

        let result = match (function, core.variables()) {
            (Function::Single(f), Variables::Single(_)) => f(values),
            (Function::Named(f), Variables::Multiple(names)) => {
                let named: NamedValues =
                    names.iter().cloned().zip(values.into_elements()).collect();
                f(&named)
            }
            (function, _) => return Err(core.convention_mismatch(function)),
        };

        result.map_err(|e| OutcomeError::Function {
            outcome: core.name.clone(),
            message: format!("{e:#}"),
        })
    }
}

/// Optional construction arguments shared by both outcome variants.
#[derive(Debug, Clone)]
pub struct OutcomeBuilder {
    name: String,
    kind: Kind,
    variable_name: Option<VariableName>,
    function: Option<Function>,
    reduce: Option<Reducer>,
}

impl OutcomeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: Kind::Info,
            variable_name: None,
            function: None,
            reduce: None,
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn variable_name(mut self, variable_name: impl Into<VariableName>) -> Self {
        self.variable_name = Some(variable_name.into());
        self
    }

    #[must_use]
    pub fn function(mut self, function: Function) -> Self {
        self.function = Some(function);
        self
    }

    /// Only meaningful for time series; ignored when building a scalar.
    #[must_use]
    pub fn reduce(mut self, reduce: Reducer) -> Self {
        self.reduce = Some(reduce);
        self
    }

    pub fn scalar(self) -> Result<ScalarOutcome> {
        let core = OutcomeCore::new(self.name, self.kind, self.variable_name, self.function)?;
        Ok(ScalarOutcome { core })
    }

    pub fn time_series(self) -> Result<TimeSeriesOutcome> {
        let core = OutcomeCore::new(self.name, self.kind, self.variable_name, self.function)?;
        if core.kind.is_objective() && self.reduce.is_none() {
            return Err(OutcomeError::MissingReducer { outcome: core.name });
        }
        Ok(TimeSeriesOutcome {
            core,
            reduce: self.reduce,
        })
    }

    pub fn build(self, outcome_type: OutcomeType) -> Result<Outcome> {
        match outcome_type {
            OutcomeType::Scalar => self.scalar().map(Outcome::Scalar),
            OutcomeType::TimeSeries => self.time_series().map(Outcome::TimeSeries),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarOutcome {
    core: OutcomeCore,
}

impl ScalarOutcome {
    /// An informational outcome read under its own name, without post-processing.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: OutcomeCore {
                name: name.into(),
                kind: Kind::Info,
                variable_name: None,
                function: None,
            },
        }
    }

    pub fn builder(name: impl Into<String>) -> OutcomeBuilder {
        OutcomeBuilder::new(name)
    }
}

impl OutcomeDefinition for ScalarOutcome {
    fn core(&self) -> &OutcomeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut OutcomeCore {
        &mut self.core
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesOutcome {
    core: OutcomeCore,
    reduce: Option<Reducer>,
}

impl TimeSeriesOutcome {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: OutcomeCore {
                name: name.into(),
                kind: Kind::Info,
                variable_name: None,
                function: None,
            },
            reduce: None,
        }
    }

    pub fn builder(name: impl Into<String>) -> OutcomeBuilder {
        OutcomeBuilder::new(name)
    }

    pub fn reducer(&self) -> Option<&Reducer> {
        self.reduce.as_ref()
    }

    /// Collapses a processed value into the scalar an optimizer works with.
    pub fn reduce_value(&self, value: &OutputValue) -> Result<f64> {
        let reduce = self
            .reduce
            .as_ref()
            .ok_or_else(|| OutcomeError::MissingReducer {
                outcome: self.core.name.clone(),
            })?;

        match value {
            OutputValue::Scalar(scalar) => Ok(*scalar),
            OutputValue::Series(series) => {
                reduce
                    .reduce(series)
                    .map_err(|e| OutcomeError::Function {
                        outcome: self.core.name.clone(),
                        message: format!("{e:#}"),
                    })
            }
            OutputValue::Tuple(_) => Err(OutcomeError::NotASeries {
                outcome: self.core.name.clone(),
            }),
        }
    }
}

impl OutcomeDefinition for TimeSeriesOutcome {
    fn core(&self) -> &OutcomeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut OutcomeCore {
        &mut self.core
    }
}

/// Either outcome variant; the element type of outcome sequences.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Scalar(ScalarOutcome),
    TimeSeries(TimeSeriesOutcome),
}

impl Outcome {
    pub fn outcome_type(&self) -> OutcomeType {
        match self {
            Self::Scalar(_) => OutcomeType::Scalar,
            Self::TimeSeries(_) => OutcomeType::TimeSeries,
        }
    }

    pub fn summary(&self) -> OutcomeSummary {
        OutcomeSummary {
            name: self.name().to_owned(),
            outcome_type: self.outcome_type(),
            kind: self.kind(),
            variable_name: self.variable_name().iter().map(str::to_owned).collect(),
            has_function: self.function().is_some(),
        }
    }
}

impl OutcomeDefinition for Outcome {
    fn core(&self) -> &OutcomeCore {
        match self {
            Self::Scalar(outcome) => outcome.core(),
            Self::TimeSeries(outcome) => outcome.core(),
        }
    }

    fn core_mut(&mut self) -> &mut OutcomeCore {
        match self {
            Self::Scalar(outcome) => outcome.core_mut(),
            Self::TimeSeries(outcome) => outcome.core_mut(),
        }
    }
}

impl From<ScalarOutcome> for Outcome {
    fn from(outcome: ScalarOutcome) -> Self {
        Self::Scalar(outcome)
    }
}

impl From<TimeSeriesOutcome> for Outcome {
    fn from(outcome: TimeSeriesOutcome) -> Self {
        Self::TimeSeries(outcome)
    }
}

/// Serializable description of an outcome, without its callables.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub outcome_type: OutcomeType,
    pub kind: Kind,
    pub variable_name: Vec<String>,
    pub has_function: bool,
}

/// Builds a time-series outcome when `time` is set, a scalar outcome otherwise.
#[deprecated(note = "construct ScalarOutcome or TimeSeriesOutcome directly")]
pub fn outcome(name: impl Into<String>, time: bool) -> Outcome {
    if time {
        warn!("outcome(name, time = true) is deprecated, use TimeSeriesOutcome instead");
        TimeSeriesOutcome::new(name).into()
    } else {
        warn!("outcome(name, time = false) is deprecated, use ScalarOutcome instead");
        ScalarOutcome::new(name).into()
    }
}

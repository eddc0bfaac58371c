mod function;
mod kind;
mod outcome;
mod value;
mod variable;

pub use function::{Builtin, Function, NamedValues, Reducer};
pub use kind::{Kind, OutcomeType};
#[allow(deprecated)]
pub use outcome::{
    Outcome, OutcomeBuilder, OutcomeCore, OutcomeDefinition, OutcomeSummary, ScalarOutcome,
    TimeSeriesOutcome, outcome,
};
pub use value::OutputValue;
pub use variable::{VariableName, Variables};

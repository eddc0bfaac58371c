use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use strum::{AsRefStr, EnumString};

use super::OutputValue;

/// Values bound to variable names for a multi-variable function call.
pub type NamedValues = BTreeMap<String, OutputValue>;

type SingleFn = dyn Fn(OutputValue) -> Result<OutputValue> + Send + Sync;
type NamedFn = dyn Fn(&NamedValues) -> Result<OutputValue> + Send + Sync;
type ReduceFn = dyn Fn(&[f64]) -> Result<f64> + Send + Sync;

/// Post-processing applied to the raw value(s) retrieved for an outcome.
///
/// The variant fixes the calling convention: `Single` receives the value of a
/// single variable, `Named` receives every declared variable keyed by name.
/// Two functions are equal only if they are the same closure.
#[derive(Clone)]
pub enum Function {
    Single(Arc<SingleFn>),
    Named(Arc<NamedFn>),
}

impl Function {
    pub fn single<F>(f: F) -> Self
    where
        F: Fn(OutputValue) -> Result<OutputValue> + Send + Sync + 'static,
    {
        Self::Single(Arc::new(f))
    }

    pub fn named<F>(f: F) -> Self
    where
        F: Fn(&NamedValues) -> Result<OutputValue> + Send + Sync + 'static,
    {
        Self::Named(Arc::new(f))
    }

    pub fn convention(&self) -> &'static str {
        match self {
            Self::Single(_) => "a single value",
            Self::Named(_) => "named values",
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Single(a), Self::Single(b)) => Arc::ptr_eq(a, b),
            (Self::Named(a), Self::Named(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(_) => f.write_str("Function::Single(..)"),
            Self::Named(_) => f.write_str("Function::Named(..)"),
        }
    }
}

/// Collapses a time series into a scalar for optimization.
#[derive(Clone)]
pub struct Reducer(Arc<ReduceFn>);

impl Reducer {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[f64]) -> Result<f64> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn reduce(&self, series: &[f64]) -> Result<f64> {
        (self.0)(series)
    }
}

impl PartialEq for Reducer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Reducer(..)")
    }
}

/// Named reductions that definition files can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Builtin {
    Min,
    Max,
    Mean,
    Sum,
    First,
    Last,
}

impl Builtin {
    pub fn apply(self, series: &[f64]) -> Result<f64> {
        if series.is_empty() {
            return Err(anyhow!("cannot take {} of an empty series", self.as_ref()));
        }

        let value = match self {
            Self::Min => series.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Max => series.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Sum => series.iter().sum(),
            #[allow(clippy::cast_precision_loss)]
            Self::Mean => series.iter().sum::<f64>() / series.len() as f64,
            Self::First => series[0],
            Self::Last => series[series.len() - 1],
        };
        Ok(value)
    }

    /// A single-value post-processing function that reduces a series to a scalar.
    /// Scalars pass through unchanged.
    pub fn function(self) -> Function {
        Function::single(move |value| match value {
            OutputValue::Scalar(_) => Ok(value),
            OutputValue::Series(series) => self.apply(&series).map(OutputValue::Scalar),
            OutputValue::Tuple(_) => Err(anyhow!(
                "{} expects a series, got a tuple of values",
                self.as_ref()
            )),
        })
    }

    pub fn reducer(self) -> Reducer {
        Reducer::new(move |series| self.apply(series))
    }
}

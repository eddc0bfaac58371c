use serde::{Deserialize, Serialize};

/// Raw output a model reports for one variable, or the processed value of an outcome.
///
/// Untagged so run output reads naturally from JSON: a number is a scalar, an
/// array of numbers is a series, anything else nested is a tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputValue {
    Scalar(f64),
    Series(Vec<f64>),
    Tuple(Vec<OutputValue>),
}

impl OutputValue {
    /// Number of elements, or `None` for an unsized scalar.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Scalar(_) => None,
            Self::Series(series) => Some(series.len()),
            Self::Tuple(values) => Some(values.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Splits a sized value into its elements; series elements become scalars.
    pub fn into_elements(self) -> Vec<OutputValue> {
        match self {
            Self::Scalar(value) => vec![Self::Scalar(value)],
            Self::Series(series) => series.into_iter().map(Self::Scalar).collect(),
            Self::Tuple(values) => values,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<f64> for OutputValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for OutputValue {
    fn from(series: Vec<f64>) -> Self {
        Self::Series(series)
    }
}

impl From<Vec<OutputValue>> for OutputValue {
    fn from(values: Vec<OutputValue>) -> Self {
        Self::Tuple(values)
    }
}

//! Error type for outcome construction and processing.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutcomeError {
    #[error("function for outcome '{outcome}' accepts {accepts}, which does not fit its variable names")]
    InvalidFunction {
        outcome: String,
        accepts: &'static str,
    },

    #[error("variable name must be a string or list of strings, got {found}")]
    InvalidVariableName { found: String },

    #[error("reduce needs to be specified when using TimeSeriesOutcome '{outcome}' in optimization")]
    MissingReducer { outcome: String },

    #[error("no {column} column in outcome table")]
    MissingColumn { column: &'static str },

    #[error("unknown type '{kind}' for {name}{}", suggestion_suffix(.suggestion))]
    UnknownType {
        name: String,
        kind: String,
        suggestion: Option<String>,
    },

    #[error("unknown kind '{kind}' for {name}{}", suggestion_suffix(.suggestion))]
    UnknownKind {
        name: String,
        kind: String,
        suggestion: Option<String>,
    },

    #[error("unknown builtin '{name}'")]
    UnknownBuiltin { name: String },

    #[error("malformed outcome table: {message}")]
    MalformedTable { message: String },

    #[error("duplicate outcome name: {name}")]
    DuplicateName { name: String },

    #[error(
        "outcome '{outcome}': number of variables is {expected}, number of outputs is {}",
        .actual.map_or_else(|| "unsized".to_owned(), |n| n.to_string())
    )]
    ArityMismatch {
        outcome: String,
        expected: usize,
        actual: Option<usize>,
    },

    #[error("no value for variable '{variable}' required by outcome '{outcome}'")]
    MissingVariable { outcome: String, variable: String },

    #[error("outcome '{outcome}' must produce a scalar to be used as an objective")]
    NotAScalar { outcome: String },

    #[error("outcome '{outcome}' cannot reduce a value that is not a series")]
    NotASeries { outcome: String },

    #[error("post-processing for outcome '{outcome}' failed: {message}")]
    Function { outcome: String, message: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse delimited table: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse outcome definitions: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse run output: {0}")]
    Json(#[from] serde_json::Error),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!("\nDid you mean: {s}"))
        .unwrap_or_default()
}

impl OutcomeError {
    /// True for errors caused by invalid definitions rather than by run data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidFunction { .. }
                | Self::InvalidVariableName { .. }
                | Self::MissingReducer { .. }
                | Self::MissingColumn { .. }
                | Self::UnknownType { .. }
                | Self::UnknownKind { .. }
                | Self::UnknownBuiltin { .. }
                | Self::MalformedTable { .. }
                | Self::DuplicateName { .. }
        )
    }
}

pub type Result<T, E = OutcomeError> = std::result::Result<T, E>;

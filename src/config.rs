//! TOML outcome definitions.
//!
//! ```toml
//! [[outcome]]
//! name = "peak infected"
//! type = "timeseries"
//! kind = "minimize"
//! variable_name = "infected fraction"
//! function = "max"
//! reduce = "max"
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{OutcomeError, Result};
use crate::helpers::find_similar;
use crate::models::{Builtin, Kind, Outcome, OutcomeBuilder, OutcomeType, VariableName};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionsFile {
    #[serde(default, rename = "outcome")]
    outcomes: Vec<OutcomeEntry>,
}

/// One `[[outcome]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutcomeEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub outcome_type: String,
    /// Matched case-insensitively.
    pub kind: Option<String>,
    /// Kept untyped so a bad value surfaces as a variable-name error rather
    /// than a generic parse error.
    pub variable_name: Option<toml::Value>,
    pub function: Option<String>,
    pub reduce: Option<String>,
}

impl OutcomeEntry {
    pub fn into_outcome(self) -> Result<Outcome> {
        let outcome_type = OutcomeType::from_str(&self.outcome_type).map_err(|_| {
            let known: Vec<&str> = OutcomeType::ALL.iter().map(|t| t.as_ref()).collect();
            OutcomeError::UnknownType {
                suggestion: find_similar(&self.outcome_type, &known).map(str::to_owned),
                name: self.name.clone(),
                kind: self.outcome_type.clone(),
            }
        })?;

        let kind = match &self.kind {
            Some(kind) => Kind::from_str(kind).map_err(|_| {
                let known: Vec<&str> = Kind::ALL.iter().map(|k| k.as_ref()).collect();
                OutcomeError::UnknownKind {
                    suggestion: find_similar(kind, &known).map(str::to_owned),
                    name: self.name.clone(),
                    kind: kind.clone(),
                }
            })?,
            None => Kind::default(),
        };

        let mut builder = OutcomeBuilder::new(self.name).kind(kind);
        if let Some(value) = &self.variable_name {
            builder = builder.variable_name(VariableName::try_from(value)?);
        }
        if let Some(name) = &self.function {
            builder = builder.function(builtin(name)?.function());
        }
        if let Some(name) = &self.reduce {
            builder = builder.reduce(builtin(name)?.reducer());
        }
        builder.build(outcome_type)
    }
}

fn builtin(name: &str) -> Result<Builtin> {
    Builtin::from_str(name).map_err(|_| OutcomeError::UnknownBuiltin {
        name: name.to_owned(),
    })
}

pub fn parse_definitions(src: &str) -> Result<Vec<Outcome>> {
    let file: DefinitionsFile = toml::from_str(src)?;
    file.outcomes
        .into_iter()
        .map(OutcomeEntry::into_outcome)
        .collect()
}

pub fn read_definitions(path: &Path) -> Result<Vec<Outcome>> {
    let src = fs::read_to_string(path).map_err(|source| OutcomeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_definitions(&src)
}

use std::collections::BTreeSet;

use crate::error::{OutcomeError, Result};

/// Name(s) an outcome reads from raw model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableName {
    Single(String),
    Multiple(Vec<String>),
}

impl VariableName {
    /// Builds a multi-variable name. A one-element list keeps the multi-variable
    /// calling convention. Names must be unique, since values are bound to them.
    pub fn multiple<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = Self::Multiple(names.into_iter().map(Into::into).collect());
        name.validate()?;
        Ok(name)
    }

    /// Fails on an empty list or a list that repeats a name.
    pub fn validate(&self) -> Result<()> {
        let Self::Multiple(names) = self else {
            return Ok(());
        };
        if names.is_empty() {
            return Err(OutcomeError::InvalidVariableName {
                found: "an empty list".to_owned(),
            });
        }
        let mut seen = BTreeSet::new();
        if let Some(repeated) = names.iter().map(String::as_str).find(|name| !seen.insert(*name)) {
            return Err(OutcomeError::InvalidVariableName {
                found: format!("a list repeating '{repeated}'"),
            });
        }
        Ok(())
    }

    pub fn variables(&self) -> Variables<'_> {
        match self {
            Self::Single(name) => Variables::Single(name),
            Self::Multiple(names) => Variables::Multiple(names),
        }
    }
}

impl From<&str> for VariableName {
    fn from(name: &str) -> Self {
        Self::Single(name.to_owned())
    }
}

impl From<String> for VariableName {
    fn from(name: String) -> Self {
        Self::Single(name)
    }
}

impl TryFrom<&toml::Value> for VariableName {
    type Error = OutcomeError;

    fn try_from(value: &toml::Value) -> Result<Self> {
        match value {
            toml::Value::String(name) => Ok(Self::Single(name.clone())),
            toml::Value::Array(items) => {
                let names = items
                    .iter()
                    .map(|item| match item {
                        toml::Value::String(name) => Ok(name.clone()),
                        other => Err(OutcomeError::InvalidVariableName {
                            found: format!("a list containing {}", other.type_str()),
                        }),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Self::multiple(names)
            }
            other => Err(OutcomeError::InvalidVariableName {
                found: other.type_str().to_owned(),
            }),
        }
    }
}

/// Borrowed view of the variable name(s) an outcome resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variables<'a> {
    Single(&'a str),
    Multiple(&'a [String]),
}

impl<'a> Variables<'a> {
    pub fn len(self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multiple(names) => names.len(),
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    pub fn iter(self) -> impl Iterator<Item = &'a str> {
        let (single, multiple) = match self {
            Self::Single(name) => (Some(name), &[][..]),
            Self::Multiple(names) => (None, names),
        };
        single
            .into_iter()
            .chain(multiple.iter().map(String::as_str))
    }
}

impl std::fmt::Display for Variables<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(name) => f.write_str(name),
            Self::Multiple(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

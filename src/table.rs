//! Bulk construction of outcomes from tabular input.
//!
//! A table needs a `name` and a `type` column; every other column is ignored.
//! Rows become outcomes in order, dispatching on `type`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::error::{OutcomeError, Result};
use crate::helpers::find_similar;
use crate::models::{Outcome, OutcomeType, ScalarOutcome, TimeSeriesOutcome};

pub const NAME_COLUMN: &str = "name";
pub const TYPE_COLUMN: &str = "type";

/// Parsing options for delimited text.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub delimiter: u8,
    pub comment: Option<u8>,
    /// Strip surrounding whitespace from every cell.
    pub trim: bool,
    /// Accept rows with fewer or more fields than the header.
    pub flexible: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            comment: None,
            trim: false,
            flexible: false,
        }
    }
}

/// Row-oriented table of string cells with named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutcomeTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl OutcomeTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Builds a table from column name to column values. Columns must have equal length.
    pub fn from_columns(columns: BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut lengths = columns.iter().map(|(name, values)| (name, values.len()));
        let Some((first, len)) = lengths.next() else {
            return Ok(Self::default());
        };
        if let Some((other, other_len)) = lengths.find(|(_, l)| *l != len) {
            return Err(OutcomeError::MalformedTable {
                message: format!(
                    "column '{first}' has {len} values but column '{other}' has {other_len}"
                ),
            });
        }

        let headers: Vec<String> = columns.keys().cloned().collect();
        let rows = (0..len)
            .map(|i| columns.values().map(|column| column[i].clone()).collect())
            .collect();
        Ok(Self { headers, rows })
    }

    pub fn read_csv(path: &Path, options: &ReadOptions) -> Result<Self> {
        let file = File::open(path).map_err(|source| OutcomeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, options)
    }

    pub fn from_reader<R: Read>(reader: R, options: &ReadOptions) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .comment(options.comment)
            .flexible(options.flexible)
            .trim(if options.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_owned).collect());
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    fn require_column(&self, column: &'static str) -> Result<usize> {
        self.column_index(column)
            .ok_or(OutcomeError::MissingColumn { column })
    }
}

/// Where `create_outcomes` reads its table from.
#[derive(Debug, Clone)]
pub enum TableSource {
    Path(PathBuf),
    Columns(BTreeMap<String, Vec<String>>),
    Table(OutcomeTable),
}

impl TableSource {
    pub fn columns<I, K, C, V>(columns: I) -> Self
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::Columns(
            columns
                .into_iter()
                .map(|(name, values)| (name.into(), values.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }

    fn into_table(self, options: &ReadOptions) -> Result<OutcomeTable> {
        match self {
            Self::Path(path) => OutcomeTable::read_csv(&path, options),
            Self::Columns(columns) => OutcomeTable::from_columns(columns),
            Self::Table(table) => Ok(table),
        }
    }
}

impl From<&Path> for TableSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for TableSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&str> for TableSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<BTreeMap<String, Vec<String>>> for TableSource {
    fn from(columns: BTreeMap<String, Vec<String>>) -> Self {
        Self::Columns(columns)
    }
}

impl From<OutcomeTable> for TableSource {
    fn from(table: OutcomeTable) -> Self {
        Self::Table(table)
    }
}

/// Builds one outcome per table row, in row order.
///
/// `options` only applies when `source` is a path. The first row with an
/// unknown type aborts the whole batch.
pub fn create_outcomes(
    source: impl Into<TableSource>,
    options: &ReadOptions,
) -> Result<Vec<Outcome>> {
    let table = source.into().into_table(options)?;

    let name_idx = table.require_column(NAME_COLUMN)?;
    let type_idx = table.require_column(TYPE_COLUMN)?;
    debug!(rows = table.len(), "building outcomes from table");

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(line, row)| {
            let cell = |idx: usize| row.get(idx).map_or("", String::as_str);
            let name = cell(name_idx);
            let kind = cell(type_idx);

            if name.is_empty() {
                return Err(OutcomeError::MalformedTable {
                    message: format!("row {} has no name", line + 1),
                });
            }

            match OutcomeType::from_str(kind) {
                Ok(OutcomeType::Scalar) => Ok(ScalarOutcome::new(name).into()),
                Ok(OutcomeType::TimeSeries) => Ok(TimeSeriesOutcome::new(name).into()),
                Err(_) => {
                    let known: Vec<&str> = OutcomeType::ALL.iter().map(|t| t.as_ref()).collect();
                    Err(OutcomeError::UnknownType {
                        name: name.to_owned(),
                        kind: kind.to_owned(),
                        suggestion: find_similar(kind, &known).map(str::to_owned),
                    })
                }
            }
        })
        .collect()
}

//! Error taxonomy for grid ingestion, configuration and per-object teardown.
//!
//! Fatal conditions are `thiserror` enums returned through `Result`. Row-level
//! warnings never escalate: they are plain values that are logged and kept in
//! the [`DiagnosticCatalog`] of the object being built.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems reading a grid file.
#[derive(Debug, Error)]
pub enum GridError {
    /// The grid file could not be opened.
    #[error("Error opening grid file {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The underlying stream failed while reading a line.
    #[error("Error reading grid file at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    /// The header is missing required columns, repeats a column or names
    /// columns outside the vocabulary.
    #[error("Invalid grid file header at line {line}: {}", join_problems(.problems))]
    HeaderStructure {
        line: usize,
        problems: Vec<HeaderProblem>,
    },

    /// A data field could not be accepted. Reading stops at this row.
    #[error("Invalid grid data at line {line}, column {column}: {kind} ('{token}')")]
    RowData {
        line: usize,
        column: &'static str,
        token: String,
        kind: RowDataErrorKind,
    },
}

impl GridError {
    /// Line number the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::FileAccess { .. } => None,
            Self::Read { line, .. }
            | Self::HeaderStructure { line, .. }
            | Self::RowData { line, .. } => Some(*line),
        }
    }
}

fn join_problems(problems: &[HeaderProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One diagnostic raised while validating a grid header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderProblem {
    #[error("missing column {0}")]
    Missing(&'static str),

    #[error("duplicate column {0}")]
    Duplicate(&'static str),

    /// None of a set of alternative columns is present.
    #[error("missing one of {{{}}}", .0.join(", "))]
    MissingOneOf(&'static [&'static str]),

    #[error("unknown column '{0}'")]
    Unknown(String),

    /// An empty name between two delimiters (1-based position).
    #[error("empty column name at position {0}")]
    EmptyColumn(usize),
}

/// Why a grid field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RowDataErrorKind {
    #[error("value is not a number")]
    NotNumeric,

    #[error("value must not be negative")]
    Negative,
}

/// Non-fatal observations made while reading a grid row.
#[derive(Debug, Clone, PartialEq)]
pub enum GridWarning {
    /// An empty field was replaced by a default value.
    EmptyField {
        line: usize,
        column: &'static str,
        value: f64,
    },
    /// The metallicity was taken from the configuration.
    DefaultMetallicity { line: usize, value: f64 },
    /// The row ended before this header column; a default was used.
    MissingTrailingColumn {
        line: usize,
        column: &'static str,
        value: f64,
    },
    /// A field beyond the header width was ignored (1-based position).
    ExtraColumn { line: usize, position: usize },
    /// The separation was derived from the orbital period.
    SeparationFromPeriod {
        line: usize,
        period: f64,
        separation: f64,
    },
}

impl GridWarning {
    pub fn line(&self) -> usize {
        match self {
            Self::EmptyField { line, .. }
            | Self::DefaultMetallicity { line, .. }
            | Self::MissingTrailingColumn { line, .. }
            | Self::ExtraColumn { line, .. }
            | Self::SeparationFromPeriod { line, .. } => *line,
        }
    }
}

impl fmt::Display for GridWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField {
                line,
                column,
                value,
            } => write!(f, "Missing data for {column} at line {line}: {value} used"),
            Self::DefaultMetallicity { line, value } => {
                write!(f, "Using default metallicity {value} at line {line}")
            }
            Self::MissingTrailingColumn {
                line,
                column,
                value,
            } => write!(f, "Row ends before column {column} at line {line}: {value} used"),
            Self::ExtraColumn { line, position } => {
                write!(f, "Extra column {position} at line {line} ignored")
            }
            Self::SeparationFromPeriod {
                line,
                period,
                separation,
            } => write!(
                f,
                "Separation {separation} AU derived from period {period} days at line {line}"
            ),
        }
    }
}

/// The per-object detailed output file could not be closed.
#[derive(Debug, Error)]
pub enum TeardownError {
    #[error("Failed to close detailed output file for object {index}: {source}")]
    OutputClose {
        index: usize,
        #[source]
        source: io::Error,
    },
}

/// Errors loading or validating a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Transient diagnostics raised while one object is built and evolved.
///
/// The population loop cleans the catalog at the end of every iteration so
/// that diagnostics never leak from one object into the next.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCatalog {
    entries: Vec<String>,
}

impl DiagnosticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic. A message already recorded for this object is
    /// kept once.
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.entries.contains(&message) {
            self.entries.push(message);
        }
    }

    pub fn extend_from_warnings(&mut self, warnings: &[GridWarning]) {
        for warning in warnings {
            self.push(warning.to_string());
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clean(&mut self) {
        self.entries.clear();
    }
}

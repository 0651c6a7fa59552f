//! Header-driven grid reader.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::marker::PhantomData;
use std::path::Path;

use tracing::{debug, error, info, warn};

use super::header::{Column, GridHeaderSet, HeaderLayout, HeaderScan, scan_header};
use super::record::{LineSource, Record, split_fields};
use super::row::ColumnValues;
use super::schema::{GridContext, GridSchema, HeaderDecision};
use crate::errors::{GridError, GridWarning, RowDataErrorKind};

/// Reads rows of schema `S` from a grid file, one row per call.
///
/// The header is validated when the reader is opened. After the first fatal
/// row error, or once the file is exhausted, the reader is closed and every
/// further call to [`GridReader::read_record`] returns `Ok(None)`.
#[derive(Debug)]
pub struct GridReader<S: GridSchema, R = BufReader<File>> {
    source: Option<LineSource<R>>,
    header: GridHeaderSet,
    layout: HeaderLayout,
    context: GridContext,
    warnings: Vec<GridWarning>,
    rows_read: usize,
    schema: PhantomData<S>,
}

impl<S: GridSchema> GridReader<S> {
    /// Open the grid file at `path` and validate its header.
    pub fn open(path: impl AsRef<Path>, context: GridContext) -> Result<Self, GridError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| GridError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), schema = S::NAME, "Opened grid file");
        Self::from_reader(BufReader::new(file), context)
    }
}

impl<S: GridSchema, R: BufRead + Seek> GridReader<S, R> {
    /// Wrap an already open stream and validate its header.
    pub fn from_reader(reader: R, context: GridContext) -> Result<Self, GridError> {
        let mut source =
            LineSource::new(reader).map_err(|source| GridError::Read { line: 1, source })?;

        let candidate = source.next_record().map_err(|e| GridError::Read {
            line: source.next_line_number(),
            source: e,
        })?;
        let scan = match &candidate {
            Some(record) => scan_header(&record.text, record.line, S::VOCABULARY),
            None => HeaderScan::empty(source.next_line_number()),
        };

        let (header, layout) = match S::decide(&scan) {
            HeaderDecision::Present(header) => (header, HeaderLayout::Present),
            HeaderDecision::Absent(header) => {
                if let Some(record) = &candidate {
                    source
                        .restore(record.checkpoint)
                        .map_err(|source| GridError::Read {
                            line: record.line,
                            source,
                        })?;
                }
                debug!(line = scan.line, "No grid header found, reading one mass per line");
                (header, HeaderLayout::Absent)
            }
            HeaderDecision::Invalid(problems) => {
                for problem in &problems {
                    error!(line = scan.line, schema = S::NAME, "Grid header: {problem}");
                }
                return Err(GridError::HeaderStructure {
                    line: scan.line,
                    problems,
                });
            }
        };

        Ok(Self {
            source: Some(source),
            header,
            layout,
            context,
            warnings: Vec::new(),
            rows_read: 0,
            schema: PhantomData,
        })
    }

    pub fn header(&self) -> &GridHeaderSet {
        &self.header
    }

    pub fn layout(&self) -> HeaderLayout {
        self.layout
    }

    /// Rows returned so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Whether the reader has stopped (end of grid or fatal error).
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Line number of the next physical line, `None` once closed.
    pub fn next_line_number(&self) -> Option<usize> {
        self.source.as_ref().map(LineSource::next_line_number)
    }

    /// Warnings raised by the most recent call to `read_record`.
    pub fn warnings(&self) -> &[GridWarning] {
        &self.warnings
    }

    /// Read the next row.
    ///
    /// `Ok(None)` means the grid is exhausted; an `Err` means the grid became
    /// unusable at that row. Both close the reader.
    pub fn read_record(&mut self) -> Result<Option<S::Row>, GridError> {
        self.warnings.clear();
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };

        let record = match source.next_record() {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.source = None;
                return Ok(None);
            }
            Err(e) => {
                let line = source.next_line_number();
                self.source = None;
                return Err(GridError::Read { line, source: e });
            }
        };

        match self.parse_row(&record) {
            Ok(row) => {
                self.rows_read += 1;
                Ok(Some(row))
            }
            Err(e) => {
                error!(line = record.line, "{e}");
                self.source = None;
                Err(e)
            }
        }
    }

    fn parse_row(&mut self, record: &Record) -> Result<S::Row, GridError> {
        let line = record.line;
        let fields = split_fields(&record.text);
        let columns = self.header.columns();
        let mut values = ColumnValues::default();

        for (position, token) in fields.iter().enumerate() {
            let Some(&column) = columns.get(position) else {
                self.warnings.push(GridWarning::ExtraColumn {
                    line,
                    position: position + 1,
                });
                continue;
            };

            if token.is_empty() {
                let (value, warning) = S::empty_default(column, &self.context, line);
                self.warnings.push(warning);
                values.set_default(column, value);
            } else {
                values.set(column, parse_field(token, column, line)?);
            }
        }

        for &column in columns.iter().skip(fields.len()) {
            let (value, _) = S::empty_default(column, &self.context, line);
            self.warnings.push(GridWarning::MissingTrailingColumn {
                line,
                column: column.name(),
                value,
            });
            values.set_default(column, value);
        }

        let row = S::assemble(&values, &self.header, &self.context, line, &mut self.warnings);
        for warning in &self.warnings {
            log_warning(warning);
        }
        Ok(row)
    }
}

fn parse_field(token: &str, column: Column, line: usize) -> Result<f64, GridError> {
    let fail = |kind| GridError::RowData {
        line,
        column: column.name(),
        token: token.to_string(),
        kind,
    };
    let value: f64 = token.parse().map_err(|_| fail(RowDataErrorKind::NotNumeric))?;
    if !value.is_finite() {
        return Err(fail(RowDataErrorKind::NotNumeric));
    }
    if column.rejects_negative() && value < 0.0 {
        return Err(fail(RowDataErrorKind::Negative));
    }
    Ok(value)
}

fn log_warning(warning: &GridWarning) {
    match warning {
        GridWarning::SeparationFromPeriod { .. } => debug!(line = warning.line(), "{warning}"),
        _ => warn!(line = warning.line(), "{warning}"),
    }
}

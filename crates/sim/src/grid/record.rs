//! Line normalization and delimited-field splitting shared by both grid
//! schemas.

use std::io::{self, BufRead, Seek, SeekFrom};

/// Marker that starts a comment running to the end of the line.
pub const COMMENT_MARKER: char = '#';
/// Field delimiter.
pub const DELIMITER: char = ',';

fn is_padding(c: char) -> bool {
    matches!(c, ' ' | '\r' | '\n')
}

/// Normalize one raw line: drop everything from the first `#`, turn tabs
/// into spaces and trim surrounding spaces, CR and LF.
///
/// ```
/// use popsynth_sim::grid::normalize_line;
///
/// assert_eq!(normalize_line("\t1.0,\t0.02  # solar-ish\r\n"), "1.0, 0.02");
/// assert_eq!(normalize_line("   # only a comment"), "");
/// ```
pub fn normalize_line(raw: &str) -> String {
    let content = match raw.find(COMMENT_MARKER) {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    content.replace('\t', " ").trim_matches(is_padding).to_string()
}

/// Trim one field the same way a line is trimmed.
pub fn trim_field(field: &str) -> &str {
    field.trim_matches(is_padding)
}

/// Split a normalized record into trimmed fields.
///
/// A trailing delimiter does not open a new (empty) field, but empty fields
/// between delimiters are kept.
///
/// ```
/// use popsynth_sim::grid::split_fields;
///
/// assert_eq!(split_fields("1.0, ,2.0"), vec!["1.0", "", "2.0"]);
/// assert_eq!(split_fields("1.0,"), vec!["1.0"]);
/// assert!(split_fields("").is_empty());
/// ```
pub fn split_fields(record: &str) -> Vec<&str> {
    if record.is_empty() {
        return Vec::new();
    }
    let mut fields: Vec<&str> = record.split(DELIMITER).map(trim_field).collect();
    if record.ends_with(DELIMITER) {
        fields.pop();
    }
    fields
}

/// A restorable read position: byte offset plus the line counter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub offset: u64,
    pub line: usize,
}

/// A non-empty normalized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line number in the file.
    pub line: usize,
    /// Normalized text.
    pub text: String,
    /// Position of the start of this line.
    pub checkpoint: Checkpoint,
}

/// Line-oriented reader that skips empty (or comment-only) lines while still
/// counting them.
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
    offset: u64,
    next_line: usize,
    buffer: String,
}

impl<R: BufRead + Seek> LineSource<R> {
    pub fn new(mut reader: R) -> io::Result<Self> {
        let offset = reader.stream_position()?;
        Ok(Self {
            reader,
            offset,
            next_line: 1,
            buffer: String::new(),
        })
    }

    /// Line number of the next physical line to be read.
    pub fn next_line_number(&self) -> usize {
        self.next_line
    }

    /// Current read position.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            offset: self.offset,
            line: self.next_line,
        }
    }

    /// Move the read cursor back to `checkpoint`.
    pub fn restore(&mut self, checkpoint: Checkpoint) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(checkpoint.offset))?;
        self.offset = checkpoint.offset;
        self.next_line = checkpoint.line;
        Ok(())
    }

    /// Read up to the next non-empty record. `Ok(None)` at end of stream.
    pub fn next_record(&mut self) -> io::Result<Option<Record>> {
        loop {
            let checkpoint = self.checkpoint();
            self.buffer.clear();
            let read = self.reader.read_line(&mut self.buffer)?;
            if read == 0 {
                return Ok(None);
            }
            self.offset += read as u64;
            self.next_line += 1;

            let text = normalize_line(&self.buffer);
            if !text.is_empty() {
                return Ok(Some(Record {
                    line: checkpoint.line,
                    text,
                    checkpoint,
                }));
            }
        }
    }
}

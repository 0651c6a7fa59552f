//! Grid file ingestion.
//!
//! A grid file is a comma separated text file with one set of initial
//! conditions per line. The first non-empty line is a header naming the
//! columns (case-insensitive); for single stars the header may be left out
//! entirely, in which case every line holds one mass. `#` starts a comment.
//!
//! ```
//! use std::io::Cursor;
//! use popsynth_sim::grid::{GridContext, GridReader, SingleStarSchema};
//!
//! let data = "MASS, METALLICITY\n1.0, 0.02\n";
//! let context = GridContext { default_metallicity: 0.0142 };
//! let mut reader = GridReader::<SingleStarSchema, _>::from_reader(Cursor::new(data), context)?;
//! let row = reader.read_record()?.expect("one row");
//! assert_eq!(row.mass, 1.0);
//! assert_eq!(row.metallicity, 0.02);
//! # Ok::<(), popsynth_sim::errors::GridError>(())
//! ```

pub mod header;
pub mod reader;
pub mod record;
pub mod row;
pub mod schema;

pub use header::{Column, GridHeaderSet, HeaderLayout};
pub use reader::GridReader;
pub use record::{normalize_line, split_fields};
pub use row::{BinaryRow, KickParameters, SingleStarRow};
pub use schema::{BinaryStarSchema, GridContext, GridSchema, SingleStarSchema};

use anyhow::{Context, Result};
use popsynth_sim::grid::{
    BinaryStarSchema, GridContext, GridReader, GridSchema, HeaderLayout, SingleStarSchema,
};
use popsynth_sim::simulation::DEFAULT_METALLICITY;
use std::path::Path;

use crate::args::SchemaArg;

/// What a pass over a grid file found.
#[derive(Debug, Default)]
pub struct GridCheck {
    pub layout: Option<HeaderLayout>,
    pub columns: Vec<&'static str>,
    pub rows: usize,
    pub warnings: Vec<String>,
}

pub fn validate_grid(path: &Path, schema: SchemaArg, metallicity: Option<f64>) -> Result<()> {
    println!("🔍 Validating grid file: {}", path.display());

    let context = GridContext {
        default_metallicity: metallicity.unwrap_or(DEFAULT_METALLICITY),
    };
    let check = match schema {
        SchemaArg::Single => check_grid::<SingleStarSchema>(path, context),
        SchemaArg::Binary => check_grid::<BinaryStarSchema>(path, context),
    }?;

    let layout = match check.layout {
        Some(HeaderLayout::Absent) => "absent (one mass per line)",
        _ => "present",
    };
    println!("  • Schema: {}", schema_name(schema));
    println!("  • Header: {layout}");
    println!("  • Columns: {}", check.columns.join(", "));
    println!("  • Rows: {}", check.rows);
    println!("  • Warnings: {}", check.warnings.len());
    for warning in &check.warnings {
        println!("    - {warning}");
    }
    println!("\n✓ Grid file is valid");
    Ok(())
}

fn check_grid<S: GridSchema>(path: &Path, context: GridContext) -> Result<GridCheck> {
    let mut reader = GridReader::<S>::open(path, context)
        .with_context(|| format!("Grid file {} is not usable", path.display()))?;
    let mut check = GridCheck {
        layout: Some(reader.layout()),
        columns: reader.header().names(),
        ..GridCheck::default()
    };

    while reader
        .read_record()
        .with_context(|| format!("Grid file {} is not usable", path.display()))?
        .is_some()
    {
        check.rows += 1;
        check
            .warnings
            .extend(reader.warnings().iter().map(ToString::to_string));
    }
    Ok(check)
}

fn schema_name(schema: SchemaArg) -> &'static str {
    match schema {
        SchemaArg::Single => "single star",
        SchemaArg::Binary => "binary star",
    }
}

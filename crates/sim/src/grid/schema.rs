//! The two grid schemas: how a header is validated, how empty fields are
//! defaulted and how parsed values become a typed row.

use std::fmt::Debug;

use super::header::{
    BINARY_STAR_COLUMNS, Column, GridHeaderSet, HeaderScan, KICK_COLUMNS, SINGLE_STAR_COLUMNS,
};
use super::row::{BinaryRow, ColumnValues, KickParameters, SingleStarRow};
use crate::base::period_days_to_separation_au;
use crate::errors::{GridWarning, HeaderProblem};

/// Values from the run configuration that grid reading depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridContext {
    pub default_metallicity: f64,
}

/// Outcome of validating a header candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderDecision {
    Present(GridHeaderSet),
    /// The candidate line is data; read it again under this header.
    Absent(GridHeaderSet),
    Invalid(Vec<HeaderProblem>),
}

/// A grid file layout.
pub trait GridSchema {
    type Row: Clone + Debug;

    /// Human readable schema name for logs.
    const NAME: &'static str;

    /// Column names this schema accepts in a header.
    const VOCABULARY: &'static [Column];

    /// Validate the first non-empty line of a grid file.
    fn decide(scan: &HeaderScan) -> HeaderDecision;

    /// Value substituted for an empty or missing field, with the warning to
    /// raise for it.
    fn empty_default(column: Column, context: &GridContext, line: usize) -> (f64, GridWarning);

    /// Build a typed row once every header column has a value.
    fn assemble(
        values: &ColumnValues,
        header: &GridHeaderSet,
        context: &GridContext,
        line: usize,
        warnings: &mut Vec<GridWarning>,
    ) -> Self::Row;
}

fn require_once(scan: &HeaderScan, column: Column, problems: &mut Vec<HeaderProblem>) {
    match scan.count(column) {
        0 => problems.push(HeaderProblem::Missing(column.name())),
        1 => {}
        _ => problems.push(HeaderProblem::Duplicate(column.name())),
    }
}

fn at_most_once(scan: &HeaderScan, column: Column, problems: &mut Vec<HeaderProblem>) {
    if scan.count(column) > 1 {
        problems.push(HeaderProblem::Duplicate(column.name()));
    }
}

fn token_problems(scan: &HeaderScan, problems: &mut Vec<HeaderProblem>) {
    problems.extend(scan.unknown.iter().cloned().map(HeaderProblem::Unknown));
    problems.extend(scan.empty.iter().copied().map(HeaderProblem::EmptyColumn));
}

/// One star per row: `MASS` and an optional `METALLICITY`. The header is
/// optional; a headerless file holds one mass per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleStarSchema;

impl GridSchema for SingleStarSchema {
    type Row = SingleStarRow;

    const NAME: &'static str = "single star";
    const VOCABULARY: &'static [Column] = &SINGLE_STAR_COLUMNS;

    fn decide(scan: &HeaderScan) -> HeaderDecision {
        let mut problems = Vec::new();
        require_once(scan, Column::Mass, &mut problems);
        at_most_once(scan, Column::Metallicity, &mut problems);
        token_problems(scan, &mut problems);

        if problems.is_empty() {
            return HeaderDecision::Present(GridHeaderSet::new(scan.columns.clone()));
        }
        if scan.tokens <= 1 && scan.columns.is_empty() {
            return HeaderDecision::Absent(GridHeaderSet::new(vec![Column::Mass]));
        }
        HeaderDecision::Invalid(problems)
    }

    fn empty_default(column: Column, context: &GridContext, line: usize) -> (f64, GridWarning) {
        match column {
            Column::Metallicity => {
                let value = context.default_metallicity;
                (value, GridWarning::DefaultMetallicity { line, value })
            }
            _ => (
                0.0,
                GridWarning::EmptyField {
                    line,
                    column: column.name(),
                    value: 0.0,
                },
            ),
        }
    }

    fn assemble(
        values: &ColumnValues,
        _header: &GridHeaderSet,
        context: &GridContext,
        _line: usize,
        _warnings: &mut Vec<GridWarning>,
    ) -> SingleStarRow {
        SingleStarRow {
            mass: values.value(Column::Mass),
            metallicity: values
                .get(Column::Metallicity)
                .unwrap_or(context.default_metallicity),
        }
    }
}

/// One binary per row. Requires both masses, both metallicities, the
/// eccentricity and either the separation or the period; the kick columns
/// come as a complete group or not at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryStarSchema;

const ORBIT_ALTERNATIVES: &[&str] = &["SEPARATION", "PERIOD"];

impl BinaryStarSchema {
    fn kick(values: &ColumnValues, columns: [Column; 4]) -> KickParameters {
        KickParameters {
            velocity: values.value(columns[0]),
            theta: values.value(columns[1]),
            phi: values.value(columns[2]),
            mean_anomaly: values.value(columns[3]),
        }
    }
}

impl GridSchema for BinaryStarSchema {
    type Row = BinaryRow;

    const NAME: &'static str = "binary star";
    const VOCABULARY: &'static [Column] = &BINARY_STAR_COLUMNS;

    fn decide(scan: &HeaderScan) -> HeaderDecision {
        let mut problems = Vec::new();
        for column in [
            Column::Mass1,
            Column::Mass2,
            Column::Metallicity1,
            Column::Metallicity2,
            Column::Eccentricity,
        ] {
            require_once(scan, column, &mut problems);
        }

        if scan.count(Column::Separation) == 0 && scan.count(Column::Period) == 0 {
            problems.push(HeaderProblem::MissingOneOf(ORBIT_ALTERNATIVES));
        }
        at_most_once(scan, Column::Separation, &mut problems);
        at_most_once(scan, Column::Period, &mut problems);

        if KICK_COLUMNS.iter().any(|&c| scan.count(c) > 0) {
            for column in KICK_COLUMNS {
                require_once(scan, column, &mut problems);
            }
        }
        token_problems(scan, &mut problems);

        if problems.is_empty() {
            HeaderDecision::Present(GridHeaderSet::new(scan.columns.clone()))
        } else {
            HeaderDecision::Invalid(problems)
        }
    }

    fn empty_default(column: Column, _context: &GridContext, line: usize) -> (f64, GridWarning) {
        (
            0.0,
            GridWarning::EmptyField {
                line,
                column: column.name(),
                value: 0.0,
            },
        )
    }

    fn assemble(
        values: &ColumnValues,
        header: &GridHeaderSet,
        _context: &GridContext,
        line: usize,
        warnings: &mut Vec<GridWarning>,
    ) -> BinaryRow {
        let mass_1 = values.value(Column::Mass1);
        let mass_2 = values.value(Column::Mass2);

        // A separation written in the row wins, even 0. Otherwise use the period.
        let separation = match values.parsed(Column::Separation) {
            Some(separation) => separation,
            None => {
                let period = values.value(Column::Period);
                if period > 0.0 && mass_1 > 0.0 && mass_2 > 0.0 {
                    let separation = period_days_to_separation_au(mass_1, mass_2, period);
                    warnings.push(GridWarning::SeparationFromPeriod {
                        line,
                        period,
                        separation,
                    });
                    separation
                } else {
                    0.0
                }
            }
        };

        let (kick_1, kick_2) = if header.has_kicks() {
            (
                Some(Self::kick(
                    values,
                    [
                        Column::KickVelocity1,
                        Column::KickTheta1,
                        Column::KickPhi1,
                        Column::KickMeanAnomaly1,
                    ],
                )),
                Some(Self::kick(
                    values,
                    [
                        Column::KickVelocity2,
                        Column::KickTheta2,
                        Column::KickPhi2,
                        Column::KickMeanAnomaly2,
                    ],
                )),
            )
        } else {
            (None, None)
        };

        BinaryRow {
            mass_1,
            mass_2,
            metallicity_1: values.value(Column::Metallicity1),
            metallicity_2: values.value(Column::Metallicity2),
            separation,
            eccentricity: values.value(Column::Eccentricity),
            kick_1,
            kick_2,
        }
    }
}

//! Typed rows produced by the grid readers.

use super::header::Column;

/// Initial conditions of one single star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleStarRow {
    pub mass: f64,
    pub metallicity: f64,
}

/// Natal kick parameters of one star: velocity in km/s, angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KickParameters {
    pub velocity: f64,
    pub theta: f64,
    pub phi: f64,
    pub mean_anomaly: f64,
}

/// Initial conditions of one binary system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryRow {
    pub mass_1: f64,
    pub mass_2: f64,
    pub metallicity_1: f64,
    pub metallicity_2: f64,
    /// Semi-major axis in AU.
    pub separation: f64,
    pub eccentricity: f64,
    pub kick_1: Option<KickParameters>,
    pub kick_2: Option<KickParameters>,
}

impl BinaryRow {
    pub fn total_mass(&self) -> f64 {
        self.mass_1 + self.mass_2
    }
}

/// Field values of one row, indexed by column. Values substituted for empty
/// or missing fields are marked as defaulted.
#[derive(Debug, Clone, Default)]
pub struct ColumnValues {
    values: [Option<f64>; Column::COUNT],
    defaulted: [bool; Column::COUNT],
}

impl ColumnValues {
    /// Store a value read from the row.
    pub fn set(&mut self, column: Column, value: f64) {
        self.values[column.slot()] = Some(value);
        self.defaulted[column.slot()] = false;
    }

    /// Store a value substituted for an empty or missing field.
    pub fn set_default(&mut self, column: Column, value: f64) {
        self.values[column.slot()] = Some(value);
        self.defaulted[column.slot()] = true;
    }

    pub fn get(&self, column: Column) -> Option<f64> {
        self.values[column.slot()]
    }

    /// Value of `column` only when the row actually gave one.
    pub fn parsed(&self, column: Column) -> Option<f64> {
        if self.defaulted[column.slot()] {
            None
        } else {
            self.get(column)
        }
    }

    /// Value of `column`, 0.0 when the row never set it.
    pub fn value(&self, column: Column) -> f64 {
        self.get(column).unwrap_or(0.0)
    }
}

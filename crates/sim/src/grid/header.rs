//! Column vocabulary and header scanning.

use std::collections::HashMap;

/// Every column name either grid schema understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Mass,
    Metallicity,
    Mass1,
    Mass2,
    Metallicity1,
    Metallicity2,
    Separation,
    Eccentricity,
    Period,
    KickVelocity1,
    KickTheta1,
    KickPhi1,
    KickMeanAnomaly1,
    KickVelocity2,
    KickTheta2,
    KickPhi2,
    KickMeanAnomaly2,
}

impl Column {
    pub const COUNT: usize = 17;

    /// Upper-case name as written in a header line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mass => "MASS",
            Self::Metallicity => "METALLICITY",
            Self::Mass1 => "MASS_1",
            Self::Mass2 => "MASS_2",
            Self::Metallicity1 => "METALLICITY_1",
            Self::Metallicity2 => "METALLICITY_2",
            Self::Separation => "SEPARATION",
            Self::Eccentricity => "ECCENTRICITY",
            Self::Period => "PERIOD",
            Self::KickVelocity1 => "KICK_VELOCITY_1",
            Self::KickTheta1 => "KICK_THETA_1",
            Self::KickPhi1 => "KICK_PHI_1",
            Self::KickMeanAnomaly1 => "KICK_MEAN_ANOMALY_1",
            Self::KickVelocity2 => "KICK_VELOCITY_2",
            Self::KickTheta2 => "KICK_THETA_2",
            Self::KickPhi2 => "KICK_PHI_2",
            Self::KickMeanAnomaly2 => "KICK_MEAN_ANOMALY_2",
        }
    }

    /// Negative values in these columns make the grid unusable.
    pub const fn rejects_negative(self) -> bool {
        matches!(
            self,
            Self::Mass
                | Self::Metallicity
                | Self::Mass1
                | Self::Mass2
                | Self::Metallicity1
                | Self::Metallicity2
                | Self::Separation
                | Self::Eccentricity
        )
    }

    pub const fn is_kick(self) -> bool {
        matches!(
            self,
            Self::KickVelocity1
                | Self::KickTheta1
                | Self::KickPhi1
                | Self::KickMeanAnomaly1
                | Self::KickVelocity2
                | Self::KickTheta2
                | Self::KickPhi2
                | Self::KickMeanAnomaly2
        )
    }

    pub(crate) const fn slot(self) -> usize {
        self as usize
    }

    /// Look `token` up in `vocabulary`. The token is expected upper-cased.
    pub fn from_token(token: &str, vocabulary: &[Column]) -> Option<Column> {
        vocabulary.iter().copied().find(|c| c.name() == token)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub const SINGLE_STAR_COLUMNS: [Column; 2] = [Column::Mass, Column::Metallicity];

pub const KICK_COLUMNS: [Column; 8] = [
    Column::KickVelocity1,
    Column::KickTheta1,
    Column::KickPhi1,
    Column::KickMeanAnomaly1,
    Column::KickVelocity2,
    Column::KickTheta2,
    Column::KickPhi2,
    Column::KickMeanAnomaly2,
];

pub const BINARY_STAR_COLUMNS: [Column; 15] = [
    Column::Mass1,
    Column::Mass2,
    Column::Metallicity1,
    Column::Metallicity2,
    Column::Separation,
    Column::Eccentricity,
    Column::Period,
    Column::KickVelocity1,
    Column::KickTheta1,
    Column::KickPhi1,
    Column::KickMeanAnomaly1,
    Column::KickVelocity2,
    Column::KickTheta2,
    Column::KickPhi2,
    Column::KickMeanAnomaly2,
];

/// Ordered, validated header columns of one grid file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridHeaderSet {
    columns: Vec<Column>,
}

impl GridHeaderSet {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn has_kicks(&self) -> bool {
        self.columns.iter().any(|c| c.is_kick())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name()).collect()
    }
}

/// Whether the first non-empty line of the file was a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLayout {
    Present,
    /// No header; the first line was data and has been re-queued.
    Absent,
}

/// Census of a header candidate line.
#[derive(Debug, Clone, Default)]
pub struct HeaderScan {
    /// Line the candidate came from (or the line after EOF for an empty file).
    pub line: usize,
    /// Number of comma separated tokens on the line.
    pub tokens: usize,
    /// Recognized columns in file order.
    pub columns: Vec<Column>,
    counts: HashMap<Column, usize>,
    /// Tokens that are not part of the vocabulary.
    pub unknown: Vec<String>,
    /// 1-based positions of empty tokens.
    pub empty: Vec<usize>,
}

impl HeaderScan {
    /// Scan for a file with no non-empty line at all.
    pub fn empty(line: usize) -> Self {
        Self {
            line,
            ..Self::default()
        }
    }

    pub fn count(&self, column: Column) -> usize {
        self.counts.get(&column).copied().unwrap_or(0)
    }

    /// Recognized plus unrecognized, non-empty tokens.
    pub fn named_tokens(&self) -> usize {
        self.columns.len() + self.unknown.len()
    }

    pub fn is_clean(&self) -> bool {
        self.unknown.is_empty() && self.empty.is_empty()
    }
}

/// Upper-case `record`, split it and classify every token against
/// `vocabulary`.
pub fn scan_header(record: &str, line: usize, vocabulary: &[Column]) -> HeaderScan {
    let upper = record.to_uppercase();
    let tokens = super::record::split_fields(&upper);

    let mut scan = HeaderScan::empty(line);
    scan.tokens = tokens.len();
    for (position, token) in tokens.iter().enumerate() {
        if token.is_empty() {
            scan.empty.push(position + 1);
            continue;
        }
        match Column::from_token(token, vocabulary) {
            Some(column) => {
                scan.columns.push(column);
                *scan.counts.entry(column).or_insert(0) += 1;
            }
            None => scan.unknown.push((*token).to_string()),
        }
    }
    scan
}

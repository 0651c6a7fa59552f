use clap::{Args, ValueEnum};
use popsynth_sim::simulation::RunMode;
use std::path::PathBuf;

use crate::defaults;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Single,
    Binary,
}

impl From<ModeArg> for RunMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Single => RunMode::Single,
            ModeArg::Binary => RunMode::Binary,
        }
    }
}

/// Which column vocabulary a grid file is checked against.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaArg {
    Single,
    Binary,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Configuration file to write
    #[arg(short, long, default_value = defaults::CONFIG_FILE)]
    pub output: PathBuf,

    /// Population type the configuration runs by default
    #[arg(long, value_enum, default_value = "binary")]
    pub mode: ModeArg,

    /// Grid file to read initial conditions from
    #[arg(long)]
    pub grid: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Options shared by the `single` and `binary` commands. Every option
/// overrides the value loaded from `--config`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Configuration file (JSON, see `popsynth init`)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Grid file with one set of initial conditions per line
    #[arg(short, long)]
    pub grid: Option<PathBuf>,

    /// Metallicity used where the grid or sweep does not give one
    #[arg(short = 'z', long)]
    pub metallicity: Option<f64>,

    /// Base random seed; object `i` is evolved with seed + i
    #[arg(long)]
    pub seed: Option<u64>,

    /// Suppress banners and per-object status lines
    #[arg(short, long)]
    pub quiet: bool,

    /// Directory for summary.csv and per-object detailed files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Skip the per-object detailed files
    #[arg(long)]
    pub no_detailed: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Smallest mass of the single-star sweep (Msol)
    #[arg(long)]
    pub mass_min: Option<f64>,

    /// Upper bound of the single-star sweep (Msol, exclusive)
    #[arg(long)]
    pub mass_max: Option<f64>,

    /// Number of stars in the single-star sweep
    #[arg(long)]
    pub mass_steps: Option<usize>,

    /// Number of binaries to sample or to repeat the individual system
    #[arg(short = 'n', long)]
    pub number_of_binaries: Option<usize>,

    /// Primary mass of an individual binary (Msol)
    #[arg(long, requires = "mass_2")]
    pub mass_1: Option<f64>,

    /// Secondary mass of an individual binary (Msol)
    #[arg(long, requires = "mass_1")]
    pub mass_2: Option<f64>,

    /// Separation of the individual binary (AU)
    #[arg(long, requires = "mass_1")]
    pub separation: Option<f64>,

    /// Orbital period of the individual binary (days)
    #[arg(long, requires = "mass_1")]
    pub period: Option<f64>,

    /// Eccentricity of the individual binary
    #[arg(long, requires = "mass_1")]
    pub eccentricity: Option<f64>,

    /// Stop after the exploratory phase of adaptive importance sampling
    #[arg(long)]
    pub ais_exploratory: bool,

    /// Double compact objects to find before the exploratory phase ends
    #[arg(long, requires = "ais_exploratory")]
    pub ais_target_hits: Option<usize>,
}

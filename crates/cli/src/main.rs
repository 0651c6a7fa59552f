mod args;
mod commands;
pub mod defaults;
mod printing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use args::{InitArgs, ModeArg, RunArgs, SchemaArg};
use commands::{init, run, validate};

/// popsynth: stellar and binary population synthesis
///
/// Evolves populations of single stars or binaries whose initial conditions
/// come from a grid file, a mass sweep, one individual system or random
/// sampling, and records how each object ends up.
#[derive(Parser, Debug)]
#[command(name = "popsynth")]
#[command(author, version, about = "Stellar and binary population synthesis", long_about = None)]
struct Cli {
    /// Log filter (e.g. "info", "popsynth_sim=debug"); overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(InitArgs),

    /// Evolve a population of single stars.
    ///
    /// Masses come from the grid file when one is given, otherwise from
    /// the mass sweep.
    Single(Box<RunArgs>),

    /// Evolve a population of binaries.
    ///
    /// Initial conditions come from the grid file, the individual system
    /// given by --mass-1/--mass-2, or random sampling, in that order.
    Binary(Box<RunArgs>),

    /// Check a grid file without evolving anything.
    ValidateGrid {
        /// Grid file to check
        grid: PathBuf,

        /// Column vocabulary to check against
        #[arg(long, value_enum, default_value = "binary")]
        schema: SchemaArg,

        /// Metallicity reported for rows that leave it empty
        #[arg(short = 'z', long)]
        metallicity: Option<f64>,
    },
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| defaults::LOG_FILTER.into()),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let status = match cli.command {
        Commands::Init(args) => {
            init::init_configuration(&args)?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Single(args) => run::run_population(ModeArg::Single.into(), &args)?,
        Commands::Binary(args) => run::run_population(ModeArg::Binary.into(), &args)?,
        Commands::ValidateGrid {
            grid,
            schema,
            metallicity,
        } => {
            validate::validate_grid(&grid, schema, metallicity)?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    if status.is_failure() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

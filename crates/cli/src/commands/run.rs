use anyhow::{Context, Result};
use popsynth_sim::prelude::*;
use popsynth_sim::simulation::{AisConfig, IndividualSystem};
use tracing::warn;

use crate::args::RunArgs;
use crate::printing::{ConsoleChannel, print_parameters, print_run_end, print_run_start};

/// Load the configuration, apply command-line overrides and evolve the
/// population. Returns the terminal status of the run.
pub fn run_population(mode: RunMode, args: &RunArgs) -> Result<EvolutionStatus> {
    let mut config = match &args.config {
        Some(path) => Configuration::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Configuration::default(),
    };
    config.mode = mode;
    apply_overrides(&mut config, args);
    config.validate().context("Invalid configuration")?;

    if !config.quiet {
        println!("🌟 popsynth - Evolving {}", population_name(mode));
        println!("============================================");
        print_parameters(&config);
    }

    let mut channel = ConsoleChannel::new(args.progress, expected_objects(&config));
    let summary = match config.output.directory.clone() {
        Some(directory) => {
            let output = CsvOutput::create(&directory, config.output.detailed)
                .with_context(|| format!("Failed to create output directory {}", directory.display()))?;
            execute(config, output, &mut channel)
        }
        None => execute(config, NullOutput, &mut channel),
    };
    channel.finish();
    if summary.status.is_failure() {
        warn!(status = %summary.status, objects = summary.objects_evolved, "Run ended early");
    }
    Ok(summary.status)
}

fn execute<O: OutputSink>(config: Configuration, output: O, channel: &mut ConsoleChannel) -> RunSummary {
    let quiet = config.quiet;
    let mut sim = Simulation::new(config, EndpointEngine, output);
    if !quiet {
        print_run_start(sim.base_seed());
    }
    let summary = sim.run(channel);
    if !quiet {
        print_run_end(&summary);
    }
    summary
}

fn apply_overrides(config: &mut Configuration, args: &RunArgs) {
    if let Some(grid) = &args.grid {
        config.grid_file = Some(grid.clone());
    }
    if let Some(metallicity) = args.metallicity {
        config.metallicity = metallicity;
    }
    if args.seed.is_some() {
        config.random_seed = args.seed;
    }
    config.quiet |= args.quiet;
    if let Some(directory) = &args.output_dir {
        config.output.directory = Some(directory.clone());
    }
    if args.no_detailed {
        config.output.detailed = false;
    }

    let sweep = &mut config.single_star;
    if let Some(mass_min) = args.mass_min {
        sweep.mass_min = mass_min;
    }
    if let Some(mass_max) = args.mass_max {
        sweep.mass_max = mass_max;
    }
    if let Some(steps) = args.mass_steps {
        sweep.mass_steps = steps;
    }

    if let Some(n) = args.number_of_binaries {
        config.binary.n_binaries = n;
    }
    if let (Some(mass_1), Some(mass_2)) = (args.mass_1, args.mass_2) {
        config.binary.individual = Some(IndividualSystem {
            mass_1,
            mass_2,
            metallicity_1: None,
            metallicity_2: None,
            separation: args.separation,
            period: args.period,
            eccentricity: args.eccentricity.unwrap_or(0.0),
        });
    }

    if args.ais_exploratory {
        config.ais = AisConfig {
            exploratory: true,
            target_hits: args.ais_target_hits.unwrap_or(config.ais.target_hits),
        };
    }
}

/// Number of objects the run will evolve, when known up front.
fn expected_objects(config: &Configuration) -> Option<u64> {
    if config.grid_file.is_some() {
        return None;
    }
    match config.mode {
        RunMode::Single => Some(config.single_star.mass_steps as u64),
        RunMode::Binary => Some(config.binary.n_binaries as u64),
    }
}

fn population_name(mode: RunMode) -> &'static str {
    match mode {
        RunMode::Single => "Single Stars",
        RunMode::Binary => "Binaries",
    }
}

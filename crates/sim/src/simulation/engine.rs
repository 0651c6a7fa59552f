//! Population evolution loop.
//!
//! One iteration per object: derive the seed, obtain the initial conditions
//! (grid row, sweep point, individual system or random sample), construct
//! the object, evolve it, report it and tear down its output. At most one
//! object is alive at any time.

use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use super::ais::{AdaptiveSampler, sampler_from_config};
use super::configs::{Configuration, RunMode, SweepConfig};
use super::report::{BinaryReport, ObjectReport, StarReport, StatusChannel};
use super::sampling::BinarySampler;
use super::seed::RandomService;
use crate::errors::DiagnosticCatalog;
use crate::grid::{BinaryRow, BinaryStarSchema, GridReader, SingleStarSchema};
use crate::stellar::{EvolutionEngine, EvolutionStatus, EvolvableBinary, EvolvableStar, PhaseRecord};
use crate::storage::OutputSink;

/// Result of a population run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub status: EvolutionStatus,
    pub objects_evolved: usize,
    pub base_seed: u64,
    pub wall_time: Duration,
}

enum StarSource {
    Grid(GridReader<SingleStarSchema>),
    Sweep(SweepConfig),
}

enum BinarySource {
    Grid(GridReader<BinaryStarSchema>),
    Individual(BinaryRow),
    Sampled(BinarySampler),
}

/// Outcome of fetching the initial conditions for one iteration.
enum Next<T> {
    Object(T),
    /// The grid is exhausted.
    Exhausted,
    /// The grid became unusable.
    Failed,
}

/// Drives a population of stars or binaries through an evolution engine.
pub struct Simulation<E: EvolutionEngine, O: OutputSink> {
    config: Configuration,
    engine: E,
    output: O,
    random: RandomService,
    sampler: Box<dyn AdaptiveSampler>,
    catalog: DiagnosticCatalog,
}

impl<E: EvolutionEngine, O: OutputSink> Simulation<E, O> {
    pub fn new(config: Configuration, engine: E, output: O) -> Self {
        let random = RandomService::from_seed_option(config.random_seed);
        let sampler = sampler_from_config(&config.ais);
        Self {
            config,
            engine,
            output,
            random,
            sampler,
            catalog: DiagnosticCatalog::new(),
        }
    }

    /// Replace the adaptive sampler chosen from the configuration.
    pub fn with_sampler(mut self, sampler: Box<dyn AdaptiveSampler>) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    pub fn base_seed(&self) -> u64 {
        self.random.base_seed()
    }

    /// Diagnostics of the object being processed; empty between iterations.
    pub fn catalog(&self) -> &DiagnosticCatalog {
        &self.catalog
    }

    /// Run the population selected by the configured mode.
    pub fn run<C: StatusChannel + ?Sized>(&mut self, channel: &mut C) -> RunSummary {
        match self.config.mode {
            RunMode::Single => self.run_single_stars(channel),
            RunMode::Binary => self.run_binaries(channel),
        }
    }

    /// Evolve single stars from the grid file or the mass sweep.
    pub fn run_single_stars<C: StatusChannel + ?Sized>(&mut self, channel: &mut C) -> RunSummary {
        let start = Instant::now();
        info!(base_seed = self.random.base_seed(), "Evolving single stars");

        let mut source = match &self.config.grid_file {
            Some(path) => match GridReader::open(path, self.config.grid_context()) {
                Ok(reader) => StarSource::Grid(reader),
                Err(e) => {
                    error!("{e}");
                    return self.finish(EvolutionStatus::Error, 0, start);
                }
            },
            None => StarSource::Sweep(self.config.single_star.clone()),
        };

        let mut n_stars = match &source {
            StarSource::Grid(_) => 1,
            StarSource::Sweep(sweep) => sweep.mass_steps,
        };
        let mut status = EvolutionStatus::Continue;
        let mut evolved = 0;
        let mut index = 0;

        while status == EvolutionStatus::Continue && index < n_stars {
            let random_seed = self.random.seed(self.random.seed_for(index));

            let next = match &mut source {
                StarSource::Grid(reader) => match reader.read_record() {
                    Ok(Some(row)) => {
                        self.catalog.extend_from_warnings(reader.warnings());
                        n_stars += 1;
                        Next::Object((row.mass, row.metallicity))
                    }
                    Ok(None) => Next::Exhausted,
                    Err(_) => Next::Failed,
                },
                StarSource::Sweep(sweep) => {
                    Next::Object((sweep.mass_at(index), self.config.metallicity))
                }
            };
            let (mass, metallicity) = match next {
                Next::Object(initial) => initial,
                Next::Exhausted => {
                    status = EvolutionStatus::Done;
                    break;
                }
                Next::Failed => {
                    status = EvolutionStatus::Stopped;
                    break;
                }
            };

            let mut star = self.engine.new_star(random_seed, mass, metallicity);
            self.open_detailed(index);
            let outcome = star.evolve(index);
            evolved += 1;

            let report = ObjectReport::Star(StarReport {
                index,
                random_seed,
                initial_mass: mass,
                metallicity: star.metallicity(),
                initial_type: star.initial_type(),
                stellar_type: star.stellar_type(),
                status: outcome,
                diagnostics: self.catalog.entries().to_vec(),
            });
            self.record(star.history(), &report, channel);

            if !self.teardown(index) {
                status = EvolutionStatus::Stopped;
            }
            index += 1;
        }

        if status == EvolutionStatus::Continue {
            status = EvolutionStatus::Done;
        }
        self.finish(status, evolved, start)
    }

    /// Evolve binaries from the grid file, the individual system or random
    /// samples.
    pub fn run_binaries<C: StatusChannel + ?Sized>(&mut self, channel: &mut C) -> RunSummary {
        let start = Instant::now();
        info!(base_seed = self.random.base_seed(), "Evolving binaries");
        self.sampler.print_settings();

        let mut source = match (&self.config.grid_file, &self.config.binary.individual) {
            (Some(path), _) => match GridReader::open(path, self.config.grid_context()) {
                Ok(reader) => BinarySource::Grid(reader),
                Err(e) => {
                    error!("{e}");
                    return self.finish(EvolutionStatus::Error, 0, start);
                }
            },
            (None, Some(system)) => BinarySource::Individual(system.to_row(self.config.metallicity)),
            (None, None) => BinarySource::Sampled(BinarySampler::new(
                self.config.binary.sampling.clone(),
                self.config.metallicity,
            )),
        };

        let mut n_binaries = match &source {
            BinarySource::Grid(_) => 1,
            _ => self.config.binary.n_binaries,
        };
        let mut status = EvolutionStatus::Continue;
        let mut evolved = 0;
        let mut index = 0;

        while status == EvolutionStatus::Continue && index < n_binaries {
            let random_seed = self.random.seed(self.random.seed_for(index));

            let next = match &mut source {
                BinarySource::Grid(reader) => match reader.read_record() {
                    Ok(Some(row)) => {
                        self.catalog.extend_from_warnings(reader.warnings());
                        n_binaries += 1;
                        Next::Object(row)
                    }
                    Ok(None) => Next::Exhausted,
                    Err(_) => Next::Failed,
                },
                BinarySource::Individual(row) => Next::Object(*row),
                BinarySource::Sampled(sampler) => Next::Object(sampler.sample(self.random.rng_mut())),
            };
            let initial = match next {
                Next::Object(row) => row,
                Next::Exhausted => {
                    status = EvolutionStatus::Done;
                    break;
                }
                Next::Failed => {
                    status = EvolutionStatus::Stopped;
                    break;
                }
            };

            let mut binary = self.engine.new_binary(random_seed, &initial);
            self.open_detailed(index);
            let outcome = binary.evolve(index);
            evolved += 1;

            let report = ObjectReport::Binary(BinaryReport {
                index,
                random_seed,
                status: outcome,
                initial,
                initial_types: binary.initial_types(),
                stellar_types: binary.stellar_types(),
                diagnostics: self.catalog.entries().to_vec(),
            });
            self.record(binary.history(), &report, channel);

            self.sampler.record_outcome(index, outcome);
            let ais_stop = self.sampler.should_stop();
            if ais_stop {
                warn!(
                    index,
                    "Binary simulation stopped: {}",
                    EvolutionStatus::AisExploratory.label()
                );
            }

            if !self.teardown(index) {
                status = EvolutionStatus::Stopped;
            } else if ais_stop {
                status = EvolutionStatus::AisExploratory;
            }
            index += 1;
        }

        if status == EvolutionStatus::Continue {
            status = EvolutionStatus::Done;
        }
        self.finish(status, evolved, start)
    }

    fn open_detailed(&mut self, index: usize) {
        if let Err(e) = self.output.open_detailed(index) {
            warn!(index, error = %e, "Could not open detailed output file");
        }
    }

    fn record<C: StatusChannel + ?Sized>(
        &mut self,
        history: &[PhaseRecord],
        report: &ObjectReport,
        channel: &mut C,
    ) {
        for phase in history {
            if let Err(e) = self.output.write_phase(phase) {
                warn!(index = report.index(), error = %e, "Could not write detailed output");
                break;
            }
        }
        if let Err(e) = self.output.write_summary(report) {
            warn!(index = report.index(), error = %e, "Could not write summary output");
        }
        if !self.config.quiet {
            channel.report(report);
        }
    }

    /// Close the per-object output and clean the diagnostic catalog. Returns
    /// `false` when the run has to stop.
    fn teardown(&mut self, index: usize) -> bool {
        let closed = match self.output.close_detailed(index) {
            Ok(()) => true,
            Err(e) => {
                error!(index, "{e}");
                false
            }
        };
        self.catalog.clean();
        closed
    }

    fn finish(&mut self, status: EvolutionStatus, evolved: usize, start: Instant) -> RunSummary {
        if let Err(e) = self.output.flush() {
            warn!(error = %e, "Could not flush output");
        }
        let summary = RunSummary {
            status,
            objects_evolved: evolved,
            base_seed: self.random.base_seed(),
            wall_time: start.elapsed(),
        };
        info!(
            status = status.label(),
            objects = evolved,
            elapsed_ms = summary.wall_time.as_millis() as u64,
            "Run finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TeardownError;
    use crate::simulation::ais::ExploratoryPhase;
    use crate::simulation::configs::IndividualSystem;
    use crate::stellar::{EndpointEngine, StellarType};
    use crate::storage::NullOutput;
    use approx::assert_relative_eq;
    use std::io::{self, Write};
    use tempfile::NamedTempFile;

    fn grid_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn stars(reports: &[ObjectReport]) -> Vec<&StarReport> {
        reports
            .iter()
            .filter_map(|r| match r {
                ObjectReport::Star(s) => Some(s),
                ObjectReport::Binary(_) => None,
            })
            .collect()
    }

    /// Output whose close fails for one object.
    #[derive(Default)]
    struct FailingClose {
        fail_at: usize,
        closed: Vec<usize>,
    }

    impl OutputSink for FailingClose {
        fn open_detailed(&mut self, _index: usize) -> io::Result<()> {
            Ok(())
        }

        fn write_phase(&mut self, _record: &PhaseRecord) -> io::Result<()> {
            Ok(())
        }

        fn write_summary(&mut self, _report: &ObjectReport) -> io::Result<()> {
            Ok(())
        }

        fn close_detailed(&mut self, index: usize) -> Result<(), TeardownError> {
            self.closed.push(index);
            if index == self.fail_at {
                return Err(TeardownError::OutputClose {
                    index,
                    source: io::Error::other("disk full"),
                });
            }
            Ok(())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn single_config() -> Configuration {
        Configuration {
            mode: RunMode::Single,
            random_seed: Some(100),
            ..Configuration::default()
        }
    }

    #[test]
    fn test_sweep_masses_and_seeds() {
        let mut config = single_config();
        config.single_star = SweepConfig {
            mass_min: 1.0,
            mass_max: 3.0,
            mass_steps: 3,
        };
        let mut sim = Simulation::new(config, EndpointEngine, NullOutput);
        let mut reports = Vec::new();
        let summary = sim.run(&mut reports);

        assert_eq!(summary.status, EvolutionStatus::Done);
        assert_eq!(summary.objects_evolved, 3);
        let stars = stars(&reports);
        assert_eq!(stars.len(), 3);
        for (i, (star, mass)) in stars.iter().zip([1.0, 1.0 + 2.0 / 3.0, 1.0 + 4.0 / 3.0]).enumerate() {
            assert_relative_eq!(star.initial_mass, mass, max_relative = 1e-12);
            assert_eq!(star.metallicity, 0.0142);
            assert_eq!(star.random_seed, 100 + i as u64);
        }
    }

    #[test]
    fn test_single_grid_runs_until_exhausted() {
        let grid = grid_file("MASS\n1.0\n,\n2.0\n");
        let mut config = single_config();
        config.grid_file = Some(grid.path().to_path_buf());

        let mut sim = Simulation::new(config, EndpointEngine, NullOutput);
        let mut reports = Vec::new();
        let summary = sim.run(&mut reports);

        assert_eq!(summary.status, EvolutionStatus::Done);
        let masses: Vec<f64> = stars(&reports).iter().map(|s| s.initial_mass).collect();
        assert_eq!(masses, vec![1.0, 0.0, 2.0]);
        assert!(sim.catalog().is_empty());
    }

    #[test]
    fn test_diagnostics_stay_with_their_object() {
        let grid = grid_file("MASS,METALLICITY
1.0,,
2.0,0.02
3.0,0.02,7,8
");
        let mut config = single_config();
        config.grid_file = Some(grid.path().to_path_buf());

        let mut sim = Simulation::new(config, EndpointEngine, NullOutput);
        let mut reports = Vec::new();
        sim.run(&mut reports);

        assert_eq!(reports.len(), 3);
        assert_eq!(
            reports[0].diagnostics(),
            &["Using default metallicity 0.0142 at line 2".to_string()]
        );
        assert!(reports[1].diagnostics().is_empty());
        assert_eq!(
            reports[2].diagnostics(),
            &[
                "Extra column 3 at line 4 ignored".to_string(),
                "Extra column 4 at line 4 ignored".to_string(),
            ]
        );
        assert!(reports[2].csv_row().ends_with(",2"));
    }

    #[test]
    fn test_bad_grid_row_stops_run() {
        let grid = grid_file("MASS\n1.0\n-2.0\n3.0\n");
        let mut config = single_config();
        config.grid_file = Some(grid.path().to_path_buf());

        let mut sim = Simulation::new(config, EndpointEngine, NullOutput);
        let mut reports = Vec::new();
        let summary = sim.run(&mut reports);

        assert_eq!(summary.status, EvolutionStatus::Stopped);
        assert_eq!(reports.len(), 1);
    }

    #[test]
    fn test_missing_grid_is_an_error() {
        let mut config = single_config();
        config.grid_file = Some("/definitely/not/here.csv".into());
        let mut sim = Simulation::new(config, EndpointEngine, NullOutput);
        let summary = sim.run(&mut ());
        assert_eq!(summary.status, EvolutionStatus::Error);
        assert_eq!(summary.objects_evolved, 0);
    }

    #[test]
    fn test_close_failure_stops_run() {
        let mut config = single_config();
        config.single_star.mass_steps = 5;
        let output = FailingClose {
            fail_at: 1,
            ..FailingClose::default()
        };
        let mut sim = Simulation::new(config, EndpointEngine, output);
        let summary = sim.run(&mut ());

        assert_eq!(summary.status, EvolutionStatus::Stopped);
        assert_eq!(summary.objects_evolved, 2);
        assert_eq!(sim.output().closed, vec![0, 1]);
    }

    #[test]
    fn test_quiet_suppresses_reports() {
        let mut config = single_config();
        config.quiet = true;
        config.single_star.mass_steps = 4;
        let mut sim = Simulation::new(config, EndpointEngine, NullOutput);
        let mut reports = Vec::new();
        assert_eq!(sim.run(&mut reports).objects_evolved, 4);
        assert!(reports.is_empty());
    }

    #[test]
    fn test_binary_grid_with_period() {
        let grid = grid_file(
            "MASS_1,MASS_2,METALLICITY_1,METALLICITY_2,PERIOD,ECCENTRICITY\n10,8,0.02,0.02,100,0.1\n",
        );
        let config = Configuration {
            grid_file: Some(grid.path().to_path_buf()),
            random_seed: Some(7),
            ..Configuration::default()
        };
        let mut sim = Simulation::new(config, EndpointEngine, NullOutput);
        let mut reports = Vec::new();
        let summary = sim.run(&mut reports);

        assert_eq!(summary.status, EvolutionStatus::Done);
        assert_eq!(reports.len(), 1);
        let ObjectReport::Binary(report) = &reports[0] else {
            panic!("expected a binary report");
        };
        let expected = (18.0_f64 * (100.0_f64 / 365.25).powi(2)).cbrt();
        assert_relative_eq!(report.initial.separation, expected, max_relative = 1e-12);
        assert_eq!(report.initial.eccentricity, 0.1);
        assert!(report.initial.kick_1.is_none());
        assert_eq!(report.random_seed, 7);
    }

    #[test]
    fn test_individual_system_repeats() {
        let mut config = Configuration {
            random_seed: Some(1),
            ..Configuration::default()
        };
        config.binary.n_binaries = 3;
        config.binary.individual = Some(IndividualSystem {
            mass_1: 30.0,
            mass_2: 25.0,
            metallicity_1: None,
            metallicity_2: None,
            separation: Some(1000.0),
            period: None,
            eccentricity: 0.0,
        });
        let mut sim = Simulation::new(config, EndpointEngine, NullOutput);
        let mut reports = Vec::new();
        let summary = sim.run(&mut reports);

        assert_eq!(summary.status, EvolutionStatus::Done);
        assert_eq!(reports.len(), 3);
        assert!(reports
            .iter()
            .all(|r| r.status() == EvolutionStatus::DoubleCompactObject));
    }

    #[test]
    fn test_ais_stop_ends_run_after_teardown() {
        let mut config = Configuration {
            random_seed: Some(1),
            ..Configuration::default()
        };
        config.binary.n_binaries = 10;
        config.binary.individual = Some(IndividualSystem {
            mass_1: 30.0,
            mass_2: 25.0,
            metallicity_1: None,
            metallicity_2: None,
            separation: Some(1000.0),
            period: None,
            eccentricity: 0.0,
        });
        let output = FailingClose {
            fail_at: usize::MAX,
            ..FailingClose::default()
        };
        let mut sim = Simulation::new(config, EndpointEngine, output)
            .with_sampler(Box::new(ExploratoryPhase::new(2)));
        let summary = sim.run(&mut ());

        assert_eq!(summary.status, EvolutionStatus::AisExploratory);
        assert_eq!(summary.objects_evolved, 2);
        assert_eq!(sim.output().closed, vec![0, 1]);
    }

    #[test]
    fn test_sampled_binaries_are_reproducible() {
        let config = Configuration {
            random_seed: Some(12345),
            ..Configuration::default()
        };
        let mut first = Vec::new();
        Simulation::new(config.clone(), EndpointEngine, NullOutput).run(&mut first);
        let mut second = Vec::new();
        Simulation::new(config, EndpointEngine, NullOutput).run(&mut second);

        assert_eq!(first.len(), 10);
        assert_eq!(first, second);
        let ObjectReport::Binary(report) = &first[0] else {
            panic!("expected a binary report");
        };
        assert_ne!(report.initial_types[0], StellarType::MasslessRemnant);
    }
}

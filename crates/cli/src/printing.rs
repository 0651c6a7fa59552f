use indicatif::{ProgressBar, ProgressStyle};
use popsynth_sim::simulation::{Configuration, ObjectReport, RunMode, RunSummary, StatusChannel};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::defaults;

pub fn print_parameters(config: &Configuration) {
    println!("\n📋 Run Configuration");
    match config.mode {
        RunMode::Single => println!("  • Population: single stars"),
        RunMode::Binary => println!("  • Population: binaries"),
    }
    if let Some(seed) = config.random_seed {
        println!("  • Random Seed: {seed} [--seed]");
    } else {
        println!("  • Random Seed: Time-based [--seed]");
    }
    println!("  • Metallicity: {} [-z, --metallicity]", config.metallicity);

    println!("\n📥 Initial Conditions");
    if let Some(grid) = &config.grid_file {
        println!("  • Grid File: {} [--grid]", grid.display());
    } else {
        match config.mode {
            RunMode::Single => {
                let sweep = &config.single_star;
                println!(
                    "  • Mass Sweep: {} stars from {} Msol in steps of {:.4} Msol",
                    sweep.mass_steps,
                    sweep.mass_min,
                    sweep.increment()
                );
            }
            RunMode::Binary => match &config.binary.individual {
                Some(system) => println!(
                    "  • Individual System: {} + {} Msol, repeated {} times",
                    system.mass_1, system.mass_2, config.binary.n_binaries
                ),
                None => {
                    let sampling = &config.binary.sampling;
                    println!(
                        "  • Random Sampling: {} binaries, primary mass {}-{} Msol (slope {})",
                        config.binary.n_binaries,
                        sampling.mass_min,
                        sampling.mass_max,
                        sampling.imf_slope
                    );
                }
            },
        }
    }
    if config.ais.exploratory {
        println!(
            "  • Adaptive Importance Sampling: exploratory phase, {} hits",
            config.ais.target_hits
        );
    }

    println!("\n💾 Output");
    match &config.output.directory {
        Some(directory) => {
            println!("  • Directory: {} [--output-dir]", directory.display());
            println!("  • Detailed Files: {}", config.output.detailed);
        }
        None => println!("  • Directory: none (status lines only)"),
    }
    println!();
}

pub fn print_run_start(base_seed: u64) {
    println!("Start generating population at {}", unix_time());
    println!("Base random seed: {base_seed}\n");
}

pub fn print_run_end(summary: &RunSummary) {
    println!("\n{}", summary.status.label());
    println!("Objects evolved: {}", summary.objects_evolved);
    println!("End generating population at {}", unix_time());
    println!("Wall-clock time = {}", format_elapsed(summary.wall_time));
}

/// Format a duration as `hh:mm:ss`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

fn unix_time() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{secs} (unix time)")
}

/// Prints one status line per object to stdout, through the progress bar
/// when one is shown.
pub struct ConsoleChannel {
    progress: Option<ProgressBar>,
}

impl ConsoleChannel {
    pub fn new(show_progress: bool, expected: Option<u64>) -> Self {
        let progress = show_progress.then(|| match expected {
            Some(len) => {
                let pb = ProgressBar::new(len);
                if let Ok(style) = ProgressStyle::default_bar().template(defaults::PROGRESS_TEMPLATE) {
                    pb.set_style(style.progress_chars("#>-"));
                }
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::default_spinner().template(defaults::SPINNER_TEMPLATE)
                {
                    pb.set_style(style);
                }
                pb
            }
        });
        Self { progress }
    }

    pub fn finish(&self) {
        if let Some(pb) = &self.progress {
            pb.finish_with_message("Done");
        }
    }
}

/// Status line of one object followed by its diagnostics, one per line.
pub fn status_lines(report: &ObjectReport) -> Vec<String> {
    std::iter::once(report.to_string())
        .chain(report.diagnostics().iter().map(|d| format!("    ⚠ {d}")))
        .collect()
}

impl StatusChannel for ConsoleChannel {
    fn report(&mut self, report: &ObjectReport) {
        let lines = status_lines(report);
        match &self.progress {
            Some(pb) => {
                for line in &lines {
                    pb.println(line);
                }
                pb.inc(1);
            }
            None => {
                for line in &lines {
                    println!("{line}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_elapsed(Duration::from_millis(59_999)), "00:00:59");
        assert_eq!(format_elapsed(Duration::from_secs(3 * 3600 + 25 * 60 + 7)), "03:25:07");
    }
}

//! Adaptive importance sampling hooks.
//!
//! Only the exploratory phase is modelled: binaries are drawn from the
//! priors until a target number of double compact objects has formed.

use tracing::info;

use super::configs::AisConfig;
use crate::stellar::EvolutionStatus;

pub trait AdaptiveSampler {
    /// Log the active sampling settings at the start of a run.
    fn print_settings(&self);

    /// Register the outcome of one evolved binary.
    fn record_outcome(&mut self, index: usize, status: EvolutionStatus);

    /// Whether the run should end now.
    fn should_stop(&self) -> bool;
}

/// Plain sampling from the priors; never stops a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAdaptiveSampling;

impl AdaptiveSampler for NoAdaptiveSampling {
    fn print_settings(&self) {}

    fn record_outcome(&mut self, _index: usize, _status: EvolutionStatus) {}

    fn should_stop(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
pub struct ExploratoryPhase {
    target_hits: usize,
    hits: usize,
    evaluated: usize,
}

impl ExploratoryPhase {
    pub fn new(target_hits: usize) -> Self {
        Self {
            target_hits,
            hits: 0,
            evaluated: 0,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Fraction of evaluated binaries that were hits.
    pub fn hit_rate(&self) -> f64 {
        if self.evaluated == 0 {
            0.0
        } else {
            self.hits as f64 / self.evaluated as f64
        }
    }
}

impl AdaptiveSampler for ExploratoryPhase {
    fn print_settings(&self) {
        info!(
            target_hits = self.target_hits,
            "Adaptive importance sampling exploratory phase: stop after {} double compact objects",
            self.target_hits
        );
    }

    fn record_outcome(&mut self, index: usize, status: EvolutionStatus) {
        self.evaluated += 1;
        if status == EvolutionStatus::DoubleCompactObject {
            self.hits += 1;
            info!(index, hits = self.hits, "Exploratory phase hit");
        }
    }

    fn should_stop(&self) -> bool {
        self.hits >= self.target_hits
    }
}

/// Sampler selected by the configuration.
pub fn sampler_from_config(config: &AisConfig) -> Box<dyn AdaptiveSampler> {
    if config.exploratory {
        Box::new(ExploratoryPhase::new(config.target_hits))
    } else {
        Box::new(NoAdaptiveSampling)
    }
}

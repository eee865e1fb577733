use super::*;
use crate::CLUSTER_COUNT;
use crate::COMPONENT_COUNT;
use crate::Likelihood;
use crate::MAX_ITERATION;
use crate::SAMPLE_SIZE;
use serde::Deserialize;
use serde::Serialize;

/// Everything a fitting run needs besides the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Number of clusters.
    pub clusters: usize,
    /// Components per cluster.
    pub components: usize,
    /// Draws per random sample.
    pub sample: usize,
    /// Maximum number of E-step/M-step iterations.
    pub iterations: usize,
    /// Stop early once the total score moves by less than this.
    pub tolerance: Option<Likelihood>,
    /// Root of every random stream in the run.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clusters: CLUSTER_COUNT,
            components: COMPONENT_COUNT,
            sample: SAMPLE_SIZE,
            iterations: MAX_ITERATION,
            tolerance: None,
            seed: 0,
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.clusters > 0, "need at least one cluster");
        anyhow::ensure!(self.components > 0, "need at least one component per cluster");
        anyhow::ensure!(self.sample > 1, "samples need at least two draws, got {}", self.sample);
        if let Some(tolerance) = self.tolerance {
            anyhow::ensure!(
                tolerance.is_finite() && tolerance >= 0.,
                "tolerance must be a non-negative number, got {}",
                tolerance
            );
        }
        Ok(())
    }

    /// Stopping policy implied by `iterations` and `tolerance`.
    pub fn termination(&self) -> Termination {
        match self.tolerance {
            Some(tolerance) => Termination::convergent(self.iterations, tolerance),
            None => Termination::Iterations(self.iterations),
        }
    }
}

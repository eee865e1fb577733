use crate::Likelihood;
use crate::mixture::*;

/// Snapshot taken after every completed E-step/M-step pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Epoch {
    /// One-based count of completed iterations.
    pub iteration: usize,
    /// Total winning score of the E-step that fed this M-step.
    pub score: Likelihood,
    /// Variables assigned in that E-step.
    pub assigned: usize,
    /// Parameters produced by the M-step.
    pub mixture: Mixture,
    /// Recoverable conditions met during this iteration alone.
    pub diagnostics: Diagnostics,
}

use super::*;
use crate::Likelihood;

/// Decides, after each completed iteration, whether fitting should stop.
/// The fitting procedure never stops on its own.
pub trait Policy {
    fn halt(&mut self, epoch: &Epoch) -> bool;
}

impl<F> Policy for F
where
    F: FnMut(&Epoch) -> bool,
{
    fn halt(&mut self, epoch: &Epoch) -> bool {
        self(epoch)
    }
}

/// Built-in stopping rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Termination {
    /// Stop after a fixed number of iterations.
    Iterations(usize),
    /// Stop once the total score moves by less than `tolerance`
    /// between iterations, or after `limit` iterations.
    Convergent {
        limit: usize,
        tolerance: Likelihood,
        last: Option<Likelihood>,
    },
}

impl Termination {
    pub fn convergent(limit: usize, tolerance: Likelihood) -> Self {
        Self::Convergent {
            limit,
            tolerance,
            last: None,
        }
    }
}

impl Policy for Termination {
    fn halt(&mut self, epoch: &Epoch) -> bool {
        match self {
            Self::Iterations(limit) => epoch.iteration >= *limit,
            Self::Convergent {
                limit,
                tolerance,
                last,
            } => {
                let settled = last.is_some_and(|prev| (epoch.score - prev).abs() < *tolerance);
                *last = Some(epoch.score);
                settled || epoch.iteration >= *limit
            }
        }
    }
}

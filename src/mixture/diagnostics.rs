use serde::Deserialize;
use serde::Serialize;

/// Counters for every recoverable condition met while fitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Variables no cluster could score; left out of the iteration.
    pub unassigned: usize,
    /// Distinct values no component in the winning cluster could score.
    pub unscored: usize,
    /// Components refit from a random sample because their pool had 0 or 1 values.
    pub sparse: usize,
    /// Components refit from a random sample because their pool had no spread.
    pub degenerate: usize,
}

impl Diagnostics {
    /// Total number of components refit from a random sample.
    pub fn resampled(&self) -> usize {
        self.sparse + self.degenerate
    }
}

impl std::ops::AddAssign for Diagnostics {
    fn add_assign(&mut self, other: Self) {
        self.unassigned += other.unassigned;
        self.unscored += other.unscored;
        self.sparse += other.sparse;
        self.degenerate += other.degenerate;
    }
}

impl std::ops::Add for Diagnostics {
    type Output = Self;
    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

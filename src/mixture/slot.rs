use serde::Deserialize;
use serde::Serialize;

/// Composite key for a component: its parent cluster and its index within it.
/// Both indices are dense and zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub cluster: usize,
    pub component: usize,
}

impl From<(usize, usize)> for Slot {
    fn from((cluster, component): (usize, usize)) -> Self {
        Self { cluster, component }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.cluster, self.component)
    }
}

use super::*;

/// Values assigned to each component during one E-step, indexed by [`Slot`].
/// Rebuilt every iteration and consumed by the following M-step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pools(Vec<Vec<Vec<f64>>>);

impl Pools {
    /// Empty pools shaped like `mixture`.
    pub fn shaped(mixture: &Mixture) -> Self {
        Self(
            mixture
                .clusters()
                .iter()
                .map(|c| vec![Vec::new(); c.len()])
                .collect(),
        )
    }
    pub fn push(&mut self, slot: Slot, value: f64) {
        self.0[slot.cluster][slot.component].push(value);
    }
    /// Values pooled for `slot`; empty when the slot does not exist.
    pub fn get(&self, slot: Slot) -> &[f64] {
        self.0
            .get(slot.cluster)
            .and_then(|c| c.get(slot.component))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
    /// Total pooled values across every component of `cluster`.
    pub fn total(&self, cluster: usize) -> usize {
        self.0
            .get(cluster)
            .map(|c| c.iter().map(Vec::len).sum())
            .unwrap_or(0)
    }
    pub fn clear(&mut self) {
        self.0.iter_mut().flatten().for_each(Vec::clear);
    }
}

use super::*;
use crate::Prior;
use rayon::iter::IntoParallelIterator;
use rayon::iter::ParallelIterator;

/// How a component's new parameters were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Empirical mean and variance of its pool.
    Fitted,
    /// Pool had 0 or 1 values; refit from a random sample.
    Sparse,
    /// Pool had no spread; refit from a random sample.
    Degenerate,
}

/// Add-one smoothed log-probability: `ln((count + 1) / (total + partitions))`.
pub fn smooth(count: usize, total: usize, partitions: usize) -> Prior {
    ((count + 1) as f64 / (total + partitions) as f64).ln()
}

/// Result of one M-step.
#[derive(Debug, Clone, PartialEq)]
pub struct Reestimation {
    mixture: Mixture,
    outcomes: Vec<(Slot, Outcome)>,
    diagnostics: Diagnostics,
}

impl Reestimation {
    /// M-step. `counts` and `pools` come from the preceding E-step, `old`
    /// supplies the mixture shape, and `total` is the number of variables in
    /// the working set. Components are refit in parallel, each with its own
    /// generator derived from `(seed, epoch, slot)`.
    pub fn run(
        counts: &[usize],
        pools: &Pools,
        old: &Mixture,
        total: usize,
        sampler: &Sampler,
        seed: u64,
        epoch: usize,
    ) -> Self {
        let k = old.len();
        let mut outcomes = Vec::new();
        let mut diagnostics = Diagnostics::default();
        let mut clusters = Vec::with_capacity(k);
        for (i, cluster) in old.clusters().iter().enumerate() {
            let pooled = pools.total(i);
            let c = cluster.len();
            let refits = (0..c)
                .into_par_iter()
                .map(|j| Slot::from((i, j)))
                .map(|slot| {
                    let values = pools.get(slot);
                    let refit = Self::refit(slot, values, pooled, c, sampler, seed, epoch);
                    (slot, refit)
                })
                .collect::<Vec<(Slot, (Component, Outcome))>>();
            let mut components = Vec::with_capacity(cluster.len());
            for (slot, (component, outcome)) in refits {
                match outcome {
                    Outcome::Fitted => {}
                    Outcome::Sparse => diagnostics.sparse += 1,
                    Outcome::Degenerate => diagnostics.degenerate += 1,
                }
                if outcome != Outcome::Fitted {
                    log::debug!("{:<32}{:<32}", "resampled component", format!("{} {:?}", slot, outcome));
                }
                outcomes.push((slot, outcome));
                components.push(component);
            }
            let count = counts.get(i).copied().unwrap_or(0);
            clusters.push(Cluster::new(smooth(count, total, k), components));
        }
        Self {
            mixture: clusters.into_iter().collect(),
            outcomes,
            diagnostics,
        }
    }

    fn refit(
        slot: Slot,
        values: &[f64],
        pooled: usize,
        partitions: usize,
        sampler: &Sampler,
        seed: u64,
        epoch: usize,
    ) -> (Component, Outcome) {
        let ref mut rng = rng(seed, epoch, slot);
        let n = values.len();
        match n {
            0 | 1 => (
                Component::new(sampler.gaussian(rng), smooth(0, pooled, partitions)),
                Outcome::Sparse,
            ),
            _ => match Gaussian::fit(values) {
                Some(gaussian) => (
                    Component::new(gaussian, smooth(n, pooled, partitions)),
                    Outcome::Fitted,
                ),
                None => (
                    Component::new(sampler.gaussian(rng), smooth(n, pooled, partitions)),
                    Outcome::Degenerate,
                ),
            },
        }
    }

    pub fn mixture(&self) -> &Mixture {
        &self.mixture
    }
    pub fn into_mixture(self) -> Mixture {
        self.mixture
    }
    pub fn outcomes(&self) -> &[(Slot, Outcome)] {
        &self.outcomes
    }
    pub fn outcome(&self, slot: Slot) -> Option<Outcome> {
        self.outcomes
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, o)| *o)
    }
    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn store() -> Store {
        Store::from_iter([
            ("a", vec![1., 2., 3., 4.]),
            ("b", vec![20., 22., 24.]),
            ("c", vec![-5., 5.]),
        ])
    }

    fn shape(k: usize, c: usize) -> Mixture {
        (0..k)
            .map(|_| {
                (0..c)
                    .map(|_| Component::new(Gaussian::new(0., 1.), 0.))
                    .collect::<Vec<Component>>()
            })
            .map(|components| Cluster::new(0., components))
            .collect()
    }

    fn pools(old: &Mixture, fill: &[(Slot, &[f64])]) -> Pools {
        let mut pools = Pools::shaped(old);
        for (slot, values) in fill {
            values.iter().for_each(|v| pools.push(*slot, *v));
        }
        pools
    }

    #[test]
    fn smoothing_over_empty_cluster() {
        assert!((smooth(0, 10, 5) - (1f64 / 15.).ln()).abs() < 1e-12);
    }

    #[test]
    fn cluster_priors_are_smoothed_counts() {
        let ref store = store();
        let ref sampler = Sampler::new(store, 100).expect("sampler");
        let old = shape(5, 1);
        let ref pools = Pools::shaped(&old);
        let m = Reestimation::run(&[4, 0, 6, 0, 0], pools, &old, 10, sampler, 0, 1);
        let priors = m.mixture().clusters().iter().map(Cluster::prior).collect::<Vec<_>>();
        assert!((priors[0] - (5f64 / 15.).ln()).abs() < 1e-12);
        assert!((priors[1] - (1f64 / 15.).ln()).abs() < 1e-12);
        assert!((priors[2] - (7f64 / 15.).ln()).abs() < 1e-12);
    }

    #[test]
    fn spread_pools_are_fit_without_resampling() {
        let ref store = store();
        let ref sampler = Sampler::new(store, 100).expect("sampler");
        let old = shape(1, 2);
        let a = Slot::from((0, 0));
        let b = Slot::from((0, 1));
        let ref pools = pools(&old, &[(a, &[1., 3.]), (b, &[10., 20., 30.])]);
        let m = Reestimation::run(&[1], pools, &old, 1, sampler, 0, 1);
        assert_eq!(m.diagnostics().resampled(), 0);
        let fitted = m.mixture().component(a).expect("a");
        assert_eq!(fitted.gaussian().mean(), 2.);
        assert_eq!(fitted.gaussian().variance(), 2.);
        assert!((fitted.prior() - (3f64 / 7.).ln()).abs() < 1e-12);
        let fitted = m.mixture().component(b).expect("b");
        assert_eq!(fitted.gaussian().mean(), 20.);
        assert!((fitted.prior() - (4f64 / 7.).ln()).abs() < 1e-12);
    }

    #[test]
    fn sparse_pools_resample() {
        let ref store = store();
        let ref sampler = Sampler::new(store, 100).expect("sampler");
        let old = shape(1, 3);
        let ref pools = pools(&old, &[(Slot::from((0, 1)), &[7.]), (Slot::from((0, 2)), &[1., 2.])]);
        let m = Reestimation::run(&[1], pools, &old, 1, sampler, 0, 1);
        assert_eq!(m.outcome(Slot::from((0, 0))), Some(Outcome::Sparse));
        assert_eq!(m.outcome(Slot::from((0, 1))), Some(Outcome::Sparse));
        assert_eq!(m.outcome(Slot::from((0, 2))), Some(Outcome::Fitted));
        assert_eq!(m.diagnostics().sparse, 2);
        assert_eq!(m.diagnostics().degenerate, 0);
        let lonely = m.mixture().component(Slot::from((0, 1))).expect("slot");
        assert!((lonely.prior() - (1f64 / 6.).ln()).abs() < 1e-12);
    }

    #[test]
    fn flat_pools_resample_with_positive_variance() {
        let ref store = store();
        let ref sampler = Sampler::new(store, 100).expect("sampler");
        let old = shape(1, 1);
        let slot = Slot::from((0, 0));
        let ref pools = pools(&old, &[(slot, &[4., 4., 4.])]);
        let m = Reestimation::run(&[1], pools, &old, 1, sampler, 0, 1);
        assert_eq!(m.outcome(slot), Some(Outcome::Degenerate));
        assert_eq!(m.diagnostics().degenerate, 1);
        let component = m.mixture().component(slot).expect("slot");
        assert!(component.gaussian().variance() > 0.);
        assert!((component.prior() - (4f64 / 4.).ln()).abs() < 1e-12);
    }

    #[test]
    fn reestimation_is_reproducible() {
        let ref store = store();
        let ref sampler = Sampler::new(store, 100).expect("sampler");
        let old = shape(2, 2);
        let ref pools = Pools::shaped(&old);
        let a = Reestimation::run(&[0, 0], pools, &old, 3, sampler, 42, 7);
        let b = Reestimation::run(&[0, 0], pools, &old, 3, sampler, 42, 7);
        assert_eq!(a, b);
    }
}

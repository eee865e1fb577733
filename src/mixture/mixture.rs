use super::*;
use crate::Prior;
use rayon::iter::IntoParallelIterator;
use rayon::iter::ParallelIterator;
use serde::Deserialize;
use serde::Serialize;

/// One Gaussian inside a cluster and its log-prior within that cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Component {
    gaussian: Gaussian,
    prior: Prior,
}

impl Component {
    pub fn new(gaussian: Gaussian, prior: Prior) -> Self {
        Self { gaussian, prior }
    }
    pub fn gaussian(&self) -> &Gaussian {
        &self.gaussian
    }
    pub fn prior(&self) -> Prior {
        self.prior
    }
}

/// A group of components and its log-prior across all clusters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    prior: Prior,
    components: Vec<Component>,
}

impl Cluster {
    pub fn new(prior: Prior, components: Vec<Component>) -> Self {
        debug_assert!(!components.is_empty());
        Self { prior, components }
    }
    pub fn prior(&self) -> Prior {
        self.prior
    }
    pub fn components(&self) -> &[Component] {
        &self.components
    }
    pub fn len(&self) -> usize {
        self.components.len()
    }
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Full parameter set: clusters, their components, and all log-priors.
///
/// Replaced wholesale by every M-step; never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mixture {
    clusters: Vec<Cluster>,
}

impl Mixture {
    /// Initial parameters: uniform log-priors, and each component fitted to
    /// an independent random sample.
    pub fn seed(clusters: usize, components: usize, sampler: &Sampler, seed: u64) -> Self {
        log::info!(
            "{:<32}{:<32}",
            "seeding mixture",
            format!("{} x {}", clusters, components)
        );
        let cluster_prior = (1. / clusters as f64).ln();
        let component_prior = (1. / components as f64).ln();
        (0..clusters)
            .map(|i| {
                (0..components)
                    .into_par_iter()
                    .map(|j| Slot::from((i, j)))
                    .map(|slot| sampler.gaussian(&mut rng(seed, 0, slot)))
                    .map(|gaussian| Component::new(gaussian, component_prior))
                    .collect::<Vec<Component>>()
            })
            .map(|components| Cluster::new(cluster_prior, components))
            .collect()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }
    pub fn cluster(&self, i: usize) -> Option<&Cluster> {
        self.clusters.get(i)
    }
    pub fn component(&self, slot: Slot) -> Option<&Component> {
        self.clusters
            .get(slot.cluster)
            .and_then(|c| c.components.get(slot.component))
    }
    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
    /// Every (cluster, component) pair, cluster-major.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.clusters
            .iter()
            .enumerate()
            .flat_map(|(i, c)| (0..c.len()).map(move |j| Slot::from((i, j))))
    }
    /// Density evaluators shaped like the mixture; `None` for unusable parameters.
    pub fn kernels(&self) -> Vec<Vec<Option<Kernel>>> {
        self.clusters
            .iter()
            .map(|c| c.components.iter().map(|k| k.gaussian.kernel()).collect())
            .collect()
    }
}

impl FromIterator<Cluster> for Mixture {
    fn from_iter<I: IntoIterator<Item = Cluster>>(iter: I) -> Self {
        Self {
            clusters: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn store() -> Store {
        Store::from_iter([
            ("a", vec![1., 1.5, 2., 2.5]),
            ("b", vec![40., 42., 44.]),
            ("c", vec![-7., -9.]),
        ])
    }

    #[test]
    fn seed_shapes_and_priors() {
        let ref store = store();
        let sampler = Sampler::new(store, 200).expect("sampler");
        let mixture = Mixture::seed(5, 3, &sampler, 11);
        assert_eq!(mixture.len(), 5);
        assert_eq!(mixture.slots().count(), 15);
        for cluster in mixture.clusters() {
            assert!((cluster.prior() - (1f64 / 5.).ln()).abs() < 1e-12);
            assert_eq!(cluster.len(), 3);
            for component in cluster.components() {
                assert!((component.prior() - (1f64 / 3.).ln()).abs() < 1e-12);
                assert!(component.gaussian().variance() > 0.);
            }
        }
    }

    #[test]
    fn seed_is_reproducible() {
        let ref store = store();
        let sampler = Sampler::new(store, 200).expect("sampler");
        assert_eq!(
            Mixture::seed(4, 2, &sampler, 99),
            Mixture::seed(4, 2, &sampler, 99)
        );
    }

    #[test]
    fn seeded_means_lie_within_observations() {
        let ref store = store();
        let sampler = Sampler::new(store, 200).expect("sampler");
        let mixture = Mixture::seed(3, 3, &sampler, 5);
        for slot in mixture.slots().collect::<Vec<_>>() {
            let mean = mixture.component(slot).expect("slot").gaussian().mean();
            assert!((-9. ..=44.).contains(&mean), "{} mean {}", slot, mean);
        }
    }
}

use super::*;
use crate::Likelihood;
use crate::store::*;
use rayon::iter::IntoParallelRefIterator;
use rayon::iter::ParallelIterator;
use std::collections::BTreeMap;

/// Where one variable landed in an E-step.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    cluster: usize,
    score: Likelihood,
    /// (distinct value, component) for every value some component could score.
    components: Vec<(f64, usize)>,
    /// Distinct values no component in the winning cluster could score.
    unscored: usize,
}

impl Verdict {
    /// Score `variable` against every cluster and keep the strictly best one,
    /// first cluster winning ties. `None` if no cluster scores above -inf.
    pub fn judge(variable: &Variable, kernels: &[Vec<Option<Kernel>>]) -> Option<Self> {
        let mut best = None::<(usize, Likelihood, Vec<Option<usize>>)>;
        for (i, cluster) in kernels.iter().enumerate() {
            let (score, picks) = Self::trial(cluster, variable);
            if score > best.as_ref().map_or(Likelihood::NEG_INFINITY, |b| b.1) {
                best = Some((i, score, picks));
            }
        }
        best.map(|(cluster, score, picks)| Self {
            cluster,
            score,
            unscored: picks.iter().filter(|p| p.is_none()).count(),
            components: variable
                .distinct()
                .iter()
                .zip(picks)
                .filter_map(|(x, pick)| pick.map(|j| (*x, j)))
                .collect(),
        })
    }

    /// Sum of the best per-value log-densities of `variable` under one cluster.
    /// Values no component can score contribute nothing.
    pub fn evaluate(cluster: &[Option<Kernel>], variable: &Variable) -> Likelihood {
        Self::trial(cluster, variable).0
    }

    /// Best component for one value: highest finite log-density, lowest index on ties.
    pub fn pick(cluster: &[Option<Kernel>], x: f64) -> Option<(usize, Likelihood)> {
        cluster
            .iter()
            .enumerate()
            .filter_map(|(j, k)| k.as_ref().and_then(|k| k.density(x)).map(|d| (j, d)))
            .fold(None, |best, (j, d)| match best {
                Some((_, b)) if b >= d => best,
                _ => Some((j, d)),
            })
    }

    fn trial(cluster: &[Option<Kernel>], variable: &Variable) -> (Likelihood, Vec<Option<usize>>) {
        variable
            .distinct()
            .iter()
            .map(|x| Self::pick(cluster, *x))
            .fold((0., Vec::with_capacity(variable.unique())), |(sum, mut picks), pick| {
                picks.push(pick.map(|(j, _)| j));
                (sum + pick.map_or(0., |(_, d)| d), picks)
            })
    }

    pub fn cluster(&self) -> usize {
        self.cluster
    }
    pub fn score(&self) -> Likelihood {
        self.score
    }
    pub fn components(&self) -> &[(f64, usize)] {
        &self.components
    }
    pub fn unscored(&self) -> usize {
        self.unscored
    }
    /// Component chosen for `value`, compared bitwise.
    pub fn component(&self, value: f64) -> Option<usize> {
        self.components
            .iter()
            .find(|(x, _)| x.to_bits() == value.to_bits())
            .map(|(_, j)| *j)
    }
}

/// Result of one E-step: a [`Verdict`] per assigned variable, the number of
/// variables per cluster, and the values pooled under each component.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    verdicts: BTreeMap<String, Verdict>,
    counts: Vec<usize>,
    pools: Pools,
    diagnostics: Diagnostics,
}

impl Assignment {
    /// E-step. Variables are scored in parallel against a read-only
    /// parameter snapshot, then merged in name order.
    pub fn assign(store: &Store, mixture: &Mixture) -> Self {
        let ref kernels = mixture.kernels();
        let judged = store
            .variables()
            .par_iter()
            .map(|variable| (variable, Verdict::judge(variable, kernels)))
            .collect::<Vec<(&Variable, Option<Verdict>)>>();
        let mut verdicts = BTreeMap::new();
        let mut counts = vec![0; mixture.len()];
        let mut pools = Pools::shaped(mixture);
        let mut diagnostics = Diagnostics::default();
        for (variable, verdict) in judged {
            match verdict {
                None => {
                    log::warn!("no cluster can score {}", variable.name());
                    diagnostics.unassigned += 1;
                }
                Some(verdict) => {
                    counts[verdict.cluster] += 1;
                    diagnostics.unscored += verdict.unscored;
                    verdict
                        .components
                        .iter()
                        .for_each(|(x, j)| pools.push(Slot::from((verdict.cluster, *j)), *x));
                    verdicts.insert(variable.name().to_string(), verdict);
                }
            }
        }
        log::debug!(
            "{:<32}{:<32}",
            "assigned variables",
            format!("{} / {}", verdicts.len(), store.len())
        );
        Self {
            verdicts,
            counts,
            pools,
            diagnostics,
        }
    }

    pub fn verdicts(&self) -> &BTreeMap<String, Verdict> {
        &self.verdicts
    }
    pub fn verdict(&self, name: &str) -> Option<&Verdict> {
        self.verdicts.get(name)
    }
    /// Cluster `name` was assigned to.
    pub fn cluster(&self, name: &str) -> Option<usize> {
        self.verdict(name).map(Verdict::cluster)
    }
    /// Component `value` of `name` was assigned to, within its cluster.
    pub fn component(&self, name: &str, value: f64) -> Option<usize> {
        self.verdict(name).and_then(|v| v.component(value))
    }
    /// Variables assigned to each cluster.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }
    pub fn pools(&self) -> &Pools {
        &self.pools
    }
    /// Hand the pooled values to the M-step, leaving this assignment's pools empty.
    pub fn take_pools(&mut self) -> Pools {
        std::mem::take(&mut self.pools)
    }
    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }
    /// Number of variables that landed in some cluster.
    pub fn assigned(&self) -> usize {
        self.verdicts.len()
    }
    /// Sum of every assigned variable's winning score.
    pub fn score(&self) -> Likelihood {
        self.verdicts.values().map(Verdict::score).sum()
    }
}

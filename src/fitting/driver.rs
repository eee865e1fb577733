use super::*;
use crate::mixture::*;
use crate::store::*;

/// Which step the driver runs next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Expect,
    Maximize,
}

/// Alternates E-steps and M-steps over a loaded [`Store`].
///
/// The only consistent stopping points are step boundaries: after
/// [`Driver::step`] returns, the driver holds either fresh parameters
/// awaiting an E-step, or a fresh assignment awaiting an M-step.
pub struct Driver<'a> {
    store: &'a Store,
    sampler: Sampler<'a>,
    config: Config,
    phase: Phase,
    iteration: usize,
    mixture: Mixture,
    assignment: Option<Assignment>,
    diagnostics: Diagnostics,
}

impl<'a> Driver<'a> {
    /// Seed parameters from random samples of `store` and wait for the first E-step.
    pub fn new(store: &'a Store, config: Config) -> anyhow::Result<Self> {
        config.validate()?;
        let sampler = Sampler::new(store, config.sample)?;
        let mixture = Mixture::seed(config.clusters, config.components, &sampler, config.seed);
        Ok(Self::build(store, sampler, config, mixture))
    }

    /// Start from caller-supplied parameters instead of random ones.
    pub fn with_mixture(store: &'a Store, config: Config, mixture: Mixture) -> anyhow::Result<Self> {
        config.validate()?;
        anyhow::ensure!(!mixture.is_empty(), "mixture has no clusters");
        anyhow::ensure!(
            mixture.clusters().iter().all(|c| !c.is_empty()),
            "every cluster needs at least one component"
        );
        let sampler = Sampler::new(store, config.sample)?;
        Ok(Self::build(store, sampler, config, mixture))
    }

    fn build(store: &'a Store, sampler: Sampler<'a>, config: Config, mixture: Mixture) -> Self {
        Self {
            store,
            sampler,
            config,
            phase: Phase::Expect,
            iteration: 0,
            mixture,
            assignment: None,
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    /// Completed iterations.
    pub fn iteration(&self) -> usize {
        self.iteration
    }
    pub fn mixture(&self) -> &Mixture {
        &self.mixture
    }
    /// Most recent E-step result.
    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }
    /// Recoverable conditions met across every step so far.
    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run whichever step comes next. Returns an [`Epoch`] when an M-step
    /// completes an iteration.
    pub fn step(&mut self) -> Option<Epoch> {
        match self.phase {
            Phase::Expect => {
                self.expect();
                None
            }
            Phase::Maximize => Some(self.maximize()),
        }
    }

    /// Run steps until the current iteration completes.
    pub fn iterate(&mut self) -> Epoch {
        loop {
            if let Some(epoch) = self.step() {
                return epoch;
            }
        }
    }

    /// Iterate until `policy` halts or an interrupt is requested.
    pub fn fit<P>(&mut self, mut policy: P) -> Report
    where
        P: Policy,
    {
        log::info!(
            "{:<32}{:<32}",
            "fitting mixture",
            format!("{} variables", self.store.len())
        );
        loop {
            let epoch = self.iterate();
            log::info!(
                "{:<32}{:<32}",
                format!("iteration {}", epoch.iteration),
                format!("score {:.4}", epoch.score)
            );
            if policy.halt(&epoch) {
                log::info!("{:<32}{:<32}", "stopping policy fired", epoch.iteration);
                break;
            }
            if crate::interrupted() {
                log::warn!("{:<32}{:<32}", "interrupted", epoch.iteration);
                break;
            }
        }
        self.report()
    }

    /// Snapshot of everything a caller may need from the run so far.
    pub fn report(&self) -> Report {
        Report::new(
            self.config,
            self.iteration,
            self.store,
            self.assignment.as_ref(),
            &self.mixture,
            self.diagnostics,
        )
    }

    fn expect(&mut self) {
        debug_assert_eq!(self.phase, Phase::Expect);
        log::debug!("{:<32}{:<32}", "expectation step", self.iteration + 1);
        let assignment = Assignment::assign(self.store, &self.mixture);
        self.diagnostics += assignment.diagnostics();
        self.assignment = Some(assignment);
        self.phase = Phase::Maximize;
    }

    fn maximize(&mut self) -> Epoch {
        debug_assert_eq!(self.phase, Phase::Maximize);
        log::debug!("{:<32}{:<32}", "maximization step", self.iteration + 1);
        self.iteration += 1;
        let assignment = self
            .assignment
            .as_mut()
            .expect("maximization follows expectation");
        let ref pools = assignment.take_pools();
        let m = Reestimation::run(
            assignment.counts(),
            pools,
            &self.mixture,
            self.store.len(),
            &self.sampler,
            self.config.seed,
            self.iteration,
        );
        let diagnostics = assignment.diagnostics() + m.diagnostics();
        let score = assignment.score();
        let assigned = assignment.assigned();
        self.diagnostics += m.diagnostics();
        self.mixture = m.into_mixture();
        self.phase = Phase::Expect;
        Epoch {
            iteration: self.iteration,
            score,
            assigned,
            mixture: self.mixture.clone(),
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        Store::from_iter([
            ("a", vec![1., 1.2, 0.8, 1.1, 0.9]),
            ("b", vec![5., 5.5, 4.5]),
            ("c", vec![50., 52., 48., 51.]),
            ("d", vec![49., 50.5]),
            ("e", vec![-30., -31., -29.]),
        ])
    }

    fn config() -> Config {
        Config {
            clusters: 3,
            components: 2,
            sample: 200,
            iterations: 5,
            tolerance: None,
            seed: 123,
        }
    }

    fn flat() -> Store {
        Store::from_iter([
            ("ten", vec![10.; 5]),
            ("twenty", vec![20.; 5]),
            ("thirty", vec![30.; 5]),
        ])
    }

    fn separated() -> Mixture {
        [10., 30.]
            .into_iter()
            .map(|mean| Cluster::new(0.5f64.ln(), vec![Component::new(Gaussian::new(mean, 1.), 0.)]))
            .collect()
    }

    #[test]
    fn phases_alternate() {
        let ref store = store();
        let mut driver = Driver::new(store, config()).expect("driver");
        assert_eq!(driver.phase(), Phase::Expect);
        assert!(driver.step().is_none());
        assert_eq!(driver.phase(), Phase::Maximize);
        assert!(driver.assignment().is_some());
        let epoch = driver.step().expect("epoch");
        assert_eq!(epoch.iteration, 1);
        assert_eq!(driver.phase(), Phase::Expect);
        assert_eq!(driver.iteration(), 1);
    }

    #[test]
    fn variances_stay_positive_every_iteration() {
        let ref store = store();
        let mut driver = Driver::new(store, config()).expect("driver");
        for _ in 0..10 {
            let epoch = driver.iterate();
            assert!(epoch
                .mixture
                .clusters()
                .iter()
                .flat_map(Cluster::components)
                .all(|c| c.gaussian().variance() > 0.));
        }
    }

    #[test]
    fn same_seed_same_fit() {
        let ref store = store();
        let a = Driver::new(store, config()).expect("driver").fit(Termination::Iterations(4));
        let b = Driver::new(store, config()).expect("driver").fit(Termination::Iterations(4));
        assert_eq!(a, b);
        assert_eq!(a.iterations, 4);
    }

    #[test]
    fn fit_honours_closure_policy() {
        let ref store = store();
        let mut driver = Driver::new(store, config()).expect("driver");
        let report = driver.fit(|e: &Epoch| e.iteration == 2);
        assert_eq!(report.iterations, 2);
        assert_eq!(report.clusters.len(), store.len());
    }

    #[test]
    fn separated_groups_do_not_collapse() {
        let ref store = flat();
        let config = Config {
            clusters: 2,
            components: 1,
            sample: 100,
            ..Config::default()
        };
        let mut driver = Driver::with_mixture(store, config, separated()).expect("driver");
        let epoch = driver.iterate();
        let assignment = driver.assignment().expect("assigned");
        let ten = assignment.cluster("ten").expect("ten");
        let thirty = assignment.cluster("thirty").expect("thirty");
        assert_ne!(ten, thirty);
        // twenty sits exactly between both clusters; the first one wins the tie
        assert_eq!(assignment.cluster("twenty"), Some(ten));
        let fitted = epoch.mixture.component(Slot::from((ten, 0))).expect("slot");
        assert_eq!(fitted.gaussian().mean(), 15.);
        assert_eq!(fitted.gaussian().variance(), 50.);
        // the lone value in the other cluster cannot be fit and is resampled
        assert_eq!(epoch.diagnostics.sparse, 1);
        assert_eq!(epoch.diagnostics.degenerate, 0);
    }

    #[test]
    fn resampling_only_fires_for_thin_pools() {
        let ref store = Store::from_iter([
            ("low", vec![1., 2., 3.]),
            ("high", vec![100., 101., 102.]),
        ]);
        let mixture = [2., 101.]
            .into_iter()
            .map(|mean| Cluster::new(0.5f64.ln(), vec![Component::new(Gaussian::new(mean, 1.), 0.)]))
            .collect();
        let config = Config {
            clusters: 2,
            components: 1,
            sample: 100,
            ..Config::default()
        };
        let mut driver = Driver::with_mixture(store, config, mixture).expect("driver");
        for _ in 0..3 {
            let epoch = driver.iterate();
            assert_eq!(epoch.diagnostics.resampled(), 0);
        }
        assert_eq!(driver.diagnostics().resampled(), 0);
    }

    #[test]
    fn empty_mixture_is_rejected() {
        let ref store = store();
        assert!(Driver::with_mixture(store, config(), Mixture::default()).is_err());
    }
}

use crate::Likelihood;
use serde::Deserialize;
use serde::Serialize;
use statrs::distribution::Continuous;
use statrs::distribution::Normal;
use statrs::statistics::Statistics;

/// Univariate normal distribution parameterized by mean and variance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gaussian {
    mean: f64,
    variance: f64,
}

impl Gaussian {
    pub fn new(mean: f64, variance: f64) -> Self {
        debug_assert!(variance > 0., "non-positive variance {}", variance);
        Self { mean, variance }
    }
    pub fn mean(&self) -> f64 {
        self.mean
    }
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Empirical mean and unbiased variance of `values`.
    /// `None` unless there are at least two values with a positive, finite spread.
    pub fn fit(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let mean = values.iter().mean();
        let variance = values.iter().variance();
        (mean.is_finite() && variance.is_finite() && variance > 0.)
            .then(|| Self::new(mean, variance))
    }

    /// Density evaluator, or `None` when the parameters cannot form a distribution.
    pub fn kernel(&self) -> Option<Kernel> {
        Normal::new(self.mean, self.variance.sqrt()).ok().map(Kernel)
    }

    /// Log-density of `x`, or `None` if it is not finite.
    pub fn density(&self, x: f64) -> Option<Likelihood> {
        self.kernel().and_then(|k| k.density(x))
    }
}

/// Precomputed normal distribution used in the hot loop of the E-step.
#[derive(Debug, Clone, Copy)]
pub struct Kernel(Normal);

impl Kernel {
    /// Log-density of `x`, or `None` if it is not finite.
    pub fn density(&self, x: f64) -> Option<Likelihood> {
        Some(self.0.ln_pdf(x)).filter(|d| d.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_uses_unbiased_variance() {
        let g = Gaussian::fit(&[1., 2., 3., 4.]).expect("spread");
        assert_eq!(g.mean(), 2.5);
        assert!((g.variance() - 5. / 3.).abs() < 1e-12);
    }

    #[test]
    fn fit_rejects_sparse_and_flat() {
        assert_eq!(Gaussian::fit(&[]), None);
        assert_eq!(Gaussian::fit(&[7.]), None);
        assert_eq!(Gaussian::fit(&[7., 7., 7.]), None);
    }

    #[test]
    fn density_matches_closed_form() {
        let g = Gaussian::new(1., 4.);
        let x = 2.;
        let expected = -0.5 * (2. * std::f64::consts::PI * 4.).ln() - (x - 1.) * (x - 1.) / 8.;
        let actual = g.density(x).expect("finite");
        assert!((actual - expected).abs() < 1e-12);
    }

    #[test]
    fn density_peaks_at_mean() {
        let g = Gaussian::new(10., 2.);
        let peak = g.density(10.).expect("finite");
        assert!(g.density(9.).expect("finite") < peak);
        assert!(g.density(11.5).expect("finite") < peak);
    }

    #[test]
    fn far_tails_are_not_candidates() {
        let g = Gaussian::new(0., 1e-300);
        assert_eq!(g.density(1e300), None);
    }
}

use super::*;
use crate::RESAMPLE_ATTEMPTS;
use crate::SAMPLE_WEIGHT_HIGH;
use crate::SAMPLE_WEIGHT_LOW;
use crate::SAMPLE_WEIGHT_POOL;
use crate::VARIANCE_FLOOR;
use crate::store::*;
use anyhow::Context;
use rand::Rng;
use rand::SeedableRng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::SmallRng;
use statrs::statistics::Statistics;

/// The three populations a random sample can be drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pool {
    /// The smallest values observed across all variables.
    Low,
    /// The largest values observed across all variables.
    High,
    /// A random observation of a random variable.
    Generic,
}

impl Pool {
    const ALL: [Pool; 3] = [Pool::Low, Pool::High, Pool::Generic];
}

/// Draws fixed-size random samples from the loaded observations.
///
/// Shared by seeding and by the M-step fallback: each sample picks one
/// [`Pool`] at random, then draws with replacement from it.
#[derive(Debug, Clone)]
pub struct Sampler<'a> {
    low: Vec<f64>,
    high: Vec<f64>,
    variables: Vec<&'a Variable>,
    size: usize,
    choice: WeightedIndex<u32>,
}

impl<'a> Sampler<'a> {
    pub fn new(store: &'a Store, size: usize) -> anyhow::Result<Self> {
        let low = store.extremes().low().to_sorted_vec();
        let high = store.extremes().high().to_sorted_vec();
        let variables = store
            .variables()
            .iter()
            .filter(|v| !v.is_empty())
            .collect::<Vec<&Variable>>();
        anyhow::ensure!(!low.is_empty(), "no observations to sample from");
        anyhow::ensure!(!variables.is_empty(), "no retained variable has observations");
        let choice = WeightedIndex::new([SAMPLE_WEIGHT_LOW, SAMPLE_WEIGHT_HIGH, SAMPLE_WEIGHT_POOL])
            .context("sampling weights")?;
        Ok(Self {
            low,
            high,
            variables,
            size,
            choice,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Choose which population the next sample comes from.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Pool {
        Pool::ALL[self.choice.sample(rng)]
    }

    /// Draw a sample of [`Self::size`] values with replacement from `pool`.
    pub fn draw_from<R: Rng>(&self, pool: Pool, rng: &mut R) -> Vec<f64> {
        match pool {
            Pool::Low => Self::replace(&self.low, self.size, rng),
            Pool::High => Self::replace(&self.high, self.size, rng),
            Pool::Generic => (0..self.size)
                .map(|_| {
                    let variable = self.variables[rng.random_range(0..self.variables.len())];
                    variable.values()[rng.random_range(0..variable.values().len())]
                })
                .collect(),
        }
    }

    /// Draw a sample from a randomly chosen pool.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        let pool = self.pick(rng);
        self.draw_from(pool, rng)
    }

    /// Gaussian fitted to a random sample. Redraws samples with no spread,
    /// and floors the variance if none of [`RESAMPLE_ATTEMPTS`] draws has any.
    pub fn gaussian<R: Rng>(&self, rng: &mut R) -> Gaussian {
        let mut last = Vec::new();
        for _ in 0..RESAMPLE_ATTEMPTS {
            let sample = self.draw(rng);
            match Gaussian::fit(&sample) {
                Some(gaussian) => return gaussian,
                None => last = sample,
            }
        }
        let mean = Some(last.iter().mean()).filter(|m| m.is_finite()).unwrap_or(0.);
        log::warn!("flat samples after {} draws, flooring variance at {}", RESAMPLE_ATTEMPTS, mean);
        Gaussian::new(mean, VARIANCE_FLOOR)
    }

    fn replace<R: Rng>(values: &[f64], n: usize, rng: &mut R) -> Vec<f64> {
        (0..n)
            .map(|_| values[rng.random_range(0..values.len())])
            .collect()
    }
}

/// Independent generator for one slot in one iteration.
/// Same inputs always produce the same stream, whichever thread asks.
pub fn rng(seed: u64, epoch: usize, slot: Slot) -> SmallRng {
    use std::hash::DefaultHasher;
    use std::hash::Hash;
    use std::hash::Hasher;
    let ref mut hasher = DefaultHasher::default();
    seed.hash(hasher);
    epoch.hash(hasher);
    slot.hash(hasher);
    SmallRng::seed_from_u64(hasher.finish())
}

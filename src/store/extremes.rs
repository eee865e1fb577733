use super::*;
use crate::EXTREME_CAPACITY;

/// Online summary of every observation loaded, regardless of whether its
/// variable survives filtering: global min/max plus both extreme tails.
#[derive(Debug, Clone)]
pub struct Extremes {
    low: Tail,
    high: Tail,
    min: f64,
    max: f64,
    seen: usize,
}

impl Default for Extremes {
    fn default() -> Self {
        Self::with_capacity(EXTREME_CAPACITY)
    }
}

impl Extremes {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            low: Tail::new(Side::Low, capacity),
            high: Tail::new(Side::High, capacity),
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            seen: 0,
        }
    }
    pub fn observe(&mut self, value: f64) {
        debug_assert!(value.is_finite());
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.low.insert(value);
        self.high.insert(value);
        self.seen += 1;
    }
    pub fn low(&self) -> &Tail {
        &self.low
    }
    pub fn high(&self) -> &Tail {
        &self.high
    }
    /// Smallest value observed, if any.
    pub fn min(&self) -> Option<f64> {
        (self.seen > 0).then_some(self.min)
    }
    /// Largest value observed, if any.
    pub fn max(&self) -> Option<f64> {
        (self.seen > 0).then_some(self.max)
    }
    pub fn seen(&self) -> usize {
        self.seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_track_both_ends() {
        let mut extremes = Extremes::with_capacity(2);
        for v in [3., -4., 10., 0.5, 7.] {
            extremes.observe(v);
        }
        assert_eq!(extremes.min(), Some(-4.));
        assert_eq!(extremes.max(), Some(10.));
        assert_eq!(extremes.low().to_sorted_vec(), vec![-4., 0.5]);
        assert_eq!(extremes.high().to_sorted_vec(), vec![7., 10.]);
        assert_eq!(extremes.seen(), 5);
    }

    #[test]
    fn empty_extremes_have_no_bounds() {
        let extremes = Extremes::default();
        assert_eq!(extremes.min(), None);
        assert_eq!(extremes.max(), None);
        assert!(extremes.low().is_empty());
    }
}

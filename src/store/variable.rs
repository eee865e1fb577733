use std::collections::HashSet;

/// A named sequence of finite observations, immutable once built.
///
/// `distinct` holds each value once, in order of first appearance. Values are
/// compared by bit pattern, so `0.0` and `-0.0` are distinct.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    values: Vec<f64>,
    distinct: Vec<f64>,
}

impl Variable {
    /// Build from raw values, dropping anything that is not finite.
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        let values = values
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<f64>>();
        let ref mut seen = HashSet::with_capacity(values.len());
        let distinct = values
            .iter()
            .copied()
            .filter(|v| seen.insert(v.to_bits()))
            .collect::<Vec<f64>>();
        Self {
            name: name.into(),
            values,
            distinct,
        }
    }

    /// Parse newline-delimited text. Returns the variable and the number of
    /// non-empty lines that were not a finite number.
    pub fn parse(name: impl Into<String>, text: &str) -> (Self, usize) {
        let mut dropped = 0;
        let values = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| match line.parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => {
                    dropped += 1;
                    None
                }
            })
            .collect::<Vec<f64>>();
        (Self::new(name, values), dropped)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn values(&self) -> &[f64] {
        &self.values
    }
    pub fn distinct(&self) -> &[f64] {
        &self.distinct
    }
    pub fn unique(&self) -> usize {
        self.distinct.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

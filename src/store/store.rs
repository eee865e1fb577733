use super::*;
use crate::UNIQUE_LIMIT;

/// The working set of variables plus global statistics gathered while loading.
///
/// Variables are kept sorted by name so iteration order, and everything
/// derived from it, is deterministic.
#[derive(Debug, Clone)]
pub struct Store {
    variables: Vec<Variable>,
    extremes: Extremes,
    excluded: Vec<String>,
    dropped: usize,
}

impl Store {
    /// Read every named variable from `source`, then exclude variables with
    /// more than [`UNIQUE_LIMIT`] distinct values.
    pub fn load<S>(source: &S, names: &[String]) -> anyhow::Result<Self>
    where
        S: Source + ?Sized,
    {
        log::info!("{:<32}{:<32}", "loading variables", names.len());
        let mut builder = Builder::default();
        for name in names {
            let text = source.read(name)?;
            let (variable, dropped) = Variable::parse(name.as_str(), &text);
            if dropped > 0 {
                log::warn!("dropped {} non-numeric lines from {}", dropped, name);
            }
            builder.dropped += dropped;
            builder.absorb(variable);
        }
        Ok(builder.build())
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables
            .binary_search_by(|v| v.name().cmp(name))
            .ok()
            .map(|i| &self.variables[i])
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(Variable::name)
    }
    pub fn len(&self) -> usize {
        self.variables.len()
    }
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
    pub fn extremes(&self) -> &Extremes {
        &self.extremes
    }
    /// Smallest observation loaded, including excluded variables.
    pub fn min(&self) -> Option<f64> {
        self.extremes.min()
    }
    /// Largest observation loaded, including excluded variables.
    pub fn max(&self) -> Option<f64> {
        self.extremes.max()
    }
    /// Variables removed by the distinct-value filter.
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }
    /// Lines that failed to parse as a finite number.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl<N> FromIterator<(N, Vec<f64>)> for Store
where
    N: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, Vec<f64>)>>(iter: I) -> Self {
        let mut builder = Builder::default();
        for (name, values) in iter {
            let raw = values.len();
            let variable = Variable::new(name, values);
            builder.dropped += raw - variable.values().len();
            builder.absorb(variable);
        }
        builder.build()
    }
}

#[derive(Default)]
struct Builder {
    variables: std::collections::BTreeMap<String, Variable>,
    extremes: Extremes,
    dropped: usize,
}

impl Builder {
    fn absorb(&mut self, variable: Variable) {
        variable
            .values()
            .iter()
            .for_each(|v| self.extremes.observe(*v));
        self.variables.insert(variable.name().to_string(), variable);
    }
    fn build(self) -> Store {
        let (kept, cut) = self
            .variables
            .into_values()
            .partition::<Vec<Variable>, _>(|v| v.unique() <= UNIQUE_LIMIT);
        let excluded = cut
            .into_iter()
            .inspect(|v| log::debug!("excluding {} ({} unique values)", v.name(), v.unique()))
            .map(|v| v.name().to_string())
            .collect::<Vec<String>>();
        log::info!(
            "{:<32}{:<32}",
            "variables retained",
            format!("{} kept {} excluded", kept.len(), excluded.len())
        );
        Store {
            variables: kept,
            extremes: self.extremes,
            excluded,
            dropped: self.dropped,
        }
    }
}

use super::*;
use crate::Likelihood;
use crate::Prior;
use crate::mixture::*;
use crate::store::*;
use anyhow::Context;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Component chosen for one distinct value of one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub variable: String,
    pub value: f64,
    pub component: usize,
}

/// Parameters of one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub cluster: usize,
    pub component: usize,
    pub mean: f64,
    pub variance: f64,
    pub prior: Prior,
}

/// Final artifacts of a fitting run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub config: Config,
    pub iterations: usize,
    /// Total winning score of the last E-step.
    pub score: Likelihood,
    /// variable -> cluster
    pub clusters: BTreeMap<String, usize>,
    /// (variable, value) -> component within the variable's cluster
    pub components: Vec<Placement>,
    /// (cluster, component) -> gaussian and log-prior
    pub parameters: Vec<Parameter>,
    /// cluster -> log-prior
    pub priors: Vec<Prior>,
    pub diagnostics: Diagnostics,
    /// Variables removed by the distinct-value filter.
    pub excluded: Vec<String>,
    /// Input lines that were not finite numbers.
    pub dropped: usize,
}

impl Report {
    pub fn new(
        config: Config,
        iterations: usize,
        store: &Store,
        assignment: Option<&Assignment>,
        mixture: &Mixture,
        diagnostics: Diagnostics,
    ) -> Self {
        let verdicts = assignment.map(Assignment::verdicts);
        Self {
            config,
            iterations,
            diagnostics,
            score: assignment.map_or(0., Assignment::score),
            clusters: verdicts
                .into_iter()
                .flatten()
                .map(|(name, verdict)| (name.clone(), verdict.cluster()))
                .collect(),
            components: verdicts
                .into_iter()
                .flatten()
                .flat_map(|(name, verdict)| {
                    verdict.components().iter().map(|(value, component)| Placement {
                        variable: name.clone(),
                        value: *value,
                        component: *component,
                    })
                })
                .collect(),
            parameters: mixture
                .slots()
                .filter_map(|slot| mixture.component(slot).map(|c| (slot, c)))
                .map(|(slot, c)| Parameter {
                    cluster: slot.cluster,
                    component: slot.component,
                    mean: c.gaussian().mean(),
                    variance: c.gaussian().variance(),
                    prior: c.prior(),
                })
                .collect(),
            priors: mixture.clusters().iter().map(Cluster::prior).collect(),
            excluded: store.excluded().to_vec(),
            dropped: store.dropped(),
        }
    }

    /// Write as pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create report directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serialize report")?;
        std::fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
        log::info!("{:<32}{:<32}", "saved report", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read report {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parse report {}", path.display()))
    }
}

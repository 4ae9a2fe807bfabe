//! Lineage manifests: jobs and the jobs they depend on.
//!
//! A manifest lists jobs in dependency order. It is loaded from TOML or JSON
//! and turned into a [`DependencyDAG`] to plan execution.
//!
//! ```toml
//! [[jobs]]
//! id = "ingest"
//!
//! [[jobs]]
//! id = "clean"
//! depends_on = ["ingest"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_core::{Error, Result, ResultExt};
use tracing::debug;

use crate::dag::DependencyDAG;

/// One job in a lineage manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Unique job identifier.
    pub id: String,
    /// Jobs whose output this job reads. They must appear earlier in the manifest.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// An ordered list of jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageManifest {
    #[serde(default)]
    pub jobs: Vec<JobSpec>,
}

impl LineageManifest {
    /// # Errors
    ///
    /// Returns `Error::TomlParseFailed` if the document is not a valid manifest.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::toml_parse_failed(e.to_string()))
    }

    /// # Errors
    ///
    /// Returns `Error::JsonParseFailed` if the document is not a valid manifest.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).map_err(|e| Error::json_parse_failed(e.to_string()))
    }

    /// Load a manifest, parsing `.toml` files as TOML and anything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileReadFailed` if the file cannot be read, or a parse
    /// error for the detected format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::file_read_failed(path, e.to_string()))?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let manifest = if is_toml {
            Self::from_toml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        };

        manifest
            .inspect_error(|e| debug!(path = %path.display(), error = %e, "rejected lineage manifest"))
            .inspect(|m| debug!(path = %path.display(), jobs = m.jobs.len(), "loaded lineage manifest"))
    }

    /// Build the dependency DAG, adding jobs in manifest order.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRecord` for a duplicated job id or a dependency
    /// that does not appear before the job that needs it.
    pub fn build_dag(&self) -> Result<DependencyDAG<String>> {
        let mut dag = DependencyDAG::new();
        for job in &self.jobs {
            dag.add(job.id.clone(), &job.depends_on)?;
        }
        Ok(dag)
    }

    /// Jobs to run for `targets`, parents first. No targets means every job.
    ///
    /// Only the targets themselves are returned; their ancestors are not
    /// pulled in.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRecord` if the DAG cannot be built or a target
    /// is not a job in the manifest.
    pub fn execution_plan(&self, targets: &[String]) -> Result<Vec<String>> {
        let dag = self.build_dag()?;
        let plan = if targets.is_empty() {
            dag.all_in_topological_order()?
        } else {
            dag.sort_topologically(targets)?
        };
        Ok(plan)
    }
}

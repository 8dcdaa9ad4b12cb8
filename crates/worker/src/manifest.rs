//! Pipeline manifest: the stages of one pass and where their files live.
//!
//! ```json
//! {
//!   "stages": [
//!     {
//!       "name": "align",
//!       "kind": "alignment",
//!       "log_file": "/data/logs/mafft.csv",
//!       "input_dir": "/data/genes",
//!       "output_dir": "/data/aligned",
//!       "options": { "amino_flag": "" }
//!     }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use seqjobs_core::{JobKind, JobOptions};
use seqjobs_pipeline::EnsureRequest;

use crate::error::WorkerError;

/// Input file suffix used for discovery when a stage names none.
pub const DEFAULT_INPUT_SUFFIX: &str = "fasta";

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub stages: Vec<StageSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StageSpec {
    pub name: String,
    /// Job kind name, e.g. `alignment` or `tree-multi-partition`.
    pub kind: String,
    /// Selects the model-finder script for multi-partition trees.
    #[serde(default)]
    pub modelfinder: bool,
    pub log_file: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Explicit input ids. When absent, ids are discovered in `input_dir`.
    #[serde(default)]
    pub inputs: Option<Vec<String>>,
    #[serde(default)]
    pub input_suffix: Option<String>,
    #[serde(default)]
    pub options: JobOptions,
    #[serde(default)]
    pub force: bool,
    #[serde(default = "default_restart_fails")]
    pub restart_fails: bool,
}

fn default_restart_fails() -> bool {
    true
}

impl Manifest {
    /// Read and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self, WorkerError> {
        let text = std::fs::read_to_string(path)?;
        let manifest: Manifest =
            serde_json::from_str(&text).map_err(|source| WorkerError::Manifest {
                path: path.to_path_buf(),
                source,
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reject unknown kinds and stages that would write the same log.
    ///
    /// Log paths are compared after making them absolute and removing `.`
    /// and `..` components. Symlinks are not followed.
    pub fn validate(&self) -> Result<(), WorkerError> {
        let mut owners: HashMap<PathBuf, &str> = HashMap::new();
        for stage in &self.stages {
            stage.job_kind()?;
            let key = normalize_path(&std::path::absolute(&stage.log_file)?);
            if let Some(first) = owners.insert(key, &stage.name) {
                return Err(WorkerError::SharedLogFile {
                    first: first.to_string(),
                    second: stage.name.clone(),
                    log_file: stage.log_file.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Lexically remove `.` and `..` components.
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

impl StageSpec {
    pub fn job_kind(&self) -> Result<JobKind, WorkerError> {
        let kind = self.kind.parse::<JobKind>()?;
        Ok(match kind {
            JobKind::TreeMultiPartition { .. } if self.modelfinder => {
                JobKind::TreeMultiPartition { modelfinder: true }
            }
            other => other,
        })
    }

    /// Input ids for this pass, sorted.
    ///
    /// Discovery lists `input_dir` and keeps the stem of every file ending in
    /// `.<input_suffix>`.
    pub fn input_ids(&self) -> Result<Vec<String>, WorkerError> {
        if let Some(inputs) = &self.inputs {
            let mut ids = inputs.clone();
            ids.sort();
            ids.dedup();
            return Ok(ids);
        }

        let suffix = format!(
            ".{}",
            self.input_suffix.as_deref().unwrap_or(DEFAULT_INPUT_SUFFIX)
        );
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.input_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(&suffix)) {
                if !stem.is_empty() {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// One tracker request per input id.
    pub fn requests(&self) -> Result<Vec<EnsureRequest>, WorkerError> {
        Ok(self
            .input_ids()?
            .into_iter()
            .map(|id| {
                EnsureRequest::new(id, &self.input_dir, &self.output_dir)
                    .options(self.options.clone())
                    .force(self.force)
                    .restart_fails(self.restart_fails)
            })
            .collect())
    }
}

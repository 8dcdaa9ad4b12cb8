//! Registry of submission scripts, keyed by [`JobKind::script_key`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CoreError;
use crate::kinds::JobKind;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ScriptRegistry(BTreeMap<String, PathBuf>);

impl ScriptRegistry {
    /// Load a JSON object mapping script keys to script paths.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))
    }

    pub fn with(mut self, key: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        self.0.insert(key.into(), script.into());
        self
    }

    /// Script path for a job kind.
    pub fn script_for(&self, kind: JobKind) -> Result<&Path, CoreError> {
        self.0
            .get(kind.script_key())
            .map(PathBuf::as_path)
            .ok_or_else(|| CoreError::UnknownScript(kind.script_key().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_load_and_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scripts.json");
        std::fs::write(
            &file,
            r#"{"MAFFT_SINGLE_GENE": "/opt/slurm/mafft.sh", "ASN_2_GB": "/opt/slurm/asn2gb.sh"}"#,
        )
        .unwrap();

        let registry = ScriptRegistry::load(&file).unwrap();

        assert_eq!(
            registry.script_for(JobKind::Alignment).unwrap(),
            Path::new("/opt/slurm/mafft.sh")
        );
        assert_matches!(
            registry.script_for(JobKind::Trim),
            Err(CoreError::UnknownScript(key)) if key == "TRIMAL_SINGLE_GENE_GAPFRACTION"
        );
    }

    #[test]
    fn test_load_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scripts.json");
        std::fs::write(&file, "[1, 2]").unwrap();
        assert_matches!(ScriptRegistry::load(&file), Err(CoreError::Config(_)));
    }
}

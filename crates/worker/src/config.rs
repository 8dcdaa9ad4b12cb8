use std::path::PathBuf;

use seqjobs_slurm::slurm::split_command;
use seqjobs_slurm::SlurmCommands;

use crate::error::WorkerError;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Pipeline manifest (JSON).
    pub manifest: PathBuf,
    /// Script registry (JSON object of script key to path).
    pub scripts: PathBuf,
    pub commands: SlurmCommands,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                  | Default             |
    /// |--------------------------|---------------------|
    /// | `SEQJOBS_MANIFEST`       | required            |
    /// | `SEQJOBS_SCRIPTS`        | required            |
    /// | `SEQJOBS_SUBMIT_CMD`     | `sbatch`            |
    /// | `SEQJOBS_SHOW_JOB_CMD`   | `scontrol show job` |
    /// | `SEQJOBS_ACCOUNTING_CMD` | `sacct`             |
    /// | `SEQJOBS_CANCEL_CMD`     | `scancel`           |
    pub fn from_env() -> Result<Self, WorkerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, WorkerError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .ok_or(WorkerError::MissingEnv(key))
        };
        let command = |key: &str, default: Vec<String>| {
            lookup(key)
                .map(|v| split_command(&v))
                .filter(|c| !c.is_empty())
                .unwrap_or(default)
        };

        let defaults = SlurmCommands::default();
        Ok(Self {
            manifest: required("SEQJOBS_MANIFEST")?,
            scripts: required("SEQJOBS_SCRIPTS")?,
            commands: SlurmCommands {
                submit: command("SEQJOBS_SUBMIT_CMD", defaults.submit),
                show_job: command("SEQJOBS_SHOW_JOB_CMD", defaults.show_job),
                accounting: command("SEQJOBS_ACCOUNTING_CMD", defaults.accounting),
                cancel: command("SEQJOBS_CANCEL_CMD", defaults.cancel),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply() {
        let config = WorkerConfig::from_lookup(lookup(&[
            ("SEQJOBS_MANIFEST", "/etc/seqjobs/manifest.json"),
            ("SEQJOBS_SCRIPTS", "/etc/seqjobs/scripts.json"),
        ]))
        .unwrap();
        assert_eq!(config.commands, SlurmCommands::default());
        assert_eq!(config.manifest, PathBuf::from("/etc/seqjobs/manifest.json"));
    }

    #[test]
    fn test_command_overrides_are_split() {
        let config = WorkerConfig::from_lookup(lookup(&[
            ("SEQJOBS_MANIFEST", "m.json"),
            ("SEQJOBS_SCRIPTS", "s.json"),
            ("SEQJOBS_SUBMIT_CMD", "sbatch --qos=long --partition=batch"),
            ("SEQJOBS_CANCEL_CMD", "  "),
        ]))
        .unwrap();
        assert_eq!(
            config.commands.submit,
            vec!["sbatch", "--qos=long", "--partition=batch"]
        );
        assert_eq!(config.commands.cancel, vec!["scancel"]);
    }

    #[test]
    fn test_missing_manifest_is_error() {
        assert_matches!(
            WorkerConfig::from_lookup(lookup(&[("SEQJOBS_SCRIPTS", "s.json")])),
            Err(WorkerError::MissingEnv("SEQJOBS_MANIFEST"))
        );
    }
}

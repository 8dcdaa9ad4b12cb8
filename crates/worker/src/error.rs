use std::path::PathBuf;

use seqjobs_core::CoreError;
use seqjobs_db::LogError;
use seqjobs_pipeline::TrackerError;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Environment variable {0} must be set")]
    MissingEnv(&'static str),

    #[error("Invalid manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Stages {first} and {second} share log file {}", log_file.display())]
    SharedLogFile {
        first: String,
        second: String,
        log_file: PathBuf,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Log(#[from] LogError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error("Stage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

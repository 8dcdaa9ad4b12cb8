use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Missing input: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Job kind {kind} requires option '{option}'")]
    MissingOption { kind: &'static str, option: &'static str },

    #[error("Invalid option '{option}' for job kind {kind}: {reason}")]
    InvalidOption {
        kind: &'static str,
        option: String,
        reason: String,
    },

    #[error("Unknown job kind: {0}")]
    UnknownJobKind(String),

    #[error("Invalid job id: {0}")]
    InvalidJobId(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Unknown script key: {0}")]
    UnknownScript(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

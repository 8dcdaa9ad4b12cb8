//! One pipeline pass: load the manifest, then bring every stage's inputs to
//! completion through its own job tracker.

pub mod config;
pub mod error;
pub mod manifest;
pub mod runner;

pub use config::WorkerConfig;
pub use error::WorkerError;
pub use manifest::{Manifest, StageSpec};
pub use runner::{run_manifest, run_stage, StageResult};

//! One row of the job log.

use std::path::PathBuf;

use crate::job_id::JobId;
use crate::job_status::JobStatus;
use crate::types::{Timestamp, MISSING_VALUE};

/// Result of probing the filesystem for a job's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputState {
    /// Primary output file (or base path for multi-file outputs).
    pub reference: PathBuf,
    /// Size of the primary output, `None` when the output is absent.
    pub size: Option<u64>,
}

impl OutputState {
    pub fn absent(reference: impl Into<PathBuf>) -> Self {
        Self {
            reference: reference.into(),
            size: None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.size.is_some()
    }
}

/// A submitted (or pre-existing) unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub job_id: JobId,
    pub status: JobStatus,
    pub submitted_at: Timestamp,
    pub last_checked_at: Timestamp,
    pub duration: String,
    pub time_limit: String,
    pub job_kind: String,
    pub script_reference: String,
    pub stdout_path: String,
    pub stderr_path: String,
    pub input_id: String,
    pub core_count: Option<u32>,
    pub output_reference: String,
    pub output_size: Option<u64>,
    /// Exact positional arguments of the submission, in order.
    pub extra_args: Vec<String>,
}

impl JobRecord {
    /// Record for output that was found before any job ran.
    ///
    /// The observation time doubles as `submitted_at` so that any later real
    /// submission for the same input sorts after it.
    pub fn preexisting(
        input_id: &str,
        job_kind: &str,
        script_reference: &str,
        output: &OutputState,
        extra_args: Vec<String>,
        observed_at: Timestamp,
    ) -> Self {
        Self {
            job_id: JobId::PreexistingOutput,
            status: JobStatus::Completed,
            submitted_at: observed_at,
            last_checked_at: observed_at,
            duration: MISSING_VALUE.to_string(),
            time_limit: MISSING_VALUE.to_string(),
            job_kind: job_kind.to_string(),
            script_reference: script_reference.to_string(),
            stdout_path: MISSING_VALUE.to_string(),
            stderr_path: MISSING_VALUE.to_string(),
            input_id: input_id.to_string(),
            core_count: None,
            output_reference: output.reference.to_string_lossy().to_string(),
            output_size: output.size,
            extra_args,
        }
    }

    /// Apply a freshly observed status.
    ///
    /// Returns `true` if the status changed. Backward transitions are
    /// dropped and the last known status is kept.
    pub fn apply_status(&mut self, next: JobStatus) -> bool {
        if self.status == next {
            return false;
        }
        if !self.status.accepts(next) {
            tracing::warn!(
                job_id = %self.job_id,
                input_id = %self.input_id,
                current = %self.status,
                observed = %next,
                "Ignoring backward status transition",
            );
            return false;
        }
        self.status = next;
        true
    }

    /// Refresh the cached output size.
    pub fn set_output(&mut self, output: &OutputState) {
        self.output_reference = output.reference.to_string_lossy().to_string();
        self.output_size = output.size;
    }

    pub fn output_present(&self) -> bool {
        self.output_size.is_some()
    }
}

use std::fmt;
use std::path::PathBuf;

use seqjobs_core::{JobId, JobOptions, JobStatus};

/// One unit of work to bring to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsureRequest {
    pub input_id: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub options: JobOptions,
    /// Cancel open jobs and resubmit even if output exists.
    pub force: bool,
    /// Resubmit when the latest attempt failed, was cancelled, or timed out.
    pub restart_fails: bool,
}

impl EnsureRequest {
    pub fn new(
        input_id: impl Into<String>,
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_id: input_id.into(),
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            options: JobOptions::default(),
            force: false,
            restart_fails: true,
        }
    }

    pub fn options(mut self, options: JobOptions) -> Self {
        self.options = options;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn restart_fails(mut self, restart_fails: bool) -> Self {
        self.restart_fails = restart_fails;
        self
    }
}

/// What [`JobTracker::ensure`](crate::JobTracker::ensure) decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// Output exists or the latest job completed. Nothing was submitted.
    Satisfied,
    /// A new job was submitted.
    Submitted(JobId),
    /// A job for this input is still pending or running.
    AlreadySubmitted(JobId),
    /// The latest job ended badly and restarting was not requested.
    KnownFailure { job_id: JobId, status: JobStatus },
}

impl EnsureOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnsureOutcome::Satisfied => "satisfied",
            EnsureOutcome::Submitted(_) => "submitted",
            EnsureOutcome::AlreadySubmitted(_) => "already_submitted",
            EnsureOutcome::KnownFailure { .. } => "known_failure",
        }
    }

    pub fn job_id(&self) -> Option<JobId> {
        match self {
            EnsureOutcome::Satisfied => None,
            EnsureOutcome::Submitted(id) | EnsureOutcome::AlreadySubmitted(id) => Some(*id),
            EnsureOutcome::KnownFailure { job_id, .. } => Some(*job_id),
        }
    }
}

impl fmt::Display for EnsureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnsureOutcome::Satisfied => f.write_str(self.as_str()),
            EnsureOutcome::Submitted(id) | EnsureOutcome::AlreadySubmitted(id) => {
                write!(f, "{} ({id})", self.as_str())
            }
            EnsureOutcome::KnownFailure { job_id, status } => {
                write!(f, "{} ({job_id}, {status})", self.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req = EnsureRequest::new("rbcL", "/in", "/out");
        assert!(!req.force);
        assert!(req.restart_fails);
        assert!(req.options.get("fasta_suffix").is_none());
    }

    #[test]
    fn test_outcome_display() {
        let outcome = EnsureOutcome::KnownFailure {
            job_id: JobId::Scheduler(12),
            status: JobStatus::Timeout,
        };
        assert_eq!(outcome.to_string(), "known_failure (12, TIMEOUT)");
        assert_eq!(EnsureOutcome::Satisfied.job_id(), None);
    }
}

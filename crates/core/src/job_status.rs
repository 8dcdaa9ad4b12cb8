//! Job status names and the forward-only transition rule.
//!
//! Status names match the scheduler's accounting output so that a log row
//! can be compared against `sacct`/`scontrol` output by eye.

use std::fmt;

/// Lifecycle status of a tracked job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
    Timeout,
    Unknown,
}

impl JobStatus {
    /// Upper-case name as written to the job log.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Running => "RUNNING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
            JobStatus::Cancelled => "CANCELLED",
            JobStatus::Timeout => "TIMEOUT",
            JobStatus::Unknown => "UNKNOWN",
        }
    }

    /// Parse a scheduler or log status string.
    ///
    /// Accepts the truncated `CANCELLED+` and the verbose `CANCELLED by 1234`
    /// forms. Scheduler states outside the tracked set are folded into the
    /// closest tracked status; anything unrecognised becomes `Unknown`.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("CANCELLED") {
            return JobStatus::Cancelled;
        }
        match s {
            "PENDING" | "REQUEUED" | "REQUEUE_HOLD" | "REQUEUE_FED" | "RESIZING" => {
                JobStatus::Pending
            }
            "RUNNING" | "COMPLETING" | "CONFIGURING" | "SUSPENDED" | "STOPPED" | "SIGNALING"
            | "STAGE_OUT" => JobStatus::Running,
            "COMPLETED" => JobStatus::Completed,
            "FAILED" | "NODE_FAIL" | "OUT_OF_MEMORY" | "BOOT_FAIL" | "DEADLINE" => {
                JobStatus::Failed
            }
            "PREEMPTED" | "REVOKED" => JobStatus::Cancelled,
            "TIMEOUT" => JobStatus::Timeout,
            _ => JobStatus::Unknown,
        }
    }

    /// Terminal statuses are never re-queried.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled | JobStatus::Timeout
        )
    }

    /// Terminal and not successful.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            JobStatus::Failed | JobStatus::Cancelled | JobStatus::Timeout
        )
    }

    /// Pending or running: the scheduler still owns the job.
    pub fn is_open(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Running)
    }

    /// Whether a record currently in `self` may move to `next`.
    ///
    /// Terminal statuses only accept themselves. `Unknown` is never entered
    /// from a known status, so a flaky query cannot erase what we know.
    pub fn accepts(&self, next: JobStatus) -> bool {
        if *self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        match next {
            JobStatus::Unknown => false,
            JobStatus::Pending => *self == JobStatus::Unknown,
            _ => true,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

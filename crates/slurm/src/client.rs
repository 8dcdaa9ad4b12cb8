use std::path::Path;

use seqjobs_core::types::Timestamp;
use seqjobs_core::wall_clock::{format_wall_clock, ZERO_DURATION};
use seqjobs_core::JobStatus;

use crate::error::SchedulerError;

/// Snapshot of a job from the live queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveJobInfo {
    pub status: JobStatus,
    pub submitted_at: Timestamp,
    pub duration: String,
    pub time_limit: String,
    pub stdout_path: String,
    pub stderr_path: String,
    pub core_count: u32,
}

/// Accounting entry for a job. Available long after the job left the queue,
/// but without output file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryInfo {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub status: JobStatus,
}

impl HistoryInfo {
    /// Elapsed wall-clock time; a job that has not ended is measured to `now`.
    pub fn duration(&self, now: Timestamp) -> String {
        match (self.start, self.end) {
            (None, _) => ZERO_DURATION.to_string(),
            (Some(start), None) => format_wall_clock(now - start),
            (Some(start), Some(end)) => format_wall_clock(end - start),
        }
    }
}

/// Synchronous operations against a cluster scheduler.
///
/// Every call blocks until the underlying command returns. Callers may retry
/// any of them; none has side effects beyond what the scheduler itself does.
pub trait SchedulerClient {
    /// Submit `script` with positional `args`; returns the scheduler job id.
    fn submit(&self, script: &Path, args: &[String]) -> Result<u64, SchedulerError>;

    /// Query the live queue. Fails once the job has aged out of it.
    fn describe(&self, job_id: u64) -> Result<LiveJobInfo, SchedulerError>;

    /// Query job accounting.
    fn history(&self, job_id: u64) -> Result<HistoryInfo, SchedulerError>;

    /// Ask the scheduler to terminate a job. Does not wait for it to stop.
    fn cancel(&self, job_id: u64) -> Result<(), SchedulerError>;
}

impl<T: SchedulerClient + ?Sized> SchedulerClient for &T {
    fn submit(&self, script: &Path, args: &[String]) -> Result<u64, SchedulerError> {
        (**self).submit(script, args)
    }

    fn describe(&self, job_id: u64) -> Result<LiveJobInfo, SchedulerError> {
        (**self).describe(job_id)
    }

    fn history(&self, job_id: u64) -> Result<HistoryInfo, SchedulerError> {
        (**self).history(job_id)
    }

    fn cancel(&self, job_id: u64) -> Result<(), SchedulerError> {
        (**self).cancel(job_id)
    }
}

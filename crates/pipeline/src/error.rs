use seqjobs_core::CoreError;
use seqjobs_db::LogError;
use seqjobs_slurm::SchedulerError;

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Cannot resolve job: {0}")]
    Resolve(#[from] CoreError),

    #[error("Job log error: {0}")]
    Log(#[from] LogError),

    #[error("Submission failed: {0}")]
    Submission(#[source] SchedulerError),

    #[error("Scheduler query failed: {0}")]
    SchedulerQuery(#[source] SchedulerError),
}

impl TrackerError {
    /// Whether a batch must stop rather than move on to the next input.
    ///
    /// Only log failures qualify: once the log cannot be written, further
    /// submissions would go unrecorded.
    pub fn is_fatal_for_batch(&self) -> bool {
        matches!(self, TrackerError::Log(_))
    }
}

/// Error type for scheduler operations.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("Failed to execute `{command}`: {source}")]
    Exec {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No job id in submission response: {response}")]
    Submission { response: String },

    #[error("Status query for job {job_id} failed: {reason}")]
    Query { job_id: u64, reason: String },
}

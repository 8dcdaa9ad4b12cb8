//! Job tracking: decides, per input, whether to skip, reuse, or (re)submit a
//! scheduler job, and keeps the job log in step with the scheduler.

pub mod error;
pub mod report;
pub mod request;
pub mod tracker;

pub use error::TrackerError;
pub use report::{BatchReport, InputFailure};
pub use request::{EnsureOutcome, EnsureRequest};
pub use tracker::JobTracker;

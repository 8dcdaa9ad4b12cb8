//! Domain types for tracking batch jobs submitted to a cluster scheduler.
//!
//! This crate has no internal dependencies so that the job log, the
//! scheduler client and the tracker can all share it.

pub mod error;
pub mod job_id;
pub mod job_record;
pub mod job_status;
pub mod kinds;
pub mod options;
pub mod scripts;
pub mod types;
pub mod wall_clock;

pub use error::CoreError;
pub use job_id::JobId;
pub use job_record::{JobRecord, OutputState};
pub use job_status::JobStatus;
pub use kinds::{ArgumentResolver, JobKind, OutputProbe, ResolvedArgs};
pub use options::JobOptions;

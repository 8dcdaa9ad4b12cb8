//! Persisted job log.
//!
//! The log is a CSV table rewritten in full after every mutation. One log
//! file is bound to one job kind: its header is the common columns plus the
//! kind's argument columns.

pub mod columns;
pub mod error;
pub mod job_log;

pub use error::LogError;
pub use job_log::JobLog;

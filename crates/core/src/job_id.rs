use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Job id written for output that existed before any job was submitted.
pub const PREEXISTING_OUTPUT: &str = "PREEXISTING_OUTPUT";

/// Identifier of a tracked job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobId {
    /// Identifier assigned by the scheduler at submission.
    Scheduler(u64),
    /// No job was run; the output was already there when first observed.
    PreexistingOutput,
}

impl JobId {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, JobId::PreexistingOutput)
    }

    /// The scheduler id, if a job was actually submitted.
    pub fn scheduler_id(&self) -> Option<u64> {
        match self {
            JobId::Scheduler(id) => Some(*id),
            JobId::PreexistingOutput => None,
        }
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Scheduler(id) => write!(f, "{id}"),
            JobId::PreexistingOutput => f.write_str(PREEXISTING_OUTPUT),
        }
    }
}

impl FromStr for JobId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == PREEXISTING_OUTPUT {
            return Ok(JobId::PreexistingOutput);
        }
        s.parse::<u64>()
            .map(JobId::Scheduler)
            .map_err(|_| CoreError::InvalidJobId(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_parses() {
        let id: JobId = PREEXISTING_OUTPUT.parse().unwrap();
        assert!(id.is_sentinel());
        assert_eq!(id.scheduler_id(), None);
    }

    #[test]
    fn test_scheduler_id_parses() {
        let id: JobId = "4242".parse().unwrap();
        assert_eq!(id, JobId::Scheduler(4242));
        assert_eq!(id.to_string(), "4242");
    }

    #[test]
    fn test_garbage_rejected() {
        assert!("12ab".parse::<JobId>().is_err());
        assert!("".parse::<JobId>().is_err());
    }
}

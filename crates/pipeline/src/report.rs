//! Summary of one pass over a batch of inputs.

use std::collections::BTreeMap;

use seqjobs_core::{JobId, JobKind, JobStatus};

use crate::error::TrackerError;
use crate::request::EnsureOutcome;

/// An input whose `ensure` call failed without stopping the batch.
#[derive(Debug)]
pub struct InputFailure {
    pub input_id: String,
    pub error: TrackerError,
}

#[derive(Debug)]
pub struct BatchReport {
    pub kind: JobKind,
    /// Outcome per input, in request order.
    pub outcomes: Vec<(String, EnsureOutcome)>,
    pub failures: Vec<InputFailure>,
    /// Status of each input's latest record after the pass.
    pub status_counts: BTreeMap<JobStatus, usize>,
}

impl BatchReport {
    pub fn new(kind: JobKind) -> Self {
        Self {
            kind,
            outcomes: Vec::new(),
            failures: Vec::new(),
            status_counts: BTreeMap::new(),
        }
    }

    /// Number of inputs per outcome label.
    pub fn outcome_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for (_, outcome) in &self.outcomes {
            *counts.entry(outcome.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Job ids submitted during this pass.
    pub fn submitted(&self) -> Vec<(&str, JobId)> {
        self.outcomes
            .iter()
            .filter_map(|(input, outcome)| match outcome {
                EnsureOutcome::Submitted(id) => Some((input.as_str(), *id)),
                _ => None,
            })
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_counts_group_by_label() {
        let mut report = BatchReport::new(JobKind::Alignment);
        report.outcomes = vec![
            ("rbcL".into(), EnsureOutcome::Satisfied),
            ("matK".into(), EnsureOutcome::Submitted(JobId::Scheduler(3))),
            ("psbA".into(), EnsureOutcome::Submitted(JobId::Scheduler(4))),
        ];

        let counts = report.outcome_counts();
        assert_eq!(counts.get("submitted"), Some(&2));
        assert_eq!(counts.get("satisfied"), Some(&1));
        assert_eq!(
            report.submitted(),
            vec![("matK", JobId::Scheduler(3)), ("psbA", JobId::Scheduler(4))]
        );
        assert!(report.is_clean());
    }
}

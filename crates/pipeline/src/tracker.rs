//! The per-kind job tracker.
//!
//! For one input, [`JobTracker::ensure`] walks these states:
//!
//! | State            | Decision                                                |
//! |------------------|---------------------------------------------------------|
//! | output present   | `Satisfied`; record or refresh the output size          |
//! | no history       | submit                                                  |
//! | latest completed | `Satisfied`, no scheduler call                          |
//! | latest failed    | submit if `restart_fails`, else `KnownFailure`          |
//! | latest open      | refresh; re-decide if it ended, else `AlreadySubmitted` |
//!
//! `force` skips the table: every open job for the input is cancelled and a
//! new one is submitted.

use std::fmt;
use std::path::PathBuf;

use seqjobs_core::scripts::ScriptRegistry;
use seqjobs_core::types::{now, MISSING_VALUE};
use seqjobs_core::{
    ArgumentResolver, JobId, JobKind, JobRecord, JobStatus, OutputProbe, OutputState,
    ResolvedArgs,
};
use seqjobs_db::JobLog;
use seqjobs_slurm::SchedulerClient;

use crate::error::TrackerError;
use crate::report::{BatchReport, InputFailure};
use crate::request::{EnsureOutcome, EnsureRequest};

/// Drives one job kind against one job log.
///
/// Calls are synchronous and block on the scheduler. Two trackers must not
/// share a log file.
pub struct JobTracker<S> {
    kind: JobKind,
    script: PathBuf,
    log: JobLog,
    scheduler: S,
}

impl<S> fmt::Debug for JobTracker<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobTracker")
            .field("kind", &self.kind)
            .field("script", &self.script)
            .field("records", &self.log.len())
            .finish_non_exhaustive()
    }
}

impl<S: SchedulerClient> JobTracker<S> {
    /// Build a tracker for the log's job kind.
    ///
    /// Fails with [`CoreError::UnknownScript`](seqjobs_core::CoreError) when
    /// the registry has no script for that kind.
    pub fn new(
        log: JobLog,
        scripts: &ScriptRegistry,
        scheduler: S,
    ) -> Result<Self, TrackerError> {
        let kind = log.kind();
        let script = scripts.script_for(kind)?.to_path_buf();
        Ok(Self {
            kind,
            script,
            log,
            scheduler,
        })
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn log(&self) -> &JobLog {
        &self.log
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn into_log(self) -> JobLog {
        self.log
    }

    // -----------------------------------------------------------------------
    // Public operations
    // -----------------------------------------------------------------------

    /// Make sure the work for one input is done, running, or (re)submitted.
    pub fn ensure(&mut self, req: &EnsureRequest) -> Result<EnsureOutcome, TrackerError> {
        let input_id = req.input_id.as_str();
        let args = self
            .kind
            .resolve(input_id, &req.input_dir, &req.output_dir, &req.options)?;

        if req.force {
            self.cancel_open(input_id)?;
            return self.submit(input_id, &args);
        }

        let output = self.kind.probe(input_id, &args)?;
        if output.is_present() {
            self.record_present_output(input_id, &args, &output)?;
            tracing::debug!(input_id, kind = self.kind.as_str(), "Output present");
            return Ok(EnsureOutcome::Satisfied);
        }

        let Some(latest) = self.log.find_latest(input_id).cloned() else {
            return self.submit(input_id, &args);
        };

        let latest = if latest.job_id.is_sentinel() || latest.status.is_terminal() {
            latest
        } else {
            self.refresh_or_keep(latest)?
        };

        match latest.status {
            JobStatus::Completed => {
                tracing::debug!(
                    input_id,
                    job_id = %latest.job_id,
                    "Latest job completed",
                );
                Ok(EnsureOutcome::Satisfied)
            }
            status if status.is_failure() => {
                if req.restart_fails {
                    tracing::info!(
                        input_id,
                        job_id = %latest.job_id,
                        status = %status,
                        "Restarting failed job",
                    );
                    self.submit(input_id, &args)
                } else {
                    Ok(EnsureOutcome::KnownFailure {
                        job_id: latest.job_id,
                        status,
                    })
                }
            }
            _ => {
                tracing::debug!(
                    input_id,
                    job_id = %latest.job_id,
                    status = %latest.status,
                    "Job still open",
                );
                Ok(EnsureOutcome::AlreadySubmitted(latest.job_id))
            }
        }
    }

    /// Re-query the latest record for an input if it is not terminal.
    ///
    /// Unlike [`ensure`](Self::ensure), scheduler failures are returned and
    /// the stored record is left as it was.
    pub fn refresh(&mut self, input_id: &str) -> Result<Option<JobRecord>, TrackerError> {
        let Some(mut record) = self.log.find_latest(input_id).cloned() else {
            return Ok(None);
        };
        if record.job_id.is_sentinel() || record.status.is_terminal() {
            return Ok(Some(record));
        }
        self.refresh_record(&mut record)?;
        self.log.upsert(record.clone())?;
        Ok(Some(record))
    }

    /// Run [`ensure`](Self::ensure) for every request in order.
    ///
    /// Failures of individual inputs are collected in the report; a log
    /// failure stops the batch.
    pub fn ensure_all(
        &mut self,
        requests: &[EnsureRequest],
    ) -> Result<BatchReport, TrackerError> {
        let mut report = BatchReport::new(self.kind);
        for req in requests {
            match self.ensure(req) {
                Ok(outcome) => report.outcomes.push((req.input_id.clone(), outcome)),
                Err(e) if e.is_fatal_for_batch() => return Err(e),
                Err(e) => {
                    tracing::error!(
                        input_id = %req.input_id,
                        kind = self.kind.as_str(),
                        error = %e,
                        "Input failed",
                    );
                    report.failures.push(InputFailure {
                        input_id: req.input_id.clone(),
                        error: e,
                    });
                }
            }
        }
        report.status_counts = self.log.status_counts();
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Steps
    // -----------------------------------------------------------------------

    /// Submit a new job and log it as pending.
    ///
    /// The output is checked before submitting so that, once the scheduler
    /// hands back a job id, only the log write can fail.
    fn submit(
        &mut self,
        input_id: &str,
        args: &ResolvedArgs,
    ) -> Result<EnsureOutcome, TrackerError> {
        let output = self.kind.probe(input_id, args)?;
        let values = args.values();
        let scheduler_id = self
            .scheduler
            .submit(&self.script, &values)
            .map_err(TrackerError::Submission)?;
        let job_id = JobId::Scheduler(scheduler_id);
        let submitted_at = now();

        let mut record = JobRecord {
            job_id,
            status: JobStatus::Pending,
            submitted_at,
            last_checked_at: submitted_at,
            duration: MISSING_VALUE.to_string(),
            time_limit: MISSING_VALUE.to_string(),
            job_kind: self.kind.as_str().to_string(),
            script_reference: self.script.to_string_lossy().to_string(),
            stdout_path: MISSING_VALUE.to_string(),
            stderr_path: MISSING_VALUE.to_string(),
            input_id: input_id.to_string(),
            core_count: None,
            output_reference: output.reference.to_string_lossy().to_string(),
            output_size: output.size,
            extra_args: values,
        };

        match self.scheduler.describe(scheduler_id) {
            Ok(live) => {
                record.submitted_at = live.submitted_at;
                record.duration = live.duration;
                record.time_limit = live.time_limit;
                record.stdout_path = live.stdout_path;
                record.stderr_path = live.stderr_path;
                record.core_count = Some(live.core_count);
            }
            Err(e) => {
                tracing::debug!(
                    input_id,
                    job_id = %job_id,
                    error = %e,
                    "No live metadata for new job",
                );
            }
        }

        self.log.upsert(record)?;
        tracing::info!(
            input_id,
            job_id = %job_id,
            kind = self.kind.as_str(),
            "Job submitted",
        );
        Ok(EnsureOutcome::Submitted(job_id))
    }

    /// Output exists: keep the latest record's size current, or note that the
    /// output was there before any job.
    fn record_present_output(
        &mut self,
        input_id: &str,
        args: &ResolvedArgs,
        output: &OutputState,
    ) -> Result<(), TrackerError> {
        match self.log.find_latest(input_id).cloned() {
            Some(latest) => {
                let mut record = if latest.job_id.is_sentinel() || latest.status.is_terminal() {
                    latest
                } else {
                    self.refresh_or_keep(latest)?
                };
                record.set_output(output);
                record.last_checked_at = now();
                self.log.upsert(record)?;
            }
            None => {
                tracing::info!(
                    input_id,
                    kind = self.kind.as_str(),
                    output = %output.reference.display(),
                    "Recording pre-existing output",
                );
                self.log.upsert(JobRecord::preexisting(
                    input_id,
                    self.kind.as_str(),
                    &self.script.to_string_lossy(),
                    output,
                    args.values(),
                    now(),
                ))?;
            }
        }
        Ok(())
    }

    /// Cancel every open job for the input and record the result.
    fn cancel_open(&mut self, input_id: &str) -> Result<(), TrackerError> {
        for mut record in self.log.open_jobs(input_id) {
            let Some(scheduler_id) = record.job_id.scheduler_id() else {
                continue;
            };
            tracing::info!(input_id, job_id = scheduler_id, "Cancelling open job");
            if let Err(e) = self.scheduler.cancel(scheduler_id) {
                tracing::warn!(input_id, job_id = scheduler_id, error = %e, "Cancel failed");
            }

            match self.refresh_record(&mut record) {
                Ok(()) => {}
                Err(TrackerError::SchedulerQuery(e)) => {
                    tracing::warn!(
                        input_id,
                        job_id = scheduler_id,
                        error = %e,
                        "Status refresh after cancel failed",
                    );
                }
                Err(e) => return Err(e),
            }
            if !record.status.is_terminal() {
                record.apply_status(JobStatus::Cancelled);
            }
            record.last_checked_at = now();
            self.log.upsert(record)?;
        }
        Ok(())
    }

    /// Refresh an open record and persist it. A scheduler failure keeps the
    /// last known status.
    fn refresh_or_keep(&mut self, record: JobRecord) -> Result<JobRecord, TrackerError> {
        let mut updated = record.clone();
        match self.refresh_record(&mut updated) {
            Ok(()) => {
                self.log.upsert(updated.clone())?;
                Ok(updated)
            }
            Err(TrackerError::SchedulerQuery(e)) => {
                tracing::warn!(
                    input_id = %record.input_id,
                    job_id = %record.job_id,
                    status = %record.status,
                    error = %e,
                    "Status refresh failed, keeping last known status",
                );
                Ok(record)
            }
            Err(e) => Err(e),
        }
    }

    /// Pull status and metadata from the scheduler into `record`, then
    /// re-probe its output. The live queue is asked first, then accounting.
    fn refresh_record(&self, record: &mut JobRecord) -> Result<(), TrackerError> {
        let Some(scheduler_id) = record.job_id.scheduler_id() else {
            return Ok(());
        };
        let checked_at = now();

        match self.scheduler.describe(scheduler_id) {
            Ok(live) => {
                record.apply_status(live.status);
                record.duration = live.duration;
                record.time_limit = live.time_limit;
                record.stdout_path = live.stdout_path;
                record.stderr_path = live.stderr_path;
                record.core_count = Some(live.core_count);
            }
            Err(live_err) => {
                tracing::debug!(
                    job_id = scheduler_id,
                    error = %live_err,
                    "Live query failed, falling back to accounting",
                );
                let history = self
                    .scheduler
                    .history(scheduler_id)
                    .map_err(TrackerError::SchedulerQuery)?;
                record.apply_status(history.status);
                record.duration = history.duration(checked_at);
            }
        }
        record.last_checked_at = checked_at;

        let args = ResolvedArgs::from_values(self.kind, &record.extra_args);
        let output = self.kind.probe(&record.input_id, &args)?;
        record.set_output(&output);
        Ok(())
    }
}

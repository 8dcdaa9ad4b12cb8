//! Runs manifest stages, each with its own tracker and job log.

use std::sync::Arc;

use seqjobs_core::scripts::ScriptRegistry;
use seqjobs_db::JobLog;
use seqjobs_pipeline::{BatchReport, JobTracker};
use seqjobs_slurm::SchedulerClient;

use crate::error::WorkerError;
use crate::manifest::{Manifest, StageSpec};

/// Outcome of one stage in a pass.
#[derive(Debug)]
pub struct StageResult {
    pub stage: String,
    pub result: Result<BatchReport, WorkerError>,
}

/// Run one stage to the end of its input list. Blocks on the scheduler.
pub fn run_stage<S: SchedulerClient>(
    stage: &StageSpec,
    scripts: &ScriptRegistry,
    scheduler: S,
) -> Result<BatchReport, WorkerError> {
    let kind = stage.job_kind()?;
    let requests = stage.requests()?;
    let log = JobLog::load(&stage.log_file, kind)?;
    let mut tracker = JobTracker::new(log, scripts, scheduler)?;

    tracing::info!(
        stage = %stage.name,
        kind = kind.as_str(),
        inputs = requests.len(),
        log_file = %stage.log_file.display(),
        "Stage started",
    );
    let report = tracker.ensure_all(&requests)?;
    log_report(&stage.name, &report);
    Ok(report)
}

/// Run every stage concurrently on the blocking pool.
///
/// Stages never share a log file (the manifest rejects that), so their
/// trackers do not contend. Results come back in manifest order.
pub async fn run_manifest<S>(
    manifest: Manifest,
    scripts: Arc<ScriptRegistry>,
    scheduler: S,
) -> Vec<StageResult>
where
    S: SchedulerClient + Clone + Send + 'static,
{
    let handles: Vec<_> = manifest
        .stages
        .into_iter()
        .map(|stage| {
            let scripts = Arc::clone(&scripts);
            let scheduler = scheduler.clone();
            let name = stage.name.clone();
            let handle =
                tokio::task::spawn_blocking(move || run_stage(&stage, &scripts, scheduler));
            (name, handle)
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (stage, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(WorkerError::Join(e)),
        };
        if let Err(e) = &result {
            tracing::error!(stage = %stage, error = %e, "Stage aborted");
        }
        results.push(StageResult { stage, result });
    }
    results
}

fn log_report(stage: &str, report: &BatchReport) {
    let outcomes = report.outcome_counts();
    let count = |label: &str| outcomes.get(label).copied().unwrap_or(0);
    tracing::info!(
        stage,
        kind = report.kind.as_str(),
        satisfied = count("satisfied"),
        submitted = count("submitted"),
        already_submitted = count("already_submitted"),
        known_failure = count("known_failure"),
        failed_inputs = report.failures.len(),
        "Stage finished",
    );
    for (status, n) in &report.status_counts {
        tracing::debug!(stage, status = %status, count = n, "Log status");
    }
    for failure in &report.failures {
        tracing::warn!(
            stage,
            input_id = %failure.input_id,
            error = %failure.error,
            "Input not processed",
        );
    }
}

//! Integration tests for running manifest stages.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use seqjobs_core::scripts::ScriptRegistry;
use seqjobs_core::types::now;
use seqjobs_core::JobStatus;
use seqjobs_db::JobLog;
use seqjobs_slurm::{HistoryInfo, LiveJobInfo, SchedulerClient, SchedulerError};
use seqjobs_worker::{run_manifest, run_stage, Manifest, WorkerError};

/// Thread-safe scheduler double: every submitted job stays pending.
#[derive(Clone, Default)]
struct QueueScheduler {
    next_id: Arc<AtomicU64>,
    submitted: Arc<Mutex<Vec<(PathBuf, Vec<String>)>>>,
}

impl QueueScheduler {
    fn submitted(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.submitted.lock().unwrap().clone()
    }
}

impl SchedulerClient for QueueScheduler {
    fn submit(&self, script: &Path, args: &[String]) -> Result<u64, SchedulerError> {
        self.submitted
            .lock()
            .unwrap()
            .push((script.to_path_buf(), args.to_vec()));
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn describe(&self, _job_id: u64) -> Result<LiveJobInfo, SchedulerError> {
        Ok(LiveJobInfo {
            status: JobStatus::Pending,
            submitted_at: now(),
            duration: "00:00:00".into(),
            time_limit: "04:00:00".into(),
            stdout_path: "/scratch/out".into(),
            stderr_path: "/scratch/err".into(),
            core_count: 2,
        })
    }

    fn history(&self, job_id: u64) -> Result<HistoryInfo, SchedulerError> {
        Err(SchedulerError::Query {
            job_id,
            reason: "accounting disabled".into(),
        })
    }

    fn cancel(&self, _job_id: u64) -> Result<(), SchedulerError> {
        Ok(())
    }
}

fn scripts() -> ScriptRegistry {
    ScriptRegistry::default()
        .with("MAFFT_SINGLE_GENE", "/opt/slurm/mafft.sh")
        .with("TRIMAL_SINGLE_GENE_GAPFRACTION", "/opt/slurm/trimal.sh")
}

/// Write a manifest with an alignment and a trim stage over `root`.
fn write_manifest(root: &Path) -> PathBuf {
    let genes = root.join("genes");
    let aligned = root.join("aligned");
    std::fs::create_dir_all(&genes).unwrap();
    std::fs::create_dir_all(&aligned).unwrap();
    for gene in ["rbcL", "matK"] {
        std::fs::write(genes.join(format!("{gene}.fasta")), ">a\nACGT\n").unwrap();
    }
    std::fs::write(aligned.join("rbcL.fasta"), ">a\nACGT\n").unwrap();

    let manifest = serde_json::json!({
        "stages": [
            {
                "name": "align",
                "kind": "alignment",
                "log_file": root.join("mafft.csv"),
                "input_dir": genes,
                "output_dir": aligned,
                "options": { "amino_flag": "" }
            },
            {
                "name": "trim",
                "kind": "trim",
                "log_file": root.join("trimal.csv"),
                "input_dir": aligned,
                "output_dir": root.join("trimmed")
            }
        ]
    });
    let path = root.join("manifest.json");
    std::fs::write(&path, manifest.to_string()).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Test: single stage
// ---------------------------------------------------------------------------

#[test]
fn stage_submits_missing_outputs_only() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = Manifest::load(&write_manifest(dir.path())).unwrap();
    let scheduler = QueueScheduler::default();

    let report = run_stage(&manifest.stages[0], &scripts(), scheduler.clone()).unwrap();

    let submitted = scheduler.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].0, PathBuf::from("/opt/slurm/mafft.sh"));
    assert!(submitted[0].1[0].ends_with("matK.fasta"));
    assert_eq!(submitted[0].1[2], "");
    assert_eq!(report.outcome_counts().get("satisfied"), Some(&1));
    assert_eq!(report.outcome_counts().get("submitted"), Some(&1));

    let log = JobLog::load(dir.path().join("mafft.csv"), seqjobs_core::JobKind::Alignment).unwrap();
    assert_eq!(log.len(), 2);
}

#[test]
fn stage_without_script_fails() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = Manifest::load(&write_manifest(dir.path())).unwrap();

    assert_matches!(
        run_stage(&manifest.stages[1], &ScriptRegistry::default(), QueueScheduler::default()),
        Err(WorkerError::Tracker(_))
    );
}

// ---------------------------------------------------------------------------
// Test: whole manifest
// ---------------------------------------------------------------------------

#[tokio::test]
async fn manifest_stages_report_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = Manifest::load(&write_manifest(dir.path())).unwrap();
    let scheduler = QueueScheduler::default();

    let results = run_manifest(manifest, Arc::new(scripts()), scheduler.clone()).await;

    let names: Vec<_> = results.iter().map(|r| r.stage.as_str()).collect();
    assert_eq!(names, vec!["align", "trim"]);
    assert!(results.iter().all(|r| r.result.is_ok()));
    // matK alignment plus the rbcL trim; the trim of matK waits for its alignment.
    assert_eq!(scheduler.submitted().len(), 2);
}

#[test]
fn manifest_with_shared_log_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.json");
    std::fs::write(
        &path,
        r#"{"stages": [
            {"name": "a", "kind": "alignment", "log_file": "x.csv", "input_dir": "i", "output_dir": "o"},
            {"name": "b", "kind": "trim", "log_file": "x.csv", "input_dir": "i", "output_dir": "o"}
        ]}"#,
    )
    .unwrap();

    assert_matches!(Manifest::load(&path), Err(WorkerError::SharedLogFile { .. }));
}

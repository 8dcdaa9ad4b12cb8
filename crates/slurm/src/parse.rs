//! Parsers for Slurm's text output.
//!
//! One function per command. These are the only places that know the wire
//! format, so a structured query API can replace them without touching
//! callers.

use std::sync::LazyLock;

use regex::Regex;
use seqjobs_core::types::{parse_timestamp, Timestamp};
use seqjobs_core::JobStatus;

use crate::client::{HistoryInfo, LiveJobInfo};

static SUBMITTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Submitted batch job (\d+)").expect("valid regex"));

/// Columns requested from `sacct -o`, in order.
pub const ACCOUNTING_COLUMNS: [&str; 4] = ["jobid", "start", "end", "state"];

/// Values `sacct` prints for a time that has not happened yet.
const UNSET_TIMES: [&str; 2] = ["Unknown", "None"];

// ---------------------------------------------------------------------------
// sbatch
// ---------------------------------------------------------------------------

/// Extract the job id from `sbatch` stdout.
pub fn parse_submit_response(stdout: &str) -> Option<u64> {
    SUBMITTED_RE
        .captures(stdout)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// ---------------------------------------------------------------------------
// scontrol show job
// ---------------------------------------------------------------------------

/// Value of one `Key=value` token, or `None` if the key is absent.
fn show_job_field<'a>(stdout: &'a str, key: &str) -> Option<&'a str> {
    stdout
        .split_whitespace()
        .find_map(|token| token.strip_prefix(key)?.strip_prefix('='))
}

/// Parse `scontrol show job <id>` output.
///
/// Every field is required; a single missing one fails the whole parse.
pub fn parse_show_job(stdout: &str) -> Result<LiveJobInfo, String> {
    let field = |key: &str| {
        show_job_field(stdout, key).ok_or_else(|| format!("field {key} missing from job record"))
    };

    let submitted_at = parse_timestamp(field("SubmitTime")?).map_err(|e| e.to_string())?;
    let core_count = field("NumCPUs")?
        .parse::<u32>()
        .map_err(|e| format!("NumCPUs: {e}"))?;

    Ok(LiveJobInfo {
        status: JobStatus::parse(field("JobState")?),
        submitted_at,
        duration: field("RunTime")?.to_string(),
        time_limit: field("TimeLimit")?.to_string(),
        stdout_path: field("StdOut")?.to_string(),
        stderr_path: field("StdErr")?.to_string(),
        core_count,
    })
}

// ---------------------------------------------------------------------------
// sacct
// ---------------------------------------------------------------------------

fn accounting_time(value: &str) -> Result<Option<Timestamp>, String> {
    if UNSET_TIMES.contains(&value) {
        return Ok(None);
    }
    parse_timestamp(value).map(Some).map_err(|e| e.to_string())
}

/// Parse the first line of `sacct -n -o jobid,start,end,state`.
///
/// The state column may be truncated (`CANCELLED+`) or verbose
/// (`CANCELLED by 1234`); only its first word matters.
pub fn parse_accounting(stdout: &str) -> Result<HistoryInfo, String> {
    let line = stdout
        .lines()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| "empty accounting output".to_string())?;

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < ACCOUNTING_COLUMNS.len() {
        return Err(format!(
            "expected {} accounting columns, got {}: {line}",
            ACCOUNTING_COLUMNS.len(),
            fields.len()
        ));
    }

    Ok(HistoryInfo {
        start: accounting_time(fields[1])?,
        end: accounting_time(fields[2])?,
        status: JobStatus::parse(fields[3]),
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const SHOW_JOB: &str = "\
JobId=4211 JobName=mafft.sh
   UserId=ana(1001) GroupId=ana(1001) MCS_label=N/A
   Priority=1 Nice=0 Account=plastid QOS=normal
   JobState=RUNNING Reason=None Dependency=(null)
   RunTime=00:12:40 TimeLimit=02:00:00 TimeMin=N/A
   SubmitTime=2024-05-02T09:14:03 EligibleTime=2024-05-02T09:14:03
   NumNodes=1 NumCPUs=8 NumTasks=1 CPUs/Task=8
   StdErr=/scratch/ana/slurm-4211.err
   StdIn=/dev/null
   StdOut=/scratch/ana/slurm-4211.out
";

    #[test]
    fn test_parse_submit_response() {
        assert_eq!(parse_submit_response("Submitted batch job 4211\n"), Some(4211));
    }

    #[test]
    fn test_parse_submit_response_without_id() {
        assert_eq!(
            parse_submit_response("sbatch: error: Batch job submission failed"),
            None
        );
    }

    #[test]
    fn test_parse_show_job() {
        let info = parse_show_job(SHOW_JOB).unwrap();
        assert_eq!(info.status, JobStatus::Running);
        assert_eq!(info.duration, "00:12:40");
        assert_eq!(info.time_limit, "02:00:00");
        assert_eq!(info.core_count, 8);
        assert_eq!(info.stdout_path, "/scratch/ana/slurm-4211.out");
        assert_eq!(info.stderr_path, "/scratch/ana/slurm-4211.err");
    }

    #[test]
    fn test_parse_show_job_missing_field_fails() {
        let truncated = SHOW_JOB.replace("NumCPUs=8 ", "");
        assert_matches!(parse_show_job(&truncated), Err(reason) if reason.contains("NumCPUs"));
    }

    #[test]
    fn test_show_job_field_does_not_match_suffix_keys() {
        // `EligibleTime` must not satisfy a lookup for `Time`.
        assert_eq!(show_job_field("EligibleTime=x Time=y", "Time"), Some("y"));
    }

    #[test]
    fn test_parse_accounting_finished() {
        let text = "4211  2024-05-02T09:15:00 2024-05-02T10:01:12  COMPLETED \n4211.batch ...";
        let info = parse_accounting(text).unwrap();
        assert_eq!(info.status, JobStatus::Completed);
        assert!(info.start.is_some() && info.end.is_some());
    }

    #[test]
    fn test_parse_accounting_pending() {
        let info = parse_accounting("4212 Unknown Unknown PENDING\n").unwrap();
        assert_eq!(info.start, None);
        assert_eq!(info.status, JobStatus::Pending);
    }

    #[test]
    fn test_parse_accounting_cancelled_by_user() {
        let info =
            parse_accounting("4213 2024-05-02T09:15:00 2024-05-02T09:20:00 CANCELLED by 1001\n")
                .unwrap();
        assert_eq!(info.status, JobStatus::Cancelled);
    }

    #[test]
    fn test_parse_accounting_empty() {
        assert!(parse_accounting("\n").is_err());
    }
}

//! Column names of the job log.

use seqjobs_core::JobKind;

pub const JOB_ID: &str = "job_id";
pub const JOB_STATUS: &str = "job_status";
pub const TIME_SUBMITTED: &str = "time_submitted";
pub const DURATION: &str = "duration";
pub const TIMELIMIT: &str = "timelimit";
pub const TIME_LAST_CHECKED: &str = "time_last_checked";
pub const JOB_KIND: &str = "job_kind";
pub const SCRIPT_FILE: &str = "script_file";
pub const OUT_FILE: &str = "out_file";
pub const ERR_FILE: &str = "err_file";
pub const INPUT_ID: &str = "input_id";
pub const N_CORES: &str = "n_cores";
pub const SOFTWARE_OUTPUT: &str = "software_output";
pub const SOFTWARE_OUTPUT_SIZE: &str = "software_output_size";

/// Columns every log carries, in write order.
pub const COMMON_COLUMNS: [&str; 14] = [
    JOB_ID,
    JOB_STATUS,
    TIME_SUBMITTED,
    DURATION,
    TIMELIMIT,
    TIME_LAST_CHECKED,
    JOB_KIND,
    SCRIPT_FILE,
    OUT_FILE,
    ERR_FILE,
    INPUT_ID,
    N_CORES,
    SOFTWARE_OUTPUT,
    SOFTWARE_OUTPUT_SIZE,
];

/// Size written when the output is absent.
pub const ABSENT_SIZE: &str = "-1";

/// Full header for a job kind: common columns, then argument columns.
pub fn canonical_header(kind: JobKind) -> Vec<String> {
    COMMON_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(kind.arg_columns())
        .collect()
}

/// Column sets are compared ignoring order.
pub fn same_columns(a: &[String], b: &[String]) -> bool {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort();
    b.sort();
    a == b
}

use chrono::SubsecRound;

use crate::error::CoreError;

/// Timestamps are naive local time, as printed by the scheduler.
pub type Timestamp = chrono::NaiveDateTime;

/// Textual timestamp layout shared by the scheduler and the job log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Placeholder written for values the scheduler never reported.
pub const MISSING_VALUE: &str = "-";

/// Current local time truncated to whole seconds.
pub fn now() -> Timestamp {
    chrono::Local::now().naive_local().trunc_subsecs(0)
}

pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Result<Timestamp, CoreError> {
    chrono::NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
        .map_err(|e| CoreError::InvalidTimestamp(format!("{s}: {e}")))
}

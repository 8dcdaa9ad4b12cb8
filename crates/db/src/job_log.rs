//! CSV-backed table of every job ever tracked for one job kind.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use seqjobs_core::types::{format_timestamp, parse_timestamp, MISSING_VALUE};
use seqjobs_core::{JobId, JobKind, JobRecord, JobStatus};

use crate::columns::{self, canonical_header, same_columns, ABSENT_SIZE};
use crate::error::LogError;

/// In-memory copy of a job log, flushed to disk after every mutation.
///
/// Concurrent writers to the same file are not supported: persistence is a
/// full read-modify-write of the file.
#[derive(Debug)]
pub struct JobLog {
    path: PathBuf,
    kind: JobKind,
    header: Vec<String>,
    records: Vec<JobRecord>,
}

impl JobLog {
    /// Open the log at `path`, creating an empty one if it does not exist.
    ///
    /// An existing file must carry exactly the kind's column set; anything
    /// else is a [`LogError::SchemaMismatch`] raised before rows are read.
    pub fn load(path: impl Into<PathBuf>, kind: JobKind) -> Result<Self, LogError> {
        let path = path.into();
        let header = canonical_header(kind);

        if !path.exists() {
            let log = Self {
                path,
                kind,
                header,
                records: Vec::new(),
            };
            log.persist()?;
            tracing::info!(path = %log.path.display(), kind = kind.as_str(), "Created job log");
            return Ok(log);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)?;
        let found: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if !same_columns(&found, &header) {
            return Err(LogError::SchemaMismatch {
                path,
                expected: header,
                found,
            });
        }

        let index: HashMap<&str, usize> = found
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        let arg_columns = kind.arg_columns();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            let record = parse_row(&row, &index, &arg_columns).map_err(|reason| {
                LogError::MalformedRow {
                    path: path.clone(),
                    line,
                    reason,
                }
            })?;
            records.push(record);
        }

        tracing::debug!(
            path = %path.display(),
            kind = kind.as_str(),
            rows = records.len(),
            "Loaded job log",
        );

        Ok(Self {
            path,
            kind,
            header,
            records,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recently submitted record for an input; ties go to the later row.
    pub fn find_latest(&self, input_id: &str) -> Option<&JobRecord> {
        self.records
            .iter()
            .filter(|r| r.input_id == input_id)
            .max_by_key(|r| r.submitted_at)
    }

    /// Record for a job id. Sentinel ids are only unique per input.
    pub fn find(&self, job_id: JobId, input_id: &str) -> Option<&JobRecord> {
        self.position(job_id, input_id).map(|i| &self.records[i])
    }

    /// Every pending or running record for an input, oldest first.
    pub fn open_jobs(&self, input_id: &str) -> Vec<JobRecord> {
        self.records
            .iter()
            .filter(|r| r.input_id == input_id && r.status.is_open())
            .cloned()
            .collect()
    }

    /// Insert a record, or replace the row with the same job id, then persist.
    pub fn upsert(&mut self, record: JobRecord) -> Result<(), LogError> {
        match self.position(record.job_id, &record.input_id) {
            Some(i) => self.records[i] = record,
            None => self.records.push(record),
        }
        self.persist()
    }

    /// Count of each status over the latest record of every input.
    pub fn status_counts(&self) -> BTreeMap<JobStatus, usize> {
        let mut latest: HashMap<&str, &JobRecord> = HashMap::new();
        for record in &self.records {
            let slot = latest.entry(record.input_id.as_str()).or_insert(record);
            if record.submitted_at >= slot.submitted_at {
                *slot = record;
            }
        }

        let mut counts = BTreeMap::new();
        for record in latest.values() {
            *counts.entry(record.status).or_insert(0) += 1;
        }
        counts
    }

    fn position(&self, job_id: JobId, input_id: &str) -> Option<usize> {
        self.records.iter().position(|r| {
            r.job_id == job_id && (!job_id.is_sentinel() || r.input_id == input_id)
        })
    }

    /// Rewrite the whole file via a sibling temp file and an atomic rename.
    fn persist(&self) -> Result<(), LogError> {
        let tmp = tmp_path(&self.path);
        {
            let mut writer = csv::Writer::from_path(&tmp)?;
            writer.write_record(&self.header)?;
            let arg_columns = self.kind.arg_columns();
            for record in &self.records {
                writer.write_record(render_row(record, &self.header, &arg_columns))?;
            }
            let file = writer
                .into_inner()
                .map_err(|e| LogError::Io(e.into_error()))?;
            file.sync_all()?;
        }
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

// ---------------------------------------------------------------------------
// Row codec
// ---------------------------------------------------------------------------

struct RowView<'r> {
    row: &'r csv::StringRecord,
    index: &'r HashMap<&'r str, usize>,
}

impl<'r> RowView<'r> {
    fn get(&self, name: &str) -> Result<&'r str, String> {
        self.index
            .get(name)
            .and_then(|&i| self.row.get(i))
            .ok_or_else(|| format!("missing field {name}"))
    }
}

fn parse_row(
    row: &csv::StringRecord,
    index: &HashMap<&str, usize>,
    arg_columns: &[String],
) -> Result<JobRecord, String> {
    let view = RowView { row, index };
    let field = |name: &str| view.get(name);

    let job_id = field(columns::JOB_ID)?
        .parse::<JobId>()
        .map_err(|e| e.to_string())?;
    let submitted_at = parse_timestamp(field(columns::TIME_SUBMITTED)?).map_err(|e| e.to_string())?;
    let last_checked_at =
        parse_timestamp(field(columns::TIME_LAST_CHECKED)?).map_err(|e| e.to_string())?;

    let core_count = match field(columns::N_CORES)? {
        MISSING_VALUE | "" => None,
        n => Some(
            n.parse::<u32>()
                .map_err(|_| format!("invalid {}: {n}", columns::N_CORES))?,
        ),
    };
    let output_size = match field(columns::SOFTWARE_OUTPUT_SIZE)? {
        ABSENT_SIZE | MISSING_VALUE | "" => None,
        n => Some(
            n.parse::<u64>()
                .map_err(|_| format!("invalid {}: {n}", columns::SOFTWARE_OUTPUT_SIZE))?,
        ),
    };

    let extra_args = arg_columns
        .iter()
        .map(|c| field(c).map(str::to_string))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(JobRecord {
        job_id,
        status: JobStatus::parse(field(columns::JOB_STATUS)?),
        submitted_at,
        last_checked_at,
        duration: field(columns::DURATION)?.to_string(),
        time_limit: field(columns::TIMELIMIT)?.to_string(),
        job_kind: field(columns::JOB_KIND)?.to_string(),
        script_reference: field(columns::SCRIPT_FILE)?.to_string(),
        stdout_path: field(columns::OUT_FILE)?.to_string(),
        stderr_path: field(columns::ERR_FILE)?.to_string(),
        input_id: field(columns::INPUT_ID)?.to_string(),
        core_count,
        output_reference: field(columns::SOFTWARE_OUTPUT)?.to_string(),
        output_size,
        extra_args,
    })
}

fn render_row(record: &JobRecord, header: &[String], arg_columns: &[String]) -> Vec<String> {
    header
        .iter()
        .map(|column| match column.as_str() {
            columns::JOB_ID => record.job_id.to_string(),
            columns::JOB_STATUS => record.status.to_string(),
            columns::TIME_SUBMITTED => format_timestamp(&record.submitted_at),
            columns::DURATION => record.duration.clone(),
            columns::TIMELIMIT => record.time_limit.clone(),
            columns::TIME_LAST_CHECKED => format_timestamp(&record.last_checked_at),
            columns::JOB_KIND => record.job_kind.clone(),
            columns::SCRIPT_FILE => record.script_reference.clone(),
            columns::OUT_FILE => record.stdout_path.clone(),
            columns::ERR_FILE => record.stderr_path.clone(),
            columns::INPUT_ID => record.input_id.clone(),
            columns::N_CORES => record
                .core_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| MISSING_VALUE.to_string()),
            columns::SOFTWARE_OUTPUT => record.output_reference.clone(),
            columns::SOFTWARE_OUTPUT_SIZE => record
                .output_size
                .map(|n| n.to_string())
                .unwrap_or_else(|| ABSENT_SIZE.to_string()),
            arg => arg_columns
                .iter()
                .position(|c| c == arg)
                .and_then(|i| record.extra_args.get(i).cloned())
                .unwrap_or_default(),
        })
        .collect()
}

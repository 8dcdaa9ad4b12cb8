//! [`SchedulerClient`] backed by the Slurm command-line tools.

use std::path::Path;
use std::process::{Command, Output};

use crate::client::{HistoryInfo, LiveJobInfo, SchedulerClient};
use crate::error::SchedulerError;
use crate::parse::{self, ACCOUNTING_COLUMNS};

/// Program (plus leading arguments) for each scheduler operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlurmCommands {
    pub submit: Vec<String>,
    pub show_job: Vec<String>,
    pub accounting: Vec<String>,
    pub cancel: Vec<String>,
}

impl Default for SlurmCommands {
    fn default() -> Self {
        Self {
            submit: split_command("sbatch"),
            show_job: split_command("scontrol show job"),
            accounting: split_command("sacct"),
            cancel: split_command("scancel"),
        }
    }
}

/// Split a command line on whitespace. No quoting support.
pub fn split_command(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Runs Slurm commands as blocking subprocesses. No timeout is applied: a
/// hung command hangs the caller.
#[derive(Debug, Clone, Default)]
pub struct SlurmClient {
    commands: SlurmCommands,
}

impl SlurmClient {
    pub fn new(commands: SlurmCommands) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &SlurmCommands {
        &self.commands
    }

    fn run(&self, command: &[String], args: &[String]) -> Result<Output, SchedulerError> {
        let rendered = command
            .iter()
            .chain(args)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        let (program, leading) = command.split_first().ok_or_else(|| SchedulerError::Exec {
            command: rendered.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        })?;

        tracing::debug!(command = %rendered, "Running scheduler command");
        Command::new(program)
            .args(leading)
            .args(args)
            .output()
            .map_err(|source| SchedulerError::Exec {
                command: rendered,
                source,
            })
    }

    /// Run a status query; a non-zero exit is a query failure.
    fn query(
        &self,
        command: &[String],
        args: &[String],
        job_id: u64,
    ) -> Result<String, SchedulerError> {
        let output = self.run(command, args)?;
        if !output.status.success() {
            return Err(SchedulerError::Query {
                job_id,
                reason: format!(
                    "exit code {:?}: {}",
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl SchedulerClient for SlurmClient {
    fn submit(&self, script: &Path, args: &[String]) -> Result<u64, SchedulerError> {
        let mut full_args = vec![script.to_string_lossy().to_string()];
        full_args.extend_from_slice(args);

        let output = self.run(&self.commands.submit, &full_args)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        tracing::info!(
            script = %script.display(),
            stdout = %stdout.trim(),
            stderr = %stderr.trim(),
            "Submission response",
        );

        parse::parse_submit_response(&stdout).ok_or_else(|| SchedulerError::Submission {
            response: format!("[stdout] {} [stderr] {}", stdout.trim(), stderr.trim()),
        })
    }

    fn describe(&self, job_id: u64) -> Result<LiveJobInfo, SchedulerError> {
        let stdout = self.query(&self.commands.show_job, &[job_id.to_string()], job_id)?;
        parse::parse_show_job(&stdout).map_err(|reason| SchedulerError::Query { job_id, reason })
    }

    fn history(&self, job_id: u64) -> Result<HistoryInfo, SchedulerError> {
        let args = [
            "-j".to_string(),
            job_id.to_string(),
            "-n".to_string(),
            "-o".to_string(),
            ACCOUNTING_COLUMNS.join(","),
        ];
        let stdout = self.query(&self.commands.accounting, &args, job_id)?;
        parse::parse_accounting(&stdout).map_err(|reason| SchedulerError::Query { job_id, reason })
    }

    fn cancel(&self, job_id: u64) -> Result<(), SchedulerError> {
        let output = self.run(&self.commands.cancel, &[job_id.to_string()])?;
        if !output.status.success() {
            tracing::warn!(
                job_id,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Cancel command reported failure",
            );
        }
        Ok(())
    }
}

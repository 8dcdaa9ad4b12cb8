//! trimAl gap-fraction trimming.
//!
//! The script writes the trimmed alignment plus an HTML report next to it;
//! both must exist for the output to count as present.

use std::path::{Path, PathBuf};

use super::{ensure_dir, file_size, id_file, path_arg, require_input, ResolvedArgs};
use crate::error::CoreError;
use crate::job_record::OutputState;
use crate::options::JobOptions;

const KIND: &str = "trim";

pub(crate) const ARGS: &[&str] = &["input_fasta", "output_name"];

const OPTIONS: &[&str] = &["fasta_suffix", "trimmed_suffix"];

pub(crate) fn resolve(
    input_id: &str,
    input_dir: &Path,
    output_dir: &Path,
    options: &JobOptions,
) -> Result<ResolvedArgs, CoreError> {
    options.check_known(KIND, OPTIONS)?;

    let input_fasta = require_input(id_file(
        input_dir,
        input_id,
        options.get_or("fasta_suffix", "fasta"),
    ))?;
    let output_name = id_file(
        output_dir,
        input_id,
        options.get_or("trimmed_suffix", "fasta"),
    );
    ensure_dir(output_dir)?;

    Ok(ResolvedArgs::new(KIND)
        .push("input_fasta", path_arg(&input_fasta))
        .push("output_name", path_arg(&output_name)))
}

pub(crate) fn probe(args: &ResolvedArgs) -> Result<OutputState, CoreError> {
    let reference = PathBuf::from(args.get("output_name")?);
    let report = PathBuf::from(format!("{}.html", reference.display()));

    if file_size(&report)?.is_none() {
        return Ok(OutputState::absent(reference));
    }
    let size = file_size(&reference)?;
    Ok(OutputState { reference, size })
}

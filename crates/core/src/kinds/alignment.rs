//! MAFFT single-gene alignment.

use std::path::Path;

use super::{ensure_dir, id_file, path_arg, require_input, ResolvedArgs};
use crate::error::CoreError;
use crate::options::JobOptions;

const KIND: &str = "alignment";

pub(crate) const ARGS: &[&str] = &["input_fasta", "output_name", "amino_flag"];

const OPTIONS: &[&str] = &["amino_flag", "fasta_suffix", "aln_suffix"];

/// Flags the alignment script accepts; empty means nucleotide input.
const AMINO_FLAGS: &[&str] = &["--amino", ""];

pub(crate) fn resolve(
    input_id: &str,
    input_dir: &Path,
    output_dir: &Path,
    options: &JobOptions,
) -> Result<ResolvedArgs, CoreError> {
    options.check_known(KIND, OPTIONS)?;

    let amino_flag = options.get_or("amino_flag", "--amino");
    if !AMINO_FLAGS.contains(&amino_flag) {
        return Err(CoreError::InvalidOption {
            kind: KIND,
            option: "amino_flag".to_string(),
            reason: format!("'{amino_flag}' is neither '--amino' nor empty"),
        });
    }

    let input_fasta = require_input(id_file(
        input_dir,
        input_id,
        options.get_or("fasta_suffix", "fasta"),
    ))?;

    let output_name = id_file(output_dir, input_id, options.get_or("aln_suffix", "fasta"));
    ensure_dir(output_dir)?;

    Ok(ResolvedArgs::new(KIND)
        .push("input_fasta", path_arg(&input_fasta))
        .push("output_name", path_arg(&output_name))
        .push("amino_flag", amino_flag))
}

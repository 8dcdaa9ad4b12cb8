//! MFannot organelle annotation.

use std::path::{Path, PathBuf};

use super::{ensure_dir, id_file, path_arg, require_input, ResolvedArgs};
use crate::error::CoreError;
use crate::options::JobOptions;

const KIND: &str = "annotation";

pub(crate) const ARGS: &[&str] = &["input_fasta", "output_name", "protein_collection"];

const OPTIONS: &[&str] = &["protein_collection", "fasta_suffix", "masterfile_suffix"];

pub(crate) fn resolve(
    input_id: &str,
    input_dir: &Path,
    output_dir: &Path,
    options: &JobOptions,
) -> Result<ResolvedArgs, CoreError> {
    options.check_known(KIND, OPTIONS)?;

    let protein_collection = options
        .get("protein_collection")
        .ok_or(CoreError::MissingOption {
            kind: KIND,
            option: "protein_collection",
        })?;

    let input_fasta = require_input(id_file(
        input_dir,
        input_id,
        options.get_or("fasta_suffix", "fa"),
    ))?;
    let output_name = id_file(
        output_dir,
        input_id,
        options.get_or("masterfile_suffix", "mf"),
    );
    ensure_dir(output_dir)?;

    let protein_collection = require_input(PathBuf::from(protein_collection))?;

    Ok(ResolvedArgs::new(KIND)
        .push("input_fasta", path_arg(&input_fasta))
        .push("output_name", path_arg(&output_name))
        .push("protein_collection", path_arg(&protein_collection)))
}

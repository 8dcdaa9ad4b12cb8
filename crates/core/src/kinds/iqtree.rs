//! IQ-TREE tree inference, single gene and partitioned supermatrix.
//!
//! A finished run leaves six files sharing one base path. An interrupted run
//! leaves a subset, which must not be mistaken for a finished tree.

use std::path::{Path, PathBuf};

use super::{ensure_dir, file_size, id_file, path_arg, require_input, JobKind, ResolvedArgs};
use crate::error::CoreError;
use crate::job_record::OutputState;
use crate::options::JobOptions;

/// Files written next to `<output_base>`; the first is the primary output.
pub const TREE_OUTPUT_SUFFIXES: [&str; 6] =
    ["treefile", "log", "ckp.gz", "iqtree", "bionj", "mldist"];

pub(crate) const SINGLE_ARGS: &[&str] = &["input_alignment", "output_base"];

pub(crate) const MULTI_ARGS: &[&str] = &["input_alignment", "partition_file", "output_base"];

const SINGLE_OPTIONS: &[&str] = &["fasta_suffix"];

const MULTI_OPTIONS: &[&str] = &["partition_file", "fasta_suffix", "tree_base_name"];

pub(crate) fn resolve_single(
    input_id: &str,
    input_dir: &Path,
    output_dir: &Path,
    options: &JobOptions,
) -> Result<ResolvedArgs, CoreError> {
    let kind = JobKind::TreeSinglePartition.as_str();
    options.check_known(kind, SINGLE_OPTIONS)?;

    let input_alignment = require_input(id_file(
        input_dir,
        input_id,
        options.get_or("fasta_suffix", "fasta"),
    ))?;
    let output_base = output_dir.join(input_id);
    ensure_dir(output_dir)?;

    Ok(ResolvedArgs::new(kind)
        .push("input_alignment", path_arg(&input_alignment))
        .push("output_base", path_arg(&output_base)))
}

pub(crate) fn resolve_multi(
    kind: JobKind,
    input_id: &str,
    input_dir: &Path,
    output_dir: &Path,
    options: &JobOptions,
) -> Result<ResolvedArgs, CoreError> {
    let kind = kind.as_str();
    options.check_known(kind, MULTI_OPTIONS)?;

    let input_alignment = require_input(id_file(
        input_dir,
        input_id,
        options.get_or("fasta_suffix", "fa"),
    ))?;

    // Each supermatrix gets its own directory; IQ-TREE names files after the base.
    let run_dir = output_dir.join(input_id);
    let output_base = run_dir.join(options.get_or("tree_base_name", "out"));
    ensure_dir(&run_dir)?;

    let partition_file = match options.get("partition_file") {
        Some(path) => PathBuf::from(path),
        None => default_partition_file(&input_alignment),
    };
    let partition_file = require_input(partition_file)?;

    Ok(ResolvedArgs::new(kind)
        .push("input_alignment", path_arg(&input_alignment))
        .push("partition_file", path_arg(&partition_file))
        .push("output_base", path_arg(&output_base)))
}

/// `<alignment without extension>_partitions.nex`
fn default_partition_file(alignment: &Path) -> PathBuf {
    let stem = alignment.with_extension("");
    PathBuf::from(format!("{}_partitions.nex", stem.display()))
}

pub(crate) fn probe(output_base: &str) -> Result<OutputState, CoreError> {
    let files: Vec<PathBuf> = TREE_OUTPUT_SUFFIXES
        .iter()
        .map(|sfx| PathBuf::from(format!("{output_base}.{sfx}")))
        .collect();
    let reference = files[0].clone();

    for file in &files {
        if file_size(file)?.is_none() {
            return Ok(OutputState::absent(reference));
        }
    }
    let size = file_size(&reference)?;
    Ok(OutputState { reference, size })
}

//! Divvier alignment partial filtering.
//!
//! Divvier takes only the input alignment and writes its results next to
//! it: `<input>.partial.fas` and the posterior probabilities `<input>.PP`.

use std::path::{Path, PathBuf};

use super::{file_size, id_file, path_arg, require_input, ResolvedArgs};
use crate::error::CoreError;
use crate::job_record::OutputState;
use crate::options::JobOptions;

const KIND: &str = "trim-divvier";

pub(crate) const ARGS: &[&str] = &["input_fasta"];

const OPTIONS: &[&str] = &["fasta_suffix"];

/// Suffix Divvier appends to the input path for the filtered alignment.
const PARTIAL_SUFFIX: &str = "partial.fas";

pub(crate) fn resolve(
    input_id: &str,
    input_dir: &Path,
    _output_dir: &Path,
    options: &JobOptions,
) -> Result<ResolvedArgs, CoreError> {
    options.check_known(KIND, OPTIONS)?;

    let input_fasta = require_input(id_file(
        input_dir,
        input_id,
        options.get_or("fasta_suffix", "fa"),
    ))?;

    Ok(ResolvedArgs::new(KIND).push("input_fasta", path_arg(&input_fasta)))
}

/// `<input_fasta>.partial.fas`. Files are only inspected, never moved.
pub(crate) fn probe(input_fasta: &str) -> Result<OutputState, CoreError> {
    let reference = PathBuf::from(format!("{input_fasta}.{PARTIAL_SUFFIX}"));
    let size = file_size(&reference)?;
    Ok(OutputState { reference, size })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_resolve_passes_only_the_input() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ycf1.fa"), ">a\nACGT\n").unwrap();
        let out = dir.path().join("divvier");

        let args = resolve("ycf1", dir.path(), &out, &JobOptions::new()).unwrap();

        assert_eq!(args.len(), 1);
        assert_eq!(args.values(), vec![path_arg(&dir.path().join("ycf1.fa"))]);
        assert!(!out.exists());
    }

    #[test]
    fn test_resolve_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ycf1.fasta"), ">a\nACGT\n").unwrap();
        assert_matches!(
            resolve("ycf1", dir.path(), dir.path(), &JobOptions::new()),
            Err(CoreError::MissingInput { path }) if path.ends_with("ycf1.fa")
        );
    }

    #[test]
    fn test_output_sits_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ycf1.fa");
        std::fs::write(&input, ">a\nACGT\n").unwrap();

        let state = probe(&path_arg(&input)).unwrap();
        assert!(!state.is_present());
        assert_eq!(state.reference, dir.path().join("ycf1.fa.partial.fas"));

        std::fs::write(dir.path().join("ycf1.fa.partial.fas"), ">a\nAC\n").unwrap();
        std::fs::write(dir.path().join("ycf1.fa.PP"), "0.9\n").unwrap();
        let state = probe(&path_arg(&input)).unwrap();
        assert_eq!(state.size, Some(6));

        // Inspection leaves every file where it was.
        assert!(dir.path().join("ycf1.fa.partial.fas").exists());
        assert!(dir.path().join("ycf1.fa.PP").exists());
    }
}

//! BMGE entropy-based trimming.

use std::path::Path;

use super::{ensure_dir, id_file, path_arg, require_input, ResolvedArgs};
use crate::error::CoreError;
use crate::options::JobOptions;

const KIND: &str = "trim-bmge";

pub(crate) const ARGS: &[&str] = &["input_fasta", "output_name"];

const OPTIONS: &[&str] = &["fasta_suffix", "aln_suffix"];

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
    let output_name = id_file(output_dir, input_id, options.get_or("aln_suffix", "fasta"));
    ensure_dir(output_dir)?;

    Ok(ResolvedArgs::new(KIND)
        .push("input_fasta", path_arg(&input_fasta))
        .push("output_name", path_arg(&output_name)))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::kinds::{JobKind, OutputProbe};

    #[test]
    fn test_resolve_default_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rbcL.fasta"), ">a\nACGT\n").unwrap();
        let out = dir.path().join("bmge");

        let args = resolve("rbcL", dir.path(), &out, &JobOptions::new()).unwrap();

        assert!(out.is_dir());
        assert_eq!(args.len(), 2);
        assert!(args.get("input_fasta").unwrap().ends_with("rbcL.fasta"));
        assert_eq!(args.get("output_name").unwrap(), path_arg(&out.join("rbcL.fasta")));
    }

    #[test]
    fn test_resolve_custom_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rbcL.aln"), ">a\nAC-T\n").unwrap();
        let options = JobOptions::new()
            .with("fasta_suffix", "aln")
            .with("aln_suffix", "phy");

        let args = resolve("rbcL", dir.path(), dir.path(), &options).unwrap();

        assert!(args.get("input_fasta").unwrap().ends_with("rbcL.aln"));
        assert!(args.get("output_name").unwrap().ends_with("rbcL.phy"));
    }

    #[test]
    fn test_resolve_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(
            resolve("rbcL", dir.path(), dir.path(), &JobOptions::new()),
            Err(CoreError::MissingInput { path }) if path.ends_with("rbcL.fasta")
        );
    }

    #[test]
    fn test_resolve_rejects_unknown_option() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rbcL.fasta"), ">a\nACGT\n").unwrap();
        let options = JobOptions::new().with("gap_fraction", "0.5");

        assert_matches!(
            resolve("rbcL", dir.path(), dir.path(), &options),
            Err(CoreError::InvalidOption { option, .. }) if option == "gap_fraction"
        );
    }

    #[test]
    fn test_output_is_the_trimmed_alignment() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rbcL.fasta"), ">a\nACGT\n").unwrap();
        let out = dir.path().join("bmge");
        let args = resolve("rbcL", dir.path(), &out, &JobOptions::new()).unwrap();

        let state = JobKind::TrimBmge.probe("rbcL", &args).unwrap();
        assert!(!state.is_present());
        assert_eq!(state.reference, out.join("rbcL.fasta"));

        std::fs::write(out.join("rbcL.fasta"), ">a\nAC\n").unwrap();
        let state = JobKind::TrimBmge.probe("rbcL", &args).unwrap();
        assert_eq!(state.size, Some(6));
    }
}

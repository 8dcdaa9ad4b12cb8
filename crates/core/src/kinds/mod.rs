//! Job kinds: how each wrapped tool turns an input id into script arguments
//! and how its output is recognised on disk.
//!
//! Every kind implements the same two capabilities, [`ArgumentResolver`] and
//! [`OutputProbe`]. [`JobKind`] selects the implementation by tag so the
//! tracker never needs to know which tool it is driving.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::CoreError;
use crate::job_record::OutputState;
use crate::options::JobOptions;

mod alignment;
mod annotation;
mod bmge;
mod divvier;
mod format_conversion;
mod iqtree;
mod trim;

pub use iqtree::TREE_OUTPUT_SUFFIXES;

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Maps an input id and directories to the ordered script arguments.
pub trait ArgumentResolver {
    /// Validate upstream files, create the output directory, and return the
    /// positional arguments for the submission script.
    fn resolve(
        &self,
        input_id: &str,
        input_dir: &Path,
        output_dir: &Path,
        options: &JobOptions,
    ) -> Result<ResolvedArgs, CoreError>;
}

/// Decides whether a job's output is already materialised.
pub trait OutputProbe {
    /// Multi-file outputs are only present when every expected file exists.
    fn probe(&self, input_id: &str, args: &ResolvedArgs) -> Result<OutputState, CoreError>;
}

// ---------------------------------------------------------------------------
// ResolvedArgs
// ---------------------------------------------------------------------------

/// Named, ordered script arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArgs {
    kind: &'static str,
    entries: Vec<(&'static str, String)>,
}

impl ResolvedArgs {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// Rebuild from stored values, pairing them with the kind's names.
    pub fn from_values(kind: JobKind, values: &[String]) -> Self {
        Self {
            kind: kind.as_str(),
            entries: kind
                .arg_names()
                .iter()
                .copied()
                .zip(values.iter().cloned())
                .collect(),
        }
    }

    pub fn push(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.entries.push((name, value.into()));
        self
    }

    /// Look up an argument by name.
    pub fn get(&self, name: &'static str) -> Result<&str, CoreError> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
            .ok_or(CoreError::MissingOption {
                kind: self.kind,
                option: name,
            })
    }

    /// Positional values in submission order.
    pub fn values(&self) -> Vec<String> {
        self.entries.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// JobKind
// ---------------------------------------------------------------------------

/// The wrapped tools this workspace knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    /// Single-gene multiple sequence alignment (MAFFT).
    Alignment,
    /// Gap-fraction trimming of an alignment (trimAl).
    Trim,
    /// Entropy-based trimming of an alignment (BMGE).
    TrimBmge,
    /// Partial filtering of an alignment (Divvier).
    TrimDivvier,
    /// Single-gene maximum-likelihood tree (IQ-TREE).
    TreeSinglePartition,
    /// Partitioned supermatrix tree (IQ-TREE), optionally with model finding.
    TreeMultiPartition { modelfinder: bool },
    /// Organelle genome annotation (MFannot).
    Annotation,
    /// ASN.1 to GenBank conversion (asn2gb).
    FormatConversion,
}

impl JobKind {
    pub const ALL: [JobKind; 9] = [
        JobKind::Alignment,
        JobKind::Trim,
        JobKind::TrimBmge,
        JobKind::TrimDivvier,
        JobKind::TreeSinglePartition,
        JobKind::TreeMultiPartition { modelfinder: false },
        JobKind::TreeMultiPartition { modelfinder: true },
        JobKind::Annotation,
        JobKind::FormatConversion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Alignment => "alignment",
            JobKind::Trim => "trim",
            JobKind::TrimBmge => "trim-bmge",
            JobKind::TrimDivvier => "trim-divvier",
            JobKind::TreeSinglePartition => "tree-single-partition",
            JobKind::TreeMultiPartition { modelfinder: false } => "tree-multi-partition",
            JobKind::TreeMultiPartition { modelfinder: true } => {
                "tree-multi-partition-modelfinder"
            }
            JobKind::Annotation => "annotation",
            JobKind::FormatConversion => "format-conversion",
        }
    }

    /// Key of the submission script in the script registry.
    pub fn script_key(&self) -> &'static str {
        match self {
            JobKind::Alignment => "MAFFT_SINGLE_GENE",
            JobKind::Trim => "TRIMAL_SINGLE_GENE_GAPFRACTION",
            JobKind::TrimBmge => "BMGE_SINGLE_GENE",
            JobKind::TrimDivvier => "DIVVIER_SINGLE_GENE",
            JobKind::TreeSinglePartition => "IQ_TREE_SINGLE_GENE",
            JobKind::TreeMultiPartition { modelfinder: false } => "IQ_TREE_BIG",
            JobKind::TreeMultiPartition { modelfinder: true } => "IQ_TREE_BIG_MODELFINDER",
            JobKind::Annotation => "MFANNOT_SINGLE_GENE",
            JobKind::FormatConversion => "ASN_2_GB",
        }
    }

    /// Argument names in positional order.
    pub fn arg_names(&self) -> &'static [&'static str] {
        match self {
            JobKind::Alignment => alignment::ARGS,
            JobKind::Trim => trim::ARGS,
            JobKind::TrimBmge => bmge::ARGS,
            JobKind::TrimDivvier => divvier::ARGS,
            JobKind::TreeSinglePartition => iqtree::SINGLE_ARGS,
            JobKind::TreeMultiPartition { .. } => iqtree::MULTI_ARGS,
            JobKind::Annotation => annotation::ARGS,
            JobKind::FormatConversion => format_conversion::ARGS,
        }
    }

    /// Log column names for the arguments: `arg1_<name>`, `arg2_<name>`, ...
    pub fn arg_columns(&self) -> Vec<String> {
        self.arg_names()
            .iter()
            .enumerate()
            .map(|(i, name)| format!("arg{}_{name}", i + 1))
            .collect()
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoreError::UnknownJobKind(s.to_string()))
    }
}

impl ArgumentResolver for JobKind {
    fn resolve(
        &self,
        input_id: &str,
        input_dir: &Path,
        output_dir: &Path,
        options: &JobOptions,
    ) -> Result<ResolvedArgs, CoreError> {
        match self {
            JobKind::Alignment => alignment::resolve(input_id, input_dir, output_dir, options),
            JobKind::Trim => trim::resolve(input_id, input_dir, output_dir, options),
            JobKind::TrimBmge => bmge::resolve(input_id, input_dir, output_dir, options),
            JobKind::TrimDivvier => divvier::resolve(input_id, input_dir, output_dir, options),
            JobKind::TreeSinglePartition => {
                iqtree::resolve_single(input_id, input_dir, output_dir, options)
            }
            JobKind::TreeMultiPartition { .. } => {
                iqtree::resolve_multi(*self, input_id, input_dir, output_dir, options)
            }
            JobKind::Annotation => annotation::resolve(input_id, input_dir, output_dir, options),
            JobKind::FormatConversion => {
                format_conversion::resolve(input_id, input_dir, output_dir, options)
            }
        }
    }
}

impl OutputProbe for JobKind {
    fn probe(&self, _input_id: &str, args: &ResolvedArgs) -> Result<OutputState, CoreError> {
        match self {
            JobKind::Alignment => single_file_output(args.get("output_name")?),
            JobKind::Trim => trim::probe(args),
            JobKind::TrimBmge => single_file_output(args.get("output_name")?),
            JobKind::TrimDivvier => divvier::probe(args.get("input_fasta")?),
            JobKind::TreeSinglePartition | JobKind::TreeMultiPartition { .. } => {
                iqtree::probe(args.get("output_base")?)
            }
            JobKind::Annotation => single_file_output(args.get("output_name")?),
            JobKind::FormatConversion => single_file_output(args.get("output_name")?),
        }
    }
}

// ---------------------------------------------------------------------------
// Filesystem helpers shared by the kinds
// ---------------------------------------------------------------------------

/// Return `path` if it exists, otherwise `MissingInput` naming it.
pub(crate) fn require_input(path: PathBuf) -> Result<PathBuf, CoreError> {
    if path.exists() {
        Ok(path)
    } else {
        Err(CoreError::MissingInput { path })
    }
}

/// Create an output directory (and parents) if it does not exist yet.
pub(crate) fn ensure_dir(dir: &Path) -> Result<(), CoreError> {
    if !dir.exists() {
        tracing::debug!(dir = %dir.display(), "Creating output directory");
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Size of a file, `None` if it does not exist.
pub(crate) fn file_size(path: &Path) -> Result<Option<u64>, CoreError> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.len())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CoreError::Io(e)),
    }
}

fn single_file_output(output_name: &str) -> Result<OutputState, CoreError> {
    let reference = PathBuf::from(output_name);
    let size = file_size(&reference)?;
    Ok(OutputState { reference, size })
}

/// `<dir>/<input_id>.<suffix>`
pub(crate) fn id_file(dir: &Path, input_id: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{input_id}.{suffix}"))
}

pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in JobKind::ALL {
            assert_eq!(kind.as_str().parse::<JobKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!("raxml".parse::<JobKind>().is_err());
    }

    #[test]
    fn test_arg_columns_are_numbered() {
        assert_eq!(
            JobKind::TreeMultiPartition { modelfinder: false }.arg_columns(),
            vec![
                "arg1_input_alignment".to_string(),
                "arg2_partition_file".to_string(),
                "arg3_output_base".to_string(),
            ]
        );
    }

    #[test]
    fn test_divvier_takes_a_single_argument() {
        let kind: JobKind = "trim-divvier".parse().unwrap();
        assert_eq!(kind.script_key(), "DIVVIER_SINGLE_GENE");
        assert_eq!(kind.arg_columns(), vec!["arg1_input_fasta".to_string()]);
    }

    #[test]
    fn test_modelfinder_selects_its_own_script() {
        assert_eq!(
            JobKind::TreeMultiPartition { modelfinder: true }.script_key(),
            "IQ_TREE_BIG_MODELFINDER"
        );
    }

    #[test]
    fn test_resolved_args_from_values_pairs_names() {
        let args = ResolvedArgs::from_values(
            JobKind::Trim,
            &["/in/a.fasta".to_string(), "/out/a.fasta".to_string()],
        );
        assert_eq!(args.get("output_name").unwrap(), "/out/a.fasta");
        assert_eq!(args.len(), 2);
    }
}

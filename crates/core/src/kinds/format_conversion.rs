//! asn2gb conversion of MFannot `.mf.sqn` submissions to GenBank.

use std::path::Path;

use super::{ensure_dir, id_file, path_arg, require_input, ResolvedArgs};
use crate::error::CoreError;
use crate::options::JobOptions;

const KIND: &str = "format-conversion";

pub(crate) const ARGS: &[&str] = &["input_sqn", "output_name"];

const OPTIONS: &[&str] = &["sqn_suffix", "gb_suffix"];

pub(crate) fn resolve(
    input_id: &str,
    input_dir: &Path,
    output_dir: &Path,
    options: &JobOptions,
) -> Result<ResolvedArgs, CoreError> {
    options.check_known(KIND, OPTIONS)?;

    // Annotation output is named `<id>.mf`, so its sqn export is `<id>.mf.sqn`.
    let sqn_suffix = format!("mf.{}", options.get_or("sqn_suffix", "sqn"));
    let input_sqn = require_input(id_file(input_dir, input_id, &sqn_suffix))?;
    let output_name = id_file(output_dir, input_id, options.get_or("gb_suffix", "gb"));
    ensure_dir(output_dir)?;

    Ok(ResolvedArgs::new(KIND)
        .push("input_sqn", path_arg(&input_sqn))
        .push("output_name", path_arg(&output_name)))
}

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::LookupResult;

/// Write results as a pretty-printed (2-space) JSON array, replacing any
/// existing file. Non-ASCII text is written as-is.
pub fn write_results(path: &Path, results: &[LookupResult]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create results file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, results)
        .with_context(|| format!("Failed to serialize results to {}", path.display()))?;
    writer.flush()?;

    Ok(())
}

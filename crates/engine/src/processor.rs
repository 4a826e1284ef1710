// crates/engine/src/processor.rs
use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::stats::FileReport;
use lambda_census_core::Detector;
use log::debug;
use std::path::PathBuf;

/// Reads one file and runs the detector over its bytes.
///
/// Decode failures and malformed brackets are reported as skips, not errors.
///
/// # Errors
/// Returns [`EngineError::FileRead`] when the file cannot be read.
pub fn process_file(path: PathBuf, config: &Config) -> Result<FileReport> {
    let bytes = std::fs::read(&path).map_err(|e| EngineError::FileRead {
        path: path.clone(),
        source: e,
    })?;
    let outcome = Detector::new(config.sampling).detect_bytes(&bytes);
    if let Some(reason) = outcome.skip_reason() {
        debug!("skipped {}: {reason}", path.display());
    }
    Ok(FileReport::new(path, outcome))
}

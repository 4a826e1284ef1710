// crates/engine/src/lib.rs
use crossbeam_channel::Receiver;
use log::info;
use rayon::iter::Either;
use rayon::prelude::*;
use std::path::PathBuf;

pub mod config;
pub mod error;
pub mod filesystem;
pub mod options;
pub mod processor;
pub mod stats;

use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::stats::{FileReport, RunResult};

/// Run the lambda counting engine.
///
/// Returns a `RunResult` containing the per-file reports, sorted as the
/// configuration asks, and any I/O errors encountered during processing.
///
/// # Errors
///
/// Returns an error for critical failures (missing root, invalid override glob).
/// In strict mode the first file read error is returned as well; otherwise
/// individual failures are collected in `RunResult::errors`.
pub fn run(config: &Config) -> Result<RunResult> {
    let (tx, rx) = crossbeam_channel::bounded(1024);
    let (err_tx, err_rx) = std::sync::mpsc::channel();

    let walk_cfg = config.walk.clone();
    let filter_cfg = config.filter.clone();

    std::thread::spawn(move || {
        if let Err(e) = crate::filesystem::walk_parallel(&walk_cfg, &filter_cfg, &tx) {
            let _ = err_tx.send(e);
        }
    });

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs.max(1))
        .build()?;

    let result = pool.install(|| collect_reports(rx, config));

    // ルートの検証や上書きパターンの構築に失敗した場合は走査自体が行われていない
    if let Ok(walk_err) = err_rx.try_recv() {
        return Err(walk_err);
    }
    let mut result = result?;

    result.sort(config.sort, config.descending);

    let summary = result.summary();
    info!(
        "{} file(s), {} lambda(s), {} skipped, {} error(s)",
        summary.files,
        summary.lambdas,
        summary.skipped_files,
        result.errors.len()
    );

    Ok(result)
}

fn collect_reports(rx: Receiver<PathBuf>, config: &Config) -> Result<RunResult> {
    let iter = rx.into_iter().par_bridge();

    if config.strict {
        // Strict mode: fail on first error
        let files = iter
            .map(|path| processor::process_file(path, config))
            .collect::<Result<Vec<_>>>()?;
        Ok(RunResult {
            files,
            errors: Vec::new(),
        })
    } else {
        // Non-strict mode: collect errors alongside successful results
        let (files, errors): (Vec<FileReport>, Vec<(PathBuf, EngineError)>) =
            iter.partition_map(|path| {
                let key = path.clone();
                match processor::process_file(path, config) {
                    Ok(report) => Either::Left(report),
                    Err(e) => Either::Right((key, e)),
                }
            });
        Ok(RunResult { files, errors })
    }
}

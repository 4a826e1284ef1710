// crates/engine/src/filesystem.rs
use crate::config::{FilterConfig, WalkOptions};
use crate::error::{EngineError, Result};
use crossbeam_channel::Sender;
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use log::warn;
use std::path::PathBuf;

/// Parallel recursive directory walk.
///
/// Files named directly as roots are always sent; files found below a
/// directory root must pass the extension and size filters.
///
/// # Errors
/// Returns an error if a root does not exist or an override glob is invalid.
/// Errors on individual entries during traversal are logged and skipped.
pub fn walk_parallel(
    options: &WalkOptions,
    filters: &FilterConfig,
    tx: &Sender<PathBuf>,
) -> Result<()> {
    let Some((first, rest)) = options.roots.split_first() else {
        return Ok(());
    };

    if let Some(missing) = options.roots.iter().find(|root| !root.exists()) {
        return Err(EngineError::Config(format!(
            "Path not found: {}",
            missing.display()
        )));
    }

    let mut builder = WalkBuilder::new(first);
    for root in rest {
        builder.add(root);
    }

    builder
        .threads(options.threads)
        .hidden(!options.hidden)
        .git_ignore(options.git_ignore)
        .follow_links(options.follow_links)
        .max_depth(options.max_depth);

    // ignore は WalkBuilder ごとに Overrides を 1 つしか持てない。除外は `!` 接頭辞で表す
    if !options.override_include.is_empty() || !options.override_exclude.is_empty() {
        let mut ov_builder = OverrideBuilder::new(first);
        for ov in &options.override_include {
            ov_builder.add(ov)?;
        }
        for ov in &options.override_exclude {
            ov_builder.add(&format!("!{ov}"))?;
        }
        builder.overrides(ov_builder.build()?);
    }

    let filter = filters.clone();
    builder.filter_entry(move |entry| {
        if entry.file_type().is_some_and(|ft| ft.is_dir()) {
            return true;
        }
        if !filter.accepts(entry.path()) {
            return false;
        }
        if let Some(max) = filter.max_size
            && let Ok(meta) = entry.metadata()
            && meta.len() > max
        {
            return false;
        }
        true
    });

    let walker = builder.build_parallel();
    walker.run(|| {
        let tx = tx.clone();
        Box::new(move |entry| {
            match entry {
                Ok(entry) if entry.file_type().is_some_and(|ft| ft.is_file()) => {
                    // 受信側が閉じていれば走査を打ち切る
                    if tx.send(entry.into_path()).is_err() {
                        return ignore::WalkState::Quit;
                    }
                }
                Ok(_) => {}
                Err(err) => warn!("walk: {err}"),
            }
            ignore::WalkState::Continue
        })
    });

    Ok(())
}

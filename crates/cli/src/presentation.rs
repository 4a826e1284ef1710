// crates/cli/src/presentation.rs
use crate::config::Config;
use crate::error::Result;
use lambda_census_engine::options::{OutputFormat, OutputMode};
use lambda_census_engine::stats::{FileReport, FileStatus, RunResult, Summary};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
struct Report<'a> {
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<&'a [FileReport]>,
    summary: Summary,
}

/// Renders `result` to `out` in the configured format.
///
/// # Errors
/// Returns an error if writing or serialization fails.
pub fn write_results<W: Write>(out: &mut W, result: &RunResult, config: &Config) -> Result<()> {
    let summary = result.summary();
    let files = match config.output_mode {
        OutputMode::Full => Some(result.files.as_slice()),
        OutputMode::TotalOnly => None,
    };

    match config.format {
        OutputFormat::Table => write_table(out, files, &summary, config)?,
        OutputFormat::Csv => write_sv(out, files, &summary, ",")?,
        OutputFormat::Tsv => write_sv(out, files, &summary, "\t")?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report(files, summary))?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => serde_yaml::to_writer(&mut *out, &report(files, summary))?,
        OutputFormat::Jsonl => write_jsonl(out, files, &summary)?,
    }
    Ok(())
}

const fn report(files: Option<&[FileReport]>, summary: Summary) -> Report<'_> {
    Report {
        version: crate::VERSION,
        files,
        summary,
    }
}

fn write_table<W: Write>(
    out: &mut W,
    files: Option<&[FileReport]>,
    summary: &Summary,
    config: &Config,
) -> Result<()> {
    writeln!(
        out,
        "lambda_census v{} · parallel={}",
        crate::VERSION,
        config.jobs
    )?;
    writeln!(out)?;

    if let Some(files) = files {
        writeln!(out, "  LAMBDAS      FILE")?;
        writeln!(out, "----------------------------------------------")?;
        for f in files {
            match f.status {
                FileStatus::Counted { count } => {
                    writeln!(out, "{count:>9}      {}", f.path.display())?;
                }
                FileStatus::Skipped { reason } => {
                    writeln!(out, "{:>9}      {} ({reason})", "-", f.path.display())?;
                }
            }
        }
        writeln!(out, "---")?;
    }

    writeln!(
        out,
        "{:>9}      TOTAL ({} files, {} skipped)",
        summary.lambdas, summary.files, summary.skipped_files
    )?;
    if summary.skipped_files > 0 {
        writeln!(
            out,
            "           skipped: decode_error={}, malformed_brackets={}",
            summary.skipped_decode, summary.skipped_malformed
        )?;
    }
    Ok(())
}

fn write_sv<W: Write>(
    out: &mut W,
    files: Option<&[FileReport]>,
    summary: &Summary,
    delimiter: &str,
) -> Result<()> {
    let Some(files) = files else {
        return write_summary_rows(out, summary, delimiter);
    };

    writeln!(out, "path{delimiter}count")?;
    for f in files {
        let path = escape_field(&f.path.display().to_string(), delimiter);
        writeln!(out, "{path}{delimiter}{}", f.status.count_value())?;
    }
    Ok(())
}

/// `key,value` rows: lambdas, skipped_files, files.
///
/// # Errors
/// Returns an error if writing fails.
pub fn write_summary_rows<W: Write>(out: &mut W, summary: &Summary, delimiter: &str) -> Result<()> {
    writeln!(out, "key{delimiter}value")?;
    for (key, value) in summary.rows() {
        writeln!(out, "{key}{delimiter}{value}")?;
    }
    Ok(())
}

fn escape_field(field: &str, delimiter: &str) -> String {
    if delimiter == "," && (field.contains(',') || field.contains('"') || field.contains('\n')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

fn write_jsonl<W: Write>(
    out: &mut W,
    files: Option<&[FileReport]>,
    summary: &Summary,
) -> Result<()> {
    for f in files.unwrap_or_default() {
        let mut v = serde_json::to_value(f)?;
        if let Some(obj) = v.as_object_mut() {
            obj.insert("type".to_string(), "file".into());
        }
        writeln!(out, "{}", serde_json::to_string(&v)?)?;
    }

    let mut total = serde_json::to_value(summary)?;
    if let Some(obj) = total.as_object_mut() {
        obj.insert("type".to_string(), "total".into());
        obj.insert("version".to_string(), crate::VERSION.into());
    }
    writeln!(out, "{}", serde_json::to_string(&total)?)?;
    Ok(())
}

/// Writes every sample as `<sample path=".." position="..">` blocks.
///
/// # Errors
/// Returns an error if writing fails.
pub fn write_samples<W: Write>(out: &mut W, result: &RunResult) -> Result<()> {
    for (path, sample) in result.samples() {
        writeln!(
            out,
            "<sample path=\"{}\" position=\"{}\">",
            path.display(),
            sample.offset
        )?;
        out.write_all(sample.context.as_bytes())?;
        writeln!(out, "\n</sample>")?;
    }
    Ok(())
}

/// Writes the sample and summary side files requested by the configuration.
///
/// # Errors
/// Returns an error if a file cannot be created or written.
pub fn write_side_files(result: &RunResult, config: &Config) -> Result<()> {
    if let Some(path) = &config.samples_out {
        with_file(path, |out| write_samples(out, result))?;
    }
    if let Some(path) = &config.summary_out {
        with_file(path, |out| write_summary_rows(out, &result.summary(), ","))?;
    }
    Ok(())
}

fn with_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut out = BufWriter::new(File::create(path)?);
    write(&mut out)?;
    out.flush()?;
    Ok(())
}

// crates/cli/src/config.rs
use crate::args::Args;
use crate::error::AppError;
use crate::options;
use lambda_census_core::SamplingConfig;
pub use lambda_census_engine::config::{
    Config, ConfigBuilder, FilterConfig, FilterConfigBuilder, WalkOptions, WalkOptionsBuilder,
    default_extensions,
};
use lambda_census_engine::options as engine_options;
use std::path::PathBuf;

impl TryFrom<Args> for Config {
    type Error = AppError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let jobs = args.scan.jobs.unwrap_or_else(num_cpus::get);
        let walk = walk_options_from_args(&args, jobs)?;
        let filter = filter_config_from_args(&args)?;

        let sampling = SamplingConfig {
            probability: args.sampling.sample_probability,
            context_margin: args.sampling.context_margin,
            seed: args.sampling.seed,
        };

        let format: engine_options::OutputFormat = args.output.format.into();
        let sort: engine_options::SortKey = args.output.sort.into();
        let output_mode = if args.output.total_only {
            engine_options::OutputMode::TotalOnly
        } else {
            engine_options::OutputMode::Full
        };

        ConfigBuilder::default()
            .walk(walk)
            .filter(filter)
            .sampling(sampling)
            .format(format)
            .sort(sort)
            .descending(args.output.desc)
            .output_mode(output_mode)
            .samples_out(args.sampling.samples_out)
            .summary_out(args.output.summary_out)
            .jobs(jobs)
            .strict(args.behavior.strict)
            .build()
            .map_err(|e| AppError::Config(e.to_string()))
    }
}

fn walk_options_from_args(args: &Args, jobs: usize) -> Result<WalkOptions, AppError> {
    let scan = &args.scan;
    let paths = &args.paths;

    let roots = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths.clone()
    };

    WalkOptionsBuilder::default()
        .roots(roots)
        .threads(scan.walk_threads.unwrap_or(jobs))
        .hidden(scan.hidden)
        .git_ignore(!scan.no_gitignore)
        .max_depth(scan.max_depth)
        .follow_links(scan.follow)
        .override_include(scan.override_include.clone())
        .override_exclude(scan.override_exclude.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))
}

fn filter_config_from_args(args: &Args) -> Result<FilterConfig, AppError> {
    let opts = &args.filter;
    let allow_ext = if opts.ext.is_empty() {
        default_extensions()
    } else {
        opts.ext
            .iter()
            .map(|e| e.trim_start_matches('.').to_owned())
            .collect()
    };

    FilterConfigBuilder::default()
        .allow_ext(allow_ext)
        .deny_ext(opts.exclude_ext.clone())
        .max_size(opts.max_size.map(|s| s.0))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))
}

// From trait implementations for CLI -> Engine enum conversion

macro_rules! map_enum {
    ($from:ty, $to:ty, $($variant:ident),+ $(,)?) => {
        impl From<$from> for $to {
            fn from(f: $from) -> Self {
                match f {
                    $( <$from>::$variant => <$to>::$variant, )+
                }
            }
        }
    };
}

map_enum!(
    options::OutputFormat,
    engine_options::OutputFormat,
    Table,
    Csv,
    Tsv,
    Json,
    Jsonl,
    Yaml
);
map_enum!(options::SortKey, engine_options::SortKey, Path, Count);

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(argv: &[&str]) -> Config {
        let args = Args::try_parse_from(std::iter::once("lambda_census").chain(argv.iter().copied()))
            .unwrap();
        Config::try_from(args).unwrap()
    }

    #[test]
    fn test_defaults_scan_current_dir() {
        let config = config(&[]);
        assert_eq!(config.walk.roots, vec![PathBuf::from(".")]);
        assert_eq!(config.filter.allow_ext, default_extensions());
        assert!(config.walk.git_ignore);
        assert!(!config.strict);
    }

    #[test]
    fn test_ext_dots_stripped() {
        let config = config(&["--ext", ".cc,hpp"]);
        assert_eq!(config.filter.allow_ext, vec!["cc", "hpp"]);
    }

    #[test]
    fn test_sampling_and_output_flags() {
        let config = config(&[
            "--sample-probability",
            "1",
            "--seed",
            "7",
            "--format",
            "json",
            "--sort",
            "count",
            "--desc",
            "--total-only",
            "-j",
            "3",
        ]);
        assert_eq!(config.sampling.probability, 1.0);
        assert_eq!(config.sampling.seed, 7);
        assert_eq!(config.format, engine_options::OutputFormat::Json);
        assert_eq!(config.sort, engine_options::SortKey::Count);
        assert!(config.descending);
        assert_eq!(config.output_mode, engine_options::OutputMode::TotalOnly);
        assert_eq!(config.jobs, 3);
        assert_eq!(config.walk.threads, 3);
    }
}

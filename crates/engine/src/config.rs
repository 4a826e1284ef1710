// crates/engine/src/config.rs
use crate::options::{OutputFormat, OutputMode, SortKey};
use derive_builder::Builder;
use lambda_census_core::SamplingConfig;
use std::path::{Path, PathBuf};

/// C++ ソースとみなす既定の拡張子
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["cc", "cpp", "cxx", "c++"];

#[must_use]
pub fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|&e| e.to_owned()).collect()
}

#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct WalkOptions {
    #[builder(default)]
    pub roots: Vec<PathBuf>,
    #[builder(default = "1")]
    pub threads: usize,
    #[builder(default)]
    pub hidden: bool,
    #[builder(default = "true")]
    pub git_ignore: bool,
    #[builder(default)]
    pub max_depth: Option<usize>,
    #[builder(default)]
    pub follow_links: bool,
    #[builder(default)]
    pub override_include: Vec<String>,
    #[builder(default)]
    pub override_exclude: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            roots: vec![],
            threads: 1,
            hidden: false,
            git_ignore: true,
            max_depth: None,
            follow_links: false,
            override_include: vec![],
            override_exclude: vec![],
        }
    }
}

#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct FilterConfig {
    #[builder(default = "default_extensions()")]
    pub allow_ext: Vec<String>,
    #[builder(default)]
    pub deny_ext: Vec<String>,
    #[builder(default)]
    pub max_size: Option<u64>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            allow_ext: default_extensions(),
            deny_ext: vec![],
            max_size: None,
        }
    }
}

impl FilterConfig {
    /// Extension check; comparison ignores ASCII case.
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            // 許可リストがある場合、拡張子なしのファイルは除外
            return self.allow_ext.is_empty();
        };
        if self.deny_ext.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            return false;
        }
        self.allow_ext.is_empty() || self.allow_ext.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct Config {
    #[builder(default)]
    pub walk: WalkOptions,
    #[builder(default)]
    pub filter: FilterConfig,
    #[builder(default)]
    pub sampling: SamplingConfig,

    #[builder(default = "OutputFormat::Table")]
    pub format: OutputFormat,
    #[builder(default)]
    pub sort: SortKey,
    #[builder(default)]
    pub descending: bool,
    #[builder(default)]
    pub output_mode: OutputMode,

    #[builder(default)]
    pub samples_out: Option<PathBuf>,
    #[builder(default)]
    pub summary_out: Option<PathBuf>,

    /// 解析ワーカースレッド数
    #[builder(default = "num_cpus::get()")]
    pub jobs: usize,
    #[builder(default)]
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            walk: WalkOptions::default(),
            filter: FilterConfig::default(),
            sampling: SamplingConfig::default(),
            format: OutputFormat::Table,
            sort: SortKey::Path,
            descending: false,
            output_mode: OutputMode::default(),
            samples_out: None,
            summary_out: None,
            jobs: num_cpus::get(),
            strict: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_extensions_accepted() {
        let filter = FilterConfig::default();
        assert!(filter.accepts(Path::new("src/a.cpp")));
        assert!(filter.accepts(Path::new("x.c++")));
        assert!(filter.accepts(Path::new("MAIN.CC")));
        assert!(!filter.accepts(Path::new("a.h")));
        assert!(!filter.accepts(Path::new("Makefile")));
    }

    #[test]
    fn test_deny_wins_over_allow() {
        let filter = FilterConfigBuilder::default()
            .deny_ext(vec!["cxx".to_owned()])
            .build()
            .unwrap();
        assert!(!filter.accepts(Path::new("a.cxx")));
        assert!(filter.accepts(Path::new("a.cc")));
    }

    #[test]
    fn test_empty_allow_list_accepts_everything() {
        let filter = FilterConfigBuilder::default()
            .allow_ext(Vec::<String>::new())
            .build()
            .unwrap();
        assert!(filter.accepts(Path::new("README")));
        assert!(filter.accepts(Path::new("a.py")));
    }

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::default().strict(true).build().unwrap();
        assert!(config.strict);
        assert_eq!(config.sort, SortKey::Path);
        assert_eq!(config.filter.allow_ext, default_extensions());
        assert!(config.walk.git_ignore);
    }
}

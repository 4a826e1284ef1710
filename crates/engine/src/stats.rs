// crates/engine/src/stats.rs
use crate::error::EngineError;
use crate::options::SortKey;
use lambda_census_core::{Outcome, Sample, SkipReason};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Counted { count: usize },
    Skipped { reason: SkipReason },
}

impl FileStatus {
    /// CSV 出力用の値。スキップされたファイルは -1
    #[must_use]
    pub fn count_value(&self) -> i64 {
        match self {
            Self::Counted { count } => i64::try_from(*count).unwrap_or(i64::MAX),
            Self::Skipped { .. } => -1,
        }
    }
}

/// Per-file result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<Sample>,
}

impl FileReport {
    #[must_use]
    pub fn new(path: PathBuf, outcome: Outcome) -> Self {
        match outcome {
            Outcome::Detected(detection) => Self {
                path,
                status: FileStatus::Counted {
                    count: detection.count,
                },
                samples: detection.samples,
            },
            Outcome::Skipped { reason } => Self {
                path,
                status: FileStatus::Skipped { reason },
                samples: Vec::new(),
            },
        }
    }

    #[must_use]
    pub const fn count(&self) -> Option<usize> {
        match self.status {
            FileStatus::Counted { count } => Some(count),
            FileStatus::Skipped { .. } => None,
        }
    }
}

/// Run totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Files examined, skipped ones included.
    pub files: usize,
    pub counted_files: usize,
    pub lambdas: usize,
    pub skipped_files: usize,
    pub skipped_decode: usize,
    pub skipped_malformed: usize,
}

impl Summary {
    #[must_use]
    pub const fn of(report: &FileReport) -> Self {
        let mut summary = Self {
            files: 1,
            counted_files: 0,
            lambdas: 0,
            skipped_files: 0,
            skipped_decode: 0,
            skipped_malformed: 0,
        };
        match report.status {
            FileStatus::Counted { count } => {
                summary.counted_files = 1;
                summary.lambdas = count;
            }
            FileStatus::Skipped { reason } => {
                summary.skipped_files = 1;
                match reason {
                    SkipReason::DecodeError => summary.skipped_decode = 1,
                    SkipReason::MalformedBrackets => summary.skipped_malformed = 1,
                }
            }
        }
        summary
    }

    /// Associative, order-independent combination of two partial summaries.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            files: self.files + other.files,
            counted_files: self.counted_files + other.counted_files,
            lambdas: self.lambdas + other.lambdas,
            skipped_files: self.skipped_files + other.skipped_files,
            skipped_decode: self.skipped_decode + other.skipped_decode,
            skipped_malformed: self.skipped_malformed + other.skipped_malformed,
        }
    }

    /// `key,value` rows in the persisted count format.
    #[must_use]
    pub fn rows(&self) -> [(&'static str, usize); 3] {
        [
            ("lambdas", self.lambdas),
            ("skipped_files", self.skipped_files),
            ("files", self.files),
        ]
    }
}

#[derive(Debug, Default)]
pub struct RunResult {
    pub files: Vec<FileReport>,
    pub errors: Vec<(PathBuf, EngineError)>,
}

impl RunResult {
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.files
            .par_iter()
            .map(Summary::of)
            .reduce(Summary::default, Summary::merge)
    }

    /// Orders reports by `key`; ties always fall back to the path.
    pub fn sort(&mut self, key: SortKey, descending: bool) {
        self.files.sort_by(|a, b| {
            let order = match key {
                SortKey::Path => Ordering::Equal,
                SortKey::Count => a.status.count_value().cmp(&b.status.count_value()),
            };
            let order = if descending { order.reverse() } else { order };
            order.then_with(|| {
                let by_path = a.path.cmp(&b.path);
                if descending && key == SortKey::Path {
                    by_path.reverse()
                } else {
                    by_path
                }
            })
        });
    }

    /// Every captured sample, paired with the file it came from.
    pub fn samples(&self) -> impl Iterator<Item = (&Path, &Sample)> {
        self.files
            .iter()
            .flat_map(|f| f.samples.iter().map(move |s| (f.path.as_path(), s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_census_core::Detection;

    fn counted(path: &str, count: usize) -> FileReport {
        FileReport::new(
            PathBuf::from(path),
            Outcome::Detected(Detection {
                count,
                samples: vec![],
            }),
        )
    }

    fn skipped(path: &str, reason: SkipReason) -> FileReport {
        FileReport::new(PathBuf::from(path), Outcome::Skipped { reason })
    }

    fn result(files: Vec<FileReport>) -> RunResult {
        RunResult {
            files,
            errors: vec![],
        }
    }

    #[test]
    fn test_summary_totals() {
        let run = result(vec![
            counted("a.cpp", 3),
            counted("b.cpp", 0),
            skipped("c.cpp", SkipReason::MalformedBrackets),
            skipped("d.cpp", SkipReason::DecodeError),
        ]);
        let summary = run.summary();
        assert_eq!(summary.files, 4);
        assert_eq!(summary.counted_files, 2);
        assert_eq!(summary.lambdas, 3);
        assert_eq!(summary.skipped_files, 2);
        assert_eq!(summary.skipped_decode, 1);
        assert_eq!(summary.skipped_malformed, 1);
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(RunResult::default().summary(), Summary::default());
    }

    #[test]
    fn test_merge_is_order_independent() {
        let a = Summary::of(&counted("a.cpp", 2));
        let b = Summary::of(&skipped("b.cpp", SkipReason::DecodeError));
        let c = Summary::of(&counted("c.cpp", 5));
        assert_eq!(a.merge(b).merge(c), c.merge(a.merge(b)));
    }

    #[test]
    fn test_summary_rows() {
        let run = result(vec![counted("a.cpp", 7), skipped("b.cpp", SkipReason::DecodeError)]);
        assert_eq!(
            run.summary().rows(),
            [("lambdas", 7), ("skipped_files", 1), ("files", 2)]
        );
    }

    #[test]
    fn test_skipped_count_value() {
        assert_eq!(skipped("x.cpp", SkipReason::DecodeError).status.count_value(), -1);
        assert_eq!(counted("x.cpp", 4).status.count_value(), 4);
    }

    #[test]
    fn test_sort_by_count_desc_then_path() {
        let mut run = result(vec![
            counted("b.cpp", 1),
            skipped("z.cpp", SkipReason::MalformedBrackets),
            counted("c.cpp", 9),
            counted("a.cpp", 1),
        ]);
        run.sort(SortKey::Count, true);
        let order: Vec<_> = run.files.iter().map(|f| f.path.to_str().unwrap()).collect();
        assert_eq!(order, vec!["c.cpp", "a.cpp", "b.cpp", "z.cpp"]);
    }

    #[test]
    fn test_sort_by_path() {
        let mut run = result(vec![counted("b.cpp", 1), counted("a.cpp", 2)]);
        run.sort(SortKey::Path, false);
        assert_eq!(run.files[0].path, PathBuf::from("a.cpp"));
        run.sort(SortKey::Path, true);
        assert_eq!(run.files[0].path, PathBuf::from("b.cpp"));
    }

    #[test]
    fn test_report_serializes_flat() {
        let json = serde_json::to_value(counted("a.cpp", 2)).unwrap();
        assert_eq!(json["path"], "a.cpp");
        assert_eq!(json["status"], "counted");
        assert_eq!(json["count"], 2);
        assert!(json.get("samples").is_none());
    }
}

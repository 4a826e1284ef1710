// crates/core/src/detect.rs
//! # Detection Driver
//!
//! Runs normalization, flattening and matching over one file and classifies
//! it as counted or skipped.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::SamplingConfig;
use crate::error::SkipReason;
use crate::flatten::Flattener;
use crate::grammar::LambdaMatcher;
use crate::normalize::normalize;
use crate::sample::{Sample, Sampler};

/// Result of a successfully processed file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub count: usize,
    pub samples: Vec<Sample>,
}

/// Per-file classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Detected(Detection),
    Skipped { reason: SkipReason },
}

impl Outcome {
    /// Lambda count, or `None` for a skipped file.
    #[must_use]
    pub const fn count(&self) -> Option<usize> {
        match self {
            Self::Detected(detection) => Some(detection.count),
            Self::Skipped { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    #[must_use]
    pub const fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Detected(_) => None,
            Self::Skipped { reason } => Some(*reason),
        }
    }

    /// Consumes the outcome, returning its samples (empty when skipped).
    #[must_use]
    pub fn into_samples(self) -> Vec<Sample> {
        match self {
            Self::Detected(detection) => detection.samples,
            Self::Skipped { .. } => Vec::new(),
        }
    }
}

/// 検出器: サンプリング設定を保持し、ファイル単位で検出を行う
#[derive(Debug, Clone, Copy, Default)]
pub struct Detector {
    config: SamplingConfig,
}

impl Detector {
    #[must_use]
    pub const fn new(config: SamplingConfig) -> Self {
        Self { config }
    }

    /// Counts the lambdas in `source`.
    ///
    /// A malformed bracket structure discards any partial count and skips the file.
    #[must_use]
    pub fn detect(&self, source: &str) -> Outcome {
        let normalized = normalize(source);
        let matcher = LambdaMatcher::global();
        let mut sampler = Sampler::new(source, self.config);
        let mut count = 0;

        for leaf in Flattener::new(&normalized) {
            let leaf = match leaf {
                Ok(leaf) => leaf,
                Err(err) => {
                    debug!("skipping source: {err}");
                    return Outcome::Skipped {
                        reason: SkipReason::from(err),
                    };
                }
            };
            let before = count;
            for found in matcher.find_iter(&leaf) {
                count += 1;
                sampler.observe(found.offset);
            }
            trace!("{:?} leaf: {} lambda(s)", leaf.kind(), count - before);
        }

        Outcome::Detected(Detection {
            count,
            samples: sampler.into_samples(),
        })
    }

    /// Decodes `bytes` as UTF-8 and counts the lambdas.
    #[must_use]
    pub fn detect_bytes(&self, bytes: &[u8]) -> Outcome {
        match core::str::from_utf8(bytes) {
            Ok(source) => self.detect(source),
            Err(err) => {
                debug!("skipping source: {err}");
                Outcome::Skipped {
                    reason: SkipReason::DecodeError,
                }
            }
        }
    }
}

/// Shorthand for [`Detector::detect`].
#[must_use]
pub fn detect(source: &str, config: &SamplingConfig) -> Outcome {
    Detector::new(*config).detect(source)
}

/// Shorthand for [`Detector::detect_bytes`].
#[must_use]
pub fn detect_bytes(bytes: &[u8], config: &SamplingConfig) -> Outcome {
    Detector::new(*config).detect_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(source: &str) -> Option<usize> {
        detect(source, &SamplingConfig::disabled()).count()
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(count(""), Some(0));
    }

    #[test]
    fn test_nested_lambdas() {
        assert_eq!(count("[]() { return []() { return 1; }; };"), Some(2));
    }

    #[test]
    fn test_unbalanced_is_skipped() {
        let outcome = detect("void f() { []{}", &SamplingConfig::disabled());
        assert_eq!(
            outcome,
            Outcome::Skipped {
                reason: SkipReason::MalformedBrackets
            }
        );
        assert!(outcome.is_skipped());
        assert_eq!(outcome.count(), None);
    }

    #[test]
    fn test_invalid_utf8_is_skipped() {
        let outcome = detect_bytes(b"auto f = []{}; \xff\xfe", &SamplingConfig::disabled());
        assert_eq!(outcome.skip_reason(), Some(SkipReason::DecodeError));
    }

    #[test]
    fn test_samples_point_at_introducer() {
        let source = "int a;\nauto f = [x] { return x; };\nint b;";
        let config = SamplingConfig::default().with_probability(1.0);
        let Outcome::Detected(detection) = Detector::new(config).detect(source) else {
            panic!("expected detection");
        };
        assert_eq!(detection.count, 1);
        assert_eq!(detection.samples.len(), 1);
        assert_eq!(detection.samples[0].offset, source.find('[').unwrap());
        assert_eq!(detection.samples[0].context, source);
    }

    #[test]
    fn test_sampling_does_not_change_count() {
        let source = "f([]{}, []{}, [](int) {});";
        let always = SamplingConfig::default().with_probability(1.0);
        assert_eq!(detect(source, &always).count(), count(source));
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let skipped = Outcome::Skipped {
            reason: SkipReason::DecodeError,
        };
        let json = serde_json::to_string(&skipped).unwrap();
        assert_eq!(json, r#"{"status":"skipped","reason":"decode_error"}"#);
    }
}

// crates/core/src/sample.rs
//! # Context Sampler
//!
//! Records, with a small probability per match, the lines of original
//! source surrounding a detected lambda so that results can be audited
//! by hand.

use memchr::{memchr, memrchr};
use serde::{Deserialize, Serialize};

use crate::config::SamplingConfig;
use crate::rng::SimpleRng;

/// A captured audit window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Byte offset of the lambda introducer in the source.
    pub offset: usize,
    /// Source lines around the match.
    pub context: String,
}

/// Returns the lines around `offset`: the match line plus up to `margin`
/// lines before and after it. A missing newline counts as the file boundary.
#[must_use]
pub fn context_window(source: &str, offset: usize, margin: usize) -> &str {
    let bytes = source.as_bytes();
    let offset = offset.min(bytes.len());

    let mut start = memrchr(b'\n', &bytes[..offset]).map_or(0, |p| p + 1);
    for _ in 0..margin {
        if start == 0 {
            break;
        }
        start = memrchr(b'\n', &bytes[..start - 1]).map_or(0, |p| p + 1);
    }

    let mut end = memchr(b'\n', &bytes[offset..]).map_or(bytes.len(), |p| offset + p);
    for _ in 0..margin {
        if end >= bytes.len() {
            break;
        }
        end = memchr(b'\n', &bytes[end + 1..]).map_or(bytes.len(), |p| end + 1 + p);
    }

    &source[start..end]
}

/// Per-file sampler; never influences the count.
#[derive(Debug)]
pub struct Sampler<'s> {
    source: &'s str,
    config: SamplingConfig,
    /// サンプリング無効時は `None`（ハッシュも計算しない）
    rng: Option<SimpleRng>,
    samples: Vec<Sample>,
}

impl<'s> Sampler<'s> {
    #[must_use]
    pub fn new(source: &'s str, config: SamplingConfig) -> Self {
        Self {
            source,
            config,
            rng: config
                .is_enabled()
                .then(|| SimpleRng::for_content(config.seed, source.as_bytes())),
            samples: Vec::new(),
        }
    }

    /// Draws once for a match at `offset`, recording its context on success.
    pub fn observe(&mut self, offset: usize) {
        let Some(rng) = self.rng.as_mut() else {
            return;
        };
        if rng.next_f64() < self.config.probability {
            self.samples.push(Sample {
                offset,
                context: context_window(self.source, offset, self.config.context_margin)
                    .to_owned(),
            });
        }
    }

    #[must_use]
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

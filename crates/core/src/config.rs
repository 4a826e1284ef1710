use serde::{Deserialize, Serialize};

/// 一致ごとにサンプルを採取する既定確率
pub const DEFAULT_SAMPLE_PROBABILITY: f64 = 0.001;

/// サンプルの前後に含める行数
pub const DEFAULT_CONTEXT_MARGIN: usize = 2;

/// Audit sampling settings applied to every detected lambda.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Probability in `[0, 1]` that a single match is recorded.
    pub probability: f64,
    /// Lines of context kept before and after the matched line.
    pub context_margin: usize,
    /// Run seed mixed with the per-file content hash.
    pub seed: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            probability: DEFAULT_SAMPLE_PROBABILITY,
            context_margin: DEFAULT_CONTEXT_MARGIN,
            seed: 0,
        }
    }
}

impl SamplingConfig {
    /// Sampling turned off; detection becomes fully deterministic.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            probability: 0.0,
            context_margin: DEFAULT_CONTEXT_MARGIN,
            seed: 0,
        }
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.probability > 0.0
    }
}

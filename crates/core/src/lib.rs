// crates/core/src/lib.rs
//! C++ ラムダ式検出器
//!
//! コンパイラのフロントエンドを使わずに、正規化・括弧の平坦化・正規文法による
//! マッチングの三段階でソーステキスト中のラムダ式を数えます。
//!
//! ```rust
//! use lambda_census_core::{Detector, SamplingConfig};
//!
//! let detector = Detector::new(SamplingConfig::disabled());
//! let outcome = detector.detect("auto f = []() { return 1; };");
//! assert_eq!(outcome.count(), Some(1));
//! ```
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod detect;
pub mod error;
pub mod flatten;
pub mod grammar;
pub mod normalize;
pub mod rng;
pub mod sample;

pub use config::SamplingConfig;
pub use detect::{Detection, Detector, Outcome, detect, detect_bytes};
pub use error::{FlattenError, SkipReason};
pub use sample::Sample;

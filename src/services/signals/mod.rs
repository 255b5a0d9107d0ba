//! Signal computation: classification, indicators, rule scoring and fusion.

pub mod classifier;
pub mod fusion;
pub mod generator;
pub mod indicators;
pub mod rules;

pub use classifier::{
    classify, select_indicator_params, AnalysisParams, IndicatorKind, IndicatorParams,
    SUPPORTED_CRYPTO,
};
pub use fusion::fuse;
pub use generator::{insufficient_data_opinion, SignalGenerator};
pub use indicators::{compute_indicators, MIN_BARS};
pub use rules::{ScoreCard, ScoringRule, Side, SCORING_RULES};

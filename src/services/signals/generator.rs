//! Rule-based technical signal generator.

use super::classifier::AnalysisParams;
use super::rules::{ScoreCard, ScoringRule, SCORING_RULES};
use crate::error::Result;
use crate::types::{IndicatorSnapshot, SignalAction, SignalOpinion};
use tracing::debug;

pub const HOLD_REASON: &str = "No strong signals detected - holding position";
pub const INSUFFICIENT_DATA_REASON: &str = "Insufficient data for analysis";

/// Volume above this multiple of the average strengthens the leading side.
pub const HIGH_VOLUME_RATIO: f64 = 1.5;
/// Volume below this multiple of the average weakens the leading side.
pub const LOW_VOLUME_RATIO: f64 = 0.7;

const HIGH_VOLUME_BOOST: u32 = 10;
const HIGH_VOLUME_TIE_BOOST: u32 = 5;
const LOW_VOLUME_PENALTY: u32 = 5;
const LOW_VOLUME_TIE_PENALTY: u32 = 2;

/// Turns indicator snapshots into technical opinions.
pub struct SignalGenerator {
    params: AnalysisParams,
    rules: &'static [ScoringRule],
}

impl SignalGenerator {
    pub fn new(params: AnalysisParams) -> Self {
        Self {
            params,
            rules: SCORING_RULES,
        }
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Rule scores after volume adjustment.
    pub fn score(&self, snapshot: &IndicatorSnapshot) -> ScoreCard {
        let mut card = ScoreCard::evaluate(self.rules, snapshot, &self.params);
        apply_volume_adjustment(&mut card, snapshot);
        card
    }

    /// Technical opinion for a snapshot.
    pub fn generate(&self, snapshot: &IndicatorSnapshot) -> SignalOpinion {
        let card = self.score(snapshot);
        debug!(
            "{}: buy score {}, sell score {}",
            snapshot.symbol, card.buy, card.sell
        );
        decide(card, self.params.signal_threshold)
    }

    /// Technical opinion for an indicator computation that may have failed.
    ///
    /// Insufficient data becomes a zero-confidence hold instead of an error.
    /// Other errors propagate.
    pub fn generate_from(&self, snapshot: Result<IndicatorSnapshot>) -> Result<SignalOpinion> {
        match snapshot {
            Ok(snapshot) => Ok(self.generate(&snapshot)),
            Err(e) if e.is_insufficient_data() => Ok(insufficient_data_opinion()),
            Err(e) => Err(e),
        }
    }
}

/// The hold opinion reported when indicators cannot be computed.
pub fn insufficient_data_opinion() -> SignalOpinion {
    SignalOpinion::technical(
        SignalAction::Hold,
        0,
        vec![INSUFFICIENT_DATA_REASON.to_string()],
    )
}

/// Adjust the leading side by how current volume compares to its average.
///
/// On a non-zero tie both sides move by a smaller step. Nothing changes when
/// the average volume is zero.
pub fn apply_volume_adjustment(card: &mut ScoreCard, snapshot: &IndicatorSnapshot) {
    let Some(ratio) = snapshot.volume_ratio() else {
        return;
    };

    if ratio > HIGH_VOLUME_RATIO {
        if card.buy > card.sell {
            card.buy += HIGH_VOLUME_BOOST;
            card.buy_reasons.push(format!(
                "High volume ({:.1}x average) confirms buying pressure",
                ratio
            ));
        } else if card.sell > card.buy {
            card.sell += HIGH_VOLUME_BOOST;
            card.sell_reasons.push(format!(
                "High volume ({:.1}x average) confirms selling pressure",
                ratio
            ));
        } else if card.buy > 0 {
            card.buy += HIGH_VOLUME_TIE_BOOST;
            card.sell += HIGH_VOLUME_TIE_BOOST;
            let reason = format!("High volume ({:.1}x average) on mixed signals", ratio);
            card.buy_reasons.push(reason.clone());
            card.sell_reasons.push(reason);
        }
    } else if ratio < LOW_VOLUME_RATIO {
        let reason = format!("Low volume ({:.1}x average) reduces confidence", ratio);
        if card.buy > card.sell {
            card.buy = card.buy.saturating_sub(LOW_VOLUME_PENALTY);
            card.buy_reasons.push(reason);
        } else if card.sell > card.buy {
            card.sell = card.sell.saturating_sub(LOW_VOLUME_PENALTY);
            card.sell_reasons.push(reason);
        } else if card.buy > 0 {
            card.buy = card.buy.saturating_sub(LOW_VOLUME_TIE_PENALTY);
            card.sell = card.sell.saturating_sub(LOW_VOLUME_TIE_PENALTY);
            card.buy_reasons.push(reason.clone());
            card.sell_reasons.push(reason);
        }
    }
}

/// Pick buy, sell or hold from adjusted scores.
///
/// A side wins only when it strictly leads and reaches the threshold. Ties
/// hold.
pub fn decide(card: ScoreCard, threshold: u8) -> SignalOpinion {
    let threshold = u32::from(threshold);
    let clamp = |score: u32| score.min(100) as u8;

    if card.buy > card.sell && card.buy >= threshold {
        SignalOpinion::technical(SignalAction::Buy, clamp(card.buy), non_empty(card.buy_reasons))
    } else if card.sell > card.buy && card.sell >= threshold {
        SignalOpinion::technical(SignalAction::Sell, clamp(card.sell), non_empty(card.sell_reasons))
    } else {
        let strongest = card.buy.max(card.sell).min(100);
        SignalOpinion::technical(
            SignalAction::Hold,
            (100 - strongest) as u8,
            vec![HOLD_REASON.to_string()],
        )
    }
}

fn non_empty(reasons: Vec<String>) -> Vec<String> {
    if reasons.is_empty() {
        vec![HOLD_REASON.to_string()]
    } else {
        reasons
    }
}

//! Weighted scoring rules evaluated against an indicator snapshot.
//!
//! Each rule adds its weight and a reason to one side when its predicate
//! matches. The table is evaluated in order, so reasons come out in table order.

use super::classifier::AnalysisParams;
use crate::types::IndicatorSnapshot;

/// Band around SMA50 in which price counts as having just crossed it.
pub const SMA_CROSS_BAND: f64 = 0.02;
/// Distance from support/resistance that counts as "near".
pub const LEVEL_PROXIMITY: f64 = 0.05;
/// Band around SMA200 in which SMA50 counts as crossing it.
pub const GOLDEN_CROSS_BAND: f64 = 0.02;

/// Which confidence score a rule feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

type Predicate = fn(&IndicatorSnapshot, &AnalysisParams) -> bool;
type Describe = fn(&IndicatorSnapshot, &AnalysisParams) -> String;

/// One weighted condition.
pub struct ScoringRule {
    pub name: &'static str,
    pub side: Side,
    pub weight: u32,
    pub applies: Predicate,
    pub reason: Describe,
}

/// The fixed, ordered rule table.
pub const SCORING_RULES: &[ScoringRule] = &[
    ScoringRule {
        name: "sma50_cross_up",
        side: Side::Buy,
        weight: 15,
        applies: |s, _| {
            s.sma
                .sma50
                .is_some_and(|sma| s.last_price > sma && s.last_price < sma * (1.0 + SMA_CROSS_BAND))
        },
        reason: |s, _| {
            format!(
                "Price just crossed above 50-day SMA ({:.2})",
                s.sma.sma50.unwrap_or_default()
            )
        },
    },
    ScoringRule {
        name: "sma50_cross_down",
        side: Side::Sell,
        weight: 15,
        applies: |s, _| {
            s.sma
                .sma50
                .is_some_and(|sma| s.last_price < sma && s.last_price > sma * (1.0 - SMA_CROSS_BAND))
        },
        reason: |s, _| {
            format!(
                "Price just crossed below 50-day SMA ({:.2})",
                s.sma.sma50.unwrap_or_default()
            )
        },
    },
    ScoringRule {
        name: "rsi_oversold",
        side: Side::Buy,
        weight: 20,
        applies: |s, p| s.rsi.is_some_and(|rsi| rsi < p.rsi_oversold),
        reason: |s, p| {
            format!(
                "RSI oversold at {:.2} (below {})",
                s.rsi.unwrap_or_default(),
                p.rsi_oversold
            )
        },
    },
    ScoringRule {
        name: "rsi_overbought",
        side: Side::Sell,
        weight: 20,
        applies: |s, p| s.rsi.is_some_and(|rsi| rsi > p.rsi_overbought),
        reason: |s, p| {
            format!(
                "RSI overbought at {:.2} (above {})",
                s.rsi.unwrap_or_default(),
                p.rsi_overbought
            )
        },
    },
    ScoringRule {
        name: "macd_bullish",
        side: Side::Buy,
        weight: 20,
        applies: |s, _| {
            s.macd
                .is_some_and(|m| m.macd > m.signal && m.histogram > 0.0)
        },
        reason: |_, _| "MACD above signal line with positive histogram".to_string(),
    },
    ScoringRule {
        name: "macd_bearish",
        side: Side::Sell,
        weight: 20,
        applies: |s, _| {
            s.macd
                .is_some_and(|m| m.macd < m.signal && m.histogram < 0.0)
        },
        reason: |_, _| "MACD below signal line with negative histogram".to_string(),
    },
    ScoringRule {
        name: "near_support",
        side: Side::Buy,
        weight: 15,
        applies: |s, _| {
            s.last_price >= s.support_level
                && s.last_price <= s.support_level * (1.0 + LEVEL_PROXIMITY)
        },
        reason: |s, _| format!("Price near support level ({:.2})", s.support_level),
    },
    ScoringRule {
        name: "near_resistance",
        side: Side::Sell,
        weight: 15,
        applies: |s, _| {
            s.last_price <= s.resistance_level
                && s.last_price >= s.resistance_level * (1.0 - LEVEL_PROXIMITY)
        },
        reason: |s, _| format!("Price near resistance level ({:.2})", s.resistance_level),
    },
    ScoringRule {
        name: "below_lower_band",
        side: Side::Buy,
        weight: 15,
        applies: |s, _| s.bollinger_bands.is_some_and(|b| s.last_price < b.lower),
        reason: |s, _| {
            format!(
                "Price below lower Bollinger Band ({:.2})",
                s.bollinger_bands.map(|b| b.lower).unwrap_or_default()
            )
        },
    },
    ScoringRule {
        name: "above_upper_band",
        side: Side::Sell,
        weight: 15,
        applies: |s, _| s.bollinger_bands.is_some_and(|b| s.last_price > b.upper),
        reason: |s, _| {
            format!(
                "Price above upper Bollinger Band ({:.2})",
                s.bollinger_bands.map(|b| b.upper).unwrap_or_default()
            )
        },
    },
    ScoringRule {
        name: "golden_cross",
        side: Side::Buy,
        weight: 25,
        applies: |s, _| match (s.sma.sma50, s.sma.sma200) {
            (Some(mid), Some(long)) => mid > long && mid < long * (1.0 + GOLDEN_CROSS_BAND),
            _ => false,
        },
        reason: |_, _| "Golden Cross: 50-day SMA crossing above 200-day SMA".to_string(),
    },
    ScoringRule {
        name: "death_cross",
        side: Side::Sell,
        weight: 25,
        applies: |s, _| match (s.sma.sma50, s.sma.sma200) {
            (Some(mid), Some(long)) => mid < long && mid > long * (1.0 - GOLDEN_CROSS_BAND),
            _ => false,
        },
        reason: |_, _| "Death Cross: 50-day SMA crossing below 200-day SMA".to_string(),
    },
];

/// Accumulated buy/sell evidence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreCard {
    pub buy: u32,
    pub sell: u32,
    pub buy_reasons: Vec<String>,
    pub sell_reasons: Vec<String>,
}

impl ScoreCard {
    /// Evaluate every rule in `rules` against the snapshot.
    pub fn evaluate(rules: &[ScoringRule], snapshot: &IndicatorSnapshot, params: &AnalysisParams) -> Self {
        let mut card = ScoreCard::default();
        for rule in rules {
            if (rule.applies)(snapshot, params) {
                card.add(rule.side, rule.weight, (rule.reason)(snapshot, params));
            }
        }
        card
    }

    pub fn add(&mut self, side: Side, weight: u32, reason: String) {
        match side {
            Side::Buy => {
                self.buy += weight;
                self.buy_reasons.push(reason);
            }
            Side::Sell => {
                self.sell += weight;
                self.sell_reasons.push(reason);
            }
        }
    }

    /// Names of the rules that match, in table order.
    pub fn matching_rules(
        rules: &[ScoringRule],
        snapshot: &IndicatorSnapshot,
        params: &AnalysisParams,
    ) -> Vec<&'static str> {
        rules
            .iter()
            .filter(|rule| (rule.applies)(snapshot, params))
            .map(|rule| rule.name)
            .collect()
    }
}

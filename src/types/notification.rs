//! Alert emitted when an analysis produces an actionable signal.

use super::{FusedSignal, SignalAction};
use serde::{Deserialize, Serialize};

/// Buy or sell trigger for a notification collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalAlert {
    pub symbol: String,
    pub signal: SignalAction,
    pub price: f64,
    pub confidence: u8,
    pub reasons: Vec<String>,
    /// Unix timestamp (milliseconds) when raised.
    pub timestamp: i64,
}

impl SignalAlert {
    /// Build an alert for an actionable signal; hold yields `None`.
    pub fn from_signal(symbol: &str, price: f64, fused: &FusedSignal) -> Option<Self> {
        if !fused.signal.is_actionable() {
            return None;
        }

        Some(Self {
            symbol: symbol.to_uppercase(),
            signal: fused.signal,
            price,
            confidence: fused.confidence,
            reasons: fused.reasons.clone(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// One-line subject suitable for a mail or chat message.
    pub fn subject(&self) -> String {
        format!(
            "{} signal for {} at ${:.2} ({}% confidence)",
            self.signal.label(),
            self.symbol,
            self.price,
            self.confidence
        )
    }
}

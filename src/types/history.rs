use super::{FusedSignal, FusionSource, SignalAction};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded final signal for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalHistoryEntry {
    /// Unique entry ID.
    pub id: Uuid,
    pub symbol: String,
    /// Price when the signal was produced.
    pub price: f64,
    pub signal: SignalAction,
    pub confidence: u8,
    pub source: FusionSource,
    pub reasons: Vec<String>,
    /// Unix timestamp (milliseconds) when recorded.
    pub timestamp: i64,
}

impl SignalHistoryEntry {
    /// Create a new entry from a final signal.
    pub fn new(symbol: &str, price: f64, fused: &FusedSignal) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.to_uppercase(),
            price,
            signal: fused.signal,
            confidence: fused.confidence,
            source: fused.source,
            reasons: fused.reasons.clone(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

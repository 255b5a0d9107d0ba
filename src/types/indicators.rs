use super::AssetClass;
use serde::{Deserialize, Serialize};

/// Last value of each simple moving average; `None` when history is too short.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmaValues {
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
}

/// Last MACD triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdValues {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Last Bollinger Bands triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BollingerValues {
    pub lower: f64,
    pub middle: f64,
    pub upper: f64,
}

/// Indicator values derived from one symbol's bar series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub symbol: String,
    pub asset_class: AssetClass,
    /// Close of the final bar.
    pub last_price: f64,
    pub sma: SmaValues,
    pub rsi: Option<f64>,
    pub macd: Option<MacdValues>,
    pub bollinger_bands: Option<BollingerValues>,
    /// Lowest close over the support/resistance lookback.
    pub support_level: f64,
    /// Highest close over the support/resistance lookback.
    pub resistance_level: f64,
    /// Mean volume of the trailing volume window (0 if unavailable).
    pub avg_volume20: f64,
    /// Volume of the final bar.
    pub current_volume: f64,
    /// Number of bars the snapshot was computed from.
    pub bar_count: usize,
}

impl IndicatorSnapshot {
    /// Current volume relative to the trailing average, if the average is usable.
    pub fn volume_ratio(&self) -> Option<f64> {
        if self.avg_volume20 > 0.0 {
            Some(self.current_volume / self.avg_volume20)
        } else {
            None
        }
    }
}

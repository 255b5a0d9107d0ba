use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One OHLCV bar of a historical price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Check that bars are strictly increasing by date (no duplicates).
///
/// Returns the date of the first offending bar.
pub fn first_out_of_order(bars: &[PriceBar]) -> Option<NaiveDate> {
    bars.windows(2)
        .find(|pair| pair[1].date <= pair[0].date)
        .map(|pair| pair[1].date)
}

/// Close prices of a bar series.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Volumes of a bar series.
pub fn volumes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.volume).collect()
}

//! Bollinger Bands.
//!
//! - Middle band: SMA(period)
//! - Upper band: SMA + k * StdDev
//! - Lower band: SMA - k * StdDev

use super::sma::sma_last;
use crate::types::BollingerValues;

/// Population standard deviation around `mean`.
fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance: f64 =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Calculate the last Bollinger Bands triple.
pub fn bollinger_last(closes: &[f64], period: usize, multiplier: f64) -> Option<BollingerValues> {
    let middle = sma_last(closes, period)?;
    let window = &closes[closes.len() - period..];
    let deviation = std_dev(window, middle);

    Some(BollingerValues {
        lower: middle - multiplier * deviation,
        middle,
        upper: middle + multiplier * deviation,
    })
}

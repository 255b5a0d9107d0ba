//! MACD (Moving Average Convergence Divergence).
//!
//! - MACD Line = EMA(fast) - EMA(slow)
//! - Signal Line = EMA(signal) of MACD Line
//! - Histogram = MACD Line - Signal Line

use super::ema::ema_series;
use crate::types::MacdValues;

/// MACD line series, aligned so element `0` corresponds to input index `slow - 1`.
pub fn macd_line(closes: &[f64], fast: usize, slow: usize) -> Vec<f64> {
    if fast == 0 || fast >= slow {
        return Vec::new();
    }

    let fast_ema = ema_series(closes, fast);
    let slow_ema = ema_series(closes, slow);

    if fast_ema.is_empty() || slow_ema.is_empty() {
        return Vec::new();
    }

    // Align the EMAs (fast starts earlier)
    let offset = slow - fast;
    fast_ema
        .iter()
        .skip(offset)
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect()
}

/// Calculate the last MACD triple.
pub fn macd_last(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Option<MacdValues> {
    let line = macd_line(closes, fast, slow);
    if line.len() < signal {
        return None;
    }

    let signal_line = ema_series(&line, signal);
    let macd = *line.last()?;
    let signal = *signal_line.last()?;

    Some(MacdValues {
        macd,
        signal,
        histogram: macd - signal,
    })
}

//! Exponential Moving Average (EMA).

/// EMA series seeded with the SMA of the first `period` values.
///
/// Element `0` corresponds to input index `period - 1`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut ema = Vec::with_capacity(values.len() - period + 1);

    // First EMA is SMA
    let seed: f64 = values.iter().take(period).sum::<f64>() / period as f64;
    ema.push(seed);

    let mut prev = seed;
    for value in &values[period..] {
        prev = (value - prev) * multiplier + prev;
        ema.push(prev);
    }

    ema
}

/// Last EMA value.
pub fn ema_last(values: &[f64], period: usize) -> Option<f64> {
    ema_series(values, period).last().copied()
}

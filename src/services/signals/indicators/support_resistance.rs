//! Support and resistance as the trailing close range.

/// Lowest and highest close over the trailing `lookback` closes.
///
/// Uses every close when fewer than `lookback` are available.
pub fn support_resistance(closes: &[f64], lookback: usize) -> Option<(f64, f64)> {
    if closes.is_empty() || lookback == 0 {
        return None;
    }

    let start = closes.len().saturating_sub(lookback);
    let window = &closes[start..];

    let support = window.iter().copied().fold(f64::INFINITY, f64::min);
    let resistance = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some((support, resistance))
}

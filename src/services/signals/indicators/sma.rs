//! Simple Moving Average (SMA).

/// Mean of the trailing `period` values.
///
/// Returns `None` when fewer than `period` values are available.
pub fn sma_last(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }

    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Full SMA series; element `i` is the mean of `values[i..i + period]`.
pub fn sma_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    values
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / period as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_last_uses_trailing_window() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(sma_last(&values, 2), Some(4.5));
        assert_eq!(sma_last(&values, 5), Some(3.0));
    }

    #[test]
    fn test_sma_insufficient_history() {
        assert_eq!(sma_last(&[1.0, 2.0], 3), None);
        assert_eq!(sma_last(&[1.0, 2.0], 0), None);
        assert!(sma_series(&[1.0], 2).is_empty());
    }

    #[test]
    fn test_sma_series_matches_last() {
        let values: Vec<f64> = (1..=30).map(|v| v as f64).collect();
        let series = sma_series(&values, 20);
        assert_eq!(series.len(), 11);
        assert_eq!(series.last().copied(), sma_last(&values, 20));
        assert_eq!(series[0], 10.5);
    }
}

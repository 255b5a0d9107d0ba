//! Technical indicator implementations and the snapshot builder.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod support_resistance;
pub mod volume;

pub use bollinger::bollinger_last;
pub use ema::{ema_last, ema_series};
pub use macd::{macd_last, macd_line};
pub use rsi::rsi_last;
pub use sma::{sma_last, sma_series};
pub use support_resistance::support_resistance;
pub use volume::average_volume;

use super::classifier::AnalysisParams;
use crate::error::{AppError, Result};
use crate::types::{closes, first_out_of_order, volumes, IndicatorSnapshot, PriceBar, SmaValues};
use tracing::debug;

/// Minimum number of bars for any analysis.
pub const MIN_BARS: usize = 50;

fn insufficient(symbol: &str, bars: usize) -> AppError {
    AppError::InsufficientData {
        symbol: symbol.to_uppercase(),
        bars,
        required: MIN_BARS,
    }
}

/// Derive the indicator snapshot for a symbol's bar series.
///
/// Fewer than [`MIN_BARS`] bars, or a required indicator without a final
/// value, yields [`AppError::InsufficientData`]. Bars out of date order yield
/// [`AppError::InvalidBars`].
pub fn compute_indicators(
    bars: &[PriceBar],
    symbol: &str,
    params: &AnalysisParams,
) -> Result<IndicatorSnapshot> {
    if bars.len() < MIN_BARS {
        return Err(insufficient(symbol, bars.len()));
    }

    if let Some(date) = first_out_of_order(bars) {
        return Err(AppError::InvalidBars(format!(
            "{} bars are not strictly increasing by date at {}",
            symbol, date
        )));
    }

    let closes = closes(bars);
    let volumes = volumes(bars);
    let last = bars.last().ok_or_else(|| insufficient(symbol, 0))?;

    let sma = SmaValues {
        sma20: sma_last(&closes, params.sma_short),
        sma50: sma_last(&closes, params.sma_medium),
        sma200: sma_last(&closes, params.sma_long),
    };

    let rsi = rsi_last(&closes, params.rsi_period);
    let macd = macd_last(&closes, params.macd_fast, params.macd_slow, params.macd_signal);
    let bollinger_bands =
        bollinger_last(&closes, params.bollinger_period, params.bollinger_std_dev);

    if rsi.is_none() || macd.is_none() || bollinger_bands.is_none() {
        debug!(
            "{}: core indicators unavailable with {} bars",
            symbol,
            bars.len()
        );
        return Err(insufficient(symbol, bars.len()));
    }

    let (support_level, resistance_level) =
        support_resistance(&closes, params.support_resistance_lookback)
            .ok_or_else(|| insufficient(symbol, bars.len()))?;

    let snapshot = IndicatorSnapshot {
        symbol: symbol.to_uppercase(),
        asset_class: params.asset_class,
        last_price: last.close,
        sma,
        rsi,
        macd,
        bollinger_bands,
        support_level,
        resistance_level,
        avg_volume20: average_volume(&volumes, params.volume_window),
        current_volume: last.volume,
        bar_count: bars.len(),
    };

    debug!(
        "{}: computed indicators from {} bars (price {:.2}, rsi {:?})",
        snapshot.symbol, snapshot.bar_count, snapshot.last_price, snapshot.rsi
    );

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndicatorConfig;
    use crate::types::AssetClass;
    use chrono::{Duration, NaiveDate};

    fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                PriceBar::new(
                    start + Duration::days(i as i64),
                    close,
                    close + 1.0,
                    close - 1.0,
                    close,
                    1_000.0 + i as f64,
                )
            })
            .collect()
    }

    fn wave(count: usize) -> Vec<f64> {
        (0..count)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn test_fewer_than_min_bars_is_insufficient() {
        let bars = bars_from_closes(&wave(49));
        let err = compute_indicators(&bars, "AAPL", &AnalysisParams::default()).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        let err = compute_indicators(&[], "AAPL", &AnalysisParams::default()).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_out_of_order_bars_rejected() {
        let mut bars = bars_from_closes(&wave(60));
        bars.swap(10, 11);
        let err = compute_indicators(&bars, "AAPL", &AnalysisParams::default()).unwrap_err();
        assert!(matches!(err, AppError::InvalidBars(_)));
    }

    #[test]
    fn test_snapshot_with_short_history_has_no_sma200() {
        let closes = wave(60);
        let bars = bars_from_closes(&closes);
        let snapshot = compute_indicators(&bars, "aapl", &AnalysisParams::default()).unwrap();

        assert_eq!(snapshot.symbol, "AAPL");
        assert_eq!(snapshot.asset_class, AssetClass::Equity);
        assert_eq!(snapshot.last_price, *closes.last().unwrap());
        assert!(snapshot.sma.sma20.is_some());
        assert!(snapshot.sma.sma50.is_some());
        assert!(snapshot.sma.sma200.is_none());
        assert!(snapshot.rsi.is_some());
        assert!(snapshot.macd.is_some());
        assert!(snapshot.bollinger_bands.is_some());
        assert_eq!(snapshot.bar_count, 60);
    }

    #[test]
    fn test_snapshot_full_history() {
        let closes = wave(250);
        let bars = bars_from_closes(&closes);
        let snapshot = compute_indicators(&bars, "MSFT", &AnalysisParams::default()).unwrap();

        assert_eq!(snapshot.sma.sma200, sma_last(&closes, 200));
        assert_eq!(snapshot.rsi, rsi_last(&closes, 14));

        let tail = &closes[closes.len() - 30..];
        let min = tail.iter().copied().fold(f64::INFINITY, f64::min);
        let max = tail.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(snapshot.support_level, min);
        assert_eq!(snapshot.resistance_level, max);

        // volumes are 1000 + index; trailing 20 are 1230..=1249
        assert_eq!(snapshot.avg_volume20, 1239.5);
        assert_eq!(snapshot.current_volume, 1249.0);
    }

    #[test]
    fn test_crypto_params_widen_bollinger() {
        let closes = wave(120);
        let bars = bars_from_closes(&closes);
        let config = IndicatorConfig::default();

        let equity = compute_indicators(&bars, "X", &AnalysisParams::resolve("X", &config, 30))
            .unwrap();
        let crypto =
            compute_indicators(&bars, "BTC-USD", &AnalysisParams::resolve("BTC-USD", &config, 30))
                .unwrap();

        let eb = equity.bollinger_bands.unwrap();
        let cb = crypto.bollinger_bands.unwrap();
        assert_eq!(crypto.asset_class, AssetClass::Crypto);
        assert!(cb.upper - cb.lower > eb.upper - eb.lower);
    }

    #[test]
    fn test_computation_is_reproducible() {
        let bars = bars_from_closes(&wave(210));
        let params = AnalysisParams::default();
        let a = compute_indicators(&bars, "SPY", &params).unwrap();
        let b = compute_indicators(&bars, "SPY", &params).unwrap();
        assert_eq!(a, b);
    }
}

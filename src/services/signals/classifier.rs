//! Asset classification and per-class parameter selection.

use crate::config::{IndicatorConfig, OscillatorParams};
use crate::types::AssetClass;

/// Crypto symbols recognised without a `-USD` or `.X` suffix.
pub const SUPPORTED_CRYPTO: &[&str] = &[
    "BTC", "ETH", "BNB", "SOL", "XRP", "DOGE", "ADA", "AVAX", "DOT", "LINK", "MATIC", "SHIB",
    "LTC", "TRX", "ATOM", "UNI", "XLM", "BCH", "NEAR", "APT",
];

/// Classify a symbol as equity or crypto.
///
/// Anything unrecognised is an equity.
pub fn classify(symbol: &str) -> AssetClass {
    let upper = symbol.trim().to_uppercase();

    if SUPPORTED_CRYPTO.contains(&upper.as_str())
        || upper.ends_with("-USD")
        || upper.ends_with(".X")
    {
        AssetClass::Crypto
    } else {
        AssetClass::Equity
    }
}

/// Indicators whose parameters depend on asset class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    Rsi,
    BollingerBands,
}

/// Parameter set for one asset-class-dependent indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorParams {
    Rsi {
        period: usize,
        oversold: f64,
        overbought: f64,
    },
    BollingerBands {
        period: usize,
        std_dev: f64,
    },
}

fn oscillator_params(asset_class: AssetClass, config: &IndicatorConfig) -> &OscillatorParams {
    match asset_class {
        AssetClass::Crypto => &config.crypto_params,
        AssetClass::Equity => &config.default_params,
    }
}

/// Look up the parameter set for one indicator of a symbol.
pub fn select_indicator_params(
    symbol: &str,
    kind: IndicatorKind,
    config: &IndicatorConfig,
) -> IndicatorParams {
    let params = oscillator_params(classify(symbol), config);
    match kind {
        IndicatorKind::Rsi => IndicatorParams::Rsi {
            period: params.rsi_period,
            oversold: params.rsi_oversold,
            overbought: params.rsi_overbought,
        },
        IndicatorKind::BollingerBands => IndicatorParams::BollingerBands {
            period: params.bollinger_period,
            std_dev: params.bollinger_std_dev,
        },
    }
}

/// Every parameter one analysis needs, resolved once per symbol.
///
/// The indicator engine and the rule scorer both read from the same value,
/// so they can never disagree about the asset class.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParams {
    pub asset_class: AssetClass,
    pub sma_short: usize,
    pub sma_medium: usize,
    pub sma_long: usize,
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub support_resistance_lookback: usize,
    pub volume_window: usize,
    pub signal_threshold: u8,
}

impl AnalysisParams {
    /// Classify `symbol` and pick the matching parameter sets.
    pub fn resolve(symbol: &str, config: &IndicatorConfig, signal_threshold: u8) -> Self {
        let asset_class = classify(symbol);
        let osc = oscillator_params(asset_class, config);

        Self {
            asset_class,
            sma_short: config.sma_short,
            sma_medium: config.sma_medium,
            sma_long: config.sma_long,
            rsi_period: osc.rsi_period,
            rsi_oversold: osc.rsi_oversold,
            rsi_overbought: osc.rsi_overbought,
            macd_fast: config.macd_fast,
            macd_slow: config.macd_slow,
            macd_signal: config.macd_signal,
            bollinger_period: osc.bollinger_period,
            bollinger_std_dev: osc.bollinger_std_dev,
            support_resistance_lookback: config.support_resistance_lookback,
            volume_window: config.volume_window,
            signal_threshold,
        }
    }
}

impl Default for AnalysisParams {
    /// Equity parameters with the default threshold.
    fn default() -> Self {
        Self::resolve("", &IndicatorConfig::default(), 30)
    }
}

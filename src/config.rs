use crate::types::ProviderKind;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Parameters that can differ between equities and crypto.
#[derive(Debug, Clone, PartialEq)]
pub struct OscillatorParams {
    /// RSI lookback period.
    pub rsi_period: usize,
    /// RSI level below which selling pressure is considered exhausted.
    pub rsi_oversold: f64,
    /// RSI level above which buying pressure is considered exhausted.
    pub rsi_overbought: f64,
    /// Bollinger Bands SMA period.
    pub bollinger_period: usize,
    /// Bollinger Bands width in standard deviations.
    pub bollinger_std_dev: f64,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
        }
    }
}

impl OscillatorParams {
    /// Crypto trades wider, so its bands are loosened.
    pub fn crypto_default() -> Self {
        Self {
            rsi_oversold: 25.0,
            rsi_overbought: 75.0,
            bollinger_std_dev: 2.5,
            ..Self::default()
        }
    }
}

/// Indicator windows shared by every asset class, plus per-class oscillator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub sma_short: usize,
    pub sma_medium: usize,
    pub sma_long: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    /// Trailing window for support/resistance (min/max close).
    pub support_resistance_lookback: usize,
    /// Trailing window for average volume.
    pub volume_window: usize,
    /// Equity (default) oscillator settings.
    pub default_params: OscillatorParams,
    /// Crypto overrides.
    pub crypto_params: OscillatorParams,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_short: 20,
            sma_medium: 50,
            sma_long: 200,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            support_resistance_lookback: 30,
            volume_window: 20,
            default_params: OscillatorParams::default(),
            crypto_params: OscillatorParams::crypto_default(),
        }
    }
}

/// External opinion (LLM) configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Whether AI enhancement is on by default for a session.
    pub enabled: bool,
    /// Default provider for a session.
    pub provider: ProviderKind,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_base_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub ollama_url: String,
    pub ollama_model: String,
    /// Request timeout for provider calls in seconds.
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: ProviderKind::OpenAi,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            anthropic_api_key: None,
            anthropic_model: "claude-3-5-haiku-latest".to_string(),
            anthropic_base_url: "https://api.anthropic.com/v1".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Indicator windows and thresholds.
    pub indicators: IndicatorConfig,
    /// Minimum winning-side score for a buy or sell call.
    pub signal_threshold: u8,
    /// Directory holding watchlist and signal history files.
    pub data_dir: PathBuf,
    /// Number of history entries kept per symbol.
    pub history_limit: usize,
    /// Bar interval requested from the market data provider.
    pub bar_interval: String,
    /// History range requested from the market data provider.
    pub bar_range: String,
    /// External opinion settings.
    pub ai: AiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indicators: IndicatorConfig::default(),
            signal_threshold: 30,
            data_dir: PathBuf::from("data"),
            history_limit: crate::services::HISTORY_LIMIT,
            bar_interval: "1d".to_string(),
            bar_range: "1y".to_string(),
            ai: AiConfig::default(),
        }
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn flag_env(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
        .unwrap_or(default)
}

fn string_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn secret_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        let ind = defaults.indicators;
        let ai = defaults.ai;

        let default_params = OscillatorParams {
            rsi_period: parse_env("RSI_PERIOD", ind.default_params.rsi_period),
            rsi_oversold: parse_env("RSI_OVERSOLD", ind.default_params.rsi_oversold),
            rsi_overbought: parse_env("RSI_OVERBOUGHT", ind.default_params.rsi_overbought),
            bollinger_period: parse_env("BOLLINGER_PERIOD", ind.default_params.bollinger_period),
            bollinger_std_dev: parse_env("BOLLINGER_STD_DEV", ind.default_params.bollinger_std_dev),
        };

        let crypto_params = OscillatorParams {
            rsi_period: parse_env("CRYPTO_RSI_PERIOD", default_params.rsi_period),
            rsi_oversold: parse_env("CRYPTO_RSI_OVERSOLD", ind.crypto_params.rsi_oversold),
            rsi_overbought: parse_env("CRYPTO_RSI_OVERBOUGHT", ind.crypto_params.rsi_overbought),
            bollinger_period: parse_env("CRYPTO_BOLLINGER_PERIOD", default_params.bollinger_period),
            bollinger_std_dev: parse_env(
                "CRYPTO_BOLLINGER_STD_DEV",
                ind.crypto_params.bollinger_std_dev,
            ),
        };

        let provider = env::var("AI_PROVIDER")
            .ok()
            .and_then(|p| ProviderKind::from_str(&p).ok())
            .unwrap_or(ai.provider);

        Self {
            indicators: IndicatorConfig {
                sma_short: parse_env("SMA_SHORT", ind.sma_short),
                sma_medium: parse_env("SMA_MEDIUM", ind.sma_medium),
                sma_long: parse_env("SMA_LONG", ind.sma_long),
                macd_fast: parse_env("MACD_FAST", ind.macd_fast),
                macd_slow: parse_env("MACD_SLOW", ind.macd_slow),
                macd_signal: parse_env("MACD_SIGNAL", ind.macd_signal),
                support_resistance_lookback: parse_env(
                    "SUPPORT_RESISTANCE_LOOKBACK",
                    ind.support_resistance_lookback,
                ),
                volume_window: parse_env("VOLUME_WINDOW", ind.volume_window),
                default_params,
                crypto_params,
            },
            signal_threshold: parse_env("SIGNAL_THRESHOLD", defaults.signal_threshold),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            history_limit: parse_env("HISTORY_LIMIT", defaults.history_limit),
            bar_interval: string_env("BAR_INTERVAL", &defaults.bar_interval),
            bar_range: string_env("BAR_RANGE", &defaults.bar_range),
            ai: AiConfig {
                enabled: flag_env("AI_ENABLED", ai.enabled),
                provider,
                openai_api_key: secret_env("OPENAI_API_KEY"),
                openai_model: string_env("OPENAI_MODEL", &ai.openai_model),
                openai_base_url: string_env("OPENAI_BASE_URL", &ai.openai_base_url),
                anthropic_api_key: secret_env("ANTHROPIC_API_KEY"),
                anthropic_model: string_env("ANTHROPIC_MODEL", &ai.anthropic_model),
                anthropic_base_url: string_env("ANTHROPIC_BASE_URL", &ai.anthropic_base_url),
                gemini_api_key: secret_env("GEMINI_API_KEY"),
                gemini_model: string_env("GEMINI_MODEL", &ai.gemini_model),
                gemini_base_url: string_env("GEMINI_BASE_URL", &ai.gemini_base_url),
                ollama_url: string_env("OLLAMA_URL", &ai.ollama_url),
                ollama_model: string_env("OLLAMA_MODEL", &ai.ollama_model),
                timeout_secs: parse_env("AI_TIMEOUT_SECS", ai.timeout_secs),
            },
        }
    }
}

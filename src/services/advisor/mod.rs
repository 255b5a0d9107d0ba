//! External opinion adapter.
//!
//! Asks an LLM backend for a second opinion on a symbol and falls back to the
//! technical opinion whenever that is not possible.

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;
pub mod parse;
pub mod prompt;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use parse::parse_opinion;
pub use prompt::build_prompt;

use crate::config::AiConfig;
use crate::error::{AppError, Result};
use crate::types::{IndicatorSnapshot, ProviderKind, SignalOpinion};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A backend that turns a prompt into raw model text.
#[async_trait]
pub trait OpinionProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn produce_opinion(&self, prompt: &str) -> Result<String>;
}

/// Per-run choices threaded into each analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub ai_enabled: bool,
    pub provider: ProviderKind,
}

impl SessionOptions {
    pub fn technical_only() -> Self {
        Self {
            ai_enabled: false,
            provider: ProviderKind::default(),
        }
    }
}

impl From<&AiConfig> for SessionOptions {
    fn from(config: &AiConfig) -> Self {
        Self {
            ai_enabled: config.enabled,
            provider: config.provider,
        }
    }
}

/// Builds providers from configuration and applies the fallback policy.
pub struct OpinionAdapter {
    client: Client,
    config: AiConfig,
    overrides: HashMap<ProviderKind, Arc<dyn OpinionProvider>>,
}

impl OpinionAdapter {
    pub fn new(config: AiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            overrides: HashMap::new(),
        })
    }

    /// Use `provider` instead of the configured backend of the same kind.
    pub fn with_provider(mut self, provider: Arc<dyn OpinionProvider>) -> Self {
        self.overrides.insert(provider.kind(), provider);
        self
    }

    /// Backend for `kind`, built from configuration unless overridden.
    pub fn provider(&self, kind: ProviderKind) -> Result<Arc<dyn OpinionProvider>> {
        if let Some(provider) = self.overrides.get(&kind) {
            return Ok(provider.clone());
        }

        let cfg = &self.config;
        let provider: Arc<dyn OpinionProvider> = match kind {
            ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(
                self.client.clone(),
                cfg.openai_api_key
                    .clone()
                    .ok_or(AppError::MissingCredentials("OPENAI_API_KEY"))?,
                cfg.openai_model.clone(),
                cfg.openai_base_url.clone(),
            )),
            ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(
                self.client.clone(),
                cfg.anthropic_api_key
                    .clone()
                    .ok_or(AppError::MissingCredentials("ANTHROPIC_API_KEY"))?,
                cfg.anthropic_model.clone(),
                cfg.anthropic_base_url.clone(),
            )),
            ProviderKind::Gemini => Arc::new(GeminiProvider::new(
                self.client.clone(),
                cfg.gemini_api_key
                    .clone()
                    .ok_or(AppError::MissingCredentials("GEMINI_API_KEY"))?,
                cfg.gemini_model.clone(),
                cfg.gemini_base_url.clone(),
            )),
            ProviderKind::Ollama => Arc::new(OllamaProvider::new(
                self.client.clone(),
                cfg.ollama_url.clone(),
                cfg.ollama_model.clone(),
            )),
        };

        Ok(provider)
    }

    /// Ask the selected provider for an opinion, propagating every failure.
    pub async fn request_opinion(
        &self,
        symbol: &str,
        price: f64,
        technical: &SignalOpinion,
        snapshot: &IndicatorSnapshot,
        kind: ProviderKind,
    ) -> Result<SignalOpinion> {
        let provider = self.provider(kind)?;
        let prompt = build_prompt(symbol, price, snapshot, technical);
        let raw = provider.produce_opinion(&prompt).await?;
        debug!("{} raw opinion for {}: {}", kind.name(), symbol, raw);
        parse_opinion(&raw, kind)
    }

    /// Second opinion for a symbol, or the technical opinion if unavailable.
    ///
    /// Disabled sessions get the technical opinion unchanged. Any provider
    /// failure yields the technical opinion annotated with the error.
    pub async fn get_enhanced_signal(
        &self,
        symbol: &str,
        price: f64,
        technical: &SignalOpinion,
        snapshot: &IndicatorSnapshot,
        session: &SessionOptions,
    ) -> SignalOpinion {
        if !session.ai_enabled {
            return technical.clone();
        }

        match self
            .request_opinion(symbol, price, technical, snapshot, session.provider)
            .await
        {
            Ok(opinion) => {
                info!(
                    "{} opinion for {}: {} ({}%)",
                    session.provider.name(),
                    symbol,
                    opinion.signal,
                    opinion.confidence
                );
                opinion
            }
            Err(e) => {
                warn!(
                    "{} opinion for {} unavailable, using technical signal: {}",
                    session.provider.name(),
                    symbol,
                    e
                );
                technical.with_error(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AssetClass, BollingerValues, MacdValues, OpinionSource, SignalAction, SmaValues,
    };

    struct CannedProvider {
        kind: ProviderKind,
        reply: std::result::Result<String, String>,
    }

    #[async_trait]
    impl OpinionProvider for CannedProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        async fn produce_opinion(&self, _prompt: &str) -> Result<String> {
            self.reply.clone().map_err(AppError::ExternalOpinion)
        }
    }

    fn snapshot() -> IndicatorSnapshot {
        IndicatorSnapshot {
            symbol: "MSFT".to_string(),
            asset_class: AssetClass::Equity,
            last_price: 410.0,
            sma: SmaValues {
                sma20: Some(405.0),
                sma50: Some(400.0),
                sma200: Some(380.0),
            },
            rsi: Some(55.0),
            macd: Some(MacdValues {
                macd: 2.0,
                signal: 1.5,
                histogram: 0.5,
            }),
            bollinger_bands: Some(BollingerValues {
                lower: 395.0,
                middle: 405.0,
                upper: 415.0,
            }),
            support_level: 390.0,
            resistance_level: 420.0,
            avg_volume20: 20_000_000.0,
            current_volume: 21_000_000.0,
            bar_count: 250,
        }
    }

    fn technical() -> SignalOpinion {
        SignalOpinion::technical(SignalAction::Buy, 35, vec!["MACD bullish".to_string()])
    }

    fn adapter_with(reply: std::result::Result<&str, &str>) -> OpinionAdapter {
        OpinionAdapter::new(AiConfig::default())
            .unwrap()
            .with_provider(Arc::new(CannedProvider {
                kind: ProviderKind::Anthropic,
                reply: reply.map(str::to_string).map_err(str::to_string),
            }))
    }

    fn session(provider: ProviderKind) -> SessionOptions {
        SessionOptions {
            ai_enabled: true,
            provider,
        }
    }

    #[tokio::test]
    async fn test_disabled_returns_technical_unchanged() {
        let adapter = adapter_with(Ok("{}"));
        let opinion = adapter
            .get_enhanced_signal("MSFT", 410.0, &technical(), &snapshot(), &SessionOptions::technical_only())
            .await;
        assert_eq!(opinion, technical());
    }

    #[tokio::test]
    async fn test_valid_reply_becomes_provider_opinion() {
        let adapter = adapter_with(Ok(
            r#"{"signal": "sell", "confidence": 64, "reasons": ["Near resistance"]}"#,
        ));
        let opinion = adapter
            .get_enhanced_signal("MSFT", 410.0, &technical(), &snapshot(), &session(ProviderKind::Anthropic))
            .await;
        assert_eq!(opinion.signal, SignalAction::Sell);
        assert_eq!(opinion.confidence, 64);
        assert_eq!(opinion.source, OpinionSource::Provider(ProviderKind::Anthropic));
        assert!(opinion.error.is_none());
    }

    #[tokio::test]
    async fn test_provider_error_falls_back_with_annotation() {
        let adapter = adapter_with(Err("connection reset"));
        let opinion = adapter
            .get_enhanced_signal("MSFT", 410.0, &technical(), &snapshot(), &session(ProviderKind::Anthropic))
            .await;
        assert_eq!(opinion.signal, SignalAction::Buy);
        assert_eq!(opinion.confidence, 35);
        assert_eq!(opinion.source, OpinionSource::Technical);
        assert!(opinion.error.unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_malformed_reply_falls_back() {
        let adapter = adapter_with(Ok("I'd probably hold this one."));
        let opinion = adapter
            .get_enhanced_signal("MSFT", 410.0, &technical(), &snapshot(), &session(ProviderKind::Anthropic))
            .await;
        assert!(!opinion.is_external());
        assert!(opinion.error.is_some());
    }

    #[tokio::test]
    async fn test_missing_key_falls_back() {
        let adapter = OpinionAdapter::new(AiConfig::default()).unwrap();
        let opinion = adapter
            .get_enhanced_signal("MSFT", 410.0, &technical(), &snapshot(), &session(ProviderKind::OpenAi))
            .await;
        assert_eq!(opinion.source, OpinionSource::Technical);
        assert!(opinion.error.unwrap().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_session_options_from_config() {
        let config = AiConfig {
            enabled: true,
            provider: ProviderKind::Gemini,
            ..AiConfig::default()
        };
        let session = SessionOptions::from(&config);
        assert!(session.ai_enabled);
        assert_eq!(session.provider, ProviderKind::Gemini);
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recommendation: Buy, Sell, or Hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

impl SignalAction {
    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            SignalAction::Buy => "BUY",
            SignalAction::Sell => "SELL",
            SignalAction::Hold => "HOLD",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalAction::Buy => "buy",
            SignalAction::Sell => "sell",
            SignalAction::Hold => "hold",
        }
    }

    /// Buy and sell calls are actionable; hold is not.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, SignalAction::Hold)
    }
}

impl FromStr for SignalAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(SignalAction::Buy),
            "sell" => Ok(SignalAction::Sell),
            "hold" => Ok(SignalAction::Hold),
            other => Err(format!("unknown signal '{}'", other)),
        }
    }
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// External opinion backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Anthropic,
    Gemini,
    Ollama,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Ollama => "ollama",
        }
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Ollama => "Ollama",
        }
    }

    pub fn all() -> [ProviderKind; 4] {
        [
            ProviderKind::OpenAi,
            ProviderKind::Anthropic,
            ProviderKind::Gemini,
            ProviderKind::Ollama,
        ]
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "gpt" | "chatgpt" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "ollama" | "local" => Ok(ProviderKind::Ollama),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an opinion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpinionSource {
    Technical,
    Provider(ProviderKind),
}

impl OpinionSource {
    pub fn tag(&self) -> &'static str {
        match self {
            OpinionSource::Technical => "technical",
            OpinionSource::Provider(kind) => kind.as_str(),
        }
    }
}

/// A buy/sell/hold opinion from one producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalOpinion {
    pub signal: SignalAction,
    /// Confidence from 0 to 100.
    pub confidence: u8,
    /// Ordered explanation, never empty.
    pub reasons: Vec<String>,
    pub source: OpinionSource,
    /// Set when an external opinion was requested but could not be produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SignalOpinion {
    /// Opinion produced by the rule-based generator.
    pub fn technical(signal: SignalAction, confidence: u8, reasons: Vec<String>) -> Self {
        Self {
            signal,
            confidence: confidence.min(100),
            reasons,
            source: OpinionSource::Technical,
            error: None,
        }
    }

    /// Copy of this opinion annotated with an error, keeping the technical tag.
    pub fn with_error(&self, error: impl Into<String>) -> Self {
        Self {
            source: OpinionSource::Technical,
            error: Some(error.into()),
            ..self.clone()
        }
    }

    /// True when this opinion came from an external provider.
    pub fn is_external(&self) -> bool {
        matches!(self.source, OpinionSource::Provider(_))
    }
}

/// How the final signal was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FusionSource {
    #[serde(rename = "technical")]
    Technical,
    #[serde(rename = "ai")]
    Ai,
    #[serde(rename = "ai+technical")]
    AiTechnical,
    #[serde(rename = "conflict")]
    Conflict,
}

impl FusionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FusionSource::Technical => "technical",
            FusionSource::Ai => "ai",
            FusionSource::AiTechnical => "ai+technical",
            FusionSource::Conflict => "conflict",
        }
    }
}

impl fmt::Display for FusionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final signal of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusedSignal {
    pub signal: SignalAction,
    pub confidence: u8,
    pub reasons: Vec<String>,
    pub source: FusionSource,
}

impl FusedSignal {
    /// Final signal when only the technical opinion is available.
    pub fn from_technical(technical: &SignalOpinion) -> Self {
        Self {
            signal: technical.signal,
            confidence: technical.confidence.min(100),
            reasons: technical.reasons.clone(),
            source: FusionSource::Technical,
        }
    }
}

//! Validation of raw provider output into an opinion.

use crate::error::{AppError, Result};
use crate::types::{OpinionSource, ProviderKind, SignalAction, SignalOpinion};
use serde_json::Value;

/// Slice from the first `{` to the last `}`, tolerating fences or prose around it.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// Parse and validate a provider response.
///
/// Requires a `signal` of buy/sell/hold, a numeric `confidence` and a
/// non-empty `reasons` array of strings.
pub fn parse_opinion(raw: &str, kind: ProviderKind) -> Result<SignalOpinion> {
    let json = extract_json_object(raw).ok_or_else(|| {
        AppError::InvalidOpinion(format!("{} response contains no JSON object", kind.name()))
    })?;

    let value: Value = serde_json::from_str(json)
        .map_err(|e| AppError::InvalidOpinion(format!("{} returned malformed JSON: {}", kind.name(), e)))?;

    let signal = value
        .get("signal")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::InvalidOpinion("missing signal".to_string()))?
        .parse::<SignalAction>()
        .map_err(AppError::InvalidOpinion)?;

    let confidence = value
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())
        .ok_or_else(|| AppError::InvalidOpinion("confidence is not a number".to_string()))?;

    let reasons = value
        .get("reasons")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::InvalidOpinion("reasons is not a list".to_string()))?
        .iter()
        .map(|r| {
            r.as_str()
                .map(str::to_string)
                .ok_or_else(|| AppError::InvalidOpinion("reasons must be strings".to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    if reasons.is_empty() {
        return Err(AppError::InvalidOpinion("reasons is empty".to_string()));
    }

    Ok(SignalOpinion {
        signal,
        confidence: confidence.round().clamp(0.0, 100.0) as u8,
        reasons,
        source: OpinionSource::Provider(kind),
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let raw = r#"{"signal": "BUY", "confidence": 72, "reasons": ["Momentum", "Breakout"]}"#;
        let opinion = parse_opinion(raw, ProviderKind::OpenAi).unwrap();
        assert_eq!(opinion.signal, SignalAction::Buy);
        assert_eq!(opinion.confidence, 72);
        assert_eq!(opinion.reasons, vec!["Momentum", "Breakout"]);
        assert_eq!(opinion.source, OpinionSource::Provider(ProviderKind::OpenAi));
        assert!(opinion.is_external());
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "Here is my analysis:\n```json\n{\"signal\": \"sell\", \"confidence\": 61.6, \"reasons\": [\"Overbought\"]}\n```";
        let opinion = parse_opinion(raw, ProviderKind::Anthropic).unwrap();
        assert_eq!(opinion.signal, SignalAction::Sell);
        assert_eq!(opinion.confidence, 62);
    }

    #[test]
    fn test_confidence_clamped() {
        let raw = r#"{"signal": "hold", "confidence": 140, "reasons": ["x"]}"#;
        assert_eq!(parse_opinion(raw, ProviderKind::Ollama).unwrap().confidence, 100);

        let raw = r#"{"signal": "hold", "confidence": -5, "reasons": ["x"]}"#;
        assert_eq!(parse_opinion(raw, ProviderKind::Ollama).unwrap().confidence, 0);
    }

    #[test]
    fn test_rejects_unknown_signal() {
        let raw = r#"{"signal": "strong buy", "confidence": 80, "reasons": ["x"]}"#;
        assert!(matches!(
            parse_opinion(raw, ProviderKind::Gemini),
            Err(AppError::InvalidOpinion(_))
        ));
    }

    #[test]
    fn test_rejects_non_numeric_confidence() {
        let raw = r#"{"signal": "buy", "confidence": "high", "reasons": ["x"]}"#;
        assert!(parse_opinion(raw, ProviderKind::Gemini).is_err());
    }

    #[test]
    fn test_rejects_bad_reasons() {
        let raw = r#"{"signal": "buy", "confidence": 50, "reasons": "because"}"#;
        assert!(parse_opinion(raw, ProviderKind::OpenAi).is_err());

        let raw = r#"{"signal": "buy", "confidence": 50, "reasons": [1, 2]}"#;
        assert!(parse_opinion(raw, ProviderKind::OpenAi).is_err());

        let raw = r#"{"signal": "buy", "confidence": 50, "reasons": []}"#;
        assert!(parse_opinion(raw, ProviderKind::OpenAi).is_err());
    }

    #[test]
    fn test_rejects_missing_object() {
        assert!(parse_opinion("I think you should buy.", ProviderKind::OpenAi).is_err());
        assert!(parse_opinion("} {", ProviderKind::OpenAi).is_err());
    }
}

//! Prompt construction for external opinion providers.

use crate::types::{IndicatorSnapshot, SignalOpinion};

/// System instruction shared by every backend.
pub const SYSTEM_PROMPT: &str = "You are a professional technical analyst. \
Respond with a single JSON object and nothing else.";

fn fmt_num(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => "N/A".to_string(),
    }
}

/// Render the analysis request for one symbol.
pub fn build_prompt(
    symbol: &str,
    price: f64,
    snapshot: &IndicatorSnapshot,
    technical: &SignalOpinion,
) -> String {
    let macd = snapshot.macd;
    let bands = snapshot.bollinger_bands;

    format!(
        r#"Analyze {symbol} ({asset_class}) and give a trading recommendation.

Current price: {price}

Technical indicators:
- SMA20: {sma20}
- SMA50: {sma50}
- SMA200: {sma200}
- RSI: {rsi}
- MACD: {macd} (signal {macd_signal}, histogram {macd_hist})
- Bollinger Bands: lower {bb_lower}, middle {bb_middle}, upper {bb_upper}
- Support: {support}
- Resistance: {resistance}
- Volume: {volume} (20-bar average {avg_volume})

Rule-based technical signal: {tech_signal} with {tech_confidence}% confidence
Reasons:
{tech_reasons}

Respond in JSON with exactly these fields:
{{"signal": "buy" | "sell" | "hold", "confidence": <integer 0-100>, "reasons": [<short strings>]}}"#,
        symbol = symbol.to_uppercase(),
        asset_class = snapshot.asset_class.label(),
        price = fmt_num(Some(price)),
        sma20 = fmt_num(snapshot.sma.sma20),
        sma50 = fmt_num(snapshot.sma.sma50),
        sma200 = fmt_num(snapshot.sma.sma200),
        rsi = fmt_num(snapshot.rsi),
        macd = fmt_num(macd.map(|m| m.macd)),
        macd_signal = fmt_num(macd.map(|m| m.signal)),
        macd_hist = fmt_num(macd.map(|m| m.histogram)),
        bb_lower = fmt_num(bands.map(|b| b.lower)),
        bb_middle = fmt_num(bands.map(|b| b.middle)),
        bb_upper = fmt_num(bands.map(|b| b.upper)),
        support = fmt_num(Some(snapshot.support_level)),
        resistance = fmt_num(Some(snapshot.resistance_level)),
        volume = fmt_num(Some(snapshot.current_volume)),
        avg_volume = fmt_num(Some(snapshot.avg_volume20)),
        tech_signal = technical.signal.label(),
        tech_confidence = technical.confidence,
        tech_reasons = technical
            .reasons
            .iter()
            .map(|r| format!("- {}", r))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

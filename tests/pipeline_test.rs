//! Analysis Pipeline Tests
//!
//! Runs the analyzer end to end against in-memory market data, history and
//! notifier fakes, plus a canned opinion provider.

use async_trait::async_trait;
use augur::config::Config;
use augur::services::{
    AnalysisOutcome, Analyzer, Notifier, OpinionAdapter, OpinionProvider, SessionOptions,
    SignalHistoryStore,
};
use augur::sources::MarketDataSource;
use augur::{
    AppError, FusionSource, OpinionSource, PriceBar, ProviderKind, Result, SignalAction,
    SignalAlert, SignalHistoryEntry,
};
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ============================================================================
// Fakes
// ============================================================================

#[derive(Default)]
struct FakeMarketData {
    bars: HashMap<String, Vec<PriceBar>>,
}

impl FakeMarketData {
    fn with(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }
}

#[async_trait]
impl MarketDataSource for FakeMarketData {
    async fn fetch_bars(&self, symbol: &str, _interval: &str, _range: &str) -> Option<Vec<PriceBar>> {
        self.bars.get(symbol).cloned()
    }
}

#[derive(Default)]
struct MemoryHistory {
    entries: Mutex<HashMap<String, Vec<SignalHistoryEntry>>>,
}

impl SignalHistoryStore for MemoryHistory {
    fn load(&self, symbol: &str) -> Result<Vec<SignalHistoryEntry>> {
        Ok(self.entries.lock().unwrap().get(symbol).cloned().unwrap_or_default())
    }

    fn save(&self, symbol: &str, entries: &[SignalHistoryEntry]) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(symbol.to_string(), entries.to_vec());
        Ok(())
    }
}

struct BrokenHistory;

impl SignalHistoryStore for BrokenHistory {
    fn load(&self, _symbol: &str) -> Result<Vec<SignalHistoryEntry>> {
        Err(AppError::Persistence("disk unavailable".to_string()))
    }

    fn save(&self, _symbol: &str, _entries: &[SignalHistoryEntry]) -> Result<()> {
        Err(AppError::Persistence("disk unavailable".to_string()))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    alerts: Mutex<Vec<SignalAlert>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, alert: &SignalAlert) -> Result<()> {
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

struct CannedProvider {
    reply: std::result::Result<&'static str, &'static str>,
}

#[async_trait]
impl OpinionProvider for CannedProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    async fn produce_opinion(&self, _prompt: &str) -> Result<String> {
        self.reply
            .map(str::to_string)
            .map_err(|e| AppError::ExternalOpinion(e.to_string()))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Steady uptrend: RSI pegged at 100 and price sitting on resistance.
fn uptrend(count: usize) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    (0..count)
        .map(|i| {
            let close = 100.0 + i as f64;
            PriceBar::new(
                start + Duration::days(i as i64),
                close - 0.5,
                close + 1.0,
                close - 1.0,
                close,
                1_000_000.0,
            )
        })
        .collect()
}

struct Harness {
    analyzer: Analyzer,
    history: Arc<MemoryHistory>,
    notifier: Arc<RecordingNotifier>,
}

fn harness(market: FakeMarketData, provider: Option<CannedProvider>) -> Harness {
    let history = Arc::new(MemoryHistory::default());
    let notifier = Arc::new(RecordingNotifier::default());

    let mut advisor = OpinionAdapter::new(Config::default().ai).unwrap();
    if let Some(provider) = provider {
        advisor = advisor.with_provider(Arc::new(provider));
    }

    let analyzer = Analyzer::new(
        Config::default(),
        Arc::new(market),
        history.clone(),
        notifier.clone(),
        advisor,
    );

    Harness {
        analyzer,
        history,
        notifier,
    }
}

fn ai_session() -> SessionOptions {
    SessionOptions {
        ai_enabled: true,
        provider: ProviderKind::Ollama,
    }
}

// ============================================================================
// Technical-only Tests
// ============================================================================

#[tokio::test]
async fn test_uptrend_produces_technical_sell() {
    let h = harness(FakeMarketData::default().with("AAPL", uptrend(250)), None);

    let outcome = h
        .analyzer
        .analyze_symbol("aapl", &SessionOptions::technical_only())
        .await;
    let report = outcome.report().expect("analyzed");

    assert_eq!(report.symbol, "AAPL");
    assert_eq!(report.price, 349.0);
    assert_eq!(report.technical.signal, SignalAction::Sell);
    assert!(report.technical.confidence >= 35);
    assert!(report
        .technical
        .reasons
        .iter()
        .any(|r| r.starts_with("RSI overbought")));
    assert!(report.ai.is_none());
    assert_eq!(report.fused.source, FusionSource::Technical);
    assert_eq!(report.fused.signal, report.technical.signal);
    assert!(report.snapshot.is_some());
}

#[tokio::test]
async fn test_short_history_holds_with_zero_confidence() {
    let h = harness(
        FakeMarketData::default().with("NEWCO", uptrend(30)),
        Some(CannedProvider {
            reply: Ok(r#"{"signal": "buy", "confidence": 90, "reasons": ["x"]}"#),
        }),
    );

    let outcome = h.analyzer.analyze_symbol("NEWCO", &ai_session()).await;
    let report = outcome.report().expect("analyzed");

    assert_eq!(report.fused.signal, SignalAction::Hold);
    assert_eq!(report.fused.confidence, 0);
    assert_eq!(report.fused.reasons, vec!["Insufficient data for analysis"]);
    assert!(report.snapshot.is_none());
    assert!(report.ai.is_none(), "no AI call without indicators");
}

#[tokio::test]
async fn test_missing_market_data_is_unavailable() {
    let h = harness(FakeMarketData::default(), None);

    let outcome = h
        .analyzer
        .analyze_symbol("GONE", &SessionOptions::technical_only())
        .await;

    assert!(matches!(outcome, AnalysisOutcome::Unavailable { .. }));
    assert_eq!(outcome.symbol(), "GONE");
    assert!(h.history.load("GONE").unwrap().is_empty());
}

#[tokio::test]
async fn test_unsorted_bars_are_unavailable() {
    let mut bars = uptrend(80);
    bars.swap(3, 4);
    let h = harness(FakeMarketData::default().with("MESS", bars), None);

    let outcome = h
        .analyzer
        .analyze_symbol("MESS", &SessionOptions::technical_only())
        .await;
    assert!(matches!(outcome, AnalysisOutcome::Unavailable { .. }));
}

// ============================================================================
// AI Fusion Tests
// ============================================================================

#[tokio::test]
async fn test_confident_ai_overrides_technical() {
    let h = harness(
        FakeMarketData::default().with("MSFT", uptrend(250)),
        Some(CannedProvider {
            reply: Ok(r#"{"signal": "buy", "confidence": 95, "reasons": ["Strong earnings"]}"#),
        }),
    );

    let outcome = h.analyzer.analyze_symbol("MSFT", &ai_session()).await;
    let report = outcome.report().unwrap();

    let ai = report.ai.as_ref().unwrap();
    assert_eq!(ai.source, OpinionSource::Provider(ProviderKind::Ollama));
    assert_eq!(report.fused.signal, SignalAction::Buy);
    assert_eq!(report.fused.confidence, 95);
    assert_eq!(report.fused.source, FusionSource::Ai);
    assert_eq!(report.fused.reasons[0], "AI analysis overrides technical signal");
}

#[tokio::test]
async fn test_agreeing_ai_averages_confidence() {
    let h = harness(
        FakeMarketData::default().with("MSFT", uptrend(250)),
        Some(CannedProvider {
            reply: Ok(r#"{"signal": "sell", "confidence": 45, "reasons": ["Stretched valuation"]}"#),
        }),
    );

    let outcome = h.analyzer.analyze_symbol("MSFT", &ai_session()).await;
    let report = outcome.report().unwrap();

    let expected = ((report.technical.confidence as f64 + 45.0) / 2.0).round() as u8;
    assert_eq!(report.fused.signal, SignalAction::Sell);
    assert_eq!(report.fused.confidence, expected);
    assert_eq!(report.fused.source, FusionSource::AiTechnical);
    assert!(report
        .fused
        .reasons
        .contains(&"Stretched valuation".to_string()));
}

#[tokio::test]
async fn test_failed_ai_falls_back_to_technical() {
    let h = harness(
        FakeMarketData::default().with("MSFT", uptrend(250)),
        Some(CannedProvider {
            reply: Err("model overloaded"),
        }),
    );

    let outcome = h.analyzer.analyze_symbol("MSFT", &ai_session()).await;
    let report = outcome.report().unwrap();

    let ai = report.ai.as_ref().unwrap();
    assert_eq!(ai.source, OpinionSource::Technical);
    assert!(ai.error.as_ref().unwrap().contains("model overloaded"));
    assert_eq!(report.fused.source, FusionSource::Technical);
    assert_eq!(report.fused.signal, report.technical.signal);
    assert_eq!(report.fused.confidence, report.technical.confidence);
}

// ============================================================================
// Collaborator Tests
// ============================================================================

#[tokio::test]
async fn test_history_is_capped_and_previous_signal_reported() {
    let h = harness(FakeMarketData::default().with("SPY", uptrend(250)), None);
    let session = SessionOptions::technical_only();

    let first = h.analyzer.analyze_symbol("SPY", &session).await;
    assert!(first.report().unwrap().previous_signal.is_none());

    let second = h.analyzer.analyze_symbol("SPY", &session).await;
    let previous = second.report().unwrap().previous_signal.as_ref().unwrap();
    assert_eq!(previous.signal, SignalAction::Sell);

    for _ in 0..12 {
        h.analyzer.analyze_symbol("SPY", &session).await;
    }
    assert_eq!(h.history.load("SPY").unwrap().len(), 10);
}

#[tokio::test]
async fn test_actionable_signal_notifies() {
    let h = harness(
        FakeMarketData::default()
            .with("SELLME", uptrend(250))
            .with("TINY", uptrend(20)),
        None,
    );
    let session = SessionOptions::technical_only();

    h.analyzer.analyze_symbol("SELLME", &session).await;
    h.analyzer.analyze_symbol("TINY", &session).await;

    let alerts = h.notifier.alerts.lock().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].symbol, "SELLME");
    assert_eq!(alerts[0].signal, SignalAction::Sell);
    assert_eq!(alerts[0].price, 349.0);
}

#[tokio::test]
async fn test_persistence_failure_keeps_result() {
    let analyzer = Analyzer::new(
        Config::default(),
        Arc::new(FakeMarketData::default().with("AAPL", uptrend(250))),
        Arc::new(BrokenHistory),
        Arc::new(RecordingNotifier::default()),
        OpinionAdapter::new(Config::default().ai).unwrap(),
    );

    let outcome = analyzer
        .analyze_symbol("AAPL", &SessionOptions::technical_only())
        .await;
    let report = outcome.report().expect("analysis survives storage errors");
    assert!(report.previous_signal.is_none());
    assert_eq!(report.fused.signal, SignalAction::Sell);
}

#[tokio::test]
async fn test_batch_continues_past_bad_symbols() {
    let h = harness(
        FakeMarketData::default()
            .with("AAPL", uptrend(250))
            .with("SHORT", uptrend(10)),
        None,
    );
    let symbols = vec!["AAPL".to_string(), "MISSING".to_string(), "SHORT".to_string()];

    let outcomes = h
        .analyzer
        .analyze_batch(&symbols, &SessionOptions::technical_only())
        .await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].report().is_some());
    assert!(matches!(outcomes[1], AnalysisOutcome::Unavailable { .. }));
    assert_eq!(outcomes[2].report().unwrap().fused.signal, SignalAction::Hold);
}

#[tokio::test]
async fn test_crypto_symbol_uses_crypto_classification() {
    let h = harness(FakeMarketData::default().with("BTC-USD", uptrend(250)), None);

    let outcome = h
        .analyzer
        .analyze_symbol("btc-usd", &SessionOptions::technical_only())
        .await;
    let report = outcome.report().unwrap();

    assert!(report.asset_class.is_crypto());
    assert!(report.snapshot.as_ref().unwrap().asset_class.is_crypto());
}

//! End-to-end analysis of one symbol or a batch.

use super::advisor::{OpinionAdapter, SessionOptions};
use super::history::SignalHistoryStore;
use super::notifier::Notifier;
use super::signals::{compute_indicators, fuse, AnalysisParams, SignalGenerator};
use crate::config::Config;
use crate::sources::MarketDataSource;
use crate::types::{
    AssetClass, FusedSignal, IndicatorSnapshot, SignalAlert, SignalHistoryEntry, SignalOpinion,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything produced by one successful analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub symbol: String,
    pub asset_class: AssetClass,
    pub price: f64,
    /// Absent when the series was too short for indicators.
    pub snapshot: Option<IndicatorSnapshot>,
    pub technical: SignalOpinion,
    /// Present when an external opinion was requested.
    pub ai: Option<SignalOpinion>,
    pub fused: FusedSignal,
    /// Last recorded signal before this run.
    pub previous_signal: Option<SignalHistoryEntry>,
    pub analyzed_at: DateTime<Utc>,
}

/// Result of analyzing one symbol.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Analyzed(Box<AnalysisReport>),
    Unavailable { symbol: String, reason: String },
}

impl AnalysisOutcome {
    pub fn symbol(&self) -> &str {
        match self {
            AnalysisOutcome::Analyzed(report) => &report.symbol,
            AnalysisOutcome::Unavailable { symbol, .. } => symbol,
        }
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisOutcome::Analyzed(report) => Some(report),
            AnalysisOutcome::Unavailable { .. } => None,
        }
    }
}

/// Runs fetch, indicators, scoring, the optional second opinion and fusion.
pub struct Analyzer {
    config: Config,
    market_data: Arc<dyn MarketDataSource>,
    history: Arc<dyn SignalHistoryStore>,
    notifier: Arc<dyn Notifier>,
    advisor: OpinionAdapter,
}

impl Analyzer {
    pub fn new(
        config: Config,
        market_data: Arc<dyn MarketDataSource>,
        history: Arc<dyn SignalHistoryStore>,
        notifier: Arc<dyn Notifier>,
        advisor: OpinionAdapter,
    ) -> Self {
        Self {
            config,
            market_data,
            history,
            notifier,
            advisor,
        }
    }

    /// Analyze one symbol. Never fails; problems become `Unavailable`.
    pub async fn analyze_symbol(&self, symbol: &str, session: &SessionOptions) -> AnalysisOutcome {
        let symbol = symbol.trim().to_uppercase();

        let Some(bars) = self
            .market_data
            .fetch_bars(&symbol, &self.config.bar_interval, &self.config.bar_range)
            .await
        else {
            return AnalysisOutcome::Unavailable {
                symbol,
                reason: "Market data unavailable".to_string(),
            };
        };

        let Some(price) = bars.last().map(|b| b.close) else {
            return AnalysisOutcome::Unavailable {
                symbol,
                reason: "No price bars returned".to_string(),
            };
        };

        let params =
            AnalysisParams::resolve(&symbol, &self.config.indicators, self.config.signal_threshold);
        let asset_class = params.asset_class;
        debug!("{}: classified as {}", symbol, asset_class.label());

        let generator = SignalGenerator::new(params);
        let computed = compute_indicators(&bars, &symbol, generator.params());
        let snapshot = computed.as_ref().ok().cloned();

        let technical = match generator.generate_from(computed) {
            Ok(opinion) => opinion,
            Err(e) => {
                warn!("{}: cannot analyze: {}", symbol, e);
                return AnalysisOutcome::Unavailable {
                    symbol,
                    reason: e.to_string(),
                };
            }
        };

        let ai = match (&snapshot, session.ai_enabled) {
            (Some(snapshot), true) => Some(
                self.advisor
                    .get_enhanced_signal(&symbol, price, &technical, snapshot, session)
                    .await,
            ),
            _ => None,
        };

        let fused = match &ai {
            Some(opinion) if opinion.is_external() => fuse(&technical, opinion),
            _ => FusedSignal::from_technical(&technical),
        };

        let previous_signal = self.history.latest(&symbol).unwrap_or_else(|e| {
            warn!("{}: failed to load signal history: {}", symbol, e);
            None
        });

        let entry = SignalHistoryEntry::new(&symbol, price, &fused);
        if let Err(e) = self
            .history
            .append(&symbol, entry, self.config.history_limit)
        {
            warn!("{}: failed to save signal history: {}", symbol, e);
        }

        if let Some(alert) = SignalAlert::from_signal(&symbol, price, &fused) {
            if let Err(e) = self.notifier.notify(&alert).await {
                warn!("{}: failed to send alert: {}", symbol, e);
            }
        }

        info!(
            "{}: {} ({}% confidence, {})",
            symbol, fused.signal, fused.confidence, fused.source
        );

        AnalysisOutcome::Analyzed(Box::new(AnalysisReport {
            symbol,
            asset_class,
            price,
            snapshot,
            technical,
            ai,
            fused,
            previous_signal,
            analyzed_at: Utc::now(),
        }))
    }

    /// Analyze symbols one after another; one failure never stops the rest.
    pub async fn analyze_batch(
        &self,
        symbols: &[String],
        session: &SessionOptions,
    ) -> Vec<AnalysisOutcome> {
        let mut outcomes = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            outcomes.push(self.analyze_symbol(symbol, session).await);
        }

        let analyzed = outcomes.iter().filter(|o| o.report().is_some()).count();
        info!("Analyzed {}/{} symbols", analyzed, symbols.len());
        outcomes
    }
}

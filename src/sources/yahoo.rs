//! Yahoo Finance chart API client for historical bars.
//!
//! Covers stocks, ETFs and the `-USD` crypto pairs Yahoo lists.

use super::MarketDataSource;
use crate::error::{AppError, Result};
use crate::services::signals::SUPPORTED_CRYPTO;
use crate::types::PriceBar;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

/// Map a user symbol to its Yahoo ticker.
///
/// Bare crypto symbols and the `.X` form become `<SYM>-USD`; share classes
/// use hyphens (e.g. BRK-B not BRK.B).
pub fn yahoo_symbol(symbol: &str) -> String {
    let upper = symbol.trim().to_uppercase();

    if let Some(base) = upper.strip_suffix(".X") {
        return format!("{}-USD", base);
    }
    if SUPPORTED_CRYPTO.contains(&upper.as_str()) {
        return format!("{}-USD", upper);
    }
    if upper.ends_with("-USD") {
        return upper;
    }
    upper.replace('.', "-")
}

fn bar_date(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

/// Yahoo Finance API client.
pub struct YahooFinanceSource {
    client: Client,
    base_url: String,
}

impl YahooFinanceSource {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against a different host, e.g. a proxy or test server.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Chart endpoint for a ticker, with the ticker encoded as one path segment.
    fn chart_url(&self, ticker: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::ProviderUnavailable(format!("Invalid Yahoo base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::ProviderUnavailable(format!(
                    "Yahoo base URL cannot take a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", ticker]);
        Ok(url)
    }

    /// Fetch historical bars for a symbol.
    ///
    /// Arguments:
    /// - symbol: Stock/ETF/crypto symbol (e.g., "AAPL", "BTC", "ETH-USD")
    /// - interval: Bar interval ("1d", "1wk", "1mo", ...)
    /// - range: Time range ("3mo", "6mo", "1y", "2y", "5y", "max", ...)
    pub async fn get_historical_data(
        &self,
        symbol: &str,
        interval: &str,
        range: &str,
    ) -> Result<Vec<PriceBar>> {
        let ticker = yahoo_symbol(symbol);
        let url = self.chart_url(&ticker)?;

        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self
            .client
            .get(url)
            .query(&[
                ("range", range),
                ("interval", interval),
                ("includePrePost", "false"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ProviderUnavailable(format!(
                "Yahoo API error for {}: {}",
                ticker,
                response.status()
            )));
        }

        let data: YahooChartResponse = response.json().await?;

        if let Some(error) = data.chart.error {
            return Err(AppError::ProviderUnavailable(format!(
                "Yahoo API error: {} - {}",
                error.code, error.description
            )));
        }

        let result = data
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| AppError::ProviderUnavailable(format!("No results for {}", ticker)))?;

        let timestamps = result.timestamp.unwrap_or_default();
        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ProviderUnavailable(format!("No quote data for {}", ticker)))?;

        Ok(build_bars(&timestamps, quote))
    }
}

/// Zip the column arrays into bars.
///
/// Points without a positive close are skipped. When two points fall on the
/// same date the later one wins, which covers Yahoo's trailing live bar.
fn build_bars(timestamps: &[i64], quote: YahooQuote) -> Vec<PriceBar> {
    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let close = closes.get(i).and_then(|v| *v).unwrap_or(0.0);
        if close <= 0.0 {
            continue;
        }

        let Some(date) = bar_date(timestamp) else {
            continue;
        };

        let bar = PriceBar::new(
            date,
            opens.get(i).and_then(|v| *v).unwrap_or(close),
            highs.get(i).and_then(|v| *v).unwrap_or(close),
            lows.get(i).and_then(|v| *v).unwrap_or(close),
            close,
            volumes.get(i).and_then(|v| *v).unwrap_or(0.0),
        );

        match bars.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            Some(last) if last.date > bar.date => continue,
            _ => bars.push(bar),
        }
    }

    bars
}

#[async_trait]
impl MarketDataSource for YahooFinanceSource {
    async fn fetch_bars(&self, symbol: &str, interval: &str, range: &str) -> Option<Vec<PriceBar>> {
        match self.get_historical_data(symbol, interval, range).await {
            Ok(bars) => {
                debug!("Fetched {} bars for {}", bars.len(), symbol);
                Some(bars)
            }
            Err(e) => {
                warn!("Failed to fetch bars for {}: {}", symbol, e);
                None
            }
        }
    }
}

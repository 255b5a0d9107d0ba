//! Market data providers.

pub mod yahoo;

pub use yahoo::YahooFinanceSource;

use crate::types::PriceBar;
use async_trait::async_trait;

/// Source of historical price bars.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Bars for `symbol`, oldest first, or `None` when the provider fails.
    async fn fetch_bars(&self, symbol: &str, interval: &str, range: &str) -> Option<Vec<PriceBar>>;
}

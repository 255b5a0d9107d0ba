//! Buy/sell alert delivery.

use crate::error::Result;
use crate::types::SignalAlert;
use async_trait::async_trait;
use tracing::info;

/// Receives an alert for every actionable final signal.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, alert: &SignalAlert) -> Result<()>;
}

/// Writes alerts to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, alert: &SignalAlert) -> Result<()> {
        info!("{}: {}", alert.subject(), alert.reasons.join("; "));
        Ok(())
    }
}

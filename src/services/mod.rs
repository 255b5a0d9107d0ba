pub mod advisor;
pub mod analyzer;
pub mod history;
pub mod notifier;
pub mod signals;
pub mod watchlist;

pub use advisor::{OpinionAdapter, OpinionProvider, SessionOptions};
pub use analyzer::{AnalysisOutcome, AnalysisReport, Analyzer};
pub use history::{JsonHistoryStore, SignalHistoryStore, HISTORY_LIMIT};
pub use notifier::{LogNotifier, Notifier};
pub use watchlist::WatchlistStore;

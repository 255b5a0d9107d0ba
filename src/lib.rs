//! Augur - technical and AI-assisted buy/sell/hold signals for stocks and crypto

pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use services::{AnalysisOutcome, AnalysisReport, Analyzer, SessionOptions};
pub use types::*;

use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Insufficient data for {symbol}: {bars} bars, need {required}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        required: usize,
    },

    #[error("Invalid price bars: {0}")]
    InvalidBars(String),

    #[error("Market data provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("External opinion error: {0}")]
    ExternalOpinion(String),

    #[error("Invalid opinion response: {0}")]
    InvalidOpinion(String),

    #[error("Missing credentials: {0} is not set")]
    MissingCredentials(&'static str),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    /// Whether this error means the symbol simply lacks enough history.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, AppError::InsufficientData { .. })
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = AppError::InsufficientData {
            symbol: "AAPL".to_string(),
            bars: 12,
            required: 50,
        };
        assert!(err.is_insufficient_data());
        assert_eq!(err.to_string(), "Insufficient data for AAPL: 12 bars, need 50");
    }

    #[test]
    fn test_missing_credentials_message() {
        let err = AppError::MissingCredentials("OPENAI_API_KEY");
        assert!(!err.is_insufficient_data());
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}

use serde::{Deserialize, Serialize};

/// Asset class of a symbol, decided before any indicator is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    #[default]
    Equity,
    Crypto,
}

impl AssetClass {
    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::Equity => "Equity",
            AssetClass::Crypto => "Crypto",
        }
    }

    pub fn is_crypto(&self) -> bool {
        matches!(self, AssetClass::Crypto)
    }
}

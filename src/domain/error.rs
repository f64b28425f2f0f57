//! Domain error types.

/// Top-level error type for stocktrader.
#[derive(Debug, thiserror::Error)]
pub enum TraderError {
    #[error("invalid stock symbol: {symbol}")]
    InvalidSymbol { symbol: String },

    #[error("invalid quantity {quantity}: must be a positive whole number")]
    InvalidQuantity { quantity: i64 },

    #[error("portfolio is empty")]
    EmptyPortfolio,

    #[error("{symbol} not found in portfolio")]
    NotHeld { symbol: String },

    #[error("portfolio file {path}: {reason}")]
    Storage { path: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TraderError> for std::process::ExitCode {
    fn from(err: &TraderError) -> Self {
        let code: u8 = match err {
            TraderError::Io(_) | TraderError::Storage { .. } => 1,
            TraderError::ConfigParse { .. } => 2,
            TraderError::InvalidSymbol { .. } | TraderError::InvalidQuantity { .. } => 3,
            TraderError::EmptyPortfolio | TraderError::NotHeld { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

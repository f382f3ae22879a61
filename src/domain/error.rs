//! Domain error types.

/// Top-level error type for gbce.
#[derive(Debug, thiserror::Error)]
pub enum GbceError {
    #[error("invalid trade for {symbol}: {reason}")]
    InvalidTrade { symbol: String, reason: String },

    #[error("invalid security {symbol}: {reason}")]
    InvalidSecurity { symbol: String, reason: String },

    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("symbol already registered: {symbol}")]
    DuplicateSymbol { symbol: String },

    #[error("non-positive price {value} for {symbol} cannot enter the geometric mean")]
    NonPositivePrice { symbol: String, value: f64 },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("trade data error: {reason}")]
    TradeData { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&GbceError> for std::process::ExitCode {
    fn from(err: &GbceError) -> Self {
        let code: u8 = match err {
            GbceError::Io(_) => 1,
            GbceError::ConfigParse { .. }
            | GbceError::ConfigMissing { .. }
            | GbceError::ConfigInvalid { .. } => 2,
            GbceError::TradeData { .. } => 3,
            GbceError::InvalidTrade { .. } | GbceError::InvalidSecurity { .. } => 4,
            GbceError::UnknownSymbol { .. } | GbceError::DuplicateSymbol { .. } => 5,
            GbceError::NonPositivePrice { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

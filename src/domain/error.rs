//! Domain error types.

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum SigtraderError {
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

    #[error("unknown strategy '{name}' (available: {available})")]
    UnknownStrategy { name: String, available: String },

    #[error("invalid parameter for strategy '{strategy}': {reason}")]
    InvalidParameter { strategy: String, reason: String },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("{ticker}: missing required column '{column}'")]
    MissingColumn { ticker: String, column: String },

    #[error("{ticker}: malformed data: {reason}")]
    DataFormat { ticker: String, reason: String },

    #[error("insufficient data: have {bars} bars, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("signal series has {actual} entries for {expected} bars")]
    SignalMismatch { expected: usize, actual: usize },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SigtraderError> for std::process::ExitCode {
    fn from(err: &SigtraderError) -> Self {
        let code: u8 = match err {
            SigtraderError::Io(_) | SigtraderError::Report { .. } => 1,
            SigtraderError::ConfigParse { .. }
            | SigtraderError::ConfigMissing { .. }
            | SigtraderError::ConfigInvalid { .. } => 2,
            SigtraderError::UnknownStrategy { .. } | SigtraderError::InvalidParameter { .. } => 4,
            SigtraderError::NoData { .. }
            | SigtraderError::MissingColumn { .. }
            | SigtraderError::DataFormat { .. }
            | SigtraderError::InsufficientData { .. }
            | SigtraderError::SignalMismatch { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

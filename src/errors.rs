use thiserror::Error;

/// Failures raised by the forecast engine and the week controller.
///
/// Every mutation validates its inputs before touching state, so receiving
/// one of these means nothing changed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForecastError {
    #[error("index {index} is out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("week {0} has no transactions")]
    UnknownWeek(u32),
    #[error("invalid week number {0}")]
    InvalidWeek(u32),
    #[error("running balance would overflow")]
    BalanceOverflow,
}

pub type Result<T> = std::result::Result<T, ForecastError>;

/// Error type that captures export, import and configuration failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Snapshot could not be replayed: {0}")]
    Forecast(#[from] ForecastError),
    #[error("Snapshot schema v{0} is newer than this build supports")]
    UnsupportedSchema(u32),
    #[error("Configuration error: {0}")]
    Config(String),
}

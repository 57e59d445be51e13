//! Error types for the forecasting engine

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors produced while computing indicators or forecasts.
///
/// Every variant is scoped to a single request: none of them leaves shared
/// state behind, so the caller can keep serving other symbols.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Not enough history for the requested window or period
    #[error("Insufficient data: need at least {required} prices, got {available}")]
    InsufficientData { required: usize, available: usize },

    /// Numerical instability during training or prediction
    #[error("Model training failed: {0}")]
    ModelTraining(String),

    /// Raised by a data provider before the engine is invoked
    #[error("External data unavailable: {0}")]
    ExternalDataUnavailable(String),

    /// Malformed series, arguments or configuration
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Cancellation or timeout hook fired
    #[error("Request cancelled during {0}")]
    Cancelled(String),
}

impl ForecastError {
    pub fn insufficient(required: usize, available: usize) -> Self {
        ForecastError::InsufficientData {
            required,
            available,
        }
    }

    /// Whether the caller can recover by choosing a different symbol,
    /// period or horizon
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ForecastError::InsufficientData { .. }
                | ForecastError::InvalidInput(_)
                | ForecastError::ExternalDataUnavailable(_)
        )
    }
}

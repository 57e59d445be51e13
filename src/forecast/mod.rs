//! # Forecasting
//!
//! - [`ForecastEngine`]: the two request entry points, indicators and forecast
//! - [`AutoregressiveForecaster`]: step-by-step prediction with sentiment drift
//! - [`VerdictConfig`]: BUY / SELL / HOLD from the predicted move
//! - [`CancelToken`]: cooperative cancellation and timeouts
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use stock_rnn::data::PriceSeries;
//! use stock_rnn::forecast::ForecastEngine;
//!
//! let closes: Vec<f64> = (0..120).map(|i| 100.0 + (i as f64 * 0.1).sin() * 5.0).collect();
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let series = PriceSeries::from_closes("AAPL", start, &closes).unwrap();
//!
//! let engine = ForecastEngine::default();
//! let result = engine.forecast(&series, 0.3, 7).unwrap();
//! println!("{} with {}% confidence", result.verdict, result.confidence);
//! ```

mod autoregressive;
mod cancel;
mod engine;
mod verdict;

pub use autoregressive::{
    forecast_step, validate_sentiment, AutoregressiveForecaster, DriftConfig, ForecastStep,
};
pub use cancel::CancelToken;
pub use engine::{ForecastEngine, ForecastPoint, ForecastResult};
pub use verdict::{Assessment, Verdict, VerdictConfig};

//! # Stock RNN - LSTM price forecasting with sentiment drift
//!
//! Forecasting and signal engine for daily stock prices:
//! technical indicators, an LSTM trained per request on min-max scaled
//! windows, an autoregressive forecast nudged by news sentiment and a
//! BUY / SELL / HOLD verdict.
//!
//! ## Modules
//!
//! - `data` - Price series and history providers
//! - `indicators` - SMA, RSI, volatility and qualitative signals
//! - `preprocessing` - Normalization and sliding windows
//! - `model` - LSTM regressor, dense layers, Adam
//! - `forecast` - Forecast engine, autoregressive loop, verdicts
//! - `sentiment` - Sentiment signals and providers
//! - `analysis` - Per-symbol pipeline and comparisons
//! - `risk` - Investor risk questionnaire
//! - `utils` - Configuration, metrics, CSV and logging
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use stock_rnn::{ForecastEngine, PriceSeries};
//!
//! fn main() -> anyhow::Result<()> {
//!     let closes: Vec<f64> = (0..90).map(|i| 150.0 + (i as f64 * 0.2).sin() * 4.0).collect();
//!     let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//!     let series = PriceSeries::from_closes("AAPL", start, &closes)?;
//!
//!     let engine = ForecastEngine::default();
//!     let indicators = engine.compute_indicators(&series)?;
//!     let forecast = engine.forecast(&series, 0.2, 7)?;
//!
//!     println!("RSI {:.2}, verdict {}", indicators.rsi, forecast.verdict);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod data;
pub mod error;
pub mod forecast;
pub mod indicators;
pub mod model;
pub mod preprocessing;
pub mod risk;
pub mod sentiment;
pub mod utils;

// Re-export the main types
pub use data::{HistoryProvider, PricePoint, PriceSeries};
pub use error::{ForecastError, Result};
pub use forecast::{CancelToken, ForecastEngine, ForecastResult, Verdict};
pub use indicators::{IndicatorSet, TechnicalSignal};
pub use model::{LstmRegressor, ModelConfig, SequenceRegressor};
pub use sentiment::{SentimentProvider, SentimentSignal};
pub use utils::EngineConfig;

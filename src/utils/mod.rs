//! # Utilities
//!
//! Configuration loading, fit metrics, CSV import/export and logging setup.

mod config;
mod io;
mod logging;
mod metrics;

pub use config::{load_config, save_config, EngineConfig};
pub use io::{load_series_csv, save_forecast_csv, save_series_csv};
pub use logging::init_logging;
pub use metrics::{directional_accuracy, mae, mse, r2_score, rmse};

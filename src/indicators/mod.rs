//! # Technical indicators
//!
//! Pure functions over closing prices plus [`IndicatorSet`], the snapshot
//! reported by the engine. Nothing here is cached between calls.
//!
//! ```rust
//! use stock_rnn::indicators::{moving_average, momentum_oscillator};
//!
//! let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
//! assert_eq!(moving_average(&closes, 10).unwrap(), 124.5);
//! assert_eq!(momentum_oscillator(&closes, 14).unwrap(), 100.0);
//! ```

mod momentum;
mod signals;
mod trend;
mod volatility;

pub use momentum::momentum_oscillator;
pub use signals::{qualitative_signals, TechnicalSignal, RSI_OVERBOUGHT, RSI_OVERSOLD};
pub use trend::moving_average;
pub use volatility::{historical_volatility, TRADING_DAYS_PER_YEAR};

use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Look-back periods of the indicator snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndicatorConfig {
    pub sma_short_period: usize,
    pub sma_long_period: usize,
    pub rsi_period: usize,
    pub volatility_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_short_period: 50,
            sma_long_period: 200,
            rsi_period: 14,
            volatility_period: 30,
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sma_short_period == 0 || self.sma_long_period == 0 || self.rsi_period == 0 {
            return Err(ForecastError::InvalidInput(
                "indicator periods must be positive".to_string(),
            ));
        }
        if self.volatility_period < 2 {
            return Err(ForecastError::InvalidInput(
                "volatility period must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

/// Indicator snapshot of one series
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndicatorSet {
    pub current_price: f64,
    /// Short SMA, absent when history is shorter than its period
    pub sma_short: Option<f64>,
    /// Long SMA, absent when history is shorter than its period
    pub sma_long: Option<f64>,
    pub rsi: f64,
    /// Annualized volatility, absent when history is too short
    pub volatility: Option<f64>,
    pub signals: Vec<TechnicalSignal>,
}

impl IndicatorSet {
    /// Computes every indicator from the series.
    ///
    /// Only the RSI is mandatory; averages and volatility are reported as
    /// `None` when the history does not cover their period.
    pub fn compute(series: &PriceSeries, config: &IndicatorConfig) -> Result<Self> {
        config.validate()?;

        let closes = series.closes();
        let current_price = series
            .last_close()
            .ok_or_else(|| ForecastError::insufficient(config.rsi_period + 1, 0))?;

        let rsi = momentum_oscillator(&closes, config.rsi_period)?;
        let sma_short = moving_average(&closes, config.sma_short_period).ok();
        let sma_long = moving_average(&closes, config.sma_long_period).ok();
        let volatility = historical_volatility(&closes, config.volatility_period).ok();

        let signals = qualitative_signals(current_price, sma_short, sma_long, rsi);

        Ok(Self {
            current_price,
            sma_short,
            sma_long,
            rsi,
            volatility,
            signals,
        })
    }

    /// Signals joined the way they are shown to end users
    pub fn summary(&self) -> String {
        self.signals
            .iter()
            .map(|s| s.description())
            .collect::<Vec<_>>()
            .join(". ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_closes("TEST", start, closes).unwrap()
    }

    #[test]
    fn test_linear_series_snapshot() {
        // 65 closes rising from 100 to 164
        let closes: Vec<f64> = (0..65).map(|i| 100.0 + i as f64).collect();
        let set = IndicatorSet::compute(&series(&closes), &IndicatorConfig::default()).unwrap();

        assert_eq!(set.current_price, 164.0);
        assert_relative_eq!(set.sma_short.unwrap(), 139.5, epsilon = 1e-9);
        assert!(set.sma_long.is_none());
        assert_eq!(set.rsi, 100.0);
        assert!(set.volatility.is_some());
        assert_eq!(
            set.signals,
            vec![TechnicalSignal::Overbought, TechnicalSignal::Strong]
        );
    }

    #[test]
    fn test_flat_series_snapshot() {
        let closes = vec![42.17; 60];
        let set = IndicatorSet::compute(&series(&closes), &IndicatorConfig::default()).unwrap();

        assert_eq!(set.rsi, 100.0);
        assert_eq!(set.sma_short, Some(42.17));
        assert_eq!(set.volatility, Some(0.0));
        assert_eq!(set.signals, vec![TechnicalSignal::Overbought]);
    }

    #[test]
    fn test_short_history_fails_on_rsi() {
        let closes: Vec<f64> = (0..10).map(|i| 10.0 + i as f64).collect();
        let err = IndicatorSet::compute(&series(&closes), &IndicatorConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData {
                required: 15,
                available: 10
            }
        ));
    }

    #[test]
    fn test_summary() {
        let closes: Vec<f64> = (0..65).map(|i| 100.0 + i as f64).collect();
        let set = IndicatorSet::compute(&series(&closes), &IndicatorConfig::default()).unwrap();
        assert_eq!(
            set.summary(),
            "Overbought (High Risk). Price above 50-day avg (Strong)"
        );
    }
}

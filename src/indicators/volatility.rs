//! Volatility indicators

use crate::error::{ForecastError, Result};

/// Trading days used to annualize daily volatility
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualized historical volatility.
///
/// Sample standard deviation of the last `period` daily log returns, scaled
/// by `sqrt(252)`. Needs `period + 1` closes.
pub fn historical_volatility(closes: &[f64], period: usize) -> Result<f64> {
    if period < 2 {
        return Err(ForecastError::InvalidInput(format!(
            "volatility period must be at least 2, got {}",
            period
        )));
    }
    if closes.len() < period + 1 {
        return Err(ForecastError::insufficient(period + 1, closes.len()));
    }

    let recent = &closes[closes.len() - period - 1..];
    let returns: Vec<f64> = recent.windows(2).map(|w| (w[1] / w[0]).ln()).collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);

    Ok(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt())
}

//! Trend indicators

use crate::error::{ForecastError, Result};

/// Simple Moving Average of the most recent `period` closes.
///
/// Fails without computing anything when fewer than `period` closes exist.
pub fn moving_average(closes: &[f64], period: usize) -> Result<f64> {
    if period == 0 {
        return Err(ForecastError::InvalidInput(
            "moving average period must be positive".to_string(),
        ));
    }
    if closes.len() < period {
        return Err(ForecastError::insufficient(period, closes.len()));
    }

    // Accumulate offsets from the first close so a flat window stays exact
    let window = &closes[closes.len() - period..];
    let base = window[0];
    let offset: f64 = window.iter().map(|c| c - base).sum();
    Ok(base + offset / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average_uses_latest_closes() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(moving_average(&closes, 2).unwrap(), 4.5);
        assert_eq!(moving_average(&closes, 5).unwrap(), 3.0);
    }

    #[test]
    fn test_moving_average_insufficient() {
        let err = moving_average(&[1.0, 2.0], 3).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData {
                required: 3,
                available: 2
            }
        ));
        assert!(moving_average(&[], 1).is_err());
        assert!(matches!(
            moving_average(&[1.0], 0),
            Err(ForecastError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_moving_average_flat() {
        let closes = vec![42.17; 200];
        for period in [1, 14, 50, 200] {
            assert_eq!(moving_average(&closes, period).unwrap(), 42.17);
        }
    }
}

//! Momentum oscillators

use crate::error::{ForecastError, Result};

/// Relative Strength Index with Wilder smoothing.
///
/// The first `period` deltas seed plain averages of gains and losses; every
/// later delta is folded in as `avg = (avg * (period - 1) + current) / period`.
/// A series without any loss reports exactly `100`. The result is rounded to
/// two decimals.
pub fn momentum_oscillator(closes: &[f64], period: usize) -> Result<f64> {
    if period == 0 {
        return Err(ForecastError::InvalidInput(
            "RSI period must be positive".to_string(),
        ));
    }
    if closes.len() < period + 1 {
        return Err(ForecastError::insufficient(period + 1, closes.len()));
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let n = period as f64;
    let mut avg_gain = gains / n;
    let mut avg_loss = losses / n;

    for i in (period + 1)..closes.len() {
        let change = closes[i] - closes[i - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        avg_gain = (avg_gain * (n - 1.0) + gain) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss) / n;
    }

    if avg_loss == 0.0 {
        return Ok(100.0);
    }

    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - 100.0 / (1.0 + rs);

    Ok((rsi * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rsi_requires_period_plus_one() {
        let closes = vec![1.0; 14];
        assert!(matches!(
            momentum_oscillator(&closes, 14),
            Err(ForecastError::InsufficientData {
                required: 15,
                available: 14
            })
        ));
        assert!(momentum_oscillator(&[1.0, 2.0], 0).is_err());
    }

    #[test]
    fn test_rsi_uptrend_and_flat() {
        let rising: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        assert_eq!(momentum_oscillator(&rising, 14).unwrap(), 100.0);

        let flat = vec![42.17; 30];
        assert_eq!(momentum_oscillator(&flat, 14).unwrap(), 100.0);
    }

    #[test]
    fn test_rsi_downtrend_is_zero() {
        let falling: Vec<f64> = (0..30).map(|i| 200.0 - i as f64).collect();
        assert_eq!(momentum_oscillator(&falling, 14).unwrap(), 0.0);
    }

    #[test]
    fn test_rsi_known_value() {
        // 2 up moves of 1.0, 1 down move of 1.0, period 3: avg_gain 2/3, avg_loss 1/3
        let closes = [10.0, 11.0, 10.0, 11.0];
        assert_relative_eq!(momentum_oscillator(&closes, 3).unwrap(), 66.67);

        // One extra loss of 1.0 after seeding: gain 4/9, loss 5/9
        let closes = [10.0, 11.0, 10.0, 11.0, 10.0];
        assert_relative_eq!(momentum_oscillator(&closes, 3).unwrap(), 44.44);
    }

    #[test]
    fn test_rsi_bounds() {
        let closes: Vec<f64> = (0..120)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.05)
            .collect();

        for period in [2, 5, 14, 30] {
            let rsi = momentum_oscillator(&closes, period).unwrap();
            assert!((0.0..=100.0).contains(&rsi), "rsi {} out of range", rsi);
        }
    }
}

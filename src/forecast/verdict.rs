//! Reduction of a forecast path to a trading verdict

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Buy => "BUY",
            Verdict::Sell => "SELL",
            Verdict::Hold => "HOLD",
        };
        f.pad(label)
    }
}

/// Thresholds of the verdict rule.
///
/// The confidence is a plain rescaling of the size of the move, capped
/// below 100. It is not a calibrated probability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VerdictConfig {
    /// Percent gain above which the verdict is BUY
    pub buy_threshold_pct: f64,
    /// Percent loss beyond which the verdict is SELL
    pub sell_threshold_pct: f64,
    /// Confidence points per percent of move
    pub confidence_per_pct: f64,
    /// Upper bound of the confidence
    pub confidence_cap: f64,
}

impl Default for VerdictConfig {
    fn default() -> Self {
        Self {
            buy_threshold_pct: 2.0,
            sell_threshold_pct: 2.0,
            confidence_per_pct: 10.0,
            confidence_cap: 95.0,
        }
    }
}

/// Verdict with the numbers it was derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assessment {
    pub verdict: Verdict,
    pub confidence: u8,
    pub percent_change: f64,
}

impl VerdictConfig {
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.buy_threshold_pct,
            self.sell_threshold_pct,
            self.confidence_per_pct,
            self.confidence_cap,
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ForecastError::InvalidInput(
                "verdict thresholds must be finite and non-negative".to_string(),
            ));
        }
        if self.confidence_cap > 100.0 {
            return Err(ForecastError::InvalidInput(format!(
                "confidence cap {} exceeds 100",
                self.confidence_cap
            )));
        }
        Ok(())
    }

    /// Strict comparisons: a change exactly on a threshold is HOLD
    pub fn classify(&self, percent_change: f64) -> Verdict {
        if percent_change > self.buy_threshold_pct {
            Verdict::Buy
        } else if percent_change < -self.sell_threshold_pct {
            Verdict::Sell
        } else {
            Verdict::Hold
        }
    }

    /// `round(min(|pct| * confidence_per_pct, confidence_cap))`
    pub fn confidence(&self, percent_change: f64) -> u8 {
        let raw = (percent_change.abs() * self.confidence_per_pct).min(self.confidence_cap);
        raw.round().clamp(0.0, 100.0) as u8
    }

    /// Compares the last predicted price with the current price
    pub fn assess(&self, predicted: &[f64], current_price: f64) -> Result<Assessment> {
        let last = *predicted.last().ok_or_else(|| {
            ForecastError::InvalidInput("cannot assess an empty forecast".to_string())
        })?;
        if !(current_price.is_finite() && current_price > 0.0) {
            return Err(ForecastError::InvalidInput(format!(
                "current price must be positive, got {}",
                current_price
            )));
        }

        let percent_change = (last - current_price) / current_price * 100.0;
        if !percent_change.is_finite() {
            return Err(ForecastError::ModelTraining(
                "non-finite percent change".to_string(),
            ));
        }

        Ok(Assessment {
            verdict: self.classify(percent_change),
            confidence: self.confidence(percent_change),
            percent_change,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_hold() {
        let config = VerdictConfig::default();
        assert_eq!(config.classify(2.0), Verdict::Hold);
        assert_eq!(config.classify(2.0001), Verdict::Buy);
        assert_eq!(config.classify(-2.0), Verdict::Hold);
        assert_eq!(config.classify(-2.0001), Verdict::Sell);
        assert_eq!(config.classify(0.0), Verdict::Hold);
    }

    #[test]
    fn test_confidence_scaling() {
        let config = VerdictConfig::default();
        assert_eq!(config.confidence(5.0), 50);
        assert_eq!(config.confidence(-5.0), 50);
        assert_eq!(config.confidence(10.0), 95);
        assert_eq!(config.confidence(0.0), 0);
        assert_eq!(config.confidence(0.26), 3);
        assert_eq!(config.confidence(250.0), 95);
    }

    #[test]
    fn test_assess() {
        let config = VerdictConfig::default();

        let up = config.assess(&[101.0, 103.0, 105.0], 100.0).unwrap();
        assert_eq!(up.verdict, Verdict::Buy);
        assert_eq!(up.confidence, 50);

        let flat = config.assess(&[42.17; 7], 42.17).unwrap();
        assert_eq!(flat.verdict, Verdict::Hold);
        assert_eq!(flat.confidence, 0);
        assert_eq!(flat.percent_change, 0.0);

        let down = config.assess(&[80.0], 100.0).unwrap();
        assert_eq!(down.verdict, Verdict::Sell);
        assert_eq!(down.confidence, 95);
    }

    #[test]
    fn test_assess_rejects_bad_input() {
        let config = VerdictConfig::default();
        assert!(config.assess(&[], 100.0).is_err());
        assert!(config.assess(&[1.0], 0.0).is_err());
        assert!(config.assess(&[f64::NAN], 10.0).is_err());
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(Verdict::Buy.to_string(), "BUY");
        assert_eq!(serde_json::to_string(&Verdict::Sell).unwrap(), "\"SELL\"");
        let parsed: Verdict = serde_json::from_str("\"HOLD\"").unwrap();
        assert_eq!(parsed, Verdict::Hold);
    }
}

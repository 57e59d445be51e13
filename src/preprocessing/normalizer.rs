//! Min-max scaling over a reference window

use crate::error::{ForecastError, Result};

/// Normalized value used for every point of a flat window
pub const DEGENERATE_VALUE: f64 = 0.5;

/// `(min, max)` captured from one trailing window.
///
/// Not `Clone`: owned by the dataset that fitted it and dropped with it.
#[derive(Debug, PartialEq)]
pub struct ScalingParameters {
    min: f64,
    max: f64,
}

impl ScalingParameters {
    /// Captures min and max of `values`
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::insufficient(1, 0));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidInput(
                "cannot scale non-finite values".to_string(),
            ));
        }

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// All fitted values were equal
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// `(v - min) / (max - min)`, or [`DEGENERATE_VALUE`] for a flat window
    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            DEGENERATE_VALUE
        } else {
            (value - self.min) / self.range()
        }
    }

    pub fn normalize_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.normalize(v)).collect()
    }

    /// `v * (max - min) + min`; a flat window maps everything back to `min`
    pub fn denormalize(&self, value: f64) -> f64 {
        value * self.range() + self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fit_bounds() {
        let params = ScalingParameters::fit(&[3.0, 1.0, 4.0, 1.5, 9.0, 2.6]).unwrap();
        assert_eq!(params.min(), 1.0);
        assert_eq!(params.max(), 9.0);
        assert_eq!(params.range(), 8.0);
        assert!(!params.is_degenerate());
    }

    #[test]
    fn test_normalize_range_and_inverse() {
        let values = [187.3, 182.15, 190.02, 185.5, 181.0, 193.77];
        let params = ScalingParameters::fit(&values).unwrap();

        for &v in &values {
            let n = params.normalize(v);
            assert!((0.0..=1.0).contains(&n));
            assert_relative_eq!(params.denormalize(n), v, epsilon = 1e-9);
        }
        assert_eq!(params.normalize(181.0), 0.0);
        assert_eq!(params.normalize(193.77), 1.0);
    }

    #[test]
    fn test_degenerate_window() {
        let params = ScalingParameters::fit(&[42.17; 10]).unwrap();
        assert!(params.is_degenerate());
        assert_eq!(params.normalize_all(&[42.17, 42.17]), vec![0.5, 0.5]);
        assert_eq!(params.denormalize(0.5), 42.17);
        assert_eq!(params.denormalize(0.9), 42.17);
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        assert!(ScalingParameters::fit(&[]).is_err());
        assert!(ScalingParameters::fit(&[1.0, f64::NAN]).is_err());
    }
}

//! Sliding-window training examples

use super::normalizer::ScalingParameters;
use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2, Array3};
use serde::{Deserialize, Serialize};

/// Window geometry of the training set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Number of most recent closes the model is fitted on
    pub trailing_length: usize,
    /// Closes per model input
    pub window_size: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            trailing_length: 60,
            window_size: 5,
        }
    }
}

impl WindowConfig {
    pub fn new(trailing_length: usize, window_size: usize) -> Self {
        Self {
            trailing_length,
            window_size,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(ForecastError::InvalidInput(
                "window_size must be at least 1".to_string(),
            ));
        }
        if self.trailing_length < self.window_size + 2 {
            return Err(ForecastError::InvalidInput(format!(
                "trailing_length {} must be at least window_size + 2 ({})",
                self.trailing_length,
                self.window_size + 2
            )));
        }
        Ok(())
    }

    /// Smallest series length a dataset can be built from
    pub fn min_history(&self) -> usize {
        self.window_size + 2
    }
}

/// One `window -> next value` pair, both normalized
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub window: Array1<f64>,
    pub target: f64,
}

/// Normalized trailing window of a series with its training examples.
///
/// Owns the [`ScalingParameters`] it was fitted with; they never leave the
/// dataset except by reference.
#[derive(Debug)]
pub struct WindowedDataset {
    window_size: usize,
    scaling: ScalingParameters,
    normalized: Vec<f64>,
    examples: Vec<TrainingExample>,
}

impl WindowedDataset {
    /// Normalizes the trailing window of `series` and slides over it.
    ///
    /// A series shorter than `trailing_length` is used whole, provided it
    /// holds more than `window_size + 1` closes.
    pub fn prepare(series: &PriceSeries, config: &WindowConfig) -> Result<Self> {
        Self::from_closes(&series.closes(), config)
    }

    pub fn from_closes(closes: &[f64], config: &WindowConfig) -> Result<Self> {
        config.validate()?;

        let trailing = if closes.len() >= config.trailing_length {
            &closes[closes.len() - config.trailing_length..]
        } else if closes.len() > config.window_size + 1 {
            closes
        } else {
            return Err(ForecastError::insufficient(config.min_history(), closes.len()));
        };

        let scaling = ScalingParameters::fit(trailing)?;
        let normalized = scaling.normalize_all(trailing);

        let examples: Vec<TrainingExample> = normalized
            .windows(config.window_size + 1)
            .map(|w| TrainingExample {
                window: Array1::from(w[..config.window_size].to_vec()),
                target: w[config.window_size],
            })
            .collect();

        if examples.is_empty() {
            return Err(ForecastError::insufficient(config.min_history(), closes.len()));
        }

        Ok(Self {
            window_size: config.window_size,
            scaling,
            normalized,
            examples,
        })
    }

    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    pub fn scaling(&self) -> &ScalingParameters {
        &self.scaling
    }

    /// Normalized trailing window, oldest first
    pub fn normalized(&self) -> &[f64] {
        &self.normalized
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn is_degenerate(&self) -> bool {
        self.scaling.is_degenerate()
    }

    /// Final `window_size` normalized values, the seed of a forecast
    pub fn last_window(&self) -> Array1<f64> {
        let start = self.normalized.len() - self.window_size;
        Array1::from(self.normalized[start..].to_vec())
    }

    /// Examples as `[n, window, 1]` inputs and `[n, 1]` targets
    pub fn to_arrays(&self) -> (Array3<f64>, Array2<f64>) {
        let n = self.examples.len();
        let mut x = Array3::zeros((n, self.window_size, 1));
        let mut y = Array2::zeros((n, 1));

        for (i, example) in self.examples.iter().enumerate() {
            for (t, &value) in example.window.iter().enumerate() {
                x[[i, t, 0]] = value;
            }
            y[[i, 0]] = example.target;
        }

        (x, y)
    }
}

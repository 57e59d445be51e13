//! Configuration of the LSTM regressor

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Hyper-parameters of [`LstmRegressor`](super::LstmRegressor) and its
/// training protocol
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// LSTM hidden units
    pub hidden_size: usize,
    /// Units of the ReLU layer between the LSTM and the output
    pub dense_size: usize,
    /// Passes over the training set
    pub epochs: usize,
    /// Examples per mini-batch
    pub batch_size: usize,
    /// Adam step size
    pub learning_rate: f64,
    /// Global gradient norm limit
    pub gradient_clip: Option<f64>,
    /// Weight initialization scheme
    pub weight_init: WeightInit,
    /// Pins initialization and shuffling; `None` draws from entropy
    pub seed: Option<u64>,
    /// Draw a progress bar while training
    pub show_progress: bool,
}

/// Weight initialization scheme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub enum WeightInit {
    /// Xavier/Glorot uniform
    #[default]
    Xavier,
    /// He uniform
    He,
    /// Normal distribution
    Normal { mean: f64, std: f64 },
    /// Uniform distribution
    Uniform { low: f64, high: f64 },
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            hidden_size: 32,
            dense_size: 16,
            epochs: 50,
            batch_size: 8,
            learning_rate: 0.01,
            gradient_clip: None,
            weight_init: WeightInit::Xavier,
            seed: None,
            show_progress: false,
        }
    }
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = hidden_size;
        self
    }

    pub fn with_dense_size(mut self, dense_size: usize) -> Self {
        self.dense_size = dense_size;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_gradient_clip(mut self, clip: f64) -> Self {
        self.gradient_clip = Some(clip);
        self
    }

    pub fn with_weight_init(mut self, init: WeightInit) -> Self {
        self.weight_init = init;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Small, quick-to-train preset for tests and demos
    pub fn small() -> Self {
        Self::default()
            .with_hidden_size(8)
            .with_dense_size(4)
            .with_epochs(10)
    }

    pub fn validate(&self) -> Result<()> {
        if self.hidden_size == 0 || self.dense_size == 0 {
            return Err(ForecastError::InvalidInput(
                "layer sizes must be positive".to_string(),
            ));
        }
        if self.epochs == 0 || self.batch_size == 0 {
            return Err(ForecastError::InvalidInput(
                "epochs and batch_size must be positive".to_string(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ForecastError::InvalidInput(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        match self.weight_init {
            WeightInit::Normal { mean, std } if !(mean.is_finite() && std.is_finite() && std > 0.0) => {
                return Err(ForecastError::InvalidInput(format!(
                    "invalid normal init: mean {}, std {}",
                    mean, std
                )));
            }
            WeightInit::Uniform { low, high } if !(low.is_finite() && high.is_finite() && low < high) => {
                return Err(ForecastError::InvalidInput(format!(
                    "invalid uniform init: [{}, {})",
                    low, high
                )));
            }
            _ => {}
        }
        if let Some(clip) = self.gradient_clip {
            if !(clip.is_finite() && clip > 0.0) {
                return Err(ForecastError::InvalidInput(format!(
                    "gradient clip must be positive, got {}",
                    clip
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.hidden_size, 32);
        assert_eq!(config.dense_size, 16);
        assert_eq!(config.epochs, 50);
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.learning_rate, 0.01);
        assert!(config.gradient_clip.is_none());
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ModelConfig::new()
            .with_hidden_size(64)
            .with_learning_rate(0.001)
            .with_gradient_clip(1.0)
            .with_seed(7)
            .with_weight_init(WeightInit::He);

        assert_eq!(config.hidden_size, 64);
        assert_eq!(config.learning_rate, 0.001);
        assert_eq!(config.gradient_clip, Some(1.0));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.weight_init, WeightInit::He);
    }

    #[test]
    fn test_validation() {
        assert!(ModelConfig::new().with_epochs(0).validate().is_err());
        assert!(ModelConfig::new().with_learning_rate(-0.1).validate().is_err());
        assert!(ModelConfig::new().with_gradient_clip(0.0).validate().is_err());
        assert!(ModelConfig::new()
            .with_weight_init(WeightInit::Uniform { low: 1.0, high: 1.0 })
            .validate()
            .is_err());
        assert!(ModelConfig::small().validate().is_ok());
    }
}

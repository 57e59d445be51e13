//! # Sequence regression models
//!
//! A regressor maps a window of normalized prices to the next normalized
//! price. [`LstmRegressor`] is the production model; anything implementing
//! [`SequenceRegressor`] can be handed to the forecaster instead.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stock_rnn::forecast::CancelToken;
//! use stock_rnn::model::{LstmRegressor, ModelConfig, SequenceRegressor};
//! use stock_rnn::preprocessing::{WindowConfig, WindowedDataset};
//!
//! let closes: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.2).sin()).collect();
//! let dataset = WindowedDataset::from_closes(&closes, &WindowConfig::default()).unwrap();
//!
//! let mut model = LstmRegressor::new(ModelConfig::default().with_seed(42)).unwrap();
//! let report = model.fit(dataset.examples(), &CancelToken::new()).unwrap();
//! let next = model.predict(&dataset.last_window());
//! println!("loss {:.5}, next {:.4}", report.final_loss, next);
//! ```

mod config;
mod layers;
mod lstm;
mod optimizer;

pub use config::{ModelConfig, WeightInit};
pub use layers::{Activation, Dense};
pub use lstm::LstmRegressor;
pub use optimizer::Adam;

use crate::error::Result;
use crate::forecast::CancelToken;
use crate::preprocessing::TrainingExample;
use ndarray::Array1;
use serde::Serialize;

/// Outcome of one training run. Metrics are on the normalized scale.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TrainingReport {
    pub epochs: usize,
    pub final_loss: f64,
    pub loss_history: Vec<f64>,
    pub in_sample_rmse: f64,
    pub in_sample_mae: f64,
    pub in_sample_r2: f64,
    /// Share of in-sample moves whose direction was fitted correctly
    pub directional_accuracy: f64,
}

/// A model fitted on `window -> next value` examples
pub trait SequenceRegressor {
    /// Fits the model, checking `cancel` between epochs
    fn fit(&mut self, examples: &[TrainingExample], cancel: &CancelToken) -> Result<TrainingReport>;

    /// Predicts the value following `window`
    fn predict(&self, window: &Array1<f64>) -> f64;
}

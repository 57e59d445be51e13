//! # Preprocessing
//!
//! Turns a price series into normalized training examples:
//! - min-max scaling over the trailing window ([`ScalingParameters`])
//! - sliding `window -> next value` pairs ([`WindowedDataset`])
//!
//! ```rust
//! use stock_rnn::preprocessing::{WindowConfig, WindowedDataset};
//!
//! let closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
//! let dataset = WindowedDataset::from_closes(&closes, &WindowConfig::default()).unwrap();
//!
//! assert_eq!(dataset.examples().len(), 55);
//! assert_eq!(dataset.last_window().len(), 5);
//! ```

mod normalizer;
mod windower;

pub use normalizer::{ScalingParameters, DEGENERATE_VALUE};
pub use windower::{TrainingExample, WindowConfig, WindowedDataset};

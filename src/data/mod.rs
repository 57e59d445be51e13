//! # Price data
//!
//! - `types` - validated daily price series
//! - `provider` - history sources consumed before the engine runs

mod provider;
mod types;

pub use provider::{
    parse_time_series_json, FileHistoryProvider, HistoryProvider, StaticHistoryProvider,
};
pub use types::{PricePoint, PriceSeries};

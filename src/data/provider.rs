//! Historical data providers
//!
//! The engine itself never performs I/O. Providers run before the engine is
//! invoked and report every failure as
//! [`ForecastError::ExternalDataUnavailable`].

use super::types::{PricePoint, PriceSeries};
use crate::error::{ForecastError, Result};
use crate::utils::load_series_csv;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Source of daily closing prices for a symbol
pub trait HistoryProvider: Send + Sync {
    fn fetch_history(&self, symbol: &str) -> Result<PriceSeries>;
}

/// Twelve Data `time_series` payload (also used for error envelopes)
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    values: Vec<TimeSeriesValue>,
}

#[derive(Debug, Deserialize)]
struct TimeSeriesValue {
    datetime: String,
    close: String,
}

/// Parses a Twelve Data `time_series` JSON payload.
///
/// Values arrive newest first and are reversed into chronological order.
/// Intraday timestamps are truncated to their date.
pub fn parse_time_series_json(symbol: &str, payload: &str) -> Result<PriceSeries> {
    let response: TimeSeriesResponse = serde_json::from_str(payload).map_err(|e| {
        ForecastError::ExternalDataUnavailable(format!("{}: malformed payload: {}", symbol, e))
    })?;

    if let Some(code) = response.code {
        if code != 200 {
            return Err(ForecastError::ExternalDataUnavailable(format!(
                "{}: provider error {}: {}",
                symbol,
                code,
                response.message.unwrap_or_default()
            )));
        }
    }

    if response.values.is_empty() {
        return Err(ForecastError::ExternalDataUnavailable(format!(
            "{}: no data values returned",
            symbol
        )));
    }

    let mut points = Vec::with_capacity(response.values.len());
    for value in response.values.iter().rev() {
        let date_part = value.datetime.get(..10).unwrap_or(&value.datetime);
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
            ForecastError::ExternalDataUnavailable(format!(
                "{}: bad datetime '{}': {}",
                symbol, value.datetime, e
            ))
        })?;
        let close: f64 = value.close.trim().parse().map_err(|e| {
            ForecastError::ExternalDataUnavailable(format!(
                "{}: bad close '{}': {}",
                symbol, value.close, e
            ))
        })?;
        points.push(PricePoint::new(date, close));
    }

    PriceSeries::new(symbol, points)
        .map_err(|e| ForecastError::ExternalDataUnavailable(e.to_string()))
}

/// Reads `<dir>/<SYMBOL>.json` (Twelve Data payload) or `<dir>/<SYMBOL>.csv`
#[derive(Debug, Clone)]
pub struct FileHistoryProvider {
    dir: PathBuf,
}

impl FileHistoryProvider {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn read(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| {
            ForecastError::ExternalDataUnavailable(format!("{}: {}", path.display(), e))
        })
    }
}

impl HistoryProvider for FileHistoryProvider {
    fn fetch_history(&self, symbol: &str) -> Result<PriceSeries> {
        let symbol = symbol.trim().to_uppercase();
        let json_path = self.dir.join(format!("{}.json", symbol));
        let csv_path = self.dir.join(format!("{}.csv", symbol));

        let series = if json_path.exists() {
            debug!("Reading {}", json_path.display());
            parse_time_series_json(&symbol, &self.read(&json_path)?)?
        } else if csv_path.exists() {
            debug!("Reading {}", csv_path.display());
            load_series_csv(&symbol, &csv_path)
                .map_err(|e| ForecastError::ExternalDataUnavailable(e.to_string()))?
        } else {
            return Err(ForecastError::ExternalDataUnavailable(format!(
                "no history for {} in {}",
                symbol,
                self.dir.display()
            )));
        };

        info!("Loaded {} closes for {}", series.len(), symbol);
        Ok(series)
    }
}

/// In-memory provider keyed by upper-case symbol
#[derive(Debug, Clone, Default)]
pub struct StaticHistoryProvider {
    series: HashMap<String, PriceSeries>,
}

impl StaticHistoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.insert(series);
        self
    }

    pub fn insert(&mut self, series: PriceSeries) {
        self.series.insert(series.symbol().to_uppercase(), series);
    }
}

impl HistoryProvider for StaticHistoryProvider {
    fn fetch_history(&self, symbol: &str) -> Result<PriceSeries> {
        self.series
            .get(&symbol.trim().to_uppercase())
            .cloned()
            .ok_or_else(|| {
                ForecastError::ExternalDataUnavailable(format!("no history for {}", symbol))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const PAYLOAD: &str = r#"{
        "meta": {"symbol": "AAPL", "interval": "1day"},
        "values": [
            {"datetime": "2024-01-04", "open": "182.1", "close": "181.91"},
            {"datetime": "2024-01-03", "open": "184.2", "close": "184.25"},
            {"datetime": "2024-01-02", "open": "187.1", "close": "185.64"}
        ],
        "status": "ok"
    }"#;

    #[test]
    fn test_parse_reverses_to_chronological() {
        let series = parse_time_series_json("AAPL", PAYLOAD).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![185.64, 184.25, 181.91]);
        assert_eq!(
            series.last_date(),
            NaiveDate::from_ymd_opt(2024, 1, 4)
        );
    }

    #[test]
    fn test_parse_error_envelope() {
        let payload = r#"{"code": 400, "message": "symbol not found", "status": "error"}"#;
        let err = parse_time_series_json("NOPE", payload).unwrap_err();
        assert!(matches!(err, ForecastError::ExternalDataUnavailable(_)));
        assert!(err.to_string().contains("symbol not found"));
    }

    #[test]
    fn test_parse_empty_values() {
        let err = parse_time_series_json("X", r#"{"values": []}"#).unwrap_err();
        assert!(matches!(err, ForecastError::ExternalDataUnavailable(_)));
    }

    #[test]
    fn test_file_provider_json_and_csv() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("AAPL.json"), PAYLOAD).unwrap();

        let mut csv = std::fs::File::create(dir.path().join("MSFT.csv")).unwrap();
        writeln!(csv, "date,close").unwrap();
        writeln!(csv, "2024-01-02,370.87").unwrap();
        writeln!(csv, "2024-01-03,370.60").unwrap();

        let provider = FileHistoryProvider::new(dir.path());
        assert_eq!(provider.fetch_history("aapl").unwrap().len(), 3);
        assert_eq!(provider.fetch_history("MSFT").unwrap().closes(), vec![370.87, 370.60]);

        let missing = provider.fetch_history("TSLA").unwrap_err();
        assert!(matches!(missing, ForecastError::ExternalDataUnavailable(_)));
    }

    #[test]
    fn test_static_provider() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = PriceSeries::from_closes("spy", start, &[1.0, 2.0]).unwrap();
        let provider = StaticHistoryProvider::new().with_series(series);

        assert!(provider.fetch_history("SPY").is_ok());
        assert!(provider.fetch_history("QQQ").is_err());
    }
}

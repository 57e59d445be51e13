//! CSV import/export of price series and forecasts

use crate::data::{PricePoint, PriceSeries};
use crate::forecast::ForecastResult;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct SeriesRow {
    date: NaiveDate,
    close: f64,
}

/// Loads a `date,close` CSV file (oldest row first)
pub fn load_series_csv(symbol: &str, path: impl AsRef<Path>) -> Result<PriceSeries> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("cannot open {}", path.display()))?;

    let mut points = Vec::new();
    for row in reader.deserialize() {
        let row: SeriesRow = row.with_context(|| format!("bad row in {}", path.display()))?;
        points.push(PricePoint::new(row.date, row.close));
    }

    Ok(PriceSeries::new(symbol, points)?)
}

/// Writes a series as `date,close`
pub fn save_series_csv(series: &PriceSeries, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for point in series.points() {
        writer.serialize(SeriesRow {
            date: point.date,
            close: point.close,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes predicted prices as `date,price`
pub fn save_forecast_csv(result: &ForecastResult, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for point in &result.points {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_series_csv_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spy.csv");
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let series = PriceSeries::from_closes("SPY", start, &[510.5, 512.25, 509.0]).unwrap();

        save_series_csv(&series, &path).unwrap();
        let loaded = load_series_csv("SPY", &path).unwrap();

        assert_eq!(loaded, series);
    }

    #[test]
    fn test_load_rejects_unordered_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "date,close\n2024-01-03,10.0\n2024-01-02,11.0\n").unwrap();

        assert!(load_series_csv("BAD", &path).is_err());
    }
}

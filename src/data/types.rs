//! Price series types

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Daily closing price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading day
    pub date: NaiveDate,
    /// Closing price
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }

    /// Percentage change relative to an earlier point
    pub fn change_pct_from(&self, earlier: &PricePoint) -> f64 {
        (self.close - earlier.close) / earlier.close * 100.0
    }
}

/// Historical closing prices of one symbol, oldest first.
///
/// Dates are strictly ascending and every close is finite and positive.
/// The series cannot be mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validates and wraps a list of points
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self> {
        let symbol = symbol.into();

        for (i, point) in points.iter().enumerate() {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(ForecastError::InvalidInput(format!(
                    "{}: close on {} must be positive, got {}",
                    symbol, point.date, point.close
                )));
            }
            if i > 0 && point.date <= points[i - 1].date {
                return Err(ForecastError::InvalidInput(format!(
                    "{}: dates must be strictly ascending ({} follows {})",
                    symbol,
                    point.date,
                    points[i - 1].date
                )));
            }
        }

        Ok(Self { symbol, points })
    }

    /// Builds a series of consecutive calendar days starting at `start`
    pub fn from_closes(symbol: impl Into<String>, start: NaiveDate, closes: &[f64]) -> Result<Self> {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                start
                    .checked_add_days(Days::new(i as u64))
                    .map(|date| PricePoint::new(date, close))
                    .ok_or_else(|| ForecastError::InvalidInput("date overflow".to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Closing prices in chronological order
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Total return over the whole series in percent
    pub fn total_return_pct(&self) -> Option<f64> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 1 => {
                Some(last.change_pct_from(first))
            }
            _ => None,
        }
    }
}

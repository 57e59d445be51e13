//! Request-level entry points

use super::autoregressive::{validate_sentiment, AutoregressiveForecaster};
use super::cancel::CancelToken;
use super::verdict::Verdict;
use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use crate::indicators::IndicatorSet;
use crate::model::{LstmRegressor, SequenceRegressor, TrainingReport};
use crate::preprocessing::WindowedDataset;
use crate::utils::EngineConfig;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

/// Predicted close for one future day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Forecast of one symbol with its verdict.
///
/// Holds no model or scaling state; both are dropped before it is returned.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    pub symbol: String,
    /// One point per requested day, starting the day after the last close
    pub points: Vec<ForecastPoint>,
    pub verdict: Verdict,
    /// Heuristic in `[0, 95]`, not a probability
    pub confidence: u8,
    pub percent_change: f64,
    pub current_price: f64,
    pub sentiment_score: f64,
    /// Trailing window was flat
    pub degenerate: bool,
    pub training: TrainingReport,
}

impl ForecastResult {
    pub fn predicted_prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn final_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    pub fn days(&self) -> usize {
        self.points.len()
    }
}

/// Stateless forecasting engine.
///
/// Only configuration is stored. Every call builds, trains and drops its own
/// dataset and model, so one engine can serve many threads at once.
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: EngineConfig,
}

impl ForecastEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Indicator snapshot of `series`
    pub fn compute_indicators(&self, series: &PriceSeries) -> Result<IndicatorSet> {
        IndicatorSet::compute(series, &self.config.indicators)
    }

    /// Trains a fresh LSTM on `series` and forecasts `days` closes
    pub fn forecast(
        &self,
        series: &PriceSeries,
        sentiment_score: f64,
        days: usize,
    ) -> Result<ForecastResult> {
        self.forecast_with_cancel(series, sentiment_score, days, &CancelToken::new())
    }

    pub fn forecast_with_cancel(
        &self,
        series: &PriceSeries,
        sentiment_score: f64,
        days: usize,
        cancel: &CancelToken,
    ) -> Result<ForecastResult> {
        validate_request(sentiment_score, days)?;
        let mut model = LstmRegressor::new(self.config.model.clone())?;
        self.forecast_with_model(&mut model, series, sentiment_score, days, cancel)
    }

    /// Runs the pipeline with a caller-supplied regressor
    pub fn forecast_with_model<M: SequenceRegressor + ?Sized>(
        &self,
        model: &mut M,
        series: &PriceSeries,
        sentiment_score: f64,
        days: usize,
        cancel: &CancelToken,
    ) -> Result<ForecastResult> {
        validate_request(sentiment_score, days)?;
        let started = Instant::now();

        let (current_price, last_date) = match (series.last_close(), series.last_date()) {
            (Some(price), Some(date)) => (price, date),
            _ => {
                return Err(ForecastError::insufficient(
                    self.config.window.min_history(),
                    0,
                ))
            }
        };

        info!(
            "Forecasting {} days for {} from {} closes (sentiment {:+.2})",
            days,
            series.symbol(),
            series.len(),
            sentiment_score
        );

        let dataset = WindowedDataset::prepare(series, &self.config.window)?;
        if dataset.is_degenerate() {
            warn!(
                "{}: trailing window is flat at {}, normalized values fixed at 0.5",
                series.symbol(),
                dataset.scaling().min()
            );
        }

        let training = model.fit(dataset.examples(), cancel)?;

        let prices = AutoregressiveForecaster::new(
            &*model,
            dataset.last_window(),
            sentiment_score,
            days,
            self.config.drift.clone(),
        )?
        .run(dataset.scaling(), cancel)?;

        let assessment = self.config.verdict.assess(&prices, current_price)?;
        let points = forecast_points(last_date, &prices)?;

        info!(
            "{}: {} ({}% confidence, {:+.2}%) in {:.1?}",
            series.symbol(),
            assessment.verdict,
            assessment.confidence,
            assessment.percent_change,
            started.elapsed()
        );

        Ok(ForecastResult {
            symbol: series.symbol().to_string(),
            points,
            verdict: assessment.verdict,
            confidence: assessment.confidence,
            percent_change: assessment.percent_change,
            current_price,
            sentiment_score,
            degenerate: dataset.is_degenerate(),
            training,
        })
    }
}

fn validate_request(sentiment_score: f64, days: usize) -> Result<()> {
    validate_sentiment(sentiment_score)?;
    if days == 0 {
        return Err(ForecastError::InvalidInput(
            "days to predict must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Dates the prices to consecutive days after `last_date`
fn forecast_points(last_date: NaiveDate, prices: &[f64]) -> Result<Vec<ForecastPoint>> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| {
            last_date
                .checked_add_days(Days::new(i as u64 + 1))
                .map(|date| ForecastPoint { date, price })
                .ok_or_else(|| ForecastError::InvalidInput("forecast date overflow".to_string()))
        })
        .collect()
}

//! Multi-step forecasting that feeds predictions back as inputs

use crate::error::{ForecastError, Result};
use crate::forecast::CancelToken;
use crate::model::SequenceRegressor;
use crate::preprocessing::ScalingParameters;
use ndarray::{s, Array1};
use serde::{Deserialize, Serialize};

/// Strength of the sentiment drift added to each predicted step.
///
/// Step `i` (1-based) adds `score * sentiment_scale * i * step_scale` to the
/// raw model output, so the drift compounds over the horizon. Both constants
/// are empirical.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DriftConfig {
    pub sentiment_scale: f64,
    pub step_scale: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            sentiment_scale: 0.05,
            step_scale: 0.01,
        }
    }
}

impl DriftConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.sentiment_scale.is_finite() && self.step_scale.is_finite()) {
            return Err(ForecastError::InvalidInput(
                "drift scales must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// `score * sentiment_scale`
    pub fn sentiment_bias(&self, score: f64) -> f64 {
        score * self.sentiment_scale
    }

    /// Normalized offset added at 1-based `step`
    pub fn step_adjustment(&self, sentiment_bias: f64, step: usize) -> f64 {
        sentiment_bias * step as f64 * self.step_scale
    }
}

/// Checks that a sentiment score lies in `[-1, 1]`
pub fn validate_sentiment(score: f64) -> Result<()> {
    if !score.is_finite() || !(-1.0..=1.0).contains(&score) {
        return Err(ForecastError::InvalidInput(format!(
            "sentiment score must be within [-1, 1], got {}",
            score
        )));
    }
    Ok(())
}

/// One autoregressive step.
///
/// Returns `model(window) + adjustment` and the window shifted left by one
/// with that value appended.
pub fn forecast_step<M: SequenceRegressor + ?Sized>(
    model: &M,
    window: &Array1<f64>,
    adjustment: f64,
) -> (f64, Array1<f64>) {
    let next = model.predict(window) + adjustment;

    let mut shifted = Array1::zeros(window.len());
    if !window.is_empty() {
        let n = window.len();
        shifted.slice_mut(s![..n - 1]).assign(&window.slice(s![1..]));
        shifted[n - 1] = next;
    }

    (next, shifted)
}

/// A single predicted step on the normalized scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastStep {
    /// 1-based position in the horizon
    pub step: usize,
    /// Model output before drift
    pub raw: f64,
    /// Drift added at this step
    pub adjustment: f64,
    /// `raw + adjustment`, fed back into the next window
    pub value: f64,
}

/// Iterator over the steps of one forecast.
///
/// Each step only sees the trailing window, which after the first
/// `window_size` steps consists entirely of earlier predictions.
pub struct AutoregressiveForecaster<'a, M: SequenceRegressor + ?Sized> {
    model: &'a M,
    window: Array1<f64>,
    drift: DriftConfig,
    sentiment_bias: f64,
    horizon: usize,
    step: usize,
}

impl<'a, M: SequenceRegressor + ?Sized> AutoregressiveForecaster<'a, M> {
    pub fn new(
        model: &'a M,
        seed_window: Array1<f64>,
        sentiment_score: f64,
        horizon: usize,
        drift: DriftConfig,
    ) -> Result<Self> {
        validate_sentiment(sentiment_score)?;
        drift.validate()?;
        if horizon == 0 {
            return Err(ForecastError::InvalidInput(
                "forecast horizon must be at least one day".to_string(),
            ));
        }
        if seed_window.is_empty() {
            return Err(ForecastError::InvalidInput(
                "seed window is empty".to_string(),
            ));
        }

        let sentiment_bias = drift.sentiment_bias(sentiment_score);
        Ok(Self {
            model,
            window: seed_window,
            drift,
            sentiment_bias,
            horizon,
            step: 0,
        })
    }

    /// Window the next step will be predicted from
    pub fn window(&self) -> &Array1<f64> {
        &self.window
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.horizon
    }

    /// Runs the remaining steps and denormalizes every value with `scaling`.
    ///
    /// `cancel` is checked before each step.
    pub fn run(mut self, scaling: &ScalingParameters, cancel: &CancelToken) -> Result<Vec<f64>> {
        let mut prices = Vec::with_capacity(self.horizon - self.step);

        while !self.is_finished() {
            cancel.check("forecast")?;
            let Some(step) = self.next() else { break };

            let price = scaling.denormalize(step.value);
            if !step.value.is_finite() || !price.is_finite() {
                return Err(ForecastError::ModelTraining(format!(
                    "non-finite prediction at step {}",
                    step.step
                )));
            }
            prices.push(price);
        }

        Ok(prices)
    }
}

impl<'a, M: SequenceRegressor + ?Sized> Iterator for AutoregressiveForecaster<'a, M> {
    type Item = ForecastStep;

    fn next(&mut self) -> Option<ForecastStep> {
        if self.is_finished() {
            return None;
        }
        self.step += 1;

        let adjustment = self.drift.step_adjustment(self.sentiment_bias, self.step);
        let (value, window) = forecast_step(self.model, &self.window, adjustment);
        self.window = window;

        Some(ForecastStep {
            step: self.step,
            raw: value - adjustment,
            adjustment,
            value,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.horizon - self.step;
        (remaining, Some(remaining))
    }
}

//! Example: from price history to a trading verdict
//!
//! Steps:
//! 1. Build a synthetic daily price history
//! 2. Compute technical indicators
//! 3. Window, normalize and train the LSTM
//! 4. Walk the autoregressive forecast step by step
//! 5. Compare verdicts under different sentiment scores
//!
//! Run: cargo run --example full_pipeline --release

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stock_rnn::forecast::{AutoregressiveForecaster, CancelToken, DriftConfig, ForecastEngine};
use stock_rnn::model::{LstmRegressor, ModelConfig, SequenceRegressor};
use stock_rnn::preprocessing::{WindowConfig, WindowedDataset};
use stock_rnn::utils::{init_logging, EngineConfig};
use stock_rnn::PriceSeries;

/// Random walk with a slight upward drift and a weekly cycle
fn synthetic_series(symbol: &str, days: usize, seed: u64) -> anyhow::Result<PriceSeries> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = 100.0;
    let closes: Vec<f64> = (0..days)
        .map(|i| {
            let shock: f64 = rng.gen_range(-1.0..1.0);
            price *= 1.0 + 0.0005 + 0.012 * shock + 0.003 * (i as f64 * 0.9).sin();
            price
        })
        .collect();

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    Ok(PriceSeries::from_closes(symbol, start, &closes)?)
}

fn main() -> anyhow::Result<()> {
    init_logging("warn");

    println!("==========================================================");
    println!("  Stock RNN - full forecasting pipeline");
    println!("==========================================================");
    println!();

    // Step 1: data
    println!("STEP 1: Price history\n");
    let series = synthetic_series("DEMO", 260, 42)?;
    println!("  Symbol:        {}", series.symbol());
    println!("  Closes:        {}", series.len());
    println!("  Last close:    ${:.2}", series.last_close().unwrap_or_default());
    println!(
        "  Total return:  {:.2}%\n",
        series.total_return_pct().unwrap_or_default()
    );

    // Step 2: indicators
    println!("STEP 2: Technical indicators\n");
    let mut config = EngineConfig::default();
    config.model = ModelConfig::default().with_epochs(30).with_seed(7);
    let engine = ForecastEngine::new(config)?;

    let indicators = engine.compute_indicators(&series)?;
    println!("  SMA 50:        {:?}", indicators.sma_short);
    println!("  SMA 200:       {:?}", indicators.sma_long);
    println!("  RSI 14:        {:.2}", indicators.rsi);
    println!("  Summary:       {}\n", indicators.summary());

    // Step 3: training
    println!("STEP 3: Training\n");
    let dataset = WindowedDataset::prepare(&series, &WindowConfig::default())?;
    println!(
        "  Window:        {} -> 1 ({} examples, range {:.2}..{:.2})",
        dataset.window_size(),
        dataset.examples().len(),
        dataset.scaling().min(),
        dataset.scaling().max()
    );

    let mut model = LstmRegressor::new(engine.config().model.clone())?;
    println!("  Parameters:    {}", model.num_parameters());

    let report = model.fit(dataset.examples(), &CancelToken::new())?;
    println!("  Final loss:    {:.6}", report.final_loss);
    println!("  RMSE:          {:.4}", report.in_sample_rmse);
    println!("  R2:            {:.4}", report.in_sample_r2);
    println!(
        "  Direction:     {:.1}%\n",
        report.directional_accuracy * 100.0
    );

    // Step 4: step-by-step forecast
    println!("STEP 4: Autoregressive forecast (sentiment +0.5)\n");
    let forecaster = AutoregressiveForecaster::new(
        &model,
        dataset.last_window(),
        0.5,
        7,
        DriftConfig::default(),
    )?;
    println!("{:>5} {:>10} {:>12} {:>10} {:>10}", "Step", "Raw", "Adjustment", "Value", "Price");
    for step in forecaster {
        println!(
            "{:>5} {:>10.4} {:>12.6} {:>10.4} {:>10.2}",
            step.step,
            step.raw,
            step.adjustment,
            step.value,
            dataset.scaling().denormalize(step.value)
        );
    }
    println!();

    // Step 5: sentiment scenarios
    println!("STEP 5: Verdicts by sentiment\n");
    println!("{:>10} {:>8} {:>12} {:>10}", "Sentiment", "Verdict", "Confidence", "Change");
    for score in [-1.0, 0.0, 1.0] {
        let forecast = engine.forecast(&series, score, 7)?;
        println!(
            "{:>10.1} {:>8} {:>11}% {:>9.2}%",
            score, forecast.verdict, forecast.confidence, forecast.percent_change
        );
    }

    println!("\nConfidence is a heuristic score, not a probability.");
    Ok(())
}

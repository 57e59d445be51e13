//! Example: parallel analysis of several symbols
//!
//! Each symbol is fetched, scored and forecast on its own worker. A missing
//! symbol fails alone without affecting the others.
//!
//! Run: cargo run --example compare_symbols --release

use chrono::NaiveDate;
use stock_rnn::analysis::{analyze_symbols, compare};
use stock_rnn::data::StaticHistoryProvider;
use stock_rnn::model::ModelConfig;
use stock_rnn::sentiment::{SentimentSignal, StaticSentimentProvider};
use stock_rnn::utils::{init_logging, EngineConfig};
use stock_rnn::{ForecastEngine, PriceSeries};

fn series(symbol: &str, closes: Vec<f64>) -> anyhow::Result<PriceSeries> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    Ok(PriceSeries::from_closes(symbol, start, &closes)?)
}

fn main() -> anyhow::Result<()> {
    init_logging("info");

    let history = StaticHistoryProvider::new()
        .with_series(series(
            "STEADY",
            (0..120).map(|i| 50.0 + i as f64 * 0.1 + (i as f64 * 0.4).sin() * 0.3).collect(),
        )?)
        .with_series(series(
            "SWING",
            (0..120).map(|i| 80.0 + (i as f64 * 0.25).sin() * 8.0).collect(),
        )?)
        .with_series(series("FLAT", vec![25.0; 90])?);

    let sentiment = StaticSentimentProvider::new()
        .with_signal("STEADY", SentimentSignal::new(0.6, "Strong quarterly guidance")?)
        .with_signal("SWING", SentimentSignal::new(-0.4, "Sector headwinds")?);

    let mut config = EngineConfig::default();
    config.model = ModelConfig::default().with_epochs(20).with_seed(11);
    config.request_timeout_secs = Some(120);
    let engine = ForecastEngine::new(config)?;

    let symbols: Vec<String> = ["STEADY", "SWING", "FLAT", "GHOST"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let results = analyze_symbols(&engine, &history, &sentiment, &symbols, 10);

    println!("\n{:<8} {:>8} {:>11} {:>9} {:>10}", "Symbol", "Verdict", "Confidence", "Change", "Sentiment");
    println!("{}", "-".repeat(50));
    let mut analyses = Vec::new();
    for (symbol, result) in results {
        match result {
            Ok(analysis) => {
                println!(
                    "{:<8} {:>8} {:>10}% {:>8.2}% {:>10.2}",
                    symbol,
                    analysis.forecast.verdict,
                    analysis.forecast.confidence,
                    analysis.forecast.percent_change,
                    analysis.sentiment.score
                );
                analyses.push(analysis);
            }
            Err(e) => println!("{:<8} failed: {}", symbol, e),
        }
    }

    if let [first, second, ..] = analyses.as_slice() {
        let comparison = compare(first, second);
        println!("\n{} vs {}", comparison.first, comparison.second);
        println!("  Stronger forecast: {}", comparison.stronger_forecast);
        println!(
            "  More volatile:     {}",
            comparison.more_volatile.as_deref().unwrap_or("n/a")
        );
    }

    Ok(())
}

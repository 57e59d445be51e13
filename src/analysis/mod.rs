//! # Symbol analysis
//!
//! Full per-symbol pipeline (history, indicators, sentiment, forecast),
//! parallel analysis of several symbols and a two-symbol comparison.
//!
//! Symbols are independent: each runs on its own rayon worker with its own
//! [`CancelToken`], so one slow or failing symbol does not affect the rest.

use crate::data::HistoryProvider;
use crate::error::{ForecastError, Result};
use crate::forecast::{CancelToken, ForecastEngine, ForecastResult, Verdict};
use crate::indicators::IndicatorSet;
use crate::sentiment::{resolve_sentiment, SentimentProvider, SentimentSignal};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info, warn};

/// Everything computed for one symbol
#[derive(Debug, Clone, Serialize)]
pub struct SymbolAnalysis {
    pub symbol: String,
    /// `None` when the history is too short for the RSI but long enough
    /// to forecast
    pub indicators: Option<IndicatorSet>,
    pub sentiment: SentimentSignal,
    pub forecast: ForecastResult,
}

/// Runs the whole pipeline for one symbol.
///
/// Provider failures surface as `ExternalDataUnavailable`; a missing
/// sentiment falls back to neutral. A history that only covers the forecast
/// window (fewer than `rsi_period + 1` closes) is still forecast, without
/// indicators.
pub fn analyze_symbol(
    engine: &ForecastEngine,
    history: &dyn HistoryProvider,
    sentiment: &dyn SentimentProvider,
    symbol: &str,
    days: usize,
    cancel: &CancelToken,
) -> Result<SymbolAnalysis> {
    let series = history.fetch_history(symbol)?;
    let indicators = match engine.compute_indicators(&series) {
        Ok(indicators) => Some(indicators),
        Err(ForecastError::InsufficientData {
            required,
            available,
        }) => {
            warn!(
                "{}: indicators skipped, need {} closes, got {}",
                series.symbol(),
                required,
                available
            );
            None
        }
        Err(e) => return Err(e),
    };
    let signal = resolve_sentiment(sentiment, symbol);

    cancel.check("analysis")?;
    let forecast = engine.forecast_with_cancel(&series, signal.score, days, cancel)?;

    Ok(SymbolAnalysis {
        symbol: series.symbol().to_string(),
        indicators,
        sentiment: signal,
        forecast,
    })
}

/// Analyzes every symbol in parallel, keeping input order.
///
/// Each symbol gets a fresh token bounded by the engine's request timeout.
pub fn analyze_symbols(
    engine: &ForecastEngine,
    history: &dyn HistoryProvider,
    sentiment: &dyn SentimentProvider,
    symbols: &[String],
    days: usize,
) -> Vec<(String, Result<SymbolAnalysis>)> {
    info!("Analyzing {} symbols", symbols.len());

    symbols
        .par_iter()
        .map(|symbol| {
            let cancel = engine.config().cancel_token();
            let result = analyze_symbol(engine, history, sentiment, symbol, days, &cancel);
            if let Err(e) = &result {
                error!("{}: {}", symbol, e);
            }
            (symbol.clone(), result)
        })
        .collect()
}

/// Side-by-side reading of two analyses
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub first: String,
    pub second: String,
    /// Symbol with the larger predicted percent change
    pub stronger_forecast: String,
    /// Symbol with the higher annualized volatility, when both are known
    pub more_volatile: Option<String>,
    pub first_verdict: Verdict,
    pub second_verdict: Verdict,
    pub first_change_pct: f64,
    pub second_change_pct: f64,
}

/// Compares two analyses. Ties favour `first`.
pub fn compare(first: &SymbolAnalysis, second: &SymbolAnalysis) -> Comparison {
    let a = first.forecast.percent_change;
    let b = second.forecast.percent_change;
    let stronger_forecast = if b > a { &second.symbol } else { &first.symbol };

    let volatility = |a: &SymbolAnalysis| a.indicators.as_ref().and_then(|i| i.volatility);
    let more_volatile = match (volatility(first), volatility(second)) {
        (Some(va), Some(vb)) => Some(if vb > va { &second.symbol } else { &first.symbol }),
        _ => None,
    };

    Comparison {
        first: first.symbol.clone(),
        second: second.symbol.clone(),
        stronger_forecast: stronger_forecast.clone(),
        more_volatile: more_volatile.cloned(),
        first_verdict: first.forecast.verdict,
        second_verdict: second.forecast.verdict,
        first_change_pct: a,
        second_change_pct: b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PriceSeries, StaticHistoryProvider};
    use crate::error::ForecastError;
    use crate::model::ModelConfig;
    use crate::sentiment::StaticSentimentProvider;
    use crate::utils::EngineConfig;
    use chrono::NaiveDate;

    fn engine() -> ForecastEngine {
        let mut config = EngineConfig::default();
        config.model = ModelConfig::small().with_epochs(2).with_seed(8);
        ForecastEngine::new(config).unwrap()
    }

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_closes(symbol, start, closes).unwrap()
    }

    fn provider() -> StaticHistoryProvider {
        let calm: Vec<f64> = (0..70).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let wild: Vec<f64> = (0..70).map(|i| 50.0 + (i as f64 * 0.9).sin() * 10.0).collect();
        StaticHistoryProvider::new()
            .with_series(series("CALM", &calm))
            .with_series(series("WILD", &wild))
    }

    #[test]
    fn test_analyze_symbols_keeps_order_and_isolates_failures() {
        let symbols: Vec<String> = ["CALM", "MISSING", "WILD"].iter().map(|s| s.to_string()).collect();
        let results = analyze_symbols(
            &engine(),
            &provider(),
            &StaticSentimentProvider::new(),
            &symbols,
            3,
        );

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, "CALM");
        assert!(results[0].1.is_ok());
        assert!(matches!(
            results[1].1,
            Err(ForecastError::ExternalDataUnavailable(_))
        ));
        assert!(results[2].1.is_ok());

        let calm = results[0].1.as_ref().unwrap();
        assert_eq!(calm.forecast.days(), 3);
        assert!(!calm.sentiment.available);
    }

    #[test]
    fn test_compare() {
        let engine = engine();
        let history = provider();
        let sentiment = StaticSentimentProvider::new();
        let cancel = CancelToken::new();

        let calm = analyze_symbol(&engine, &history, &sentiment, "CALM", 5, &cancel).unwrap();
        let wild = analyze_symbol(&engine, &history, &sentiment, "WILD", 5, &cancel).unwrap();

        let comparison = compare(&calm, &wild);
        assert_eq!(comparison.more_volatile.as_deref(), Some("WILD"));
        assert_eq!(comparison.first, "CALM");
        assert_eq!(comparison.first_verdict, calm.forecast.verdict);

        let expected = if wild.forecast.percent_change > calm.forecast.percent_change {
            "WILD"
        } else {
            "CALM"
        };
        assert_eq!(comparison.stronger_forecast, expected);
    }

    #[test]
    fn test_short_history_is_forecast_without_indicators() {
        let closes: Vec<f64> = (0..10).map(|i| 20.0 + (i % 3) as f64).collect();
        let history = provider().with_series(series("YOUNG", &closes));
        let sentiment = StaticSentimentProvider::new();
        let cancel = CancelToken::new();
        let engine = engine();

        let young = analyze_symbol(&engine, &history, &sentiment, "YOUNG", 4, &cancel).unwrap();
        assert!(young.indicators.is_none());
        assert_eq!(young.forecast.days(), 4);

        let calm = analyze_symbol(&engine, &history, &sentiment, "CALM", 4, &cancel).unwrap();
        assert!(calm.indicators.is_some());
        assert_eq!(compare(&calm, &young).more_volatile, None);

        let tiny = provider().with_series(series("TINY", &[1.0, 2.0, 3.0]));
        assert!(matches!(
            analyze_symbol(&engine, &tiny, &sentiment, "TINY", 4, &cancel),
            Err(ForecastError::InsufficientData { .. })
        ));
    }
}

//! # Sentiment signals
//!
//! Sentiment comes from an external collaborator (news analysed by an LLM).
//! The engine only sees a score in `[-1, 1]` with a free-text rationale.
//! A failing provider never fails a forecast: [`resolve_sentiment`] falls
//! back to a neutral, clearly labelled signal.

mod parser;

pub use parser::parse_sentiment_reply;

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Score in `[-1, 1]` with its rationale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSignal {
    pub score: f64,
    pub rationale: String,
    /// `false` when the signal is the neutral fallback
    pub available: bool,
}

impl SentimentSignal {
    /// Clamps `score` into `[-1, 1]`; non-finite scores are rejected
    pub fn new(score: f64, rationale: impl Into<String>) -> Result<Self> {
        if !score.is_finite() {
            return Err(ForecastError::InvalidInput(format!(
                "sentiment score must be finite, got {}",
                score
            )));
        }
        Ok(Self {
            score: score.clamp(-1.0, 1.0),
            rationale: rationale.into(),
            available: true,
        })
    }

    /// Neutral fallback used when no sentiment could be obtained
    pub fn unavailable(reason: impl std::fmt::Display) -> Self {
        Self {
            score: 0.0,
            rationale: format!("Sentiment unavailable: {}", reason),
            available: false,
        }
    }
}

/// Source of sentiment for a symbol
pub trait SentimentProvider: Send + Sync {
    fn sentiment(&self, symbol: &str) -> Result<SentimentSignal>;
}

/// Fixed scores keyed by upper-case symbol
#[derive(Debug, Clone, Default)]
pub struct StaticSentimentProvider {
    signals: HashMap<String, SentimentSignal>,
}

impl StaticSentimentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signal(mut self, symbol: &str, signal: SentimentSignal) -> Self {
        self.signals.insert(symbol.trim().to_uppercase(), signal);
        self
    }
}

impl SentimentProvider for StaticSentimentProvider {
    fn sentiment(&self, symbol: &str) -> Result<SentimentSignal> {
        self.signals
            .get(&symbol.trim().to_uppercase())
            .cloned()
            .ok_or_else(|| {
                ForecastError::ExternalDataUnavailable(format!("no sentiment for {}", symbol))
            })
    }
}

/// Reads stored LLM replies from `<dir>/<SYMBOL>.txt`
#[derive(Debug, Clone)]
pub struct ReplyFileSentimentProvider {
    dir: PathBuf,
}

impl ReplyFileSentimentProvider {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl SentimentProvider for ReplyFileSentimentProvider {
    fn sentiment(&self, symbol: &str) -> Result<SentimentSignal> {
        let path = self
            .dir
            .join(format!("{}.txt", symbol.trim().to_uppercase()));
        debug!("Reading sentiment reply {}", path.display());

        let text = std::fs::read_to_string(&path).map_err(|e| {
            ForecastError::ExternalDataUnavailable(format!("{}: {}", path.display(), e))
        })?;
        parse_sentiment_reply(&text)
    }
}

/// Queries `provider`, falling back to neutral sentiment on any error.
///
/// This is the only place where an error is swallowed; the fallback is
/// logged and flagged through [`SentimentSignal::available`].
pub fn resolve_sentiment(provider: &dyn SentimentProvider, symbol: &str) -> SentimentSignal {
    match provider.sentiment(symbol) {
        Ok(signal) => signal,
        Err(e) => {
            warn!("Sentiment for {} unavailable, using neutral: {}", symbol, e);
            SentimentSignal::unavailable(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_signal_clamps() {
        assert_eq!(SentimentSignal::new(-4.0, "panic").unwrap().score, -1.0);
        assert_eq!(SentimentSignal::new(0.25, "calm").unwrap().score, 0.25);
        assert!(SentimentSignal::new(f64::NAN, "").is_err());
    }

    #[test]
    fn test_static_provider() {
        let provider = StaticSentimentProvider::new()
            .with_signal("aapl", SentimentSignal::new(0.3, "new product").unwrap());

        assert_eq!(provider.sentiment("AAPL").unwrap().score, 0.3);
        assert!(provider.sentiment("MSFT").is_err());
    }

    #[test]
    fn test_reply_file_provider() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("TSLA.txt"),
            "```json\n{\"score\": -0.5, \"reasoning\": \"Delivery miss\"}\n```",
        )
        .unwrap();
        std::fs::write(dir.path().join("NVDA.txt"), "no idea").unwrap();

        let provider = ReplyFileSentimentProvider::new(dir.path());
        let signal = provider.sentiment("tsla").unwrap();
        assert_eq!(signal.score, -0.5);
        assert_eq!(signal.rationale, "Delivery miss");

        assert!(provider.sentiment("NVDA").is_err());
        assert!(provider.sentiment("AMZN").is_err());
    }

    #[test]
    fn test_resolve_falls_back_to_neutral() {
        let provider = StaticSentimentProvider::new();
        let signal = resolve_sentiment(&provider, "GOOG");

        assert_eq!(signal.score, 0.0);
        assert!(!signal.available);
        assert!(signal.rationale.starts_with("Sentiment unavailable: "));
        assert!(signal.rationale.contains("GOOG"));
    }
}

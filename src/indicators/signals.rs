//! Qualitative summary of the indicator readings

use serde::{Deserialize, Serialize};
use std::fmt;

/// RSI above this level reads as overbought
pub const RSI_OVERBOUGHT: f64 = 70.0;
/// RSI below this level reads as oversold
pub const RSI_OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnicalSignal {
    Overbought,
    Oversold,
    Neutral,
    BullishCrossover,
    BearishCrossover,
    Strong,
    Weak,
}

impl TechnicalSignal {
    /// Long-form explanation shown to end users
    pub fn description(&self) -> &'static str {
        match self {
            TechnicalSignal::Overbought => "Overbought (High Risk)",
            TechnicalSignal::Oversold => "Oversold (Potential Buy)",
            TechnicalSignal::Neutral => "RSI Neutral",
            TechnicalSignal::BullishCrossover => "Golden Cross (Bullish/Uptrend)",
            TechnicalSignal::BearishCrossover => "Death Cross (Bearish/Downtrend)",
            TechnicalSignal::Strong => "Price above 50-day avg (Strong)",
            TechnicalSignal::Weak => "Price below 50-day avg (Weak)",
        }
    }
}

impl fmt::Display for TechnicalSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TechnicalSignal::Overbought => "overbought",
            TechnicalSignal::Oversold => "oversold",
            TechnicalSignal::Neutral => "neutral",
            TechnicalSignal::BullishCrossover => "bullish crossover",
            TechnicalSignal::BearishCrossover => "bearish crossover",
            TechnicalSignal::Strong => "strong",
            TechnicalSignal::Weak => "weak",
        };
        write!(f, "{}", label)
    }
}

/// Ordered signals: RSI reading, then the 50/200 crossover (only when both
/// averages exist), then price against the 50-day average.
///
/// Exact equality in either comparison emits nothing.
pub fn qualitative_signals(
    current_price: f64,
    sma_short: Option<f64>,
    sma_long: Option<f64>,
    rsi: f64,
) -> Vec<TechnicalSignal> {
    let mut signals = Vec::with_capacity(3);

    signals.push(if rsi > RSI_OVERBOUGHT {
        TechnicalSignal::Overbought
    } else if rsi < RSI_OVERSOLD {
        TechnicalSignal::Oversold
    } else {
        TechnicalSignal::Neutral
    });

    if let (Some(short), Some(long)) = (sma_short, sma_long) {
        if short > long {
            signals.push(TechnicalSignal::BullishCrossover);
        } else if short < long {
            signals.push(TechnicalSignal::BearishCrossover);
        }
    }

    if let Some(short) = sma_short {
        if current_price > short {
            signals.push(TechnicalSignal::Strong);
        } else if current_price < short {
            signals.push(TechnicalSignal::Weak);
        }
    }

    signals
}

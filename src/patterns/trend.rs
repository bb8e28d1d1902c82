/// Daily trend from a fast/slow simple moving average crossover

use crate::models::Bar;
use serde::Serialize;
use std::fmt;

pub const FAST_SMA_PERIOD: usize = 10;
pub const SLOW_SMA_PERIOD: usize = 20;
/// Bars required before a trend is reported
pub const MIN_TREND_BARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Bullish => "Bullish",
            Trend::Bearish => "Bearish",
            Trend::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calculate Simple Moving Average (SMA) over the trailing `period` values
pub fn calculate_sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }

    let sum: f64 = values.iter().rev().take(period).sum();
    Some(sum / period as f64)
}

/// Bullish when SMA10 of closes is above SMA20, Bearish otherwise
pub fn detect_daily_trend(bars: &[Bar]) -> Trend {
    if bars.len() < MIN_TREND_BARS {
        return Trend::Neutral;
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    match (
        calculate_sma(&closes, FAST_SMA_PERIOD),
        calculate_sma(&closes, SLOW_SMA_PERIOD),
    ) {
        (Some(fast), Some(slow)) if fast > slow => Trend::Bullish,
        _ => Trend::Bearish,
    }
}

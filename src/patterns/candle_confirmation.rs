use super::MIN_PATTERN_BARS;
use crate::models::Bar;
use serde::Serialize;
use std::fmt;

/// Close of the prior bar breaking the range of the bar before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CandleConfirmation {
    #[serde(rename = "Bullish CC")]
    Bullish,
    #[serde(rename = "Bearish CC")]
    Bearish,
    #[serde(rename = "")]
    None,
}

impl CandleConfirmation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandleConfirmation::Bullish => "Bullish CC",
            CandleConfirmation::Bearish => "Bearish CC",
            CandleConfirmation::None => "",
        }
    }
}

impl fmt::Display for CandleConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare the second-to-last close against the third-to-last bar's range
///
/// The latest bar is ignored because it may still be forming.
pub fn detect_candle_confirmation(bars: &[Bar]) -> CandleConfirmation {
    if bars.len() < MIN_PATTERN_BARS {
        return CandleConfirmation::None;
    }

    let prior = &bars[bars.len() - 2];
    let before = &bars[bars.len() - 3];

    if prior.close > before.high {
        CandleConfirmation::Bullish
    } else if prior.close < before.low {
        CandleConfirmation::Bearish
    } else {
        CandleConfirmation::None
    }
}

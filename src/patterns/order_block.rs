use super::MIN_PATTERN_BARS;
use crate::models::Bar;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderBlock {
    #[serde(rename = "Bullish OB Confirmed")]
    Bullish,
    #[serde(rename = "Bearish OB Confirmed")]
    Bearish,
    #[serde(rename = "")]
    None,
}

impl OrderBlock {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBlock::Bullish => "Bullish OB Confirmed",
            OrderBlock::Bearish => "Bearish OB Confirmed",
            OrderBlock::None => "",
        }
    }
}

impl fmt::Display for OrderBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opposite-colour bar followed by a bar that breaks its extreme
///
/// Bullish: down bar, then an up bar with a higher high.
/// Bearish: up bar, then a down bar with a lower low.
/// Uses the third- and second-to-last bars.
pub fn detect_order_block(bars: &[Bar]) -> OrderBlock {
    if bars.len() < MIN_PATTERN_BARS {
        return OrderBlock::None;
    }

    let p = &bars[bars.len() - 2];
    let b = &bars[bars.len() - 3];

    if p.is_up() && b.is_down() && p.high > b.high {
        OrderBlock::Bullish
    } else if p.is_down() && b.is_up() && p.low < b.low {
        OrderBlock::Bearish
    } else {
        OrderBlock::None
    }
}

use super::MIN_PATTERN_BARS;
use crate::models::Bar;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FairValueGap {
    #[serde(rename = "Bullish FVG Confirmed")]
    Bullish,
    #[serde(rename = "Bearish FVG Confirmed")]
    Bearish,
    #[serde(rename = "")]
    None,
}

impl FairValueGap {
    pub fn as_str(&self) -> &'static str {
        match self {
            FairValueGap::Bullish => "Bullish FVG Confirmed",
            FairValueGap::Bearish => "Bearish FVG Confirmed",
            FairValueGap::None => "",
        }
    }
}

impl fmt::Display for FairValueGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gap between the latest bar and the bar two before it
pub fn detect_fair_value_gap(bars: &[Bar]) -> FairValueGap {
    if bars.len() < MIN_PATTERN_BARS {
        return FairValueGap::None;
    }

    let last = &bars[bars.len() - 1];
    let two_back = &bars[bars.len() - 3];

    if last.low > two_back.high {
        FairValueGap::Bullish
    } else if last.high < two_back.low {
        FairValueGap::Bearish
    } else {
        FairValueGap::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_support::bars;

    const MIDDLE: (f64, f64, f64, f64) = (1.10, 1.15, 1.05, 1.12);

    #[test]
    fn test_bullish_gap() {
        let series = bars(&[(1.09, 1.10, 1.08, 1.095), MIDDLE, (1.12, 1.14, 1.11, 1.13)]);
        assert_eq!(detect_fair_value_gap(&series), FairValueGap::Bullish);
    }

    #[test]
    fn test_bearish_gap() {
        let series = bars(&[(1.12, 1.13, 1.11, 1.115), MIDDLE, (1.10, 1.105, 1.08, 1.09)]);
        assert_eq!(detect_fair_value_gap(&series), FairValueGap::Bearish);
    }

    #[test]
    fn test_overlap_is_not_a_gap() {
        let series = bars(&[(1.09, 1.10, 1.08, 1.095), MIDDLE, (1.10, 1.12, 1.10, 1.11)]);
        assert_eq!(detect_fair_value_gap(&series), FairValueGap::None);
    }

    #[test]
    fn test_insufficient_bars() {
        let series = bars(&[(1.09, 1.10, 1.08, 1.095), (1.12, 1.14, 1.11, 1.13)]);
        assert_eq!(detect_fair_value_gap(&series), FairValueGap::None);
        assert_eq!(FairValueGap::None.to_string(), "");
    }
}

use super::MIN_PATTERN_BARS;
use crate::models::Bar;
use serde::Serialize;
use std::fmt;

/// Relationship between the latest daily bar and the one before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriorDayPattern {
    #[serde(rename = "Bullish Engulfing")]
    BullishEngulfing,
    #[serde(rename = "Bearish Engulfing")]
    BearishEngulfing,
    #[serde(rename = "Bullish HH/HL")]
    BullishHigherHighLow,
    #[serde(rename = "Bearish LH/LL")]
    BearishLowerHighLow,
    Other,
}

impl PriorDayPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorDayPattern::BullishEngulfing => "Bullish Engulfing",
            PriorDayPattern::BearishEngulfing => "Bearish Engulfing",
            PriorDayPattern::BullishHigherHighLow => "Bullish HH/HL",
            PriorDayPattern::BearishLowerHighLow => "Bearish LH/LL",
            PriorDayPattern::Other => "Other",
        }
    }
}

impl fmt::Display for PriorDayPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the last two bars
///
/// Rules are checked in order and the first match wins, so an engulfing bar
/// that also makes a higher high and higher low is reported as engulfing.
pub fn detect_prior_day_pattern(bars: &[Bar]) -> PriorDayPattern {
    if bars.len() < MIN_PATTERN_BARS {
        return PriorDayPattern::Other;
    }

    let today = &bars[bars.len() - 1];
    let yesterday = &bars[bars.len() - 2];

    if yesterday.is_down()
        && today.is_up()
        && today.open < yesterday.close
        && today.close > yesterday.open
    {
        return PriorDayPattern::BullishEngulfing;
    }

    if yesterday.is_up()
        && today.is_down()
        && today.open > yesterday.close
        && today.close < yesterday.open
    {
        return PriorDayPattern::BearishEngulfing;
    }

    if today.high > yesterday.high && today.low > yesterday.low {
        return PriorDayPattern::BullishHigherHighLow;
    }

    if today.high < yesterday.high && today.low < yesterday.low {
        return PriorDayPattern::BearishLowerHighLow;
    }

    PriorDayPattern::Other
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_support::bars;

    const FILLER: (f64, f64, f64, f64) = (1.1000, 1.1100, 1.0900, 1.1050);

    #[test]
    fn test_bullish_engulfing() {
        let series = bars(&[
            FILLER,
            (1.1200, 1.1210, 1.0990, 1.1000), // yesterday: down
            (1.0950, 1.1260, 1.0940, 1.1250), // today: up, engulfs
        ]);
        assert_eq!(
            detect_prior_day_pattern(&series),
            PriorDayPattern::BullishEngulfing
        );
    }

    #[test]
    fn test_engulfing_wins_over_higher_high_higher_low() {
        // today also has a higher high and higher low than yesterday
        let series = bars(&[
            FILLER,
            (1.1200, 1.1220, 1.0900, 1.1000),
            (1.0950, 1.1300, 1.0940, 1.1250),
        ]);
        let today = &series[2];
        let yesterday = &series[1];
        assert!(today.high > yesterday.high && today.low > yesterday.low);
        assert_eq!(
            detect_prior_day_pattern(&series),
            PriorDayPattern::BullishEngulfing
        );
    }

    #[test]
    fn test_bearish_engulfing() {
        let series = bars(&[
            FILLER,
            (1.1000, 1.1210, 1.0990, 1.1200), // yesterday: up
            (1.1250, 1.1260, 1.0940, 1.0950), // today: down, engulfs
        ]);
        assert_eq!(
            detect_prior_day_pattern(&series),
            PriorDayPattern::BearishEngulfing
        );
    }

    #[test]
    fn test_higher_high_higher_low() {
        let series = bars(&[
            FILLER,
            (1.1000, 1.1100, 1.0950, 1.1050),
            (1.1050, 1.1150, 1.1000, 1.1120),
        ]);
        assert_eq!(
            detect_prior_day_pattern(&series),
            PriorDayPattern::BullishHigherHighLow
        );
    }

    #[test]
    fn test_lower_high_lower_low() {
        let series = bars(&[
            FILLER,
            (1.1050, 1.1100, 1.0950, 1.1000),
            (1.1000, 1.1050, 1.0900, 1.0920),
        ]);
        assert_eq!(
            detect_prior_day_pattern(&series),
            PriorDayPattern::BearishLowerHighLow
        );
    }

    #[test]
    fn test_inside_bar_is_other() {
        let series = bars(&[
            FILLER,
            (1.1000, 1.1200, 1.0900, 1.1100),
            (1.1050, 1.1150, 1.0950, 1.1080),
        ]);
        assert_eq!(detect_prior_day_pattern(&series), PriorDayPattern::Other);
    }

    #[test]
    fn test_insufficient_bars() {
        let series = bars(&[
            (1.1200, 1.1210, 1.0990, 1.1000),
            (1.0950, 1.1260, 1.0940, 1.1250),
        ]);
        assert_eq!(detect_prior_day_pattern(&series), PriorDayPattern::Other);
        assert_eq!(detect_prior_day_pattern(&[]), PriorDayPattern::Other);
    }

    #[test]
    fn test_label_strings() {
        assert_eq!(PriorDayPattern::BullishHigherHighLow.as_str(), "Bullish HH/HL");
        assert_eq!(PriorDayPattern::BearishLowerHighLow.as_str(), "Bearish LH/LL");
        assert_eq!(PriorDayPattern::Other.to_string(), "Other");
    }
}

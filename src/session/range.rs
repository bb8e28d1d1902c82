/// Session and daily range aggregation in pips
///
/// All ranges are `(max high - min low) * pip_multiplier`, rounded half-up to one
/// decimal. Empty or short input yields `0.0`.

use super::classifier::{classify, Session};
use crate::models::{Bar, BarSeries};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// CBDR ranges below this are ideal
pub const CBDR_IDEAL_MAX_PIPS: f64 = 40.0;
/// Asian ranges above this are delayed protraction
pub const ASIAN_DELAYED_MIN_PIPS: f64 = 40.0;
pub const ASIAN_IDEAL_MIN_PIPS: f64 = 20.0;
pub const ASIAN_IDEAL_MAX_PIPS: f64 = 30.0;
/// Daily bars averaged for the ADR
pub const ADR_DAYS: usize = 5;

/// Round half-up to one decimal place
pub fn round_pips(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

fn range_pips<'a>(bars: impl Iterator<Item = &'a Bar>, multiplier: f64) -> f64 {
    let mut high = f64::NEG_INFINITY;
    let mut low = f64::INFINITY;
    let mut seen = false;

    for bar in bars {
        high = high.max(bar.high);
        low = low.min(bar.low);
        seen = true;
    }

    if !seen {
        return 0.0;
    }

    round_pips((high - low) * multiplier)
}

/// Range in pips of the bars on `date` that fall in `session`
pub fn session_range(series: &BarSeries, date: NaiveDate, session: Session) -> f64 {
    let multiplier = series.instrument().pip_multiplier();
    range_pips(
        series
            .bars()
            .iter()
            .filter(|bar| bar.date() == date && classify(&bar.timestamp) == session),
        multiplier,
    )
}

/// High-low range of the second-to-last daily bar
pub fn prior_day_range(daily: &BarSeries) -> f64 {
    let bars = daily.bars();
    if bars.len() < 2 {
        return 0.0;
    }

    let prior = &bars[bars.len() - 2];
    round_pips((prior.high - prior.low) * daily.instrument().pip_multiplier())
}

/// Average daily range over the `days` bars preceding the most recent bar
///
/// The most recent bar may still be forming, so it is excluded.
pub fn average_daily_range(daily: &BarSeries, days: usize) -> f64 {
    let bars = daily.bars();
    if days == 0 || bars.len() < days + 1 {
        return 0.0;
    }

    let end = bars.len() - 1;
    let window = &bars[end - days..end];
    let mean = window.iter().map(|b| b.high - b.low).sum::<f64>() / days as f64;

    round_pips(mean * daily.instrument().pip_multiplier())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CbdrStatus {
    #[serde(rename = "Ideal")]
    Ideal,
    #[serde(rename = "")]
    None,
}

impl CbdrStatus {
    pub fn from_range(pips: f64) -> Self {
        if pips < CBDR_IDEAL_MAX_PIPS {
            CbdrStatus::Ideal
        } else {
            CbdrStatus::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CbdrStatus::Ideal => "Ideal",
            CbdrStatus::None => "",
        }
    }
}

impl fmt::Display for CbdrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AsianStatus {
    #[serde(rename = "Delayed Protraction")]
    DelayedProtraction,
    #[serde(rename = "Ideal")]
    Ideal,
    #[serde(rename = "")]
    None,
}

impl AsianStatus {
    pub fn from_range(pips: f64) -> Self {
        if pips > ASIAN_DELAYED_MIN_PIPS {
            AsianStatus::DelayedProtraction
        } else if (ASIAN_IDEAL_MIN_PIPS..=ASIAN_IDEAL_MAX_PIPS).contains(&pips) {
            AsianStatus::Ideal
        } else {
            AsianStatus::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AsianStatus::DelayedProtraction => "Delayed Protraction",
            AsianStatus::Ideal => "Ideal",
            AsianStatus::None => "",
        }
    }
}

impl fmt::Display for AsianStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Zone every bar timestamp is reported in (the provider is asked for New York time)
pub const REFERENCE_TZ: Tz = chrono_tz::America::New_York;

/// One OHLC observation
///
/// `low <= open, close <= high` is expected but never enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Tz>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(timestamp: DateTime<Tz>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: 0,
        }
    }

    pub fn is_up(&self) -> bool {
        self.close > self.open
    }

    pub fn is_down(&self) -> bool {
        self.close < self.open
    }

    /// Calendar date of the bar in the reference zone
    pub fn date(&self) -> NaiveDate {
        self.timestamp.with_timezone(&REFERENCE_TZ).date_naive()
    }
}

/// Parse a provider timestamp into the reference zone
///
/// Accepts RFC 3339 strings, `YYYY-MM-DD HH:MM:SS` and bare `YYYY-MM-DD` dates;
/// naive values are read as reference-zone local time. Local times that fall
/// in a DST gap resolve to `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&REFERENCE_TZ));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    REFERENCE_TZ.from_local_datetime(&naive).earliest()
}

/// Bar timeframes requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1day")]
    Daily,
    #[serde(rename = "4h")]
    FourHour,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "5min")]
    FiveMinute,
}

impl Timeframe {
    /// Interval string used on the wire
    pub fn interval(&self) -> &'static str {
        match self {
            Timeframe::Daily => "1day",
            Timeframe::FourHour => "4h",
            Timeframe::OneHour => "1h",
            Timeframe::FiveMinute => "5min",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.interval())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1day" | "1D" | "daily" => Ok(Timeframe::Daily),
            "4h" | "240min" => Ok(Timeframe::FourHour),
            "1h" | "60min" => Ok(Timeframe::OneHour),
            "5min" | "5m" => Ok(Timeframe::FiveMinute),
            other => Err(format!("Unknown timeframe: {}", other)),
        }
    }
}

/// A currency pair such as EUR/USD
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Instrument {
    base: String,
    quote: String,
}

impl Instrument {
    pub fn new(base: &str, quote: &str) -> Self {
        Self {
            base: base.to_uppercase(),
            quote: quote.to_uppercase(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// Provider-facing pair name, e.g. `EUR/USD`
    pub fn pair(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }

    /// Slash-free symbol used as the row key, e.g. `EURUSD`
    pub fn symbol(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }

    /// Multiplier converting a raw price difference into pips
    pub fn pip_multiplier(&self) -> f64 {
        if self.quote == "JPY" {
            100.0
        } else {
            10_000.0
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for Instrument {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (base, quote) = match s.split_once('/') {
            Some(parts) => parts,
            None if s.len() == 6 && s.is_ascii() => s.split_at(3),
            None => return Err(format!("Invalid currency pair: {}", s)),
        };

        if is_currency_code(base) && is_currency_code(quote) {
            Ok(Instrument::new(base, quote))
        } else {
            Err(format!("Invalid currency pair: {}", s))
        }
    }
}

fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

impl TryFrom<String> for Instrument {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Instrument> for String {
    fn from(instrument: Instrument) -> Self {
        instrument.pair()
    }
}

/// Bars for one instrument and one timeframe, strictly increasing by timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    instrument: Instrument,
    timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series from bars in any order
    ///
    /// Bars are sorted oldest first; when two bars share a timestamp the later one wins.
    pub fn new(instrument: Instrument, timeframe: Timeframe, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.timestamp == bar.timestamp => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            instrument,
            timeframe,
            bars: deduped,
        }
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// The `n` most recent bars, oldest first
    pub fn tail(&self, n: usize) -> &[Bar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }
}

/// All series fetched for one instrument, keyed by timeframe
///
/// Series are held behind `Arc` so cached series are shared, not copied.
#[derive(Debug, Clone, Default)]
pub struct SeriesSet {
    series: HashMap<Timeframe, Arc<BarSeries>>,
}

impl SeriesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series: impl Into<Arc<BarSeries>>) {
        let series = series.into();
        self.series.insert(series.timeframe(), series);
    }

    pub fn get(&self, timeframe: Timeframe) -> Option<&BarSeries> {
        self.series.get(&timeframe).map(Arc::as_ref)
    }

    /// Shared handle to a series, for callers that keep it beyond this set
    pub fn get_shared(&self, timeframe: Timeframe) -> Option<Arc<BarSeries>> {
        self.series.get(&timeframe).cloned()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl FromIterator<BarSeries> for SeriesSet {
    fn from_iter<I: IntoIterator<Item = BarSeries>>(iter: I) -> Self {
        let mut set = SeriesSet::new();
        for series in iter {
            set.insert(series);
        }
        set
    }
}

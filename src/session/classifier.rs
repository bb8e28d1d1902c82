//! Trading session classification
//!
//! Sessions are fixed windows of reference-zone (New York) wall-clock time:
//! - CBDR:  14:00 up to but excluding 20:00
//! - Asian: 20:00 through midnight up to but excluding 03:00
//! - none:  everything else (03:00 - 13:59)

use crate::models::{parse_timestamp, REFERENCE_TZ};
use chrono::{DateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

const CBDR_START: (u32, u32) = (14, 0);
const ASIAN_START: (u32, u32) = (20, 0);
const ASIAN_END: (u32, u32) = (3, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Session {
    #[serde(rename = "CBDR")]
    Cbdr,
    Asian,
    #[serde(rename = "none")]
    None,
}

impl Session {
    pub fn as_str(&self) -> &'static str {
        match self {
            Session::Cbdr => "CBDR",
            Session::Asian => "Asian",
            Session::None => "none",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn hm(hour_minute: (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(hour_minute.0, hour_minute.1, 0).unwrap_or(NaiveTime::MIN)
}

/// Classify a reference-zone time of day
pub fn classify_time(t: NaiveTime) -> Session {
    if t >= hm(CBDR_START) && t < hm(ASIAN_START) {
        Session::Cbdr
    } else if t >= hm(ASIAN_START) || t < hm(ASIAN_END) {
        Session::Asian
    } else {
        Session::None
    }
}

/// Classify a timestamp from any zone by its New York time of day
pub fn classify<T: TimeZone>(timestamp: &DateTime<T>) -> Session {
    classify_time(timestamp.with_timezone(&REFERENCE_TZ).time())
}

/// Missing timestamps classify as `Session::None`
pub fn classify_opt<T: TimeZone>(timestamp: Option<&DateTime<T>>) -> Session {
    timestamp.map(classify).unwrap_or(Session::None)
}

/// Classify a raw provider timestamp; unparseable input is `Session::None`
pub fn classify_str(raw: &str) -> Session {
    classify_opt(parse_timestamp(raw).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_cbdr_window() {
        assert_eq!(classify_time(at(14, 0, 0)), Session::Cbdr);
        assert_eq!(classify_time(at(17, 30, 0)), Session::Cbdr);
        assert_eq!(classify_time(at(19, 59, 0)), Session::Cbdr);
        assert_eq!(
            classify_time(NaiveTime::from_hms_milli_opt(19, 59, 59, 999).unwrap()),
            Session::Cbdr
        );
        assert_eq!(classify_time(at(13, 59, 59)), Session::None);
    }

    #[test]
    fn test_asian_window_wraps_midnight() {
        assert_eq!(classify_time(at(20, 0, 0)), Session::Asian);
        assert_eq!(classify_time(at(23, 59, 59)), Session::Asian);
        assert_eq!(classify_time(at(0, 0, 0)), Session::Asian);
        assert_eq!(classify_time(at(2, 59, 59)), Session::Asian);
        assert_eq!(classify_time(at(3, 0, 0)), Session::None);
    }

    #[test]
    fn test_full_day_sweep() {
        for minute_of_day in 0..(24 * 60) {
            let t = at(minute_of_day / 60, minute_of_day % 60, 0);
            let expected = if (14 * 60..20 * 60).contains(&minute_of_day) {
                Session::Cbdr
            } else if minute_of_day >= 20 * 60 || minute_of_day < 3 * 60 {
                Session::Asian
            } else {
                Session::None
            };
            assert_eq!(classify_time(t), expected, "minute {}", minute_of_day);
        }
    }

    #[test]
    fn test_classify_converts_to_new_york() {
        // 19:30 UTC in January is 14:30 in New York
        let utc = Utc.with_ymd_and_hms(2024, 1, 15, 19, 30, 0).unwrap();
        assert_eq!(classify(&utc), Session::Cbdr);

        // July is EDT: 15:30 local, and five hours later 20:30 local
        let summer = Utc.with_ymd_and_hms(2024, 7, 15, 19, 30, 0).unwrap();
        assert_eq!(classify(&summer), Session::Cbdr);
        assert_eq!(classify(&(summer + Duration::hours(5))), Session::Asian);
    }

    #[test]
    fn test_null_and_unparseable_input() {
        assert_eq!(classify_opt::<Utc>(None), Session::None);
        assert_eq!(classify_str("garbage"), Session::None);
        assert_eq!(classify_str(""), Session::None);
        assert_eq!(classify_str("2024-01-15 21:05:00"), Session::Asian);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let ts = REFERENCE_TZ.with_ymd_and_hms(2024, 5, 1, 15, 0, 0).unwrap();
        let first = classify(&ts);
        for _ in 0..10 {
            assert_eq!(classify(&ts), first);
        }
    }
}

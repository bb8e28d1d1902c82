use crate::config::RefreshConfig;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Fixed daily wall-clock refresh times in one zone
#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    times: Vec<NaiveTime>,
    timezone: Tz,
}

impl RefreshSchedule {
    pub fn new(mut times: Vec<NaiveTime>, timezone: Tz) -> Self {
        times.sort();
        times.dedup();
        Self { times, timezone }
    }

    pub fn from_config(config: &RefreshConfig) -> Result<Self> {
        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("Invalid refresh timezone: {}", config.timezone))?;

        let times = config
            .times
            .iter()
            .map(|t| {
                NaiveTime::parse_from_str(t, "%H:%M")
                    .with_context(|| format!("Invalid refresh time (expected HH:MM): {}", t))
            })
            .collect::<Result<Vec<_>>>()?;

        if times.is_empty() {
            anyhow::bail!("refresh.times must not be empty");
        }

        Ok(Self::new(times, timezone))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// First scheduled instant strictly after `now`
    pub fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let local_today = now.with_timezone(&self.timezone).date_naive();

        // two days ahead covers a DST jump swallowing every time left today
        (0..=2)
            .filter_map(|offset| local_today.checked_add_signed(Duration::days(offset)))
            .flat_map(|date| self.times.iter().map(move |t| date.and_time(*t)))
            .filter_map(|naive| self.timezone.from_local_datetime(&naive).earliest())
            .map(|local| local.with_timezone(&Utc))
            .find(|candidate| *candidate > now)
    }
}

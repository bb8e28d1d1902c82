use super::{BarSource, FetchError, RetryPolicy};
use crate::config::ProviderConfig;
use crate::models::{parse_timestamp, Bar, BarSeries, Instrument, Timeframe};
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Zone the provider is asked to report timestamps in
const PROVIDER_TIMEZONE: &str = "America/New_York";

type ProviderRateLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Twelve Data time-series client with rate limiting and bounded retries
///
/// Cloning is cheap; all clones share the same rate limiter.
#[derive(Clone)]
pub struct TwelveDataClient {
    client: Client,
    config: ProviderConfig,
    retry: RetryPolicy,
    rate_limiter: Arc<ProviderRateLimiter>,
}

/// Response from /time_series
///
/// Errors come back as HTTP 200 with `"status": "error"` and a `code`.
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    values: Vec<RawBar>,
}

#[derive(Debug, Deserialize)]
struct RawBar {
    datetime: String,
    open: String,
    high: String,
    low: String,
    close: String,
    #[serde(default)]
    volume: Option<String>,
}

impl RawBar {
    fn into_bar(self) -> Option<Bar> {
        Some(Bar {
            timestamp: parse_timestamp(&self.datetime)?,
            open: self.open.trim().parse().ok()?,
            high: self.high.trim().parse().ok()?,
            low: self.low.trim().parse().ok()?,
            close: self.close.trim().parse().ok()?,
            volume: self
                .volume
                .and_then(|v| v.trim().parse::<f64>().ok())
                .map(|v| v.max(0.0) as u64)
                .unwrap_or(0),
        })
    }
}

impl TwelveDataClient {
    pub fn new(config: ProviderConfig, retry: RetryPolicy) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        let rpm = NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(rpm)));

        Ok(Self {
            client,
            config,
            retry,
            rate_limiter,
        })
    }

    /// Fetch a bar series, retrying transient failures per the retry policy
    pub async fn time_series(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
    ) -> Result<BarSeries, FetchError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.request_once(instrument, timeframe).await {
                Ok(series) => return Ok(series),
                Err(e) if self.retry.should_retry(&e, attempt) => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        "{} {} failed: {}, retrying in {:?} (attempt {}/{})",
                        instrument,
                        timeframe,
                        e,
                        delay,
                        attempt,
                        self.retry.max_attempts
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_transient() => {
                    return Err(FetchError::Exhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    })
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn request_once(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
    ) -> Result<BarSeries, FetchError> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/time_series", self.config.base_url.trim_end_matches('/'));
        let output_size = self.config.output_size.to_string();
        let pair = instrument.pair();

        tracing::debug!("Fetching {} {} ({} bars)", pair, timeframe, output_size);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", pair.as_str()),
                ("interval", timeframe.interval()),
                ("outputsize", output_size.as_str()),
                ("timezone", PROVIDER_TIMEZONE),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(FetchError::RateLimited(format!("HTTP {}", status)));
        }
        if status.is_server_error() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Server {
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FetchError::Permanent(format!("HTTP {}: {}", status, message)));
        }

        let body = response.text().await?;
        let parsed: TimeSeriesResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        if parsed.status.as_deref() == Some("error") {
            let message = parsed.message.unwrap_or_else(|| "unknown error".to_string());
            return Err(match parsed.code {
                Some(429) => FetchError::RateLimited(message),
                Some(code) if code >= 500 => FetchError::Server {
                    status: code,
                    message,
                },
                _ => FetchError::Permanent(message),
            });
        }

        let series = into_series(instrument, timeframe, parsed.values);
        tracing::debug!("Fetched {} bars for {} {}", series.len(), pair, timeframe);

        Ok(series)
    }
}

/// Convert wire rows (newest first) into an ascending series, dropping bad rows
fn into_series(instrument: &Instrument, timeframe: Timeframe, values: Vec<RawBar>) -> BarSeries {
    let total = values.len();
    let bars: Vec<Bar> = values.into_iter().filter_map(RawBar::into_bar).collect();

    if bars.len() < total {
        tracing::warn!(
            "Dropped {} unparseable {} {} bars",
            total - bars.len(),
            instrument,
            timeframe
        );
    }

    BarSeries::new(instrument.clone(), timeframe, bars)
}

#[async_trait]
impl BarSource for TwelveDataClient {
    async fn fetch_series(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
    ) -> Result<BarSeries, FetchError> {
        self.time_series(instrument, timeframe).await
    }
}

// Refresh cycle: pull every configured series through the cache
pub mod schedule;

pub use schedule::RefreshSchedule;

use crate::api::BarSource;
use crate::cache::SeriesCache;
use crate::models::{Instrument, SeriesSet, Timeframe};
use std::sync::Arc;

/// Series gathered in one refresh cycle, plus counters for logging
#[derive(Debug, Default)]
pub struct RefreshReport {
    /// Instruments with at least one series, in request order
    pub series: Vec<(Instrument, SeriesSet)>,
    pub fetched: usize,
    pub cached: usize,
    pub failed: usize,
}

/// Collects bar series for many instruments from a `BarSource`
///
/// A failed fetch only loses that one (instrument, timeframe) pair; whatever
/// arrived is still returned so rows can be built from complete series.
pub struct MarketFeed<S: BarSource> {
    source: S,
    cache: SeriesCache,
    timeframes: Vec<Timeframe>,
}

impl<S: BarSource> MarketFeed<S> {
    pub fn new(source: S, cache: SeriesCache, timeframes: Vec<Timeframe>) -> Self {
        Self {
            source,
            cache,
            timeframes,
        }
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    pub fn timeframes(&self) -> &[Timeframe] {
        &self.timeframes
    }

    /// Fetch (or reuse cached) series for every instrument and timeframe
    pub async fn refresh(&self, instruments: &[Instrument]) -> RefreshReport {
        let mut report = RefreshReport::default();

        if let Err(e) = self.cache.purge_expired() {
            tracing::warn!("Failed to purge series cache: {}", e);
        }

        for instrument in instruments {
            let symbol = instrument.symbol();
            let mut set = SeriesSet::new();

            for &timeframe in &self.timeframes {
                match self.cache.get(&symbol, timeframe) {
                    Ok(Some(series)) => {
                        set.insert(series);
                        report.cached += 1;
                        continue;
                    }
                    Ok(None) => {}
                    Err(e) => tracing::warn!("Series cache unavailable: {}", e),
                }

                match self.source.fetch_series(instrument, timeframe).await {
                    Ok(series) => {
                        let series = Arc::new(series);
                        if let Err(e) = self.cache.insert(Arc::clone(&series)) {
                            tracing::warn!("Failed to cache {} {}: {}", instrument, timeframe, e);
                        }
                        set.insert(series);
                        report.fetched += 1;
                    }
                    Err(e) => {
                        tracing::warn!(
                            symbol = %symbol,
                            timeframe = %timeframe,
                            "Fetch failed, skipping: {}",
                            e
                        );
                        report.failed += 1;
                    }
                }
            }

            if set.is_empty() {
                tracing::warn!("No data for {}, omitting", instrument);
            } else {
                report.series.push((instrument.clone(), set));
            }
        }

        tracing::info!(
            instruments = report.series.len(),
            fetched = report.fetched,
            cached = report.cached,
            failed = report.failed,
            "Refresh cycle complete"
        );

        report
    }
}

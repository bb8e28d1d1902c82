use crate::models::{BarSeries, Timeframe};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

type CacheKey = (String, Timeframe);

#[derive(Debug, Clone)]
struct CachedSeries {
    series: Arc<BarSeries>,
    fetched_at: Instant,
}

/// Thread-safe in-memory cache of fetched bar series
///
/// Entries are keyed by (symbol, timeframe) and expire `ttl` after insertion.
/// Clones share the same storage.
#[derive(Clone)]
pub struct SeriesCache {
    data: Arc<RwLock<HashMap<CacheKey, CachedSeries>>>,
    ttl: Duration,
}

impl SeriesCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store a series, replacing any previous entry for the same key
    pub fn insert(&self, series: impl Into<Arc<BarSeries>>) -> Result<(), String> {
        let series = series.into();
        let mut data = self.data.write().map_err(|e| e.to_string())?;
        let key = (series.instrument().symbol(), series.timeframe());
        data.insert(
            key,
            CachedSeries {
                series,
                fetched_at: Instant::now(),
            },
        );
        Ok(())
    }

    /// Get a series if it was cached less than `ttl` ago
    pub fn get(&self, symbol: &str, timeframe: Timeframe) -> Result<Option<Arc<BarSeries>>, String> {
        let data = self.data.read().map_err(|e| e.to_string())?;

        Ok(data
            .get(&(symbol.to_string(), timeframe))
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.series)))
    }

    /// Number of entries, including expired ones not yet purged
    pub fn len(&self) -> Result<usize, String> {
        let data = self.data.read().map_err(|e| e.to_string())?;
        Ok(data.len())
    }

    pub fn is_empty(&self) -> Result<bool, String> {
        Ok(self.len()? == 0)
    }

    /// Drop expired entries, returning how many were removed
    pub fn purge_expired(&self) -> Result<usize, String> {
        let mut data = self.data.write().map_err(|e| e.to_string())?;
        let before = data.len();
        data.retain(|_, entry| entry.fetched_at.elapsed() < self.ttl);
        Ok(before - data.len())
    }

    /// Clear all timeframes for a symbol
    pub fn invalidate(&self, symbol: &str) -> Result<(), String> {
        let mut data = self.data.write().map_err(|e| e.to_string())?;
        data.retain(|(s, _), _| s != symbol);
        Ok(())
    }

    /// Clear all data
    pub fn clear(&self) -> Result<(), String> {
        let mut data = self.data.write().map_err(|e| e.to_string())?;
        data.clear();
        Ok(())
    }
}

// Market data provider clients
pub mod error;
pub mod retry;
pub mod twelvedata;

pub use error::FetchError;
pub use retry::{Backoff, RetryPolicy};
pub use twelvedata::TwelveDataClient;

use crate::models::{BarSeries, Instrument, Timeframe};
use async_trait::async_trait;

/// Anything that can supply a bar series for an instrument and timeframe
#[async_trait]
pub trait BarSource: Send + Sync {
    async fn fetch_series(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
    ) -> Result<BarSeries, FetchError>;
}

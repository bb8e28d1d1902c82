// Price-action pattern detectors
//
// Every detector takes a read-only tail of a bar series (oldest first) and
// returns a label. Short input yields the detector's neutral label.
pub mod candle_confirmation;
pub mod fair_value_gap;
pub mod order_block;
pub mod prior_day;
pub mod trend;

pub use candle_confirmation::{detect_candle_confirmation, CandleConfirmation};
pub use fair_value_gap::{detect_fair_value_gap, FairValueGap};
pub use order_block::{detect_order_block, OrderBlock};
pub use prior_day::{detect_prior_day_pattern, PriorDayPattern};
pub use trend::{calculate_sma, detect_daily_trend, Trend};

/// Minimum bars for the three-bar detectors
pub const MIN_PATTERN_BARS: usize = 3;

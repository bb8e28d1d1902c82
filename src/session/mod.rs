// Trading session classification and session/daily range aggregation
pub mod classifier;
pub mod range;

pub use classifier::{classify, classify_opt, classify_str, classify_time, Session};
pub use range::{
    average_daily_range, prior_day_range, round_pips, session_range, AsianStatus, CbdrStatus,
    ADR_DAYS,
};

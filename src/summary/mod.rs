//! One summary row per instrument, built from the session ranges and pattern
//! detectors, plus the priority ordering used when presenting rows.

pub mod assembler;
pub mod priority;

pub use assembler::{assemble, assemble_all, direction_trail, DETECTOR_WINDOW, TREND_WINDOW};
pub use priority::{sort_by_priority, DEFAULT_PRIORITY};

use crate::patterns::{CandleConfirmation, FairValueGap, OrderBlock, PriorDayPattern, Trend};
use crate::session::{AsianStatus, CbdrStatus};
use serde::Serialize;

/// Signals computed for one instrument in one refresh cycle
///
/// Serialized field names match the dashboard column labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Asset")]
    pub asset: String,
    #[serde(rename = "CBDR")]
    pub cbdr_pips: f64,
    #[serde(rename = "Ideal CBDR")]
    pub cbdr_status: CbdrStatus,
    #[serde(rename = "Asian")]
    pub asian_pips: f64,
    #[serde(rename = "Asian Status")]
    pub asian_status: AsianStatus,
    #[serde(rename = "Prior Day")]
    pub prior_day_pips: f64,
    #[serde(rename = "5D ADR")]
    pub adr_5d_pips: f64,
    #[serde(rename = "Pattern")]
    pub pattern: PriorDayPattern,
    #[serde(rename = "Daily CC")]
    pub daily_cc: CandleConfirmation,
    #[serde(rename = "Order Block")]
    pub order_block: OrderBlock,
    #[serde(rename = "FVG")]
    pub fvg: FairValueGap,
    #[serde(rename = "4H CC")]
    pub four_hour_cc: CandleConfirmation,
    #[serde(rename = "Trend")]
    pub trend: Trend,
    #[serde(rename = "Last 3D")]
    pub last_3d: String,
}

impl SummaryRow {
    /// Column labels in display order
    pub const COLUMNS: [&'static str; 14] = [
        "Asset",
        "CBDR",
        "Ideal CBDR",
        "Asian",
        "Asian Status",
        "Prior Day",
        "5D ADR",
        "Pattern",
        "Daily CC",
        "Order Block",
        "FVG",
        "4H CC",
        "Trend",
        "Last 3D",
    ];

    /// Cell values as display strings, in `COLUMNS` order
    pub fn cells(&self) -> [String; 14] {
        [
            self.asset.clone(),
            format!("{:.1}", self.cbdr_pips),
            self.cbdr_status.to_string(),
            format!("{:.1}", self.asian_pips),
            self.asian_status.to_string(),
            format!("{:.1}", self.prior_day_pips),
            format!("{:.1}", self.adr_5d_pips),
            self.pattern.to_string(),
            self.daily_cc.to_string(),
            self.order_block.to_string(),
            self.fvg.to_string(),
            self.four_hour_cc.to_string(),
            self.trend.to_string(),
            self.last_3d.clone(),
        ]
    }
}

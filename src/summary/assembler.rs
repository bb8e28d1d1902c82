use super::{sort_by_priority, SummaryRow};
use crate::models::{Bar, Instrument, SeriesSet, Timeframe};
use crate::patterns::{
    detect_candle_confirmation, detect_daily_trend, detect_fair_value_gap, detect_order_block,
    detect_prior_day_pattern, CandleConfirmation,
};
use crate::session::{
    average_daily_range, prior_day_range, session_range, AsianStatus, CbdrStatus, Session,
    ADR_DAYS,
};
use rayon::prelude::*;

/// Trailing bars handed to the three-bar detectors
pub const DETECTOR_WINDOW: usize = 10;
/// Trailing daily bars handed to the trend detector
pub const TREND_WINDOW: usize = 30;
/// Daily bars summarised in the direction trail
pub const TRAIL_DAYS: usize = 3;

/// "Up"/"Down" per bar, oldest first, for the last `TRAIL_DAYS` bars
pub fn direction_trail(bars: &[Bar]) -> String {
    bars[bars.len().saturating_sub(TRAIL_DAYS)..]
        .iter()
        .map(|b| if b.close >= b.open { "Up" } else { "Down" })
        .collect()
}

/// Build the summary row for one instrument
///
/// Returns `None` when the daily or 5-minute series is missing or empty.
/// Every other shortfall degrades the affected field to its neutral value.
pub fn assemble(instrument: &Instrument, series: &SeriesSet) -> Option<SummaryRow> {
    let (daily, five_min) = match (
        series.get(Timeframe::Daily).filter(|s| !s.is_empty()),
        series.get(Timeframe::FiveMinute).filter(|s| !s.is_empty()),
    ) {
        (Some(daily), Some(five_min)) => (daily, five_min),
        _ => {
            tracing::debug!(
                symbol = %instrument.symbol(),
                "Skipping instrument without daily and 5min series"
            );
            return None;
        }
    };

    let today = five_min.last()?.date();

    let cbdr_pips = session_range(five_min, today, Session::Cbdr);
    let asian_pips = session_range(five_min, today, Session::Asian);

    let recent_daily = daily.tail(DETECTOR_WINDOW);
    let four_hour_cc = series
        .get(Timeframe::FourHour)
        .map(|s| detect_candle_confirmation(s.tail(DETECTOR_WINDOW)))
        .unwrap_or(CandleConfirmation::None);

    Some(SummaryRow {
        asset: instrument.symbol(),
        cbdr_pips,
        cbdr_status: CbdrStatus::from_range(cbdr_pips),
        asian_pips,
        asian_status: AsianStatus::from_range(asian_pips),
        prior_day_pips: prior_day_range(daily),
        adr_5d_pips: average_daily_range(daily, ADR_DAYS),
        pattern: detect_prior_day_pattern(recent_daily),
        daily_cc: detect_candle_confirmation(recent_daily),
        order_block: detect_order_block(recent_daily),
        fvg: detect_fair_value_gap(recent_daily),
        four_hour_cc,
        trend: detect_daily_trend(daily.tail(TREND_WINDOW)),
        last_3d: direction_trail(daily.bars()),
    })
}

/// Assemble rows for every instrument in parallel, then apply priority ordering
///
/// Row order before the priority sort follows `inputs`, so unlisted assets keep
/// the order they were supplied in.
pub fn assemble_all<S: AsRef<str>>(
    inputs: &[(Instrument, SeriesSet)],
    priority: &[S],
) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = inputs
        .par_iter()
        .filter_map(|(instrument, series)| assemble(instrument, series))
        .collect();

    tracing::debug!(
        "Assembled {} rows from {} instruments",
        rows.len(),
        inputs.len()
    );

    sort_by_priority(&mut rows, priority);
    rows
}

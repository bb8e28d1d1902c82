use async_trait::async_trait;
use chrono::{Duration, TimeZone};
use fxsession::api::{BarSource, FetchError};
use fxsession::cache::SeriesCache;
use fxsession::feed::MarketFeed;
use fxsession::patterns::PriorDayPattern;
use fxsession::render::{render_json, render_table};
use fxsession::session::{AsianStatus, CbdrStatus};
use fxsession::summary::DEFAULT_PRIORITY;
use fxsession::*;
use std::collections::HashMap;

/// Serves canned series and fails for anything it was not given
struct CannedSource {
    series: HashMap<(String, Timeframe), BarSeries>,
}

impl CannedSource {
    fn new(series: Vec<BarSeries>) -> Self {
        Self {
            series: series
                .into_iter()
                .map(|s| ((s.instrument().symbol(), s.timeframe()), s))
                .collect(),
        }
    }
}

#[async_trait]
impl BarSource for CannedSource {
    async fn fetch_series(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
    ) -> std::result::Result<BarSeries, FetchError> {
        self.series
            .get(&(instrument.symbol(), timeframe))
            .cloned()
            .ok_or_else(|| FetchError::Permanent(format!("no data for {}", instrument)))
    }
}

/// Yesterday down, today up and engulfing
fn engulfing_daily(instrument: &Instrument) -> BarSeries {
    let start = REFERENCE_TZ.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
    let ohlc = [
        (1.1150, 1.1190, 1.1120, 1.1180),
        (1.1200, 1.1210, 1.0990, 1.1000),
        (1.0950, 1.1260, 1.0940, 1.1250),
    ];
    let bars = ohlc
        .iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| Bar::new(start + Duration::days(i as i64), o, h, l, c))
        .collect();
    BarSeries::new(instrument.clone(), Timeframe::Daily, bars)
}

/// Asian bar at 01:00 (25 pips) and three CBDR bars spanning 70 pips
fn session_five_min(instrument: &Instrument) -> BarSeries {
    let at = |h: u32, m: u32| REFERENCE_TZ.with_ymd_and_hms(2024, 3, 5, h, m, 0).unwrap();
    let bars = vec![
        Bar::new(at(1, 0), 1.1005, 1.1030, 1.1005, 1.1020),
        Bar::new(at(14, 0), 1.1020, 1.1050, 1.1000, 1.1040),
        Bar::new(at(15, 0), 1.1040, 1.1060, 1.1010, 1.1030),
        Bar::new(at(19, 55), 1.1030, 1.1040, 1.0990, 1.1000),
    ];
    BarSeries::new(instrument.clone(), Timeframe::FiveMinute, bars)
}

fn inputs(pairs: &[&str]) -> Vec<(Instrument, SeriesSet)> {
    pairs
        .iter()
        .map(|p| {
            let instrument: Instrument = p.parse().unwrap();
            let set: SeriesSet = vec![engulfing_daily(&instrument), session_five_min(&instrument)]
                .into_iter()
                .collect();
            (instrument, set)
        })
        .collect()
}

#[test]
fn test_row_from_synthetic_series() {
    let rows = assemble_all(&inputs(&["EUR/USD"]), &DEFAULT_PRIORITY);
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row.asset, "EURUSD");
    assert_eq!(row.cbdr_pips, 70.0);
    assert_eq!(row.cbdr_status, CbdrStatus::None);
    assert_eq!(row.asian_pips, 25.0);
    assert_eq!(row.asian_status, AsianStatus::Ideal);
    assert_eq!(row.prior_day_pips, 220.0);
    assert_eq!(row.pattern, PriorDayPattern::BullishEngulfing);
    assert_eq!(row.last_3d, "UpDownUp");
}

#[test]
fn test_unlisted_assets_follow_priority_list() {
    let rows = assemble_all(
        &inputs(&["NZD/CHF", "USD/JPY", "CAD/JPY", "EUR/USD"]),
        &DEFAULT_PRIORITY,
    );
    let assets: Vec<&str> = rows.iter().map(|r| r.asset.as_str()).collect();
    assert_eq!(assets, vec!["EURUSD", "USDJPY", "NZDCHF", "CADJPY"]);
}

#[test]
fn test_output_is_deterministic() {
    let data = inputs(&["GBP/USD", "EUR/JPY", "EUR/USD"]);

    let first = render_json(&assemble_all(&data, &DEFAULT_PRIORITY)).unwrap();
    let second = render_json(&assemble_all(&data, &DEFAULT_PRIORITY)).unwrap();
    assert_eq!(first, second);

    let table = render_table(&assemble_all(&data, &DEFAULT_PRIORITY), false);
    assert_eq!(table.lines().count(), 5);
}

#[test]
fn test_feed_to_rows() {
    let eurusd: Instrument = "EUR/USD".parse().unwrap();
    let usdjpy: Instrument = "USD/JPY".parse().unwrap();
    // USD/JPY only has daily bars, so it cannot produce a row
    let source = CannedSource::new(vec![
        engulfing_daily(&eurusd),
        session_five_min(&eurusd),
        engulfing_daily(&usdjpy),
    ]);
    let feed = MarketFeed::new(
        source,
        SeriesCache::new(std::time::Duration::from_secs(60)),
        vec![Timeframe::Daily, Timeframe::FourHour, Timeframe::FiveMinute],
    );

    let report = tokio_test::block_on(feed.refresh(&[usdjpy, eurusd]));
    assert_eq!(report.fetched, 3);
    assert_eq!(report.failed, 3);
    assert_eq!(report.series.len(), 2);

    let rows = assemble_all(&report.series, &DEFAULT_PRIORITY);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].asset, "EURUSD");
    assert_eq!(rows[0].four_hour_cc.to_string(), "");
}

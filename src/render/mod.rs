//! Terminal and JSON rendering of summary rows
//!
//! Emphasis is decided from the cell text alone, so it only relies on the
//! label strings the detectors emit.

use crate::summary::SummaryRow;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Bullish,
    Bearish,
    Ideal,
    Delayed,
    Plain,
}

impl Emphasis {
    pub fn for_value(value: &str) -> Self {
        if value.contains("Bullish") {
            Emphasis::Bullish
        } else if value.contains("Bearish") {
            Emphasis::Bearish
        } else if value == "Ideal" {
            Emphasis::Ideal
        } else if value.contains("Delayed") {
            Emphasis::Delayed
        } else {
            Emphasis::Plain
        }
    }

    fn ansi(&self) -> Option<String> {
        match self {
            Emphasis::Bullish => Some(format!("{}{}", BOLD, GREEN)),
            Emphasis::Bearish => Some(format!("{}{}", BOLD, RED)),
            Emphasis::Ideal => Some(CYAN.to_string()),
            Emphasis::Delayed => Some(YELLOW.to_string()),
            Emphasis::Plain => None,
        }
    }
}

/// Fixed-width table with one line per row
///
/// Widths are computed on the plain text so colour codes never misalign columns.
pub fn render_table(rows: &[SummaryRow], color: bool) -> String {
    let cells: Vec<[String; 14]> = rows.iter().map(SummaryRow::cells).collect();

    let mut widths: Vec<usize> = SummaryRow::COLUMNS.iter().map(|c| c.len()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();

    let header: Vec<String> = SummaryRow::COLUMNS
        .iter()
        .zip(&widths)
        .map(|(name, w)| format!("{:<w$}", name, w = *w))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');

    let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&"─".repeat(rule_len));
    out.push('\n');

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| {
                let padded = format!("{:<w$}", cell, w = *w);
                match Emphasis::for_value(cell).ansi() {
                    Some(code) if color => format!("{}{}{}", code, padded, RESET),
                    _ => padded,
                }
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }

    out
}

/// JSON array of rows keyed by column label
pub fn render_json(rows: &[SummaryRow]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}

/// "Live · 2024-03-05 14:05 HKT" style caption
pub fn caption(now: DateTime<Utc>, timezone: Tz) -> String {
    let local = now.with_timezone(&timezone);
    format!("Live · {}", local.format("%Y-%m-%d %H:%M %Z"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{CandleConfirmation, FairValueGap, OrderBlock, PriorDayPattern, Trend};
    use crate::session::{AsianStatus, CbdrStatus};
    use chrono::TimeZone;

    fn sample_row() -> SummaryRow {
        SummaryRow {
            asset: "EURUSD".to_string(),
            cbdr_pips: 35.0,
            cbdr_status: CbdrStatus::Ideal,
            asian_pips: 45.5,
            asian_status: AsianStatus::DelayedProtraction,
            prior_day_pips: 80.2,
            adr_5d_pips: 72.4,
            pattern: PriorDayPattern::BullishEngulfing,
            daily_cc: CandleConfirmation::Bearish,
            order_block: OrderBlock::None,
            fvg: FairValueGap::None,
            four_hour_cc: CandleConfirmation::None,
            trend: Trend::Bullish,
            last_3d: "UpDownUp".to_string(),
        }
    }

    #[test]
    fn test_emphasis_rules() {
        assert_eq!(Emphasis::for_value("Bullish HH/HL"), Emphasis::Bullish);
        assert_eq!(Emphasis::for_value("Bearish OB Confirmed"), Emphasis::Bearish);
        assert_eq!(Emphasis::for_value("Ideal"), Emphasis::Ideal);
        assert_eq!(Emphasis::for_value("Delayed Protraction"), Emphasis::Delayed);
        assert_eq!(Emphasis::for_value("Other"), Emphasis::Plain);
        assert_eq!(Emphasis::for_value("Ideal CBDR"), Emphasis::Plain);
        assert_eq!(Emphasis::for_value(""), Emphasis::Plain);
    }

    #[test]
    fn test_plain_table() {
        let table = render_table(&[sample_row()], false);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Asset"));
        assert!(lines[0].contains("Last 3D"));
        assert!(lines[2].starts_with("EURUSD"));
        assert!(lines[2].contains("Bullish Engulfing"));
        assert!(lines[2].contains("45.5"));
        assert!(!table.contains('\x1b'));
    }

    #[test]
    fn test_colored_table() {
        let table = render_table(&[sample_row()], true);
        assert!(table.contains(&format!("{}{}Bullish Engulfing", BOLD, GREEN)));
        assert!(table.contains(&format!("{}Delayed Protraction", YELLOW)));
        assert!(table.contains(&format!("{}Ideal", CYAN)));
    }

    #[test]
    fn test_empty_table_has_header() {
        let table = render_table(&[], false);
        assert_eq!(table.lines().count(), 2);
    }

    #[test]
    fn test_json_uses_column_labels() {
        let json = render_json(&[sample_row()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let row = &value[0];

        assert_eq!(row["Asset"], "EURUSD");
        assert_eq!(row["CBDR"], 35.0);
        assert_eq!(row["Ideal CBDR"], "Ideal");
        assert_eq!(row["Asian Status"], "Delayed Protraction");
        assert_eq!(row["Pattern"], "Bullish Engulfing");
        assert_eq!(row["Daily CC"], "Bearish CC");
        assert_eq!(row["Order Block"], "");
        assert_eq!(row["Trend"], "Bullish");
        assert_eq!(row["Last 3D"], "UpDownUp");
    }

    #[test]
    fn test_caption_in_display_zone() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 6, 5, 0).unwrap();
        assert_eq!(
            caption(now, chrono_tz::Asia::Hong_Kong),
            "Live · 2024-03-05 14:05 HKT"
        );
    }
}

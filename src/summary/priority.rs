use super::SummaryRow;

/// Majors shown first, in this order
pub const DEFAULT_PRIORITY: [&str; 7] = [
    "EURUSD", "GBPUSD", "AUDUSD", "NZDUSD", "USDJPY", "USDCAD", "USDCHF",
];

/// Sort rows by their asset's position in `priority`
///
/// Assets missing from the list go after every listed asset. The sort is
/// stable, so unlisted assets keep their input order.
pub fn sort_by_priority<S: AsRef<str>>(rows: &mut [SummaryRow], priority: &[S]) {
    rows.sort_by_key(|row| {
        priority
            .iter()
            .position(|p| p.as_ref() == row.asset)
            .unwrap_or(usize::MAX)
    });
}

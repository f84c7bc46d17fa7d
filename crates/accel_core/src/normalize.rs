use crate::{Mode, Record};

/// Maximum number of rows emitted in widget layout.
pub const WIDGET_ROW_LIMIT: usize = 6;

/// Status assigned to live records that arrive without one.
pub const DEFAULT_PENDING_STATUS: &str = "accelerating";

/// Post-processes a raw batch before display.
///
/// Pending feeds get a default status, every record gets `boost` derived from
/// `boost_cost` falling back to `bid_boost`, and widget layout keeps only the
/// first [`WIDGET_ROW_LIMIT`] rows in source order.
pub fn normalize(mut records: Vec<Record>, mode: Mode) -> Vec<Record> {
    if mode.is_pending() {
        for record in records.iter_mut().filter(|record| !record.has_status()) {
            record.status = Some(DEFAULT_PENDING_STATUS.to_string());
        }
    }

    for record in &mut records {
        record.boost = record.boost_cost.or(record.bid_boost);
    }

    if mode.is_widget() {
        records.truncate(WIDGET_ROW_LIMIT);
    }
    records
}

use crate::{Record, RecordKey};

/// Placeholder rows shown by the widget while loading.
pub const WIDGET_SKELETON_ROWS: usize = 6;
/// Placeholder rows shown by the full list while loading.
pub const FULL_SKELETON_ROWS: usize = 15;

/// What the rendering layer receives after every state change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListView {
    pub records: Vec<Record>,
    pub is_loading: bool,
    /// Only present for paged history without an external stream.
    pub total_count: Option<u64>,
    pub page: u32,
    pub skeleton_rows: usize,
}

impl ListView {
    pub fn row_keys(&self) -> impl Iterator<Item = RecordKey> + '_ {
        self.records.iter().map(Record::key)
    }

    /// Number of pages implied by `total_count` for a given page size.
    pub fn page_count(&self, page_size: u64) -> Option<u64> {
        if page_size == 0 {
            return None;
        }
        self.total_count.map(|total| total.div_ceil(page_size))
    }
}

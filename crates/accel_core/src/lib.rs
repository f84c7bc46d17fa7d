//! Accelerations core: pure list-synchronization state machine and view-model helpers.
mod effect;
mod mode;
mod msg;
mod normalize;
mod record;
mod source;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Topic};
pub use mode::{Feed, Layout, Mode};
pub use msg::{Batch, Msg, SourceError};
pub use normalize::{normalize, DEFAULT_PENDING_STATUS, WIDGET_ROW_LIMIT};
pub use record::{Record, RecordKey};
pub use source::{
    parse_total_count, select_source, Page, PageResult, ResponseHeaders, SourceKind,
    TOTAL_COUNT_HEADER,
};
pub use state::{Lifecycle, PipelineState, RequestSeq};
pub use update::update;
pub use view_model::{ListView, FULL_SKELETON_ROWS, WIDGET_SKELETON_ROWS};

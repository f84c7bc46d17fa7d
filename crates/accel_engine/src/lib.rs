//! Accelerations engine: collaborators for the list pipeline and the async driver
//! that executes its effects.
mod driver;
mod history;
mod live;
mod registry;
mod types;
mod ws;

pub use driver::{PipelineConfig, PipelineDriver, PipelineHandle, Sources};
pub use history::{HistoryClient, HistorySettings, ReqwestHistoryClient, HISTORY_PATH};
pub use live::{AccelerationUpdate, LiveBook, RecordStream, StaticStream};
pub use registry::{PushTransport, SubscriptionRegistry};
pub use types::{FailureKind, FetchError, StreamError, TransportError};
pub use ws::{parse_frame, pump_frames, topic_message, WsPushTransport};

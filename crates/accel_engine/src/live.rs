use accel_core::Record;
use futures_util::stream::{self, BoxStream, StreamExt};
use serde::Deserialize;
use tokio::sync::watch;

use crate::StreamError;

/// A source of full record snapshots. Each item replaces the previous one.
pub trait RecordStream: Send + Sync {
    fn open(&self) -> BoxStream<'static, Result<Vec<Record>, StreamError>>;
}

/// Acceleration changes pushed by the backend.
///
/// A frame either carries a complete list (`accelerations`, or `reset` with
/// `added`), or a delta of added and removed records keyed by txid.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AccelerationUpdate {
    #[serde(default)]
    pub accelerations: Option<Vec<Record>>,
    #[serde(default)]
    pub added: Vec<Record>,
    #[serde(default)]
    pub removed: Vec<String>,
    #[serde(default)]
    pub reset: bool,
}

impl AccelerationUpdate {
    pub fn apply_to(self, records: &mut Vec<Record>) {
        if let Some(full) = self.accelerations {
            *records = full;
        } else if self.reset {
            records.clear();
        }

        if !self.removed.is_empty() {
            records.retain(|record| {
                record
                    .txid
                    .as_ref()
                    .is_none_or(|txid| !self.removed.contains(txid))
            });
        }

        for added in self.added {
            let existing = added.txid.as_ref().and_then(|txid| {
                records
                    .iter()
                    .position(|record| record.txid.as_ref() == Some(txid))
            });
            match existing {
                Some(index) => records[index] = added,
                None => records.push(added),
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
struct BookState {
    records: Option<Vec<Record>>,
    closed: bool,
}

/// Current set of in-flight records, assembled from push frames and shared with
/// every live list.
pub struct LiveBook {
    tx: watch::Sender<BookState>,
}

impl Default for LiveBook {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveBook {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(BookState::default());
        Self { tx }
    }

    pub fn apply(&self, update: AccelerationUpdate) {
        self.tx.send_modify(|state| {
            let mut records = state.records.take().unwrap_or_default();
            update.apply_to(&mut records);
            state.records = Some(records);
        });
    }

    pub fn replace(&self, records: Vec<Record>) {
        self.tx.send_modify(|state| state.records = Some(records));
    }

    /// Latest snapshot, or `None` until the first frame arrives.
    pub fn snapshot(&self) -> Option<Vec<Record>> {
        self.tx.borrow().records.clone()
    }

    /// Marks the feed as ended; open streams finish with [`StreamError::Closed`].
    pub fn close(&self) {
        self.tx.send_modify(|state| state.closed = true);
    }
}

impl RecordStream for LiveBook {
    fn open(&self) -> BoxStream<'static, Result<Vec<Record>, StreamError>> {
        let mut rx = self.tx.subscribe();
        rx.mark_changed();
        stream::unfold(Some(rx), |rx| async move {
            let mut rx = rx?;
            loop {
                if rx.changed().await.is_err() {
                    return Some((Err(StreamError::Closed), None));
                }
                let state = rx.borrow_and_update().clone();
                if state.closed {
                    return Some((Err(StreamError::Closed), None));
                }
                if let Some(records) = state.records {
                    return Some((Ok(records), Some(rx)));
                }
            }
        })
        .boxed()
    }
}

/// Replays a fixed sequence of batches every time it is opened.
#[derive(Debug, Clone, Default)]
pub struct StaticStream {
    batches: Vec<Result<Vec<Record>, StreamError>>,
}

impl StaticStream {
    pub fn new(batches: Vec<Result<Vec<Record>, StreamError>>) -> Self {
        Self { batches }
    }

    pub fn single(records: Vec<Record>) -> Self {
        Self::new(vec![Ok(records)])
    }
}

impl RecordStream for StaticStream {
    fn open(&self) -> BoxStream<'static, Result<Vec<Record>, StreamError>> {
        stream::iter(self.batches.clone()).boxed()
    }
}

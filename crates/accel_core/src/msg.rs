use std::fmt;

use crate::{Page, Record, RequestSeq, Topic};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The list was instantiated; selects the first source.
    Mounted,
    /// User asked for another page.
    PageRequested(u32),
    /// A source produced a batch for request `seq`.
    SourceEmitted { seq: RequestSeq, batch: Batch },
    /// A source failed for request `seq`.
    SourceFailed { seq: RequestSeq, error: SourceError },
    /// The push channel refused interest in `topic`; nothing is held.
    AcquireFailed(Topic),
    /// The list is being torn down.
    Unmounted,
    /// Fallback for placeholder wiring.
    NoOp,
}

/// A batch of records as produced by one of the sources.
#[derive(Debug, Clone, PartialEq)]
pub enum Batch {
    /// One resolved history page, possibly with a total count.
    Page(Page),
    /// A full snapshot from a stream; replaces the visible set.
    Snapshot(Vec<Record>),
}

impl Batch {
    pub fn into_parts(self) -> (Vec<Record>, Option<u64>) {
        match self {
            Batch::Page(page) => (page.records, page.total_count),
            Batch::Snapshot(records) => (records, None),
        }
    }
}

/// Transport-neutral failure reported by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The paged fetch was rejected or returned a bad response.
    Fetch(String),
    /// The stream errored or closed before producing anything useful.
    Stream(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Fetch(message) => write!(f, "fetch failed: {message}"),
            SourceError::Stream(message) => write!(f, "stream failed: {message}"),
        }
    }
}

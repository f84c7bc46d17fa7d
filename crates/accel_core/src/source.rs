use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{Mode, Record};

/// Header carrying the total number of records across all pages.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Response headers as received from the history endpoint.
pub type ResponseHeaders = BTreeMap<String, String>;

/// The single data source feeding the list for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Stream supplied by the embedding view; pagination does not apply.
    External,
    /// Full snapshots of in-flight records from the push channel.
    Live,
    /// One page of historical records.
    Paged { page: u32 },
}

impl SourceKind {
    pub fn is_live(self) -> bool {
        matches!(self, SourceKind::Live)
    }

    pub fn is_paged(self) -> bool {
        matches!(self, SourceKind::Paged { .. })
    }
}

/// Picks the source for a page request. An external stream always wins, then
/// the feed decides between the push channel and a paged fetch.
pub fn select_source(has_external: bool, mode: Mode, page: u32) -> SourceKind {
    if has_external {
        SourceKind::External
    } else if mode.is_pending() {
        SourceKind::Live
    } else {
        SourceKind::Paged { page }
    }
}

/// What the paged-fetch collaborator hands back.
///
/// Deserializes from either a bare JSON array or an object with a `body`
/// field; the presence of `body` is what tells the two shapes apart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PageResult {
    Envelope {
        body: Vec<Record>,
        #[serde(default)]
        headers: ResponseHeaders,
    },
    Bare(Vec<Record>),
}

/// A page resolved at the collaborator edge.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub records: Vec<Record>,
    pub total_count: Option<u64>,
}

impl PageResult {
    pub fn into_page(self) -> Page {
        match self {
            PageResult::Bare(records) => Page {
                records,
                total_count: None,
            },
            PageResult::Envelope { body, headers } => {
                let total_count = headers
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(TOTAL_COUNT_HEADER))
                    .and_then(|(_, value)| parse_total_count(value));
                Page {
                    records: body,
                    total_count,
                }
            }
        }
    }
}

/// Parses a total-count header value as a base-10 integer.
pub fn parse_total_count(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

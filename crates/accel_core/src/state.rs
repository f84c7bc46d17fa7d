use std::collections::BTreeSet;

use crate::{normalize, select_source, Batch, Effect, ListView, Mode, Record, SourceKind, Topic};

/// Monotonic tag carried by every fetch or subscription the pipeline issues.
pub type RequestSeq = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Created,
    Mounted,
    TornDown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineState {
    mode: Mode,
    has_external: bool,
    lifecycle: Lifecycle,
    current_page: u32,
    latest_seq: RequestSeq,
    active: Option<SourceKind>,
    is_loading: bool,
    total_count: Option<u64>,
    records: Vec<Record>,
    held: BTreeSet<Topic>,
    dirty: bool,
}

impl PipelineState {
    /// Creates the state for one list. `has_external` records whether the
    /// embedding view supplied its own stream.
    pub fn new(mode: Mode, has_external: bool) -> Self {
        Self {
            mode,
            has_external,
            lifecycle: Lifecycle::Created,
            current_page: 1,
            latest_seq: 0,
            active: None,
            is_loading: true,
            total_count: None,
            records: Vec::new(),
            held: BTreeSet::new(),
            dirty: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn has_external(&self) -> bool {
        self.has_external
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn latest_seq(&self) -> RequestSeq {
        self.latest_seq
    }

    pub fn active_source(&self) -> Option<SourceKind> {
        self.active
    }

    pub fn holds(&self, topic: Topic) -> bool {
        self.held.contains(&topic)
    }

    /// Whether a result tagged with `seq` would still be applied.
    pub fn is_current(&self, seq: RequestSeq) -> bool {
        self.lifecycle == Lifecycle::Mounted && seq == self.latest_seq
    }

    pub fn view(&self) -> ListView {
        let trusts_count = !self.has_external && !self.mode.is_pending();
        ListView {
            records: self.records.clone(),
            is_loading: self.is_loading,
            total_count: self.total_count.filter(|_| trusts_count),
            page: self.current_page,
            skeleton_rows: self.mode.skeleton_rows(),
        }
    }

    /// Returns whether the view changed since the last call, resetting the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mount(&mut self) -> Vec<Effect> {
        self.lifecycle = Lifecycle::Mounted;
        let mut effects = Vec::new();
        if !self.mode.is_widget() {
            effects.extend(self.acquire(Topic::Blocks));
        }
        effects.extend(self.reselect());
        effects
    }

    pub(crate) fn set_page(&mut self, page: u32) {
        self.current_page = page;
        self.dirty = true;
    }

    /// Issues a new request for the current page, superseding any in flight.
    pub(crate) fn reselect(&mut self) -> Vec<Effect> {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        self.is_loading = true;
        self.dirty = true;

        let source = select_source(self.has_external, self.mode, self.current_page);
        let mut effects = Vec::new();
        if self.active.is_some_and(SourceKind::is_live) && !source.is_live() {
            effects.extend(self.release(Topic::Accelerations));
        }
        match source {
            SourceKind::External => effects.push(Effect::AttachExternal { seq }),
            SourceKind::Live => {
                effects.extend(self.acquire(Topic::Accelerations));
                effects.push(Effect::AttachLive { seq });
            }
            SourceKind::Paged { page } => effects.push(Effect::FetchPage { seq, page }),
        }
        self.active = Some(source);
        effects
    }

    pub(crate) fn apply_batch(&mut self, batch: Batch) {
        let from_page = matches!(batch, Batch::Page(_));
        let (records, total_count) = batch.into_parts();
        self.records = normalize(records, self.mode);
        self.total_count = if from_page && self.active.is_some_and(SourceKind::is_paged) {
            total_count
        } else {
            None
        };
        self.is_loading = false;
        self.dirty = true;
    }

    pub(crate) fn apply_failure(&mut self) {
        self.records.clear();
        self.is_loading = false;
        self.dirty = true;
    }

    /// Drops a topic whose acquisition failed, so the next selection asks
    /// again and teardown does not release interest it never had. A live
    /// request left without its feed is retired and shows as failed.
    pub(crate) fn forget(&mut self, topic: Topic) -> Vec<Effect> {
        if !self.held.remove(&topic) {
            return Vec::new();
        }
        let waiting_on_feed = topic == Topic::Accelerations
            && self.lifecycle == Lifecycle::Mounted
            && self.active.is_some_and(SourceKind::is_live);
        if !waiting_on_feed {
            return Vec::new();
        }
        self.latest_seq += 1;
        self.apply_failure();
        vec![Effect::Detach]
    }

    pub(crate) fn tear_down(&mut self) -> Vec<Effect> {
        self.lifecycle = Lifecycle::TornDown;
        self.active = None;
        let mut effects = vec![Effect::Detach];
        let held: Vec<Topic> = self.held.iter().copied().collect();
        for topic in held {
            effects.extend(self.release(topic));
        }
        effects
    }

    fn acquire(&mut self, topic: Topic) -> Option<Effect> {
        self.held.insert(topic).then_some(Effect::Acquire(topic))
    }

    fn release(&mut self, topic: Topic) -> Option<Effect> {
        self.held.remove(&topic).then_some(Effect::Release(topic))
    }
}

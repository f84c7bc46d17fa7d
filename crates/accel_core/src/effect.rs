use crate::RequestSeq;

/// Push-channel topics the pipeline can register interest in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    /// In-flight acceleration snapshots.
    Accelerations,
    /// New block notifications, wanted by the full-page list.
    Blocks,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Accelerations => "accelerations",
            Topic::Blocks => "blocks",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Register interest in a push topic.
    Acquire(Topic),
    /// Drop interest in a push topic.
    Release(Topic),
    /// Fetch one history page; the result must be reported with `seq`.
    FetchPage { seq: RequestSeq, page: u32 },
    /// Start reading live snapshots, reporting each with `seq`.
    AttachLive { seq: RequestSeq },
    /// Start reading the externally supplied stream, reporting each batch with `seq`.
    AttachExternal { seq: RequestSeq },
    /// Stop whatever source task is running.
    Detach,
}

use crate::{Effect, Lifecycle, Msg, PipelineState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PipelineState, msg: Msg) -> (PipelineState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => match state.lifecycle() {
            Lifecycle::Created => state.mount(),
            Lifecycle::Mounted | Lifecycle::TornDown => Vec::new(),
        },
        Msg::PageRequested(page) => match state.lifecycle() {
            // The cursor remembers the page so the first selection uses it.
            Lifecycle::Created => {
                state.set_page(page);
                Vec::new()
            }
            Lifecycle::Mounted => {
                state.set_page(page);
                state.reselect()
            }
            Lifecycle::TornDown => Vec::new(),
        },
        Msg::SourceEmitted { seq, batch } => {
            if state.is_current(seq) {
                state.apply_batch(batch);
            }
            Vec::new()
        }
        Msg::SourceFailed { seq, error: _ } => {
            if state.is_current(seq) {
                state.apply_failure();
            }
            Vec::new()
        }
        Msg::AcquireFailed(topic) => state.forget(topic),
        Msg::Unmounted => match state.lifecycle() {
            Lifecycle::TornDown => Vec::new(),
            Lifecycle::Created | Lifecycle::Mounted => state.tear_down(),
        },
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

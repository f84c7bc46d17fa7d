use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

use accel_core::{
    update, Batch, Effect, ListView, Mode, Msg, PipelineState, RequestSeq, SourceError,
};
use accel_logging::{accel_debug, accel_trace, accel_warn};
use futures_util::StreamExt;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{HistoryClient, RecordStream, SubscriptionRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub mode: Mode,
    pub initial_page: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            initial_page: 1,
        }
    }
}

/// Collaborators a pipeline reads from.
#[derive(Clone)]
pub struct Sources {
    pub history: Arc<dyn HistoryClient>,
    pub live: Arc<dyn RecordStream>,
    pub registry: Arc<SubscriptionRegistry>,
    /// Replaces both the live and the paged source when present.
    pub external: Option<Arc<dyn RecordStream>>,
}

enum Command {
    SetPage(u32),
    Shutdown(oneshot::Sender<()>),
}

/// Handle held by the view layer. Dropping it tears the pipeline down.
pub struct PipelineHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
    view_rx: watch::Receiver<ListView>,
    task: JoinHandle<()>,
}

impl PipelineHandle {
    pub fn set_page(&self, page: u32) {
        let _ = self.cmd_tx.send(Command::SetPage(page));
    }

    pub fn view(&self) -> watch::Receiver<ListView> {
        self.view_rx.clone()
    }

    /// Tears the pipeline down and waits until its subscriptions are released.
    pub async fn shutdown(self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.cmd_tx.send(Command::Shutdown(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
        let _ = self.task.await;
    }
}

pub struct PipelineDriver {
    state: PipelineState,
    sources: Sources,
    msg_tx: mpsc::UnboundedSender<Msg>,
    view_tx: watch::Sender<ListView>,
    current: Option<DropGuard>,
}

impl PipelineDriver {
    /// Starts a pipeline on the current tokio runtime.
    pub fn spawn(config: PipelineConfig, sources: Sources) -> PipelineHandle {
        let state = PipelineState::new(config.mode, sources.external.is_some());
        let (view_tx, view_rx) = watch::channel(state.view());
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        let driver = Self {
            state,
            sources,
            msg_tx,
            view_tx,
            current: None,
        };
        let task = tokio::spawn(driver.run(cmd_rx, msg_rx, config.initial_page));

        PipelineHandle {
            cmd_tx,
            view_rx,
            task,
        }
    }

    async fn run(
        mut self,
        mut cmd_rx: mpsc::UnboundedReceiver<Command>,
        mut msg_rx: mpsc::UnboundedReceiver<Msg>,
        initial_page: u32,
    ) {
        if initial_page != self.state.current_page() {
            self.dispatch(Msg::PageRequested(initial_page));
        }
        self.dispatch(Msg::Mounted);

        let ack = loop {
            tokio::select! {
                command = cmd_rx.recv() => match command {
                    Some(Command::SetPage(page)) => self.dispatch(Msg::PageRequested(page)),
                    Some(Command::Shutdown(ack)) => break Some(ack),
                    None => break None,
                },
                Some(msg) = msg_rx.recv() => self.dispatch(msg),
            }
        };

        self.dispatch(Msg::Unmounted);
        if let Some(ack) = ack {
            let _ = ack.send(());
        }
    }

    /// Applies `msg` and every message its effects feed straight back, then
    /// publishes the view once.
    fn dispatch(&mut self, msg: Msg) {
        let mut pending = VecDeque::from([msg]);
        while let Some(msg) = pending.pop_front() {
            self.log_incoming(&msg);

            let placeholder = PipelineState::new(self.state.mode(), self.state.has_external());
            let state = std::mem::replace(&mut self.state, placeholder);
            let (next, effects) = update(state, msg);
            self.state = next;
            for effect in effects {
                pending.extend(self.run_effect(effect));
            }
        }

        if self.state.consume_dirty() {
            self.view_tx.send_replace(self.state.view());
        }
    }

    fn log_incoming(&self, msg: &Msg) {
        match msg {
            Msg::SourceEmitted { seq, .. } if !self.state.is_current(*seq) => {
                accel_debug!(seq = seq; "dropping stale batch");
            }
            Msg::SourceFailed { seq, error } if !self.state.is_current(*seq) => {
                accel_debug!(seq = seq; "dropping stale failure: {}", error);
            }
            Msg::SourceFailed { seq, error } => {
                accel_warn!(seq = seq; "{}; showing an empty list", error);
            }
            _ => {}
        }
    }

    /// Executes one effect. A refused subscription comes back as a message
    /// the core must see before anything else happens.
    fn run_effect(&mut self, effect: Effect) -> Option<Msg> {
        accel_trace!("effect {:?}", effect);
        match effect {
            Effect::Acquire(topic) => {
                if let Err(err) = self.sources.registry.ensure(topic) {
                    accel_warn!("could not subscribe to {}: {}", topic, err);
                    return Some(Msg::AcquireFailed(topic));
                }
            }
            Effect::Release(topic) => {
                if let Err(err) = self.sources.registry.release(topic) {
                    accel_warn!("could not unsubscribe from {}: {}", topic, err);
                }
            }
            Effect::FetchPage { seq, page } => {
                accel_debug!(seq = seq; "fetching page {}", page);
                let history = self.sources.history.clone();
                let tx = self.msg_tx.clone();
                self.replace_task(seq, fetch_page(history, seq, page, tx));
            }
            Effect::AttachLive { seq } => {
                accel_debug!(seq = seq; "attaching live feed");
                let live = self.sources.live.clone();
                let tx = self.msg_tx.clone();
                self.replace_task(seq, forward_stream(live, seq, tx));
            }
            Effect::AttachExternal { seq } => match self.sources.external.clone() {
                Some(external) => {
                    accel_debug!(seq = seq; "attaching external stream");
                    let tx = self.msg_tx.clone();
                    self.replace_task(seq, forward_stream(external, seq, tx));
                }
                None => self.report_failure(seq, "no external stream configured".to_string()),
            },
            Effect::Detach => self.current = None,
        }
        None
    }

    /// Runs `work` as the only source task, cancelling whichever one it supersedes.
    fn replace_task<F>(&mut self, seq: RequestSeq, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => accel_trace!(seq = seq; "source task cancelled"),
                _ = work => {}
            }
        });
        self.current = Some(token.drop_guard());
    }

    fn report_failure(&self, seq: RequestSeq, message: String) {
        let _ = self.msg_tx.send(Msg::SourceFailed {
            seq,
            error: SourceError::Stream(message),
        });
    }
}

async fn fetch_page(
    history: Arc<dyn HistoryClient>,
    seq: RequestSeq,
    page: u32,
    tx: mpsc::UnboundedSender<Msg>,
) {
    let msg = match history.fetch_page(page).await {
        Ok(result) => Msg::SourceEmitted {
            seq,
            batch: Batch::Page(result.into_page()),
        },
        Err(err) => Msg::SourceFailed {
            seq,
            error: SourceError::Fetch(err.to_string()),
        },
    };
    let _ = tx.send(msg);
}

async fn forward_stream(
    source: Arc<dyn RecordStream>,
    seq: RequestSeq,
    tx: mpsc::UnboundedSender<Msg>,
) {
    let mut batches = source.open();
    let mut emitted = false;
    while let Some(batch) = batches.next().await {
        let msg = match batch {
            Ok(records) => {
                emitted = true;
                Msg::SourceEmitted {
                    seq,
                    batch: Batch::Snapshot(records),
                }
            }
            Err(err) => {
                let _ = tx.send(Msg::SourceFailed {
                    seq,
                    error: SourceError::Stream(err.to_string()),
                });
                return;
            }
        };
        if tx.send(msg).is_err() {
            return;
        }
    }

    if !emitted {
        let _ = tx.send(Msg::SourceFailed {
            seq,
            error: SourceError::Stream("stream ended before its first batch".to_string()),
        });
    }
}

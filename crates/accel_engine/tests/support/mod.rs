#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use accel_core::Topic;
use accel_engine::{PushTransport, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Subscribe(Topic),
    Unsubscribe(Topic),
}

/// Transport that records every accepted call and can refuse subscriptions.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<Call>>>,
    /// Subscriptions still to be refused before accepting again.
    refusals_left: AtomicUsize,
    refused: AtomicUsize,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing() -> Self {
        Self::refusing_first(usize::MAX)
    }

    /// Refuses the first `count` subscriptions, then behaves normally.
    pub fn refusing_first(count: usize) -> Self {
        Self {
            refusals_left: AtomicUsize::new(count),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    /// Number of subscriptions turned down so far.
    pub fn refused(&self) -> usize {
        self.refused.load(Ordering::SeqCst)
    }
}

impl PushTransport for RecordingTransport {
    fn subscribe(&self, topic: Topic) -> Result<(), TransportError> {
        let refuse = self
            .refusals_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if refuse {
            self.refused.fetch_add(1, Ordering::SeqCst);
            return Err(TransportError::Closed);
        }
        self.calls.lock().unwrap().push(Call::Subscribe(topic));
        Ok(())
    }

    fn unsubscribe(&self, topic: Topic) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(Call::Unsubscribe(topic));
        Ok(())
    }
}

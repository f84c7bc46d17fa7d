use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use accel_core::Topic;
use accel_logging::{accel_info, accel_warn};

use crate::TransportError;

/// Upstream push channel able to turn topics on and off.
pub trait PushTransport: Send + Sync {
    fn subscribe(&self, topic: Topic) -> Result<(), TransportError>;
    fn unsubscribe(&self, topic: Topic) -> Result<(), TransportError>;
}

/// Process-wide, reference-counted interest in push topics.
///
/// Many lists share one channel; the transport only hears about a topic when
/// its interest count moves between zero and one.
pub struct SubscriptionRegistry {
    transport: Arc<dyn PushTransport>,
    interest: Mutex<HashMap<Topic, usize>>,
}

impl SubscriptionRegistry {
    pub fn new(transport: Arc<dyn PushTransport>) -> Self {
        Self {
            transport,
            interest: Mutex::new(HashMap::new()),
        }
    }

    pub fn ensure(&self, topic: Topic) -> Result<(), TransportError> {
        let mut interest = self.lock();
        let count = interest.entry(topic).or_insert(0);
        *count += 1;
        if *count > 1 {
            return Ok(());
        }

        accel_info!("subscribing to {}", topic);
        if let Err(err) = self.transport.subscribe(topic) {
            interest.remove(&topic);
            return Err(err);
        }
        Ok(())
    }

    /// Drops one unit of interest. Releasing a topic nobody holds is ignored.
    pub fn release(&self, topic: Topic) -> Result<(), TransportError> {
        let mut interest = self.lock();
        let Some(count) = interest.get_mut(&topic) else {
            accel_warn!("release of {} without matching ensure", topic);
            return Ok(());
        };
        *count -= 1;
        if *count > 0 {
            return Ok(());
        }

        interest.remove(&topic);
        accel_info!("unsubscribing from {}", topic);
        self.transport.unsubscribe(topic)
    }

    pub fn interest(&self, topic: Topic) -> usize {
        self.lock().get(&topic).copied().unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Topic, usize>> {
        self.interest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

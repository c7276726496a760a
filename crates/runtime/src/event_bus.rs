//! Typed fan-out channels.
//!
//! Every subscriber owns its own unbounded queue, so `publish` never blocks and
//! each subscriber observes events in publish order. Ordering across different
//! channels is not coordinated.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(pub u64);

struct Inner<T> {
    next_id: u64,
    published: u64,
    subscribers: Vec<(SubscriberId, mpsc::UnboundedSender<T>)>,
}

impl<T> Inner<T> {
    fn remove(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }
}

/// A named publish/subscribe channel carrying one event type.
pub struct Channel<T> {
    name: &'static str,
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T: Clone> Channel<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(Inner {
                next_id: 0,
                published: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Delivers `event` to every current subscriber.
    ///
    /// Returns the number of subscribers that received it. Subscribers whose
    /// receiving end has gone away are pruned.
    pub fn publish(&self, event: T) -> usize {
        let mut inner = self.inner.lock();
        inner.published += 1;
        let mut delivered = 0usize;
        inner.subscribers.retain(|(_, tx)| match tx.send(event.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(_) => false,
        });
        trace!(channel = self.name, delivered, "published event");
        delivered
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        let id = SubscriberId(inner.next_id);
        inner.next_id = inner.next_id.wrapping_add(1);
        inner.subscribers.push((id, tx));
        Subscription {
            id,
            channel: self.name,
            rx,
            registry: Some(Arc::downgrade(&self.inner)),
        }
    }
}

impl<T> Channel<T> {
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// Total number of events published so far.
    pub fn published(&self) -> u64 {
        self.inner.lock().published
    }
}

/// Receiving handle for one subscriber.
///
/// Call [`Subscription::unsubscribe`] to stop receiving; dropping the handle
/// releases it as well.
pub struct Subscription<T> {
    id: SubscriberId,
    channel: &'static str,
    rx: mpsc::UnboundedReceiver<T>,
    registry: Option<Weak<Mutex<Inner<T>>>>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn channel(&self) -> &'static str {
        self.channel
    }

    pub fn is_active(&self) -> bool {
        self.registry.is_some()
    }

    /// Next pending event without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// All events queued so far, in publish order.
    pub fn drain(&mut self) -> Vec<T> {
        let mut out = Vec::new();
        while let Ok(ev) = self.rx.try_recv() {
            out.push(ev);
        }
        out
    }

    /// Waits for the next event. Returns `None` once unsubscribed or the
    /// channel is gone and the queue is empty.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(registry) = self.registry.take() else {
            return;
        };
        if let Some(inner) = registry.upgrade() {
            inner.lock().remove(self.id);
            trace!(channel = self.channel, id = self.id.0, "unsubscribed");
        }
        self.rx.close();
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.release();
    }
}

//! Subscriber registry
//!
//! Live subscriber connections keyed by connection identity. The registry
//! itself is not synchronized; [`BroadcastHub`](super::BroadcastHub) owns it
//! behind a single lock.

use chrono::{DateTime, Utc};
use harmwatch_core::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{SendTimeoutError, TryRecvError};
use uuid::Uuid;

/// Serialized event as pushed to subscribers, shared across all of them
pub type Payload = Arc<str>;

/// Identity of one subscriber connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection lifecycle. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// Hub-side end of a subscriber connection
#[derive(Debug, Clone)]
pub struct SubscriberHandle {
    sender: mpsc::Sender<Payload>,
    connected_at: DateTime<Utc>,
}

impl SubscriberHandle {
    pub fn new(sender: mpsc::Sender<Payload>) -> Self {
        Self {
            sender,
            connected_at: Utc::now(),
        }
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Queue `payload` for the subscriber, waiting at most `timeout` for
    /// buffer space
    pub async fn deliver(&self, payload: Payload, timeout: Duration) -> Result<()> {
        self.sender
            .send_timeout(payload, timeout)
            .await
            .map_err(|e| match e {
                SendTimeoutError::Timeout(_) => Error::Timeout,
                SendTimeoutError::Closed(_) => {
                    Error::delivery_failure("subscriber connection is gone")
                }
            })
    }
}

/// Subscriber-side end of a connection
#[derive(Debug)]
pub struct Subscription {
    id: ConnectionId,
    receiver: mpsc::Receiver<Payload>,
    state: ConnectionState,
}

impl Subscription {
    pub(crate) fn new(id: ConnectionId, receiver: mpsc::Receiver<Payload>) -> Self {
        Self {
            id,
            receiver,
            state: ConnectionState::Connecting,
        }
    }

    pub(crate) fn open(&mut self) {
        if self.state == ConnectionState::Connecting {
            self.state = ConnectionState::Open;
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Next broadcast payload. Returns `None` once the hub has dropped this
    /// subscriber and the buffer is drained.
    pub async fn recv(&mut self) -> Option<Payload> {
        let payload = self.receiver.recv().await;
        if payload.is_none() {
            self.state = ConnectionState::Closed;
        }
        payload
    }

    /// Non-blocking variant of [`recv`](Self::recv)
    pub fn try_recv(&mut self) -> Option<Payload> {
        match self.receiver.try_recv() {
            Ok(payload) => Some(payload),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.state = ConnectionState::Closed;
                None
            }
        }
    }

    /// Stop accepting payloads. Later sends from the hub fail, which gets
    /// this subscriber pruned on the next broadcast.
    pub fn close(&mut self) {
        self.receiver.close();
        self.state = ConnectionState::Closed;
    }
}

/// Set of live subscribers
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    entries: HashMap<ConnectionId, SubscriberHandle>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber. Re-inserting a known id is a no-op and returns `false`.
    pub fn insert(&mut self, id: ConnectionId, handle: SubscriberHandle) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, handle);
        true
    }

    /// Remove a subscriber; `false` if it was not registered
    pub fn remove(&mut self, id: &ConnectionId) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Remove every id in `dead`, returning how many were present
    pub fn prune(&mut self, dead: &[ConnectionId]) -> usize {
        dead.iter().filter(|id| self.remove(id)).count()
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&SubscriberHandle> {
        self.entries.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConnectionId, &SubscriberHandle)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> (SubscriberHandle, mpsc::Receiver<Payload>) {
        let (tx, rx) = mpsc::channel(4);
        (SubscriberHandle::new(tx), rx)
    }

    #[test]
    fn test_insert_is_set_semantic() {
        let mut registry = SubscriberRegistry::new();
        let id = ConnectionId::new();
        let (first, _rx1) = handle();
        let (second, _rx2) = handle();

        assert!(registry.insert(id, first));
        assert!(!registry.insert(id, second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = SubscriberRegistry::new();
        let id = ConnectionId::new();
        let (h, _rx) = handle();
        registry.insert(id, h);

        assert!(registry.remove(&id));
        assert!(!registry.remove(&id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_prune_counts_only_present() {
        let mut registry = SubscriberRegistry::new();
        let (a, b, stranger) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
        let (ha, _ra) = handle();
        let (hb, _rb) = handle();
        registry.insert(a, ha);
        registry.insert(b, hb);

        assert_eq!(registry.prune(&[a, stranger]), 1);
        assert!(!registry.contains(&a));
        assert!(registry.contains(&b));
    }

    #[tokio::test]
    async fn test_deliver_to_closed_receiver_fails() {
        let (h, rx) = handle();
        drop(rx);

        let err = h
            .deliver(Arc::from("{}"), Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DeliveryFailure(_)));
    }

    #[tokio::test]
    async fn test_deliver_to_full_buffer_times_out() {
        let (tx, _rx) = mpsc::channel(1);
        let h = SubscriberHandle::new(tx);

        h.deliver(Arc::from("1"), Duration::from_millis(10)).await.unwrap();
        let err = h
            .deliver(Arc::from("2"), Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout));
    }

    #[tokio::test]
    async fn test_subscription_closes_when_sender_dropped() {
        let (tx, rx) = mpsc::channel(4);
        let mut sub = Subscription::new(ConnectionId::new(), rx);
        sub.open();
        assert_eq!(sub.state(), ConnectionState::Open);

        tx.send(Arc::from("x")).await.unwrap();
        drop(tx);

        assert_eq!(sub.recv().await.as_deref(), Some("x"));
        assert_eq!(sub.recv().await, None);
        assert_eq!(sub.state(), ConnectionState::Closed);
    }
}

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Handle for a connected observer
pub type ConnectionId = String;

/// A notification payload, serialized once per dispatch and shared across
/// every delivery attempt
pub type NotificationPayload = Arc<str>;

/// Message sender for an observer connection
pub type PayloadSender = mpsc::UnboundedSender<NotificationPayload>;

/// Subscriber information
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub connection_id: ConnectionId,
    pub sender: PayloadSender,
}

/// In-memory registry of currently-connected observers.
///
/// The set is flat: connection identity is the only key, there is no
/// per-user partitioning. The hub is constructed once at process start and
/// shared by the transport layer and the dispatcher.
#[derive(Clone)]
pub struct SubscriberHub {
    connections: Arc<DashMap<ConnectionId, Subscriber>>,
}

impl SubscriberHub {
    /// Create a new SubscriberHub
    pub fn new() -> Self {
        Self {
            connections: Arc::new(DashMap::new()),
        }
    }

    /// Register a new observer.
    /// Returns the connection id and the receiving end of its channel.
    pub fn subscribe(&self) -> (ConnectionId, mpsc::UnboundedReceiver<NotificationPayload>) {
        let connection_id: ConnectionId = nanoid::nanoid!(12);
        let (tx, rx) = mpsc::unbounded_channel();

        self.connections.insert(
            connection_id.clone(),
            Subscriber {
                connection_id: connection_id.clone(),
                sender: tx,
            },
        );

        info!(
            connection_id = %connection_id,
            subscriber_count = self.connections.len(),
            "Subscriber registered"
        );

        (connection_id, rx)
    }

    /// Remove an observer. Removing an absent connection is a no-op, so the
    /// disconnect path and the failed-delivery path may both call this for
    /// the same connection.
    pub fn unsubscribe(&self, connection_id: &str) {
        if self.connections.remove(connection_id).is_some() {
            info!(
                connection_id = %connection_id,
                subscriber_count = self.connections.len(),
                "Subscriber removed"
            );
        } else {
            debug!(
                connection_id = %connection_id,
                "Subscriber already removed"
            );
        }
    }

    /// Point-in-time copy of the current subscriber set.
    ///
    /// Delivery iterates the copy, never the live map, so a slow observer
    /// cannot hold up concurrent subscribe/unsubscribe calls.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Subscriber> {
        self.connections
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of currently-connected observers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for SubscriberHub {
    fn default() -> Self {
        Self::new()
    }
}

//! Broadcast dispatch of committed records to connected observers
//!
//! A dispatch serializes the event once, snapshots the registry, and
//! attempts delivery to each observer independently. A broken observer is
//! removed from the registry; it never fails the write path.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::hub::{NotificationPayload, SubscriberHub};
use crate::models::TelemetryRecord;

/// Store events observers are notified about
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TelemetryEvent {
    /// A record was committed by a batch ingest
    RecordCreated { record: TelemetryRecord },
    /// A record was replaced by an explicit update
    RecordUpdated { record: TelemetryRecord },
}

impl TelemetryEvent {
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RecordCreated { .. } => "record_created",
            Self::RecordUpdated { .. } => "record_updated",
        }
    }
}

/// Fan-out dispatcher over the subscriber hub
#[derive(Clone)]
pub struct TelemetryNotifier {
    hub: Arc<SubscriberHub>,
}

impl TelemetryNotifier {
    pub fn new(hub: Arc<SubscriberHub>) -> Self {
        Self { hub }
    }

    /// Deliver one event to every observer in the current snapshot.
    ///
    /// Sends are non-blocking; a failed send means the observer's receiving
    /// task is gone, so the connection is unsubscribed and delivery moves
    /// on. Returns the number of successful deliveries.
    pub fn dispatch(&self, event: &TelemetryEvent) -> usize {
        let payload: NotificationPayload = match serde_json::to_string(event) {
            Ok(json) => Arc::from(json),
            Err(err) => {
                error!(error = %err, "Failed to serialize notification, dropping dispatch");
                return 0;
            }
        };

        let snapshot = self.hub.snapshot();
        let mut delivered = 0;

        for subscriber in &snapshot {
            match subscriber.sender.send(payload.clone()) {
                Ok(()) => {
                    delivered += 1;
                }
                Err(_) => {
                    warn!(
                        connection_id = %subscriber.connection_id,
                        event_type = %event.event_type(),
                        "Subscriber channel closed, removing from registry"
                    );
                    self.hub.unsubscribe(&subscriber.connection_id);
                }
            }
        }

        if delivered > 0 {
            debug!(
                delivered,
                event_type = %event.event_type(),
                "Dispatch complete"
            );
        }

        delivered
    }

    /// Notify observers of a freshly committed record
    pub fn notify_record_created(&self, record: &TelemetryRecord) -> usize {
        self.dispatch(&TelemetryEvent::RecordCreated {
            record: record.clone(),
        })
    }

    /// Notify observers of a replaced record
    pub fn notify_record_updated(&self, record: &TelemetryRecord) -> usize {
        self.dispatch(&TelemetryEvent::RecordUpdated {
            record: record.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccelerometerReading, AgentPayload, GpsFix, TelemetryInput};

    fn sample_record(id: i64) -> TelemetryRecord {
        let input = TelemetryInput {
            road_state: "clear".to_string(),
            agent_data: AgentPayload {
                accelerometer: AccelerometerReading {
                    x: 1.0,
                    y: 2.0,
                    z: 3.0,
                },
                gps: GpsFix {
                    latitude: 10.0,
                    longitude: 20.0,
                },
                timestamp: "2024-01-01T00:00:00Z".parse().expect("valid timestamp"),
            },
        };
        TelemetryRecord::from_input(id, &input)
    }

    #[tokio::test]
    async fn test_all_subscribers_receive_dispatch() {
        let hub = Arc::new(SubscriberHub::new());
        let notifier = TelemetryNotifier::new(hub.clone());

        let (_id1, mut rx1) = hub.subscribe();
        let (_id2, mut rx2) = hub.subscribe();

        let delivered = notifier.notify_record_created(&sample_record(1));
        assert_eq!(delivered, 2);

        let payload1 = rx1.recv().await.expect("subscriber 1 notified");
        let payload2 = rx2.recv().await.expect("subscriber 2 notified");

        // Serialized once: every subscriber sees the same allocation
        assert!(Arc::ptr_eq(&payload1, &payload2));

        let event: TelemetryEvent =
            serde_json::from_str(&payload1).expect("payload is a tagged event");
        match event {
            TelemetryEvent::RecordCreated { record } => assert_eq!(record.id, 1),
            other => panic!("expected RecordCreated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dead_subscriber_is_removed_and_others_still_receive() {
        let hub = Arc::new(SubscriberHub::new());
        let notifier = TelemetryNotifier::new(hub.clone());

        let (_dead_id, dead_rx) = hub.subscribe();
        let (_live_id, mut live_rx) = hub.subscribe();
        drop(dead_rx);

        let delivered = notifier.notify_record_created(&sample_record(2));
        assert_eq!(delivered, 1);
        assert_eq!(hub.subscriber_count(), 1);

        assert!(live_rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_dispatch_does_not_wait_for_consumers() {
        let hub = Arc::new(SubscriberHub::new());
        let notifier = TelemetryNotifier::new(hub.clone());

        // The receiver is never read from; dispatch must still complete.
        let (_id, mut rx) = hub.subscribe();

        for i in 0..100 {
            assert_eq!(notifier.notify_record_created(&sample_record(i)), 1);
        }

        assert_eq!(rx.len(), 100);
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_subscriber_added_after_dispatch_sees_nothing() {
        let hub = Arc::new(SubscriberHub::new());
        let notifier = TelemetryNotifier::new(hub.clone());

        let (_id_a, mut rx_a) = hub.subscribe();
        notifier.notify_record_updated(&sample_record(3));
        let (_id_b, mut rx_b) = hub.subscribe();

        assert!(rx_a.recv().await.is_some());
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn test_event_payload_is_tagged() {
        let event = TelemetryEvent::RecordCreated {
            record: sample_record(9),
        };
        let json = serde_json::to_string(&event).expect("serializable");
        assert!(json.contains("\"type\""));
        assert!(json.contains("RecordCreated"));
        assert!(json.contains("\"road_state\":\"clear\""));
    }
}

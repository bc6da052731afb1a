pub mod hub;
pub mod notify;
pub mod telemetry;

pub use hub::{ConnectionId, NotificationPayload, Subscriber, SubscriberHub};
pub use notify::{TelemetryEvent, TelemetryNotifier};
pub use telemetry::{IngestReceipt, TelemetryService};

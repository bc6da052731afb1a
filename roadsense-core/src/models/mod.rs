pub mod telemetry;

pub use telemetry::{AccelerometerReading, AgentPayload, GpsFix, TelemetryInput, TelemetryRecord};

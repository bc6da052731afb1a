pub mod telemetry;

pub use telemetry::TelemetryRepository;

//! Structural validation of ingress telemetry
//!
//! A batch is validated in full before any storage call is made; the first
//! failing element rejects the whole batch.

use crate::models::{AgentPayload, TelemetryInput};

// Canonical validation limits
/// Maximum road-state classification length in bytes
pub const ROAD_STATE_MAX: usize = 64;
/// Latitude bounds in degrees
pub const LATITUDE_MIN: f64 = -90.0;
pub const LATITUDE_MAX: f64 = 90.0;
/// Longitude bounds in degrees
pub const LONGITUDE_MIN: f64 = -180.0;
pub const LONGITUDE_MAX: f64 = 180.0;

/// Validation error
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid {field}: {message}")]
    Field { field: String, message: String },
}

impl ValidationError {
    fn field(field: &str, message: impl Into<String>) -> Self {
        Self::Field {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Prefix the failing field with its batch position.
    fn at_index(self, index: usize) -> Self {
        match self {
            Self::Field { field, message } => Self::Field {
                field: format!("element {index}: {field}"),
                message,
            },
        }
    }
}

/// Validation result
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate the road-state classification string
pub fn validate_road_state(road_state: &str) -> ValidationResult<()> {
    if road_state.is_empty() {
        return Err(ValidationError::field("road_state", "must not be empty"));
    }
    if road_state.len() > ROAD_STATE_MAX {
        return Err(ValidationError::field(
            "road_state",
            format!("must be at most {ROAD_STATE_MAX} bytes"),
        ));
    }
    Ok(())
}

/// Validate the sensor payload: finite accelerometer components and a GPS
/// fix inside geographic bounds. Non-finite floats are rejected here because
/// they cannot be re-serialized into a notification payload.
pub fn validate_payload(payload: &AgentPayload) -> ValidationResult<()> {
    for (name, value) in [
        ("accelerometer.x", payload.accelerometer.x),
        ("accelerometer.y", payload.accelerometer.y),
        ("accelerometer.z", payload.accelerometer.z),
    ] {
        if !value.is_finite() {
            return Err(ValidationError::field(name, "must be a finite number"));
        }
    }

    let lat = payload.gps.latitude;
    if !lat.is_finite() || !(LATITUDE_MIN..=LATITUDE_MAX).contains(&lat) {
        return Err(ValidationError::field(
            "gps.latitude",
            format!("must be between {LATITUDE_MIN} and {LATITUDE_MAX}"),
        ));
    }

    let lon = payload.gps.longitude;
    if !lon.is_finite() || !(LONGITUDE_MIN..=LONGITUDE_MAX).contains(&lon) {
        return Err(ValidationError::field(
            "gps.longitude",
            format!("must be between {LONGITUDE_MIN} and {LONGITUDE_MAX}"),
        ));
    }

    Ok(())
}

/// Validate one ingress element
pub fn validate_input(input: &TelemetryInput) -> ValidationResult<()> {
    validate_road_state(&input.road_state)?;
    validate_payload(&input.agent_data)
}

/// Validate a whole batch; any failure rejects the batch before storage is
/// touched.
pub fn validate_batch(batch: &[TelemetryInput]) -> ValidationResult<()> {
    for (index, input) in batch.iter().enumerate() {
        validate_input(input).map_err(|err| err.at_index(index))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccelerometerReading, GpsFix};

    fn sample_input() -> TelemetryInput {
        TelemetryInput {
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
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(validate_input(&sample_input()).is_ok());
    }

    #[test]
    fn test_empty_road_state_rejected() {
        let mut input = sample_input();
        input.road_state = String::new();
        assert!(validate_input(&input).is_err());
    }

    #[test]
    fn test_oversized_road_state_rejected() {
        let mut input = sample_input();
        input.road_state = "x".repeat(ROAD_STATE_MAX + 1);
        assert!(validate_input(&input).is_err());
    }

    #[test]
    fn test_latitude_out_of_range_rejected() {
        let mut input = sample_input();
        input.agent_data.gps.latitude = 90.5;
        assert!(validate_input(&input).is_err());
    }

    #[test]
    fn test_nan_accelerometer_rejected() {
        let mut input = sample_input();
        input.agent_data.accelerometer.y = f64::NAN;
        assert!(validate_input(&input).is_err());
    }

    #[test]
    fn test_batch_fails_on_any_bad_element() {
        let good = sample_input();
        let mut bad = sample_input();
        bad.agent_data.gps.longitude = 181.0;

        let err = validate_batch(&[good.clone(), bad]).expect_err("batch should fail");
        assert!(err.to_string().contains("element 1"));

        assert!(validate_batch(&[good]).is_ok());
    }

    #[test]
    fn test_empty_batch_is_valid() {
        assert!(validate_batch(&[]).is_ok());
    }
}

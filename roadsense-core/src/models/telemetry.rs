use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Accelerometer vector reported by a field agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelerometerReading {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// GPS fix reported by a field agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    pub latitude: f64,
    pub longitude: f64,
}

/// Sensor payload of one telemetry submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPayload {
    pub accelerometer: AccelerometerReading,
    pub gps: GpsFix,
    pub timestamp: DateTime<Utc>,
}

/// One element of an ingress batch: a road-state classification plus the
/// sensor payload it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryInput {
    pub road_state: String,
    pub agent_data: AgentPayload,
}

/// A persisted telemetry record. `id` is assigned by storage and immutable;
/// every other field is replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub id: i64,
    pub road_state: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl TelemetryRecord {
    /// Pair a freshly assigned id with the input it was committed from.
    #[must_use]
    pub fn from_input(id: i64, input: &TelemetryInput) -> Self {
        Self {
            id,
            road_state: input.road_state.clone(),
            x: input.agent_data.accelerometer.x,
            y: input.agent_data.accelerometer.y,
            z: input.agent_data.accelerometer.z,
            latitude: input.agent_data.gps.latitude,
            longitude: input.agent_data.gps.longitude,
            timestamp: input.agent_data.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_deserializes_agent_wire_format() {
        let json = r#"{
            "road_state": "clear",
            "agent_data": {
                "accelerometer": {"x": 1.0, "y": 2.0, "z": 3.0},
                "gps": {"latitude": 10.0, "longitude": 20.0},
                "timestamp": "2024-01-01T00:00:00Z"
            }
        }"#;

        let input: TelemetryInput = serde_json::from_str(json).expect("valid wire payload");
        assert_eq!(input.road_state, "clear");
        assert_eq!(input.agent_data.accelerometer.z, 3.0);
        assert_eq!(input.agent_data.gps.latitude, 10.0);
    }

    #[test]
    fn test_input_rejects_missing_nested_field() {
        let json = r#"{
            "road_state": "clear",
            "agent_data": {
                "accelerometer": {"x": 1.0, "y": 2.0},
                "gps": {"latitude": 10.0, "longitude": 20.0},
                "timestamp": "2024-01-01T00:00:00Z"
            }
        }"#;

        assert!(serde_json::from_str::<TelemetryInput>(json).is_err());
    }

    #[test]
    fn test_record_from_input_flattens_payload() {
        let input = TelemetryInput {
            road_state: "bumpy".to_string(),
            agent_data: AgentPayload {
                accelerometer: AccelerometerReading {
                    x: 0.1,
                    y: -0.2,
                    z: 9.8,
                },
                gps: GpsFix {
                    latitude: 50.45,
                    longitude: 30.52,
                },
                timestamp: "2024-01-01T00:00:00Z".parse().expect("valid timestamp"),
            },
        };

        let record = TelemetryRecord::from_input(7, &input);
        assert_eq!(record.id, 7);
        assert_eq!(record.road_state, "bumpy");
        assert_eq!(record.z, 9.8);
        assert_eq!(record.longitude, 30.52);
        assert_eq!(record.timestamp, input.agent_data.timestamp);
    }
}

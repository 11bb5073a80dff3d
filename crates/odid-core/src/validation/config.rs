use serde::{Deserialize, Serialize};

use super::error::ConfigError;

pub const DEFAULT_REFERENCE_LAT: f64 = 37.7749;
pub const DEFAULT_REFERENCE_LON: f64 = -122.4194;
pub const DEFAULT_MAX_DISTANCE_M: f64 = 1000.0;
pub const DEFAULT_MAX_HORIZONTAL_SPEED_MPS: f64 = 100.0;
pub const DEFAULT_MAX_VERTICAL_SPEED_MPS: f64 = 50.0;
pub const DEFAULT_OPERATOR_ALLOW_LIST: [&str; 3] = ["FAA12345", "NASA54321", "DOD98765"];

/// Thresholds and reference data for plausibility checks.
///
/// Every field has a default, so a JSON document only needs the fields it
/// overrides.
///
/// # Examples
/// ```
/// use odid_core::ValidationConfig;
///
/// let config = ValidationConfig::from_json_str(r#"{"max_distance_m": 250.0}"#).unwrap();
/// assert_eq!(config.max_distance_m, 250.0);
/// assert_eq!(config.reference_lat, 37.7749);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    pub reference_lat: f64,
    pub reference_lon: f64,
    pub max_distance_m: f64,
    pub max_horizontal_speed_mps: f64,
    pub max_vertical_speed_mps: f64,
    pub operator_allow_list: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            reference_lat: DEFAULT_REFERENCE_LAT,
            reference_lon: DEFAULT_REFERENCE_LON,
            max_distance_m: DEFAULT_MAX_DISTANCE_M,
            max_horizontal_speed_mps: DEFAULT_MAX_HORIZONTAL_SPEED_MPS,
            max_vertical_speed_mps: DEFAULT_MAX_VERTICAL_SPEED_MPS,
            operator_allow_list: DEFAULT_OPERATOR_ALLOW_LIST
                .iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

impl ValidationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    pub fn with_reference(mut self, lat: f64, lon: f64) -> Result<Self, ConfigError> {
        self.reference_lat = lat;
        self.reference_lon = lon;
        self.check()?;
        Ok(self)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if !(-90.0..=90.0).contains(&self.reference_lat) {
            return Err(ConfigError::OutOfRange {
                field: "reference_lat",
                value: self.reference_lat,
            });
        }
        if !(-180.0..=180.0).contains(&self.reference_lon) {
            return Err(ConfigError::OutOfRange {
                field: "reference_lon",
                value: self.reference_lon,
            });
        }
        for (field, value) in [
            ("max_distance_m", self.max_distance_m),
            ("max_horizontal_speed_mps", self.max_horizontal_speed_mps),
            ("max_vertical_speed_mps", self.max_vertical_speed_mps),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        Ok(())
    }

    pub fn is_allowed_operator(&self, id: &str) -> bool {
        self.operator_allow_list.iter().any(|allowed| allowed == id)
    }
}

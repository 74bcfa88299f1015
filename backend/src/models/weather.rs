use serde::{Deserialize, Serialize};

/// Weather conditions captured at the moment a mood is logged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeatherSnapshot {
    /// Lowercase category, e.g. "clear", "clouds", "rain".
    pub condition: String,
    /// Degrees Celsius, halves rounded up.
    pub temperature: i32,
    pub description: String,
    /// Relative humidity in percent.
    pub humidity: i32,
    pub city: String,
}

pub const UNKNOWN_CONDITION: &str = "unknown";
pub const UNKNOWN_CITY: &str = "Unknown";

impl WeatherSnapshot {
    /// Stand-in used whenever live weather can't be obtained.
    pub fn unavailable() -> Self {
        Self {
            condition: UNKNOWN_CONDITION.into(),
            temperature: 20,
            description: "Weather data unavailable".into(),
            humidity: 50,
            city: UNKNOWN_CITY.into(),
        }
    }
}

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Cloudy,
    Overcast,
    Rain,
    Snow,
    Fog,
}

impl WeatherCondition {
    pub fn is_precipitation(self) -> bool {
        matches!(self, Self::Rain | Self::Snow)
    }
}

/// Normalized weather for one location. Temperatures are in °C, humidity in
/// percent and wind speed in m/s.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub current_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub condition: WeatherCondition,
}

impl WeatherSummary {
    pub fn new(condition: WeatherCondition) -> Self {
        Self {
            region: None,
            current_temp: None,
            max_temp: None,
            min_temp: None,
            humidity: None,
            wind_speed: None,
            condition,
        }
    }

    pub fn with_current_temp(mut self, value: f64) -> Self {
        self.current_temp = Some(value);
        self
    }

    pub fn with_humidity(mut self, value: f64) -> Self {
        self.humidity = Some(value);
        self
    }

    pub fn with_wind_speed(mut self, value: f64) -> Self {
        self.wind_speed = Some(value);
        self
    }

    pub fn with_range(mut self, min_temp: f64, max_temp: f64) -> Self {
        self.min_temp = Some(min_temp);
        self.max_temp = Some(max_temp);
        self
    }

    /// Current temperature, falling back to the midpoint of the daily range.
    pub fn effective_temp(&self) -> Option<f64> {
        self.current_temp.or(match (self.min_temp, self.max_temp) {
            (Some(min), Some(max)) => Some((min + max) / 2.0),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_temp_prefers_current_then_range_midpoint() {
        let current = WeatherSummary::new(WeatherCondition::Clear).with_current_temp(12.0);
        assert_eq!(current.effective_temp(), Some(12.0));

        let range = WeatherSummary::new(WeatherCondition::Clear).with_range(4.0, 14.0);
        assert_eq!(range.effective_temp(), Some(9.0));

        assert_eq!(WeatherSummary::new(WeatherCondition::Fog).effective_temp(), None);
    }

    #[test]
    fn summary_uses_camel_case_on_the_wire() {
        let summary = WeatherSummary::new(WeatherCondition::Rain).with_current_temp(18.5);
        let value = serde_json::to_value(&summary).expect("serialize");

        assert_eq!(value["currentTemp"], 18.5);
        assert_eq!(value["condition"], "rain");
        assert!(value.get("region").is_none());
    }
}

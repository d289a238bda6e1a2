//! Weather to attribute-suitability mapping

use serde::{Deserialize, Serialize};

use crate::domain::weather::WeatherSummary;
use crate::taxonomy::{Length, Material};

/// Scale applied to water resistance and breathability when it is cold.
///
/// Insulating materials sit at least 0.1 above the rest on insulation, while
/// the two secondary traits can differ by at most 2 x 0.04, so insulation
/// alone decides the material ranking in the cold.
const COLD_SECONDARY_SCALE: f64 = 0.04;

/// Cut-offs that turn raw weather readings into suitability signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityThresholds {
    /// At or below this temperature (°C) insulation is favored.
    pub cold_temp: f64,
    /// At or above this temperature (°C) light, short garments are favored.
    pub hot_temp: f64,
    /// Relative humidity (%) treated as muggy.
    pub muggy_humidity: f64,
    /// Wind speed (m/s) treated as windy.
    pub windy_speed: f64,
}

impl Default for SuitabilityThresholds {
    fn default() -> Self {
        Self { cold_temp: 10.0, hot_temp: 25.0, muggy_humidity: 70.0, windy_speed: 9.0 }
    }
}

/// Preference signals over material traits and length coverage, each in
/// `-1.0..=1.0`. All zeros means weather has no say.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityBias {
    pub insulation: f64,
    pub breathability: f64,
    pub water_resistance: f64,
    /// Positive favors longer garments, negative shorter ones.
    pub coverage: f64,
}

impl SuitabilityBias {
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn from_weather(
        weather: Option<&WeatherSummary>,
        thresholds: &SuitabilityThresholds,
    ) -> Self {
        let Some(weather) = weather else {
            return Self::neutral();
        };

        let mut bias = Self::neutral();
        let mut cold = false;

        if weather.condition.is_precipitation() {
            bias.water_resistance += 1.0;
            bias.coverage += 0.5;
        }

        if let Some(temp) = weather.effective_temp() {
            if temp <= thresholds.cold_temp {
                cold = true;
                bias.insulation += 1.0;
                bias.coverage += 1.0;
            } else if temp >= thresholds.hot_temp {
                bias.breathability += 1.0;
                bias.insulation -= 1.0;
                bias.coverage -= 1.0;
            }
        }

        if weather.humidity.is_some_and(|humidity| humidity >= thresholds.muggy_humidity) {
            bias.breathability += 0.5;
        }

        if weather.wind_speed.is_some_and(|speed| speed >= thresholds.windy_speed) {
            bias.insulation += 0.3;
            bias.coverage += 0.3;
        }

        let mut bias = bias.clamped();
        if cold {
            bias.breathability *= COLD_SECONDARY_SCALE;
            bias.water_resistance *= COLD_SECONDARY_SCALE;
        }
        bias
    }

    fn clamped(self) -> Self {
        Self {
            insulation: self.insulation.clamp(-1.0, 1.0),
            breathability: self.breathability.clamp(-1.0, 1.0),
            water_resistance: self.water_resistance.clamp(-1.0, 1.0),
            coverage: self.coverage.clamp(-1.0, 1.0),
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.material_magnitude() == 0.0 && self.coverage == 0.0
    }

    fn material_magnitude(&self) -> f64 {
        self.insulation.abs() + self.breathability.abs() + self.water_resistance.abs()
    }

    /// Fit of a material in `-1.0..=1.0`; 0.0 under neutral weather.
    pub fn material_fit(&self, material: Material) -> f64 {
        let magnitude = self.material_magnitude();
        if magnitude == 0.0 {
            return 0.0;
        }

        let traits = material.traits();
        let raw = self.insulation * traits.insulation
            + self.breathability * traits.breathability
            + self.water_resistance * traits.water_resistance;
        (raw / magnitude).clamp(-1.0, 1.0)
    }

    /// Fit of a length in `-1.0..=1.0`; 0.0 under neutral weather.
    pub fn length_fit(&self, length: Length) -> f64 {
        self.coverage * (2.0 * length.coverage() - 1.0)
    }
}

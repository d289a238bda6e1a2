//! Weather lookup seams and the KMA payload decoding they rely on

pub mod kma;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::weather::WeatherSummary;

pub use kma::{
    classify_condition, short_base_time, ultrashort_base_time, BaseTime, ForecastExtremes,
    KmaItem, KmaResponse, Observation,
};

#[derive(Clone, Debug, Error, PartialEq)]
pub enum WeatherError {
    #[error("coordinate ({lat}, {lon}) is outside the forecast grid")]
    OutOfCoverage { lat: f64, lon: f64 },
    #[error("weather service returned {code}: {message}")]
    Upstream { code: String, message: String },
    #[error("weather payload could not be decoded: {0}")]
    Decode(String),
    #[error("weather service unavailable: {0}")]
    Unavailable(String),
}

/// WGS84 coordinate as sent by clients.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Forecast grid cell plus the administrative region it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPoint {
    pub nx: i32,
    pub ny: i32,
    pub region: String,
}

/// Resolves a coordinate to a forecast grid cell.
pub trait GridLocator: Send + Sync {
    fn locate(&self, coordinate: Coordinate) -> Result<GridPoint, WeatherError>;
}

/// Always answers with one configured grid cell.
#[derive(Clone, Debug)]
pub struct FixedGridLocator {
    point: GridPoint,
}

impl FixedGridLocator {
    pub fn new(point: GridPoint) -> Self {
        Self { point }
    }
}

impl GridLocator for FixedGridLocator {
    fn locate(&self, coordinate: Coordinate) -> Result<GridPoint, WeatherError> {
        if !coordinate.is_valid() {
            return Err(WeatherError::OutOfCoverage { lat: coordinate.lat, lon: coordinate.lon });
        }
        Ok(self.point.clone())
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, coordinate: Coordinate) -> Result<WeatherSummary, WeatherError>;
}

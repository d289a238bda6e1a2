//! Korea Meteorological Administration village forecast payloads.
//!
//! Two endpoints are involved: the ultra-short nowcast for current readings
//! and the short-term forecast for the daily minimum and maximum. Values come
//! back as strings; entries that do not parse as numbers are skipped.

use chrono::{DateTime, Duration, NaiveDateTime, Timelike, Utc};
use serde::Deserialize;

use super::WeatherError;
use crate::domain::weather::{WeatherCondition, WeatherSummary};

pub const ULTRA_SHORT_NOWCAST_PATH: &str = "getUltraSrtNcst";
pub const VILLAGE_FORECAST_PATH: &str = "getVilageFcst";
pub const RESULT_OK: &str = "00";

/// Korea Standard Time has no daylight saving.
const KST_OFFSET_HOURS: i64 = 9;

/// `base_date` / `base_time` query pair, formatted `YYYYMMDD` / `HHMM`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseTime {
    pub date: String,
    pub time: String,
}

impl BaseTime {
    fn at(moment: NaiveDateTime) -> Self {
        Self { date: moment.format("%Y%m%d").to_string(), time: moment.format("%H%M").to_string() }
    }
}

fn to_kst(now: DateTime<Utc>) -> NaiveDateTime {
    now.naive_utc() + Duration::hours(KST_OFFSET_HOURS)
}

/// Latest nowcast release available at `now`.
///
/// Backs off to the previous ten-minute mark minus ten minutes, then snaps to
/// half past: the same hour from :40 on, otherwise the hour before.
pub fn ultrashort_base_time(now: DateTime<Utc>) -> BaseTime {
    let local = to_kst(now);
    let backed_off = local - Duration::minutes(i64::from(local.minute() % 10 + 10));
    let half_past = backed_off - Duration::minutes(i64::from(backed_off.minute()))
        + Duration::minutes(30);

    if backed_off.minute() >= 40 {
        BaseTime::at(half_past)
    } else {
        BaseTime::at(half_past - Duration::hours(1))
    }
}

/// Latest short-term forecast release available at `now`.
pub fn short_base_time(now: DateTime<Utc>) -> BaseTime {
    let local = to_kst(now);
    let time = match local.hour() {
        0..=1 => {
            return BaseTime {
                date: (local - Duration::days(1)).format("%Y%m%d").to_string(),
                time: "2300".to_string(),
            }
        }
        2..=4 => "0200",
        5..=7 => "0500",
        8..=10 => "0800",
        11..=13 => "1100",
        14..=16 => "1400",
        17..=19 => "1700",
        _ => "2000",
    };
    BaseTime { date: local.format("%Y%m%d").to_string(), time: time.to_string() }
}

/// Maps precipitation type (PTY), sky state (SKY), humidity and visibility
/// onto a condition. Precipitation wins over sky, sky over humidity.
pub fn classify_condition(
    precipitation_type: Option<i64>,
    sky: Option<i64>,
    humidity: Option<f64>,
    visibility: Option<f64>,
) -> WeatherCondition {
    match (precipitation_type, sky) {
        (Some(1 | 2 | 5 | 6), _) => WeatherCondition::Rain,
        (Some(3 | 7), _) => WeatherCondition::Snow,
        (_, Some(1)) => WeatherCondition::Clear,
        (_, Some(3)) => WeatherCondition::Cloudy,
        (_, Some(4)) => WeatherCondition::Overcast,
        _ if humidity.is_some_and(|value| value >= 70.0) => WeatherCondition::Cloudy,
        _ if visibility.is_some_and(|value| value < 1.0) => WeatherCondition::Fog,
        _ => WeatherCondition::Clear,
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct KmaResponse {
    pub response: KmaEnvelope,
}

#[derive(Clone, Debug, Deserialize)]
pub struct KmaEnvelope {
    pub header: KmaHeader,
    #[serde(default)]
    pub body: Option<KmaBody>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KmaHeader {
    pub result_code: String,
    #[serde(default)]
    pub result_msg: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct KmaBody {
    pub items: KmaItems,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct KmaItems {
    #[serde(default)]
    pub item: Vec<KmaItem>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KmaItem {
    pub category: String,
    #[serde(default)]
    pub obsr_value: Option<String>,
    #[serde(default)]
    pub fcst_value: Option<String>,
    #[serde(default)]
    pub fcst_time: Option<String>,
}

impl KmaItem {
    fn numeric(value: Option<&String>) -> Option<f64> {
        value.and_then(|raw| raw.trim().parse::<f64>().ok())
    }

    pub fn observed(&self) -> Option<f64> {
        Self::numeric(self.obsr_value.as_ref())
    }

    pub fn forecast(&self) -> Option<f64> {
        Self::numeric(self.fcst_value.as_ref())
    }
}

impl KmaResponse {
    pub fn from_json(raw: &str) -> Result<Self, WeatherError> {
        serde_json::from_str(raw).map_err(|error| WeatherError::Decode(error.to_string()))
    }

    /// Items of a successful response; a non-`00` result code is an error.
    pub fn into_items(self) -> Result<Vec<KmaItem>, WeatherError> {
        let KmaEnvelope { header, body } = self.response;
        if header.result_code != RESULT_OK {
            return Err(WeatherError::Upstream {
                code: header.result_code,
                message: header.result_msg,
            });
        }
        Ok(body.map(|body| body.items.item).unwrap_or_default())
    }
}

/// Current readings from the nowcast endpoint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Observation {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub precipitation_type: Option<i64>,
    pub sky: Option<i64>,
    pub visibility: Option<f64>,
}

impl Observation {
    pub fn from_items(items: &[KmaItem]) -> Self {
        let mut observation = Self::default();
        for item in items {
            let Some(value) = item.observed() else {
                continue;
            };
            match item.category.as_str() {
                "T1H" => observation.temperature = Some(value),
                "REH" => observation.humidity = Some(value),
                "WSD" => observation.wind_speed = Some(value),
                "PTY" => observation.precipitation_type = Some(value as i64),
                "SKY" => observation.sky = Some(value as i64),
                "VVV" => observation.visibility = Some(value),
                _ => {}
            }
        }
        observation
    }

    pub fn condition(&self) -> WeatherCondition {
        classify_condition(self.precipitation_type, self.sky, self.humidity, self.visibility)
    }
}

/// Daily extremes from the short-term forecast.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ForecastExtremes {
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
}

impl ForecastExtremes {
    pub fn from_items(items: &[KmaItem]) -> Self {
        let mut extremes = Self::default();
        for item in items {
            let Some(value) = item.forecast() else {
                continue;
            };
            match item.category.as_str() {
                "TMX" => {
                    extremes.max_temp = Some(extremes.max_temp.map_or(value, |max| max.max(value)))
                }
                "TMN" => {
                    extremes.min_temp = Some(extremes.min_temp.map_or(value, |min| min.min(value)))
                }
                _ => {}
            }
        }
        extremes
    }
}

impl WeatherSummary {
    pub fn from_parts(
        region: Option<String>,
        observation: &Observation,
        extremes: &ForecastExtremes,
    ) -> Self {
        Self {
            region,
            current_temp: observation.temperature,
            max_temp: extremes.max_temp,
            min_temp: extremes.min_temp,
            humidity: observation.humidity,
            wind_speed: observation.wind_speed,
            condition: observation.condition(),
        }
    }
}

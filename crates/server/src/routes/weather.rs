use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use tracing::warn;

use closet_core::{Coordinate, WeatherError, WeatherSummary};

use crate::error::ApiError;
use crate::state::{AppState, CorrelationId};

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: f64,
    pub lon: f64,
}

pub async fn current(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherSummary>, ApiError> {
    let Some(provider) = state.weather.as_ref() else {
        return Err(ApiError::unavailable("weather lookups are disabled", &correlation));
    };
    provider
        .current(Coordinate::new(query.lat, query.lon))
        .await
        .map(Json)
        .map_err(|error| weather_error(error, &correlation))
}

const WEATHER_UNAVAILABLE: &str = "weather service is temporarily unavailable";

pub(crate) fn weather_error(error: WeatherError, correlation: &CorrelationId) -> ApiError {
    match error {
        WeatherError::OutOfCoverage { .. } => ApiError::bad_request(error.to_string(), correlation),
        other => {
            warn!(
                event_name = "weather.lookup.failed",
                correlation_id = %correlation,
                error = %other,
                "weather lookup failed"
            );
            ApiError::unavailable(WEATHER_UNAVAILABLE, correlation)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use closet_core::{WeatherCondition, WeatherError, WeatherSummary};

    use crate::classifier::fake::StaticClassifier;
    use crate::routes::test_support::{app, empty_request, json_body, send};
    use crate::state::testing::{test_app, test_app_with};

    #[tokio::test]
    async fn returns_summary_in_camel_case() {
        let summary = WeatherSummary::new(WeatherCondition::Cloudy).with_current_temp(21.0);
        let test = test_app_with(StaticClassifier::default(), Some(Ok(summary)));

        let response =
            send(app(test.state), empty_request("GET", "/weather?lat=37.5&lon=127.0")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["currentTemp"], 21.0);
        assert_eq!(body["condition"], "cloudy");
    }

    #[tokio::test]
    async fn disabled_or_failing_weather_is_unavailable() {
        let disabled = test_app();
        let response =
            send(app(disabled.state), empty_request("GET", "/weather?lat=37.5&lon=127.0")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let failing = test_app_with(
            StaticClassifier::default(),
            Some(Err(WeatherError::Unavailable("timeout".to_string()))),
        );
        let response =
            send(app(failing.state), empty_request("GET", "/weather?lat=37.5&lon=127.0")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn missing_coordinates_are_rejected() {
        let test = test_app();
        let response = send(app(test.state), empty_request("GET", "/weather?lat=37.5")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unavailable_body_hides_the_upstream_detail() {
        let leaked = "https://apis.example/getUltraSrtNcst?serviceKey=TOPSECRETKEY";
        let failing = test_app_with(
            StaticClassifier::default(),
            Some(Err(WeatherError::Unavailable(leaked.to_string()))),
        );

        let response =
            send(app(failing.state), empty_request("GET", "/weather?lat=37.5&lon=127.0")).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert!(!body.to_string().contains("TOPSECRETKEY"), "leaked key: {body}");
        assert_eq!(body["error"], "weather service is temporarily unavailable");
    }
}

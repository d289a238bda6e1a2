//! Weather provider backed by the KMA village forecast service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use closet_core::weather::kma::{ULTRA_SHORT_NOWCAST_PATH, VILLAGE_FORECAST_PATH};
use closet_core::weather::{
    short_base_time, ultrashort_base_time, BaseTime, ForecastExtremes, KmaItem, KmaResponse,
    Observation,
};
use closet_core::{
    Coordinate, GridLocator, GridPoint, WeatherError, WeatherProvider, WeatherSummary,
};

const PAGE_SIZE: &str = "1000";

pub struct KmaWeatherProvider {
    client: reqwest::Client,
    base_url: String,
    service_key: SecretString,
    locator: Arc<dyn GridLocator>,
}

impl KmaWeatherProvider {
    pub fn new(
        base_url: impl Into<String>,
        service_key: SecretString,
        timeout_secs: u64,
        locator: Arc<dyn GridLocator>,
    ) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(unavailable)?;
        Ok(Self { client, base_url: base_url.into(), service_key, locator })
    }

    async fn fetch(
        &self,
        path: &str,
        base: &BaseTime,
        point: &GridPoint,
    ) -> Result<Vec<KmaItem>, WeatherError> {
        let url = format!("{}/{path}", self.base_url.trim_end_matches('/'));
        let nx = point.nx.to_string();
        let ny = point.ny.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("serviceKey", self.service_key.expose_secret()),
                ("numOfRows", PAGE_SIZE),
                ("pageNo", "1"),
                ("dataType", "JSON"),
                ("base_date", base.date.as_str()),
                ("base_time", base.time.as_str()),
                ("nx", nx.as_str()),
                ("ny", ny.as_str()),
            ])
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Unavailable(format!("{path} returned HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|error| WeatherError::Decode(error.without_url().to_string()))?;
        KmaResponse::from_json(&body)?.into_items()
    }
}

// Request URLs carry the service key in their query string.
fn unavailable(error: reqwest::Error) -> WeatherError {
    WeatherError::Unavailable(error.without_url().to_string())
}

#[async_trait]
impl WeatherProvider for KmaWeatherProvider {
    async fn current(&self, coordinate: Coordinate) -> Result<WeatherSummary, WeatherError> {
        let point = self.locator.locate(coordinate)?;
        let now = Utc::now();

        let observed =
            self.fetch(ULTRA_SHORT_NOWCAST_PATH, &ultrashort_base_time(now), &point).await?;
        let observation = Observation::from_items(&observed);

        // Extremes are optional; a failed forecast call still yields the nowcast.
        let forecast = self.fetch(VILLAGE_FORECAST_PATH, &short_base_time(now), &point).await;
        let extremes = match forecast {
            Ok(items) => ForecastExtremes::from_items(&items),
            Err(error) => {
                warn!(
                    event_name = "weather.forecast.unavailable",
                    nx = point.nx,
                    ny = point.ny,
                    error = %error,
                    "village forecast unavailable, returning nowcast only"
                );
                ForecastExtremes::default()
            }
        };

        let region = (!point.region.is_empty()).then(|| point.region.clone());
        let summary = WeatherSummary::from_parts(region, &observation, &extremes);
        debug!(
            event_name = "weather.summary",
            nx = point.nx,
            ny = point.ny,
            condition = ?summary.condition,
            "weather summary decoded"
        );
        Ok(summary)
    }
}


#[cfg(test)]
mod tests {
    use axum::{extract::Query, routing::get, Router};
    use closet_core::weather::FixedGridLocator;
    use closet_core::WeatherCondition;
    use std::collections::HashMap;

    use super::*;

    const NOWCAST: &str = r#"{"response":{"header":{"resultCode":"00","resultMsg":"NORMAL_SERVICE"},
        "body":{"items":{"item":[
            {"category":"T1H","obsrValue":"3.5"},
            {"category":"REH","obsrValue":"80"},
            {"category":"WSD","obsrValue":"2.1"},
            {"category":"PTY","obsrValue":"3"}
        ]}}}}"#;

    const FORECAST: &str = r#"{"response":{
        "header":{"resultCode":"00","resultMsg":"NORMAL_SERVICE"},
        "body":{"items":{"item":[
            {"category":"TMX","fcstValue":"6.0","fcstTime":"1500"},
            {"category":"TMN","fcstValue":"-2.0","fcstTime":"0600"}
        ]}}}}"#;

    const DENIED: &str = r#"{"response":{"header":{
        "resultCode":"30","resultMsg":"SERVICE_KEY_IS_NOT_REGISTERED_ERROR"}}}"#;

    async fn serve(nowcast: &'static str, forecast: &'static str) -> String {
        let app = Router::new()
            .route(
                "/getUltraSrtNcst",
                get(move |Query(params): Query<HashMap<String, String>>| async move {
                    assert_eq!(params.get("nx").map(String::as_str), Some("60"));
                    assert_eq!(params.get("serviceKey").map(String::as_str), Some("test-key"));
                    nowcast
                }),
            )
            .route("/getVilageFcst", get(move || async move { forecast }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{address}")
    }

    fn provider(base_url: String) -> KmaWeatherProvider {
        provider_with_key(base_url, "test-key")
    }

    fn provider_with_key(base_url: String, key: &str) -> KmaWeatherProvider {
        let locator = FixedGridLocator::new(GridPoint {
            nx: 60,
            ny: 127,
            region: "서울특별시 종로구".to_string(),
        });
        KmaWeatherProvider::new(base_url, key.to_string().into(), 5, Arc::new(locator))
            .expect("provider")
    }

    #[tokio::test]
    async fn combines_nowcast_and_forecast_extremes() {
        let provider = provider(serve(NOWCAST, FORECAST).await);

        let summary = provider.current(Coordinate::new(37.57, 126.98)).await.expect("weather");

        assert_eq!(summary.region.as_deref(), Some("서울특별시 종로구"));
        assert_eq!(summary.current_temp, Some(3.5));
        assert_eq!(summary.humidity, Some(80.0));
        assert_eq!(summary.max_temp, Some(6.0));
        assert_eq!(summary.min_temp, Some(-2.0));
        assert_eq!(summary.condition, WeatherCondition::Snow);
    }

    #[tokio::test]
    async fn forecast_failure_still_returns_nowcast() {
        let provider = provider(serve(NOWCAST, DENIED).await);

        let summary = provider.current(Coordinate::new(37.57, 126.98)).await.expect("weather");

        assert_eq!(summary.current_temp, Some(3.5));
        assert_eq!(summary.max_temp, None);
    }

    #[tokio::test]
    async fn nowcast_rejection_is_an_upstream_error() {
        let provider = provider(serve(DENIED, FORECAST).await);

        let error = provider.current(Coordinate::new(37.57, 126.98)).await;

        assert!(matches!(error, Err(WeatherError::Upstream { ref code, .. }) if code == "30"));
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        let provider = provider("http://127.0.0.1:9".to_string());

        let error = provider.current(Coordinate::new(37.57, 126.98)).await;

        assert!(matches!(error, Err(WeatherError::Unavailable(_))));
    }

    #[tokio::test]
    async fn connection_errors_do_not_carry_the_service_key() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let address = listener.local_addr().expect("address");
        drop(listener);
        let provider = provider_with_key(format!("http://{address}"), "TOPSECRETKEY");

        let error =
            provider.current(Coordinate::new(37.57, 126.98)).await.expect_err("closed port");

        assert!(matches!(error, WeatherError::Unavailable(_)));
        assert!(!error.to_string().contains("TOPSECRETKEY"), "leaked key: {error}");
        assert!(!format!("{error:?}").contains("TOPSECRETKEY"));
    }
}

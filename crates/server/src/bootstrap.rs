use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, Router};
use thiserror::Error;
use tower_http::services::ServeDir;
use tracing::info;

use closet_core::config::{AppConfig, ConfigError};
use closet_core::weather::FixedGridLocator;
use closet_core::{WeatherError, WeatherProvider};
use closet_db::repositories::{SqlGarmentRepository, SqlProfileRepository};
use closet_db::{connect_with_settings, migrations, DbPool, FsImageStore};

use crate::classifier::{ClassifierError, HttpClassifier};
use crate::kma::KmaWeatherProvider;
use crate::request_log::log_requests;
use crate::state::AppState;
use crate::{health, routes};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("image directory `{path}` could not be created: {source}")]
    ImageRoot { path: String, source: std::io::Error },
    #[error("classifier client could not be built: {0}")]
    Classifier(#[source] ClassifierError),
    #[error("weather client could not be built: {0}")]
    Weather(#[source] WeatherError),
}

pub async fn bootstrap(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let image_root = &config.storage.image_root;
    tokio::fs::create_dir_all(image_root).await.map_err(|source| BootstrapError::ImageRoot {
        path: image_root.display().to_string(),
        source,
    })?;

    let classifier =
        HttpClassifier::new(&config.classifier.endpoint, config.classifier.timeout_secs)
            .map_err(BootstrapError::Classifier)?;

    let weather = weather_provider(&config)?;
    info!(
        event_name = "system.bootstrap.weather",
        correlation_id = "bootstrap",
        enabled = weather.is_some(),
        required = config.weather.required_for_recommendation,
        "weather provider configured"
    );

    let state = AppState {
        garments: Arc::new(SqlGarmentRepository::new(db_pool.clone())),
        profiles: Arc::new(SqlProfileRepository::new(db_pool.clone())),
        images: Arc::new(FsImageStore::new(image_root, &config.storage.public_base_url)),
        classifier: Arc::new(classifier),
        weather,
        weather_required: config.weather.required_for_recommendation,
        engine: Arc::new(config.recommendation.engine()),
    };

    Ok(Application { config, db_pool, state })
}

fn weather_provider(
    config: &AppConfig,
) -> Result<Option<Arc<dyn WeatherProvider>>, BootstrapError> {
    let weather = &config.weather;
    if !weather.enabled {
        return Ok(None);
    }
    let service_key = weather.service_key.clone().ok_or_else(|| {
        ConfigError::Validation(
            "weather.service_key is required when weather is enabled".to_string(),
        )
    })?;
    let locator = Arc::new(FixedGridLocator::new(weather.grid_point()));
    let provider =
        KmaWeatherProvider::new(&weather.base_url, service_key, weather.timeout_secs, locator)
            .map_err(BootstrapError::Weather)?;
    Ok(Some(Arc::new(provider)))
}

impl Application {
    /// Full HTTP app: API routes, health check and static images behind the
    /// request logger.
    pub fn router(&self) -> Router {
        let images_dir = self.config.storage.image_root.join("images");
        routes::router(self.state.clone())
            .merge(health::router(self.db_pool.clone()))
            .nest_service("/images", ServeDir::new(images_dir))
            .layer(DefaultBodyLimit::max(self.config.server.max_upload_bytes))
            .layer(middleware::from_fn(log_requests))
    }
}

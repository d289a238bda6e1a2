use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::recommend::{
    RecommendationEngine, ScoringWeights, SuitabilityThresholds, TieBreak, WeightedModesPolicy,
    DEFAULT_MAX_DISTANCE, DEFAULT_WEIGHTS,
};
use crate::weather::GridPoint;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub classifier: ClassifierConfig,
    pub weather: WeatherConfig,
    pub recommendation: RecommendationConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
    pub max_upload_bytes: usize,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Directory that holds `images/{uid}/{name}` objects.
    pub image_root: PathBuf,
    /// Prefix prepended to object keys when building image URLs.
    pub public_base_url: String,
}

#[derive(Clone, Debug)]
pub struct ClassifierConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct WeatherConfig {
    pub enabled: bool,
    pub base_url: String,
    pub service_key: Option<SecretString>,
    pub timeout_secs: u64,
    pub grid_nx: i32,
    pub grid_ny: i32,
    pub region: String,
    /// Fail `/recommend` instead of scoring with neutral weather.
    pub required_for_recommendation: bool,
}

#[derive(Clone, Debug)]
pub struct RecommendationConfig {
    pub weights: ScoringWeights,
    pub max_distance: f64,
    pub tie_break: TieBreak,
    pub thresholds: SuitabilityThresholds,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

/// Values applied after the file and `CLOSET_*` variables.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub image_root: Option<PathBuf>,
    pub weather_enabled: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://closet.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
                max_upload_bytes: 10 * 1024 * 1024,
            },
            storage: StorageConfig {
                image_root: PathBuf::from("data"),
                public_base_url: "/".to_string(),
            },
            classifier: ClassifierConfig {
                endpoint: "http://127.0.0.1:8500/classify".to_string(),
                timeout_secs: 60,
            },
            weather: WeatherConfig {
                enabled: false,
                base_url: "http://apis.data.go.kr/1360000/VilageFcstInfoService_2.0".to_string(),
                service_key: None,
                timeout_secs: 10,
                grid_nx: 60,
                grid_ny: 127,
                region: "서울특별시 종로구".to_string(),
                required_for_recommendation: false,
            },
            recommendation: RecommendationConfig {
                weights: DEFAULT_WEIGHTS,
                max_distance: DEFAULT_MAX_DISTANCE,
                tie_break: TieBreak::MostRecent,
                thresholds: SuitabilityThresholds::default(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl WeatherConfig {
    pub fn grid_point(&self) -> GridPoint {
        GridPoint { nx: self.grid_nx, ny: self.grid_ny, region: self.region.clone() }
    }
}

impl RecommendationConfig {
    pub fn policy(&self) -> WeightedModesPolicy {
        WeightedModesPolicy::new()
            .with_weights(self.weights)
            .with_max_distance(self.max_distance)
            .with_tie_break(self.tie_break)
    }

    pub fn engine(&self) -> RecommendationEngine {
        RecommendationEngine::with_policy(self.policy()).with_thresholds(self.thresholds)
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = resolve_config_path(options.config_path.as_deref()) {
            config.apply_patch(read_patch(&path)?);
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
            if let Some(max_upload_bytes) = server.max_upload_bytes {
                self.server.max_upload_bytes = max_upload_bytes;
            }
        }

        if let Some(storage) = patch.storage {
            if let Some(image_root) = storage.image_root {
                self.storage.image_root = image_root;
            }
            if let Some(public_base_url) = storage.public_base_url {
                self.storage.public_base_url = public_base_url;
            }
        }

        if let Some(classifier) = patch.classifier {
            if let Some(endpoint) = classifier.endpoint {
                self.classifier.endpoint = endpoint;
            }
            if let Some(timeout_secs) = classifier.timeout_secs {
                self.classifier.timeout_secs = timeout_secs;
            }
        }

        if let Some(weather) = patch.weather {
            if let Some(enabled) = weather.enabled {
                self.weather.enabled = enabled;
            }
            if let Some(base_url) = weather.base_url {
                self.weather.base_url = base_url;
            }
            if let Some(service_key) = weather.service_key {
                self.weather.service_key = Some(SecretString::from(service_key));
            }
            if let Some(timeout_secs) = weather.timeout_secs {
                self.weather.timeout_secs = timeout_secs;
            }
            if let Some(grid_nx) = weather.grid_nx {
                self.weather.grid_nx = grid_nx;
            }
            if let Some(grid_ny) = weather.grid_ny {
                self.weather.grid_ny = grid_ny;
            }
            if let Some(region) = weather.region {
                self.weather.region = region;
            }
            if let Some(required) = weather.required_for_recommendation {
                self.weather.required_for_recommendation = required;
            }
        }

        if let Some(recommendation) = patch.recommendation {
            if let Some(max_distance) = recommendation.max_distance {
                self.recommendation.max_distance = max_distance;
            }
            if let Some(tie_break) = recommendation.tie_break {
                self.recommendation.tie_break = tie_break;
            }
            if let Some(weights) = recommendation.weights {
                let target = &mut self.recommendation.weights;
                target.style = weights.style.unwrap_or(target.style);
                target.color = weights.color.unwrap_or(target.color);
                target.material = weights.material.unwrap_or(target.material);
                target.length = weights.length.unwrap_or(target.length);
                target.print = weights.print.unwrap_or(target.print);
                target.weather_influence =
                    weights.weather_influence.unwrap_or(target.weather_influence);
            }
            if let Some(thresholds) = recommendation.thresholds {
                let target = &mut self.recommendation.thresholds;
                target.cold_temp = thresholds.cold_temp.unwrap_or(target.cold_temp);
                target.hot_temp = thresholds.hot_temp.unwrap_or(target.hot_temp);
                target.muggy_humidity = thresholds.muggy_humidity.unwrap_or(target.muggy_humidity);
                target.windy_speed = thresholds.windy_speed.unwrap_or(target.windy_speed);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("CLOSET_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("CLOSET_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_env("CLOSET_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("CLOSET_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_env("CLOSET_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("CLOSET_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("CLOSET_SERVER_PORT") {
            self.server.port = parse_env("CLOSET_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("CLOSET_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_env("CLOSET_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }
        if let Some(value) = read_env("CLOSET_SERVER_MAX_UPLOAD_BYTES") {
            self.server.max_upload_bytes = parse_env("CLOSET_SERVER_MAX_UPLOAD_BYTES", &value)?;
        }

        if let Some(value) = read_env("CLOSET_STORAGE_IMAGE_ROOT") {
            self.storage.image_root = PathBuf::from(value);
        }
        if let Some(value) = read_env("CLOSET_STORAGE_PUBLIC_BASE_URL") {
            self.storage.public_base_url = value;
        }

        if let Some(value) = read_env("CLOSET_CLASSIFIER_ENDPOINT") {
            self.classifier.endpoint = value;
        }
        if let Some(value) = read_env("CLOSET_CLASSIFIER_TIMEOUT_SECS") {
            self.classifier.timeout_secs = parse_env("CLOSET_CLASSIFIER_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("CLOSET_WEATHER_ENABLED") {
            self.weather.enabled = parse_env("CLOSET_WEATHER_ENABLED", &value)?;
        }
        if let Some(value) = read_env("CLOSET_WEATHER_BASE_URL") {
            self.weather.base_url = value;
        }
        if let Some(value) = read_env("CLOSET_WEATHER_SERVICE_KEY") {
            self.weather.service_key = Some(SecretString::from(value));
        }
        if let Some(value) = read_env("CLOSET_WEATHER_TIMEOUT_SECS") {
            self.weather.timeout_secs = parse_env("CLOSET_WEATHER_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("CLOSET_WEATHER_GRID_NX") {
            self.weather.grid_nx = parse_env("CLOSET_WEATHER_GRID_NX", &value)?;
        }
        if let Some(value) = read_env("CLOSET_WEATHER_GRID_NY") {
            self.weather.grid_ny = parse_env("CLOSET_WEATHER_GRID_NY", &value)?;
        }
        if let Some(value) = read_env("CLOSET_WEATHER_REGION") {
            self.weather.region = value;
        }
        if let Some(value) = read_env("CLOSET_WEATHER_REQUIRED_FOR_RECOMMENDATION") {
            self.weather.required_for_recommendation =
                parse_env("CLOSET_WEATHER_REQUIRED_FOR_RECOMMENDATION", &value)?;
        }

        if let Some(value) = read_env("CLOSET_RECOMMENDATION_MAX_DISTANCE") {
            self.recommendation.max_distance =
                parse_env("CLOSET_RECOMMENDATION_MAX_DISTANCE", &value)?;
        }
        if let Some(value) = read_env("CLOSET_RECOMMENDATION_TIE_BREAK") {
            self.recommendation.tie_break = parse_tie_break(&value)?;
        }
        if let Some(value) = read_env("CLOSET_RECOMMENDATION_WEATHER_INFLUENCE") {
            self.recommendation.weights.weather_influence =
                parse_env("CLOSET_RECOMMENDATION_WEATHER_INFLUENCE", &value)?;
        }

        let log_level = read_env("CLOSET_LOGGING_LEVEL").or_else(|| read_env("CLOSET_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("CLOSET_LOGGING_FORMAT").or_else(|| read_env("CLOSET_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(image_root) = overrides.image_root {
            self.storage.image_root = image_root;
        }
        if let Some(enabled) = overrides.weather_enabled {
            self.weather.enabled = enabled;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_server(&self.server)?;
        validate_storage(&self.storage)?;
        validate_classifier(&self.classifier)?;
        validate_weather(&self.weather)?;
        validate_recommendation(&self.recommendation)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("closet.toml"), PathBuf::from("config/closet.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    if server.max_upload_bytes == 0 {
        return Err(ConfigError::Validation(
            "server.max_upload_bytes must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
    if storage.image_root.as_os_str().is_empty() {
        return Err(ConfigError::Validation("storage.image_root must not be empty".to_string()));
    }

    Ok(())
}

fn validate_classifier(classifier: &ClassifierConfig) -> Result<(), ConfigError> {
    let endpoint = classifier.endpoint.trim();
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(ConfigError::Validation(
            "classifier.endpoint must start with http:// or https://".to_string(),
        ));
    }

    if classifier.timeout_secs == 0 || classifier.timeout_secs > 600 {
        return Err(ConfigError::Validation(
            "classifier.timeout_secs must be in range 1..=600".to_string(),
        ));
    }

    Ok(())
}

fn validate_weather(weather: &WeatherConfig) -> Result<(), ConfigError> {
    if weather.required_for_recommendation && !weather.enabled {
        return Err(ConfigError::Validation(
            "weather.required_for_recommendation needs weather.enabled = true".to_string(),
        ));
    }

    if !weather.enabled {
        return Ok(());
    }

    let missing_key = weather
        .service_key
        .as_ref()
        .map(|value| value.expose_secret().trim().is_empty())
        .unwrap_or(true);
    if missing_key {
        return Err(ConfigError::Validation(
            "weather.service_key is required when weather is enabled. \
             Get it from https://www.data.go.kr > 기상청_단기예보 조회서비스"
                .to_string(),
        ));
    }

    if !weather.base_url.starts_with("http://") && !weather.base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "weather.base_url must start with http:// or https://".to_string(),
        ));
    }

    if weather.timeout_secs == 0 || weather.timeout_secs > 120 {
        return Err(ConfigError::Validation(
            "weather.timeout_secs must be in range 1..=120".to_string(),
        ));
    }

    if weather.grid_nx <= 0 || weather.grid_ny <= 0 {
        return Err(ConfigError::Validation(
            "weather.grid_nx and weather.grid_ny must be positive".to_string(),
        ));
    }

    Ok(())
}

fn validate_recommendation(recommendation: &RecommendationConfig) -> Result<(), ConfigError> {
    let weights = &recommendation.weights;
    let all = [
        ("style", weights.style),
        ("color", weights.color),
        ("material", weights.material),
        ("length", weights.length),
        ("print", weights.print),
        ("weather_influence", weights.weather_influence),
    ];
    if let Some((name, _)) = all.iter().find(|(_, value)| !value.is_finite() || *value < 0.0) {
        return Err(ConfigError::Validation(format!(
            "recommendation.weights.{name} must be a non-negative number"
        )));
    }

    let total = weights.style + weights.color + weights.material + weights.length + weights.print;
    if total <= 0.0 {
        return Err(ConfigError::Validation(
            "recommendation.weights must not all be zero".to_string(),
        ));
    }

    if !(recommendation.max_distance > 0.0 && recommendation.max_distance <= 1.0) {
        return Err(ConfigError::Validation(
            "recommendation.max_distance must be in range (0, 1]".to_string(),
        ));
    }

    let thresholds = &recommendation.thresholds;
    if thresholds.cold_temp >= thresholds.hot_temp {
        return Err(ConfigError::Validation(
            "recommendation.thresholds.cold_temp must be below hot_temp".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_tie_break(value: &str) -> Result<TieBreak, ConfigError> {
    match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "most_recent" => Ok(TieBreak::MostRecent),
        "lowest_id" => Ok(TieBreak::LowestId),
        other => Err(ConfigError::Validation(format!(
            "unsupported tie break `{other}` (expected most_recent|lowest_id)"
        ))),
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    server: Option<ServerPatch>,
    storage: Option<StoragePatch>,
    classifier: Option<ClassifierPatch>,
    weather: Option<WeatherPatch>,
    recommendation: Option<RecommendationPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
    max_upload_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    image_root: Option<PathBuf>,
    public_base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ClassifierPatch {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct WeatherPatch {
    enabled: Option<bool>,
    base_url: Option<String>,
    service_key: Option<String>,
    timeout_secs: Option<u64>,
    grid_nx: Option<i32>,
    grid_ny: Option<i32>,
    region: Option<String>,
    required_for_recommendation: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommendationPatch {
    max_distance: Option<f64>,
    tie_break: Option<TieBreak>,
    weights: Option<WeightsPatch>,
    thresholds: Option<ThresholdsPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct WeightsPatch {
    style: Option<f64>,
    color: Option<f64>,
    material: Option<f64>,
    length: Option<f64>,
    print: Option<f64>,
    weather_influence: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ThresholdsPatch {
    cold_temp: Option<f64>,
    hot_temp: Option<f64>,
    muggy_humidity: Option<f64>,
    windy_speed: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use closet_core::{RecommendationEngine, WeatherProvider};
use closet_db::repositories::{GarmentRepository, ProfileRepository};
use closet_db::ImageStore;

use crate::classifier::GarmentClassifier;

/// Collaborators shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub garments: Arc<dyn GarmentRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub images: Arc<dyn ImageStore>,
    pub classifier: Arc<dyn GarmentClassifier>,
    /// `None` when weather lookups are disabled.
    pub weather: Option<Arc<dyn WeatherProvider>>,
    pub weather_required: bool,
    pub engine: Arc<RecommendationEngine>,
}

/// Per-request id attached by the request logger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl From<&str> for CorrelationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::BTreeMap;

    use closet_core::{WeatherError, WeatherSummary};
    use closet_db::repositories::{InMemoryGarmentRepository, InMemoryProfileRepository};
    use closet_db::FsImageStore;
    use tempfile::TempDir;

    use super::*;
    use crate::classifier::fake::StaticClassifier;
    use crate::kma::fake::StaticWeather;

    /// In-memory state plus the temp dir backing its image store.
    pub struct TestApp {
        pub state: AppState,
        pub image_dir: TempDir,
    }

    pub fn test_app() -> TestApp {
        test_app_with(StaticClassifier::with(BTreeMap::new()), None)
    }

    pub fn test_app_with(
        classifier: StaticClassifier,
        weather: Option<Result<WeatherSummary, WeatherError>>,
    ) -> TestApp {
        let image_dir = TempDir::new().expect("tempdir");
        let state = AppState {
            garments: Arc::new(InMemoryGarmentRepository::default()),
            profiles: Arc::new(InMemoryProfileRepository::default()),
            images: Arc::new(FsImageStore::new(image_dir.path(), "/")),
            classifier: Arc::new(classifier),
            weather: weather
                .map(|answer| Arc::new(StaticWeather(answer)) as Arc<dyn WeatherProvider>),
            weather_required: false,
            engine: Arc::new(RecommendationEngine::new()),
        };
        TestApp { state, image_dir }
    }
}

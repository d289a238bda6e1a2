use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use tracing::{info, warn};

use closet_core::{
    ApplicationError, AttributeLabels, Coordinate, GarmentAttributes, GarmentId,
    RecommendationMode, RecommendationRequest, RecommendationResult, RequestError, Sex, Style,
    UserId, UserProfile, WeatherSummary,
};

use super::user_id;
use super::weather::weather_error;
use crate::error::{ApiError, ResultExt};
use crate::state::{AppState, CorrelationId};

/// `age`/`sex` fall back to the stored profile. Either `anchor_id` (a garment
/// in the closet) or inline `anchor` labels select the fixed garment.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendBody {
    pub uid: String,
    pub style: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub anchor_id: Option<String>,
    #[serde(default)]
    pub anchor: Option<AttributeLabels>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

pub async fn recommend(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Json(body): Json<RecommendBody>,
) -> Result<Json<RecommendationResult>, ApiError> {
    let uid = user_id(&body.uid, &correlation)?;
    let style: Style = body.style.parse().or_api(&correlation)?;
    let profile = resolve_profile(&state, &uid, &body, &correlation).await?;
    let anchor = resolve_anchor(&state, &uid, &body, &correlation).await?;

    let mode = match (body.mode.as_deref(), anchor) {
        (Some(raw), _) => raw.parse::<RecommendationMode>().or_api(&correlation)?,
        (None, Some(anchor)) => RecommendationMode::completing(anchor.group()),
        (None, None) => RecommendationMode::Full,
    };

    let weather = resolve_weather(&state, &body, &correlation).await?;
    let wardrobe = state.garments.list_for_user(&uid, None).await.or_api(&correlation)?;

    let request = RecommendationRequest { mode, profile, style, weather, anchor };
    let result = state.engine.recommend(&request, &wardrobe).or_api(&correlation)?;

    info!(
        event_name = "recommend.completed",
        correlation_id = %correlation,
        uid = %uid.0,
        mode = mode.as_str(),
        style = style.as_str(),
        wardrobe_size = wardrobe.len(),
        weather_known = request.weather.is_some(),
        success = result.success(),
        "recommendation produced"
    );
    Ok(Json(result))
}

async fn resolve_profile(
    state: &AppState,
    uid: &UserId,
    body: &RecommendBody,
    correlation: &CorrelationId,
) -> Result<UserProfile, ApiError> {
    let stored = match (body.age, &body.sex) {
        (Some(_), Some(_)) => None,
        _ => state.profiles.find(uid).await.or_api(correlation)?,
    };

    let age = body
        .age
        .or(stored.as_ref().map(|profile| profile.age))
        .ok_or(RequestError::MissingField("age"))
        .or_api(correlation)?;
    let sex = match &body.sex {
        Some(raw) => raw.parse::<Sex>().or_api(correlation)?,
        None => stored
            .as_ref()
            .map(|profile| profile.sex)
            .ok_or(RequestError::MissingField("sex"))
            .or_api(correlation)?,
    };
    Ok(UserProfile { age, sex })
}

async fn resolve_anchor(
    state: &AppState,
    uid: &UserId,
    body: &RecommendBody,
    correlation: &CorrelationId,
) -> Result<Option<GarmentAttributes>, ApiError> {
    match (&body.anchor_id, &body.anchor) {
        (Some(_), Some(_)) => Err(RequestError::InvalidField {
            field: "anchor",
            reason: "give either `anchor_id` or `anchor`, not both".to_string(),
        })
        .or_api(correlation),
        (Some(id), None) => {
            let id = GarmentId(id.clone());
            match state.garments.find(uid, &id).await.or_api(correlation)? {
                Some(stored) => Ok(Some(stored.record.attributes)),
                None => Err(ApplicationError::NotFound { resource: "garment", id: id.0 })
                    .or_api(correlation),
            }
        }
        (None, Some(labels)) => GarmentAttributes::try_from(labels).map(Some).or_api(correlation),
        (None, None) => Ok(None),
    }
}

/// Missing weather scores as neutral unless the service is configured to
/// require it.
async fn resolve_weather(
    state: &AppState,
    body: &RecommendBody,
    correlation: &CorrelationId,
) -> Result<Option<WeatherSummary>, ApiError> {
    let coordinate = match (body.lat, body.lon) {
        (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
        (None, None) => None,
        _ => {
            return Err(RequestError::InvalidField {
                field: "lat",
                reason: "`lat` and `lon` must be given together".to_string(),
            })
            .or_api(correlation)
        }
    };

    let (Some(provider), Some(coordinate)) = (state.weather.as_ref(), coordinate) else {
        if state.weather_required {
            return Err(ApiError::unavailable(
                "weather is required for recommendations \
                 but no coordinate or provider is available",
                correlation,
            ));
        }
        return Ok(None);
    };

    match provider.current(coordinate).await {
        Ok(summary) => Ok(Some(summary)),
        Err(error) if state.weather_required => Err(weather_error(error, correlation)),
        Err(error) => {
            warn!(
                event_name = "recommend.weather_unavailable",
                correlation_id = %correlation,
                error = %error,
                "scoring without weather"
            );
            Ok(None)
        }
    }
}

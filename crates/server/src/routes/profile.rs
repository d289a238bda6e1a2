use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use closet_core::{AgeBracket, ApplicationError, Sex};
use closet_db::repositories::StoredProfile;

use super::user_id;
use crate::error::{ApiError, ResultExt};
use crate::state::{AppState, CorrelationId};

#[derive(Debug, Deserialize)]
pub struct ProfileBody {
    pub age: u8,
    pub sex: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub uid: String,
    pub age: u8,
    pub sex: Sex,
    pub age_bracket: AgeBracket,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredProfile> for ProfileResponse {
    fn from(stored: StoredProfile) -> Self {
        let age_bracket = stored.profile().age_bracket();
        Self {
            uid: stored.uid.0,
            age: stored.age,
            sex: stored.sex,
            age_bracket,
            updated_at: stored.updated_at,
        }
    }
}

pub async fn show(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Path(uid): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let uid = user_id(&uid, &correlation)?;
    match state.profiles.find(&uid).await.or_api(&correlation)? {
        Some(stored) => Ok(Json(stored.into())),
        None => {
            Err(ApplicationError::NotFound { resource: "profile", id: uid.0 }).or_api(&correlation)
        }
    }
}

pub async fn update(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Path(uid): Path<String>,
    Json(body): Json<ProfileBody>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let uid = user_id(&uid, &correlation)?;
    let sex: Sex = body.sex.parse().or_api(&correlation)?;

    let stored = StoredProfile { uid, age: body.age, sex, updated_at: Utc::now() };
    state.profiles.save(stored.clone()).await.or_api(&correlation)?;

    info!(
        event_name = "profile.updated",
        correlation_id = %correlation,
        uid = %stored.uid.0,
        "user profile stored"
    );
    Ok(Json(stored.into()))
}

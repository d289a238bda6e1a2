use axum::{
    extract::{Multipart, Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use closet_core::{ApplicationError, GarmentAttributes, GarmentId, GarmentRecord, Group};
use closet_db::image_key;
use closet_db::repositories::StoredGarment;

use super::user_id;
use crate::classifier::user_garments;
use crate::error::{ApiError, ResultExt};
use crate::state::{AppState, CorrelationId};

pub async fn index() -> &'static str {
    "Hello World!"
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub uid: String,
    pub image_name: String,
    pub garments: Vec<GarmentRecord>,
    pub skipped: Vec<SkippedGarment>,
}

/// A detection for the user whose labels fall outside the garment taxonomy.
#[derive(Debug, Serialize)]
pub struct SkippedGarment {
    pub id: GarmentId,
    pub error: String,
}

/// The `image` part of an upload form.
struct ImageUpload {
    file_name: String,
    bytes: Vec<u8>,
}

/// Accepts `uid`, `image` and `imageName` form fields, classifies the photo,
/// stores it and records every garment detected for the user.
pub async fn upload(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut raw_uid: Option<String> = None;
    let mut image: Option<ImageUpload> = None;
    let mut image_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| ApiError::bad_request(error.body_text(), &correlation))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("uid") => {
                raw_uid = Some(
                    field
                        .text()
                        .await
                        .map_err(|error| ApiError::bad_request(error.body_text(), &correlation))?,
                );
            }
            Some("imageName") => {
                image_name = Some(
                    field
                        .text()
                        .await
                        .map_err(|error| ApiError::bad_request(error.body_text(), &correlation))?,
                );
            }
            Some("image") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|error| ApiError::bad_request(error.body_text(), &correlation))?;
                image = Some(ImageUpload { file_name, bytes: bytes.to_vec() });
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| ApiError::bad_request("No image file found", &correlation))?;
    if image.file_name.trim().is_empty() {
        return Err(ApiError::bad_request("No image file name", &correlation));
    }
    let uid = user_id(raw_uid.as_deref().unwrap_or_default(), &correlation)?;
    let image_name = image_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| image.file_name.clone());

    let detections = state
        .classifier
        .classify(&uid.0, &image_name, image.bytes.clone())
        .await
        .map_err(|error| {
            warn!(
                event_name = "closet.upload.classifier_failed",
                correlation_id = %correlation,
                uid = %uid.0,
                error = %error,
                "classifier call failed"
            );
            ApiError::internal("module execution failed", &correlation)
        })?;

    let mut classified = Vec::new();
    let mut skipped = Vec::new();
    for (id, labels) in user_garments(&uid.0, &detections) {
        match GarmentAttributes::try_from(&labels) {
            Ok(attributes) => classified.push((id, attributes)),
            Err(error) => {
                warn!(
                    event_name = "closet.upload.unmapped_labels",
                    correlation_id = %correlation,
                    uid = %uid.0,
                    garment_id = %id.0,
                    error = %error,
                    "skipping garment with unmapped labels"
                );
                skipped.push(SkippedGarment { id, error: error.to_string() });
            }
        }
    }
    if classified.is_empty() {
        return Err(ApiError::internal("module execution failed", &correlation));
    }

    let image_ref =
        state.images.put(&image_key(&uid, &image_name), &image.bytes).await.or_api(&correlation)?;

    let added_at = Utc::now();
    let mut garments = Vec::with_capacity(classified.len());
    for (id, attributes) in classified {
        let record = GarmentRecord { id, attributes, image_ref: image_ref.clone(), added_at };
        state
            .garments
            .save(StoredGarment {
                uid: uid.clone(),
                image_name: image_name.clone(),
                record: record.clone(),
            })
            .await
            .or_api(&correlation)?;
        garments.push(record);
    }

    info!(
        event_name = "closet.upload.stored",
        correlation_id = %correlation,
        uid = %uid.0,
        image_name = %image_name,
        garment_count = garments.len(),
        skipped_count = skipped.len(),
        "garment photo classified and stored"
    );

    Ok(Json(UploadResponse {
        message: "Data received successfully",
        uid: uid.0,
        image_name,
        garments,
        skipped,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ClosetQuery {
    pub group: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClosetResponse {
    pub uid: String,
    pub garments: Vec<GarmentRecord>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Path(uid): Path<String>,
    Query(query): Query<ClosetQuery>,
) -> Result<Json<ClosetResponse>, ApiError> {
    let uid = user_id(&uid, &correlation)?;
    let group = query.group.as_deref().map(str::parse::<Group>).transpose().or_api(&correlation)?;

    let garments = state.garments.list_for_user(&uid, group).await.or_api(&correlation)?;
    Ok(Json(ClosetResponse { uid: uid.0, garments }))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: GarmentId,
    pub image_removed: bool,
}

/// Removes one garment. The photo goes too unless another garment detected
/// in the same upload still points at it.
pub async fn remove(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Path((uid, garment_id)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let uid = user_id(&uid, &correlation)?;
    let id = GarmentId(garment_id);

    let Some(stored) = state.garments.find(&uid, &id).await.or_api(&correlation)? else {
        return Err(ApplicationError::NotFound { resource: "garment", id: id.0 })
            .or_api(&correlation);
    };
    state.garments.delete(&uid, &id).await.or_api(&correlation)?;

    let remaining = state.garments.list_for_user(&uid, None).await.or_api(&correlation)?;
    let shared = remaining.iter().any(|garment| garment.image_ref == stored.record.image_ref);
    let image_removed = if shared {
        false
    } else {
        state.images.delete(&image_key(&uid, &stored.image_name)).await.or_api(&correlation)?
    };

    info!(
        event_name = "closet.garment.deleted",
        correlation_id = %correlation,
        uid = %uid.0,
        garment_id = %id.0,
        image_removed,
        "garment removed"
    );

    Ok(Json(DeleteResponse { deleted: id, image_removed }))
}

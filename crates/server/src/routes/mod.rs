//! HTTP surface of the closet service.
//!
//! - `GET    /`                               liveness text
//! - `POST   /upload`                         classify and store a garment photo
//! - `GET    /closet/{uid}`                   list a user's garments
//! - `DELETE /closet/{uid}/{garment_id}`      remove a garment
//! - `GET    /users/{uid}/profile`            read age/sex
//! - `PUT    /users/{uid}/profile`            store age/sex
//! - `GET    /weather?lat=&lon=`              weather summary for a coordinate
//! - `POST   /recommend`                      outfit recommendation

pub mod closet;
pub mod profile;
pub mod recommend;
pub mod weather;

use axum::{
    routing::{delete, get, post},
    Router,
};

use closet_core::UserId;

use crate::classifier::sanitize_uid;
use crate::error::ApiError;
use crate::state::{AppState, CorrelationId};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(closet::index))
        .route("/upload", post(closet::upload))
        .route("/closet/{uid}", get(closet::list))
        .route("/closet/{uid}/{garment_id}", delete(closet::remove))
        .route("/users/{uid}/profile", get(profile::show).put(profile::update))
        .route("/weather", get(weather::current))
        .route("/recommend", post(recommend::recommend))
        .with_state(state)
}

/// Sanitized uid from a path or form field; empty results are rejected.
pub(crate) fn user_id(raw: &str, correlation: &CorrelationId) -> Result<UserId, ApiError> {
    let uid = sanitize_uid(raw);
    let uid = uid.trim();
    if uid.is_empty() {
        return Err(ApiError::bad_request("uid is required", correlation));
    }
    Ok(UserId(uid.to_string()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{body::Body, http::Request, response::Response, Router};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::request_log::log_requests;

    pub fn app(state: crate::state::AppState) -> Router {
        super::router(state).layer(axum::middleware::from_fn(log_requests))
    }

    pub async fn send(app: Router, request: Request<Body>) -> Response {
        app.oneshot(request).await.expect("router is infallible")
    }

    pub async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder().method(method).uri(uri).body(Body::empty()).expect("request")
    }
}

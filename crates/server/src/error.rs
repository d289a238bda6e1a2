use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use closet_core::{ApplicationError, InterfaceError};

use crate::state::CorrelationId;

/// HTTP face of an [`InterfaceError`].
#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: &'static str,
    pub correlation_id: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>, correlation: &CorrelationId) -> Self {
        Self(InterfaceError::BadRequest {
            message: message.into(),
            correlation_id: correlation.to_string(),
        })
    }

    pub fn unavailable(message: impl Into<String>, correlation: &CorrelationId) -> Self {
        Self(InterfaceError::ServiceUnavailable {
            message: message.into(),
            correlation_id: correlation.to_string(),
        })
    }

    pub fn internal(message: impl Into<String>, correlation: &CorrelationId) -> Self {
        Self(InterfaceError::Internal {
            message: message.into(),
            correlation_id: correlation.to_string(),
        })
    }

    pub fn status(&self) -> StatusCode {
        match self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(
                event_name = "http.error",
                correlation_id = %self.0.correlation_id(),
                status = status.as_u16(),
                error = %self.0,
                "request failed"
            );
        }
        let body = ErrorBody {
            error: self.0.message().to_string(),
            detail: self.0.user_message(),
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Tags application failures with the request's correlation id.
pub trait ResultExt<T> {
    fn or_api(self, correlation: &CorrelationId) -> Result<T, ApiError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<ApplicationError>,
{
    fn or_api(self, correlation: &CorrelationId) -> Result<T, ApiError> {
        self.map_err(|error| ApiError(error.into().into_interface(correlation.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use closet_core::{RequestError, TaxonomyError};

    use super::*;

    #[test]
    fn application_errors_map_to_http_status() {
        let correlation = CorrelationId::from("req-1");

        let bad: Result<(), _> = Err(RequestError::MissingField("style"));
        assert_eq!(bad.or_api(&correlation).unwrap_err().status(), StatusCode::BAD_REQUEST);

        let missing: Result<(), _> =
            Err(ApplicationError::NotFound { resource: "garment", id: "g1".to_string() });
        assert_eq!(missing.or_api(&correlation).unwrap_err().status(), StatusCode::NOT_FOUND);

        let down: Result<(), _> = Err(ApplicationError::Persistence("locked".to_string()));
        assert_eq!(
            down.or_api(&correlation).unwrap_err().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn response_body_carries_message_and_correlation_id() {
        let correlation = CorrelationId::from("req-42");
        let error: Result<(), _> =
            Err(TaxonomyError::Unmapped { dimension: "style", label: "goth".to_string() });

        let response = error.or_api(&correlation).unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body["correlation_id"], "req-42");
        assert!(body["error"].as_str().is_some_and(|message| message.contains("goth")));
    }
}

//! Client for the external garment detection service.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::debug;

use closet_core::domain::garment::GarmentId;
use closet_core::AttributeLabels;

/// Detector output: generated garment key → raw labels.
pub type Detections = BTreeMap<String, AttributeLabels>;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier request failed: {0}")]
    Transport(String),
    #[error("classifier responded with status {0}")]
    Status(u16),
    #[error("classifier response could not be decoded: {0}")]
    Decode(String),
}

#[async_trait]
pub trait GarmentClassifier: Send + Sync {
    async fn classify(
        &self,
        uid: &str,
        image_name: &str,
        image: Vec<u8>,
    ) -> Result<Detections, ClassifierError>;
}

/// Posts the photo as multipart (`uid`, `image`) and expects a JSON object of
/// detections back.
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpClassifier {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|error| ClassifierError::Transport(error.to_string()))?;
        Ok(Self { client, endpoint: endpoint.into() })
    }
}

#[async_trait]
impl GarmentClassifier for HttpClassifier {
    async fn classify(
        &self,
        uid: &str,
        image_name: &str,
        image: Vec<u8>,
    ) -> Result<Detections, ClassifierError> {
        let form = Form::new()
            .text("uid", uid.to_string())
            .part("image", Part::bytes(image).file_name(image_name.to_string()));

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|error| ClassifierError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Status(status.as_u16()));
        }

        let detections: Detections =
            response.json().await.map_err(|error| ClassifierError::Decode(error.to_string()))?;
        debug!(
            event_name = "classifier.detections",
            uid,
            detection_count = detections.len(),
            "classifier returned detections"
        );
        Ok(detections)
    }
}

/// Keeps Hangul syllables, ASCII letters and digits, and whitespace.
pub fn sanitize_uid(raw: &str) -> String {
    raw.chars()
        .filter(|ch| {
            ('\u{AC00}'..='\u{D7A3}').contains(ch)
                || ch.is_ascii_alphanumeric()
                || ch.is_whitespace()
        })
        .collect()
}

/// Detections whose key mentions `uid`; the garment id is the key with the
/// uid removed.
pub fn user_garments(uid: &str, detections: &Detections) -> Vec<(GarmentId, AttributeLabels)> {
    if uid.is_empty() {
        return Vec::new();
    }
    detections
        .iter()
        .filter(|(key, _)| key.contains(uid))
        .filter_map(|(key, labels)| {
            let id = key.replace(uid, "");
            let id = id.trim_matches(|ch: char| ch == '_' || ch == '-' || ch.is_whitespace());
            (!id.is_empty()).then(|| (GarmentId(id.to_string()), labels.clone()))
        })
        .collect()
}

#[cfg(test)]
pub mod fake {
    use std::sync::Mutex;

    use super::*;

    /// Returns canned detections and remembers what it was asked.
    #[derive(Default)]
    pub struct StaticClassifier {
        pub detections: Detections,
        pub fail: bool,
        pub calls: Mutex<Vec<(String, String, usize)>>,
    }

    impl StaticClassifier {
        pub fn with(detections: Detections) -> Self {
            Self { detections, ..Self::default() }
        }
    }

    #[async_trait]
    impl GarmentClassifier for StaticClassifier {
        async fn classify(
            &self,
            uid: &str,
            image_name: &str,
            image: Vec<u8>,
        ) -> Result<Detections, ClassifierError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push((uid.to_string(), image_name.to_string(), image.len()));
            }
            if self.fail {
                return Err(ClassifierError::Status(500));
            }
            Ok(self.detections.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{routing::post, Json, Router};

    use super::*;

    fn labels(category: &str) -> AttributeLabels {
        AttributeLabels {
            category: category.to_string(),
            color: "black".to_string(),
            print: "solid".to_string(),
            material: "denim".to_string(),
            length: "long".to_string(),
            style: "street".to_string(),
        }
    }

    #[test]
    fn sanitize_keeps_hangul_alphanumerics_and_spaces() {
        assert_eq!(sanitize_uid("홍길동_01!"), "홍길동01");
        assert_eq!(sanitize_uid("user 42@x.com"), "user 42xcom");
        assert_eq!(sanitize_uid("../../etc"), "etc");
    }

    #[test]
    fn only_keys_mentioning_the_uid_are_kept_and_uid_is_stripped() {
        let mut detections = Detections::new();
        detections.insert("abc123jeans".to_string(), labels("jeans"));
        detections.insert("abc123_hoodie".to_string(), labels("hoodie"));
        detections.insert("other_coat".to_string(), labels("coat"));
        detections.insert("abc123".to_string(), labels("coat"));

        let garments = user_garments("abc123", &detections);
        let ids: Vec<&str> = garments.iter().map(|(id, _)| id.0.as_str()).collect();

        assert_eq!(ids, vec!["hoodie", "jeans"]);
        assert_eq!(garments[1].1.category, "jeans");
    }

    #[test]
    fn empty_uid_matches_nothing() {
        let mut detections = Detections::new();
        detections.insert("shirt".to_string(), labels("shirt"));
        assert!(user_garments("", &detections).is_empty());
    }

    #[tokio::test]
    async fn http_classifier_decodes_detections() {
        let app = Router::new().route(
            "/classify",
            post(|| async {
                let mut detections = Detections::new();
                detections.insert("u1jeans".to_string(), labels("jeans"));
                Json(detections)
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let classifier =
            HttpClassifier::new(format!("http://{address}/classify"), 5).expect("client");
        let detections =
            classifier.classify("u1", "jeans.jpg", b"jpeg".to_vec()).await.expect("classify");

        assert_eq!(detections.get("u1jeans"), Some(&labels("jeans")));
    }

    #[tokio::test]
    async fn http_classifier_reports_error_status() {
        let app = Router::new().route(
            "/classify",
            post(|| async { axum::http::StatusCode::BAD_GATEWAY }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let classifier =
            HttpClassifier::new(format!("http://{address}/classify"), 5).expect("client");
        let error = classifier.classify("u1", "x.jpg", Vec::new()).await;

        assert!(matches!(error, Err(ClassifierError::Status(502))));
    }
}

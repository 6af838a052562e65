//! `Json<T>` that also runs `validator` rules
//!
//! Malformed bodies and rule violations both answer `400 Bad Request` in the
//! usual error envelope, so clients see one shape for every input problem.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiError;

/// Deserialized request body that passed its `#[validate(...)]` rules.
///
/// ```ignore
/// async fn create_slot(ValidatedJson(req): ValidatedJson<CreateSlotRequest>) { .. }
/// ```
pub struct ValidatedJson<T>(pub T);

#[derive(Debug)]
pub enum ValidatedJsonRejection {
    Body(JsonRejection),
    Rules(ValidationErrors),
}

/// `field: message` pairs in field order, joined with `; `
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{}: {}", field, msg),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();
    parts.sort();

    if parts.is_empty() {
        "Validation failed".to_string()
    } else {
        parts.join("; ")
    }
}

impl From<ValidatedJsonRejection> for ApiError {
    fn from(rejection: ValidatedJsonRejection) -> Self {
        let message = match rejection {
            ValidatedJsonRejection::Body(r) => format!("Invalid request body: {}", r.body_text()),
            ValidatedJsonRejection::Rules(errors) => describe(&errors),
        };
        ApiError::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Body)?;
        value.validate().map_err(ValidatedJsonRejection::Rules)?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 1, max = 20, message = "vehicle_number is required"))]
        vehicle_number: String,
        #[validate(range(min = 1, message = "slot_id must be positive"))]
        slot_id: i32,
    }

    async fn accept(ValidatedJson(_probe): ValidatedJson<Probe>) -> &'static str {
        "ok"
    }

    async fn post_json(raw: &str) -> (StatusCode, Value) {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/probe")
            .header("content-type", "application/json")
            .body(Body::from(raw.to_string()))
            .unwrap();
        let resp = Router::new()
            .route("/probe", post(accept))
            .oneshot(req)
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn valid_body_passes_through() {
        let (status, _) = post_json(r#"{"vehicle_number": "AB123", "slot_id": 3}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_field_is_bad_request() {
        let (status, body) = post_json(r#"{"vehicle_number": "AB123"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, body) = post_json("not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn rule_violations_are_listed_by_field() {
        let (status, body) = post_json(r#"{"vehicle_number": "", "slot_id": 0}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "slot_id: slot_id must be positive; vehicle_number: vehicle_number is required"
        );
    }
}

//! Axum extractors that report failures as [`ShopError`] responses
//!
//! The stock `Path` and `Json` extractors reject with plain-text bodies; these
//! wrappers keep every error on the `{code, message, details}` shape.

use crate::core::{RequestError, ShopError};
use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

/// Entity id taken from the `{id}` path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(pub Uuid);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ShopError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| RequestError::InvalidBody {
                message: e.body_text(),
            })?;

        Uuid::parse_str(&raw)
            .map(EntityId)
            .map_err(|_| RequestError::InvalidEntityId { id: raw }.into())
    }
}

/// JSON body that is deserialized and then run through `validator`
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ShopError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| RequestError::InvalidBody {
                message: e.body_text(),
            })?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

/// JSON body without field validation
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ShopError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| RequestError::InvalidBody {
                message: e.body_text(),
            })?;
        Ok(JsonBody(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Method, StatusCode};
    use axum::routing::{get, post};
    use tower::ServiceExt;

    #[derive(serde::Deserialize, Validate)]
    struct Named {
        #[validate(length(min = 1))]
        name: String,
    }

    fn app() -> Router {
        Router::new()
            .route("/items/{id}", get(|EntityId(id): EntityId| async move { id.to_string() }))
            .route(
                "/items",
                post(|ValidJson(body): ValidJson<Named>| async move { body.name }),
            )
    }

    async fn send(req: axum::http::Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_bad_uuid_is_json_error() {
        let req = axum::http::Request::get("/items/not-a-uuid")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_ENTITY_ID");
    }

    #[tokio::test]
    async fn test_validation_failure_is_422() {
        let req = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/items")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name": ""}"#))
            .unwrap();
        let (status, json) = send(req).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["details"]["fields"][0]["field"], "name");
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let req = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/items")
            .header("content-type", "application/json")
            .body(Body::from("{"))
            .unwrap();
        let (status, json) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_BODY");
    }
}

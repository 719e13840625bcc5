//! Generic REST handlers for ordered catalog collections
//!
//! Every mutation answers with the collection in display order so clients
//! can redraw a sortable list without a second request.

use crate::core::{EntityId, JsonBody, ShopResult};
use crate::entities::{CatalogEntity, CreateRequest, PatchRequest, PositionRequest};
use crate::ordering::OrderedCollection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Filter for `GET /{plural}`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Only records visible on the storefront
    #[serde(default)]
    pub active: Option<bool>,
}

/// Body of every mutating collection route
#[derive(Debug, Serialize)]
pub struct CollectionResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
    pub items: Vec<T>,
}

impl<T: CatalogEntity> CollectionResponse<T> {
    fn with_item(id: Uuid, items: Vec<T>) -> Self {
        let item = items.iter().find(|r| r.id() == id).cloned();
        Self { item, items }
    }

    fn items(items: Vec<T>) -> Self {
        Self { item: None, items }
    }
}

/// Routes for one collection, prefixed with its plural name
pub fn routes<T: CatalogEntity>(collection: OrderedCollection<T>) -> Router {
    let plural = T::resource_name();
    Router::new()
        .route(&format!("/{plural}"), get(list::<T>).post(create::<T>))
        .route(&format!("/{plural}/normalize"), post(normalize::<T>))
        .route(
            &format!("/{plural}/{{id}}"),
            get(get_one::<T>).put(update::<T>).delete(remove::<T>),
        )
        .route(&format!("/{plural}/{{id}}/position"), put(move_to::<T>))
        .with_state(collection)
}

async fn list<T: CatalogEntity>(
    State(collection): State<OrderedCollection<T>>,
    Query(query): Query<ListQuery>,
) -> ShopResult<Json<Vec<T>>> {
    let records = if query.active.unwrap_or(false) {
        collection.list_active().await?
    } else {
        collection.list().await?
    };
    Ok(Json(records))
}

async fn get_one<T: CatalogEntity>(
    State(collection): State<OrderedCollection<T>>,
    EntityId(id): EntityId,
) -> ShopResult<Json<T>> {
    Ok(Json(collection.get(&id).await?))
}

async fn create<T: CatalogEntity>(
    State(collection): State<OrderedCollection<T>>,
    JsonBody(body): JsonBody<CreateRequest<T::Create>>,
) -> ShopResult<(StatusCode, Json<CollectionResponse<T>>)> {
    body.fields.validate()?;
    let record = T::from_create(body.fields);
    let id = record.id();

    let items = collection.insert_at(record, body.order).await?;
    Ok((
        StatusCode::CREATED,
        Json(CollectionResponse::with_item(id, items)),
    ))
}

async fn update<T: CatalogEntity>(
    State(collection): State<OrderedCollection<T>>,
    EntityId(id): EntityId,
    JsonBody(body): JsonBody<PatchRequest<T::Patch>>,
) -> ShopResult<Json<CollectionResponse<T>>> {
    body.fields.validate()?;
    let patch = body.fields;

    let items = collection
        .update(&id, move |record| record.apply_patch(patch), body.order)
        .await?;
    Ok(Json(CollectionResponse::with_item(id, items)))
}

async fn remove<T: CatalogEntity>(
    State(collection): State<OrderedCollection<T>>,
    EntityId(id): EntityId,
) -> ShopResult<Json<CollectionResponse<T>>> {
    let items = collection.remove(&id).await?;
    Ok(Json(CollectionResponse::items(items)))
}

async fn move_to<T: CatalogEntity>(
    State(collection): State<OrderedCollection<T>>,
    EntityId(id): EntityId,
    JsonBody(body): JsonBody<PositionRequest>,
) -> ShopResult<Json<CollectionResponse<T>>> {
    let items = collection.move_to(&id, body.order).await?;
    Ok(Json(CollectionResponse::with_item(id, items)))
}

async fn normalize<T: CatalogEntity>(
    State(collection): State<OrderedCollection<T>>,
) -> ShopResult<Json<CollectionResponse<T>>> {
    let items = collection.normalize().await?;
    Ok(Json(CollectionResponse::items(items)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Slider;
    use crate::storage::InMemoryDataService;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        routes(OrderedCollection::new(Arc::new(
            InMemoryDataService::<Slider>::new(),
        )))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn names(items: &Value) -> Vec<String> {
        items
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_create_at_position_returns_item_and_sorted_list() {
        let app = app();
        for name in ["a", "b"] {
            let (status, _) = call(
                &app,
                "POST",
                "/sliders",
                Some(json!({"name": name, "image": format!("/img/{name}.png")})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = call(
            &app,
            "POST",
            "/sliders",
            Some(json!({"name": "first", "image": "/img/first.png", "order": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["item"]["order"], 1);
        assert_eq!(names(&body["items"]), vec!["first", "a", "b"]);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_fields() {
        let app = app();
        let (status, body) = call(
            &app,
            "POST",
            "/sliders",
            Some(json!({"name": "", "image": "/x.png"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_position_route_moves_record() {
        let app = app();
        let mut ids = Vec::new();
        for name in ["a", "b", "c"] {
            let (_, body) = call(
                &app,
                "POST",
                "/sliders",
                Some(json!({"name": name, "image": "/x.png"})),
            )
            .await;
            ids.push(body["item"]["id"].as_str().unwrap().to_string());
        }

        let (status, body) = call(
            &app,
            "PUT",
            &format!("/sliders/{}/position", ids[2]),
            Some(json!({"order": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body["items"]), vec!["c", "a", "b"]);
        assert_eq!(body["item"]["order"], 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_404() {
        let app = app();
        let (status, body) = call(
            &app,
            "DELETE",
            &format!("/sliders/{}", Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ENTITY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_normalize_route_is_not_shadowed_by_id_route() {
        let app = app();
        let (status, body) = call(&app, "POST", "/sliders/normalize", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"], json!([]));
    }
}

use crate::core::ProductService;
use crate::domain::DocumentStore;
use crate::utils::error::ApiError;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;

/// Mount the product endpoints of both API versions.
///
/// `v1` is backed by the raw client and `v2` by the typed one, but the routes
/// only require a `DocumentStore`, so any pair of stores can be plugged in.
pub fn build_router<V1, V2>(
    v1: Arc<ProductService<V1>>,
    v2: Arc<ProductService<V2>>,
    query_passthrough: bool,
) -> Router
where
    V1: DocumentStore + 'static,
    V2: DocumentStore + 'static,
{
    if !query_passthrough {
        tracing::info!("Query pass-through disabled, /findByQuery routes not mounted");
    }

    Router::new()
        .merge(product_routes("v1", v1, query_passthrough))
        .merge(product_routes("v2", v2, query_passthrough))
}

pub fn product_routes<S>(
    version: &str,
    service: Arc<ProductService<S>>,
    query_passthrough: bool,
) -> Router
where
    S: DocumentStore + 'static,
{
    let mut router = Router::new()
        .route(&format!("/findAll/{}", version), get(find_all::<S>))
        .route(&format!("/findById/{}/:id", version), get(find_by_id::<S>))
        .route(&format!("/createProduct/{}", version), post(create_product::<S>))
        .route(&format!("/updateProduct/{}/:id", version), put(update_product::<S>))
        .route(
            &format!("/deleteProductById/{}/:id", version),
            delete(delete_product::<S>),
        );

    if query_passthrough {
        router = router.route(&format!("/findByQuery/{}", version), post(find_by_query::<S>));
    }

    router.with_state(service)
}

async fn find_all<S: DocumentStore + 'static>(
    State(service): State<Arc<ProductService<S>>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let hits = service.find_all().await?;
    Ok(Json(hits))
}

async fn find_by_id<S: DocumentStore + 'static>(
    State(service): State<Arc<ProductService<S>>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match service.find_by_id(&id).await? {
        Some(hit) => Ok(Json(hit).into_response()),
        // 查無資料時回 200 空內容，不是 404
        None => Ok(StatusCode::OK.into_response()),
    }
}

async fn find_by_query<S: DocumentStore + 'static>(
    State(service): State<Arc<ProductService<S>>>,
    body: Bytes,
) -> Result<Json<Vec<Value>>, ApiError> {
    let hits = service.find_by_query(&body).await?;
    Ok(Json(hits))
}

async fn create_product<S: DocumentStore + 'static>(
    State(service): State<Arc<ProductService<S>>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let ack = service.create(&body).await?;
    Ok(Json(ack.into_inner()))
}

async fn update_product<S: DocumentStore + 'static>(
    State(service): State<Arc<ProductService<S>>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let ack = service.update(&id, &body).await?;
    Ok(Json(ack.into_inner()))
}

async fn delete_product<S: DocumentStore + 'static>(
    State(service): State<Arc<ProductService<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let ack = service.delete(&id).await?;
    Ok(Json(ack.into_inner()))
}

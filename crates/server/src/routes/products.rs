use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use models::product::{Product, ProductCreate, ProductPatch};
use service::products::ProductListParams;
use service::query::Page;

use crate::errors::JsonApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_quantity: Option<u32>,
    pub sort_by: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Page<Product>>, JsonApiError> {
    let params = ProductListParams {
        page: q.page.unwrap_or(1),
        name: q.name,
        min_price: q.min_price,
        max_price: q.max_price,
        min_quantity: q.min_quantity,
        sort_by: q.sort_by,
    };
    let page = state.products.list(&params).await?;
    info!(page = page.page, total = page.total_items, "list products");
    Ok(Json(page))
}

pub async fn get(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
) -> Result<Json<Product>, JsonApiError> {
    Ok(Json(state.products.get(product_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ProductCreate>,
) -> Result<Json<Product>, JsonApiError> {
    let created = state.products.create(input).await?;
    info!(id = created.id, name = %created.name, "created product");
    Ok(Json(created))
}

pub async fn create_batch(
    State(state): State<AppState>,
    Json(inputs): Json<Vec<ProductCreate>>,
) -> Result<Json<Vec<Product>>, JsonApiError> {
    let created = state.products.create_batch(inputs).await?;
    info!(count = created.len(), "created product batch");
    Ok(Json(created))
}

pub async fn patch(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, JsonApiError> {
    let updated = state.products.patch(product_id, patch).await?;
    info!(id = updated.id, "patched product");
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
) -> Result<StatusCode, JsonApiError> {
    state.products.delete(product_id).await?;
    info!(id = product_id, "deleted product");
    Ok(StatusCode::NO_CONTENT)
}

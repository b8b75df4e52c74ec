use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use models::order::{Order, OrderCreate, OrderPatch};
use service::orders::OrderListParams;
use service::query::Page;

use crate::errors::JsonApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub customer_name: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Page<Order>>, JsonApiError> {
    let params = OrderListParams {
        page: q.page.unwrap_or(1),
        customer_name: q.customer_name,
        status: q.status,
        sort_by: q.sort_by,
    };
    let page = state.orders.list(&params).await?;
    info!(page = page.page, total = page.total_items, "list orders");
    Ok(Json(page))
}

pub async fn get(
    State(state): State<AppState>,
    Path(order_id): Path<u64>,
) -> Result<Json<Order>, JsonApiError> {
    Ok(Json(state.orders.get(order_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<OrderCreate>,
) -> Result<Json<Order>, JsonApiError> {
    let created = state.orders.create(input).await?;
    info!(id = created.id, customer = %created.customer.name, total = created.total_price, "created order");

    // Fire-and-forget confirmation mail; delivery failure never affects the
    // create response.
    if let Some(email) = created.customer.email.clone() {
        let notifier = state.notifier.clone();
        let subject = format!("Order #{} received", created.id);
        let body = format!(
            "Hi {},\n\nwe received your order #{} over {:.2}. We will let you know once it has been processed.\n",
            created.customer.name, created.id, created.total_price,
        );
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&subject, &body, &email).await {
                warn!(err = %e, %email, "order notification failed");
            }
        });
    }

    Ok(Json(created))
}

pub async fn patch(
    State(state): State<AppState>,
    Path(order_id): Path<u64>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<Order>, JsonApiError> {
    let updated = state.orders.patch(order_id, patch).await?;
    info!(id = updated.id, status = %updated.status, "patched order");
    Ok(Json(updated))
}

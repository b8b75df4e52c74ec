use std::path::PathBuf;

use models::order::{Order, OrderCreate, OrderPatch};

use crate::errors::ServiceError;
use crate::query::{self, Filter, Page, SortCmp};
use crate::storage::json_store::JsonListStore;

/// Listing parameters for the orders collection.
#[derive(Clone, Debug)]
pub struct OrderListParams {
    pub page: usize,
    pub customer_name: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
}

impl Default for OrderListParams {
    fn default() -> Self {
        Self { page: 1, customer_name: None, status: None, sort_by: None }
    }
}

/// Business logic for the orders collection, backed by one JSON document.
///
/// Orders deliberately expose no delete and no batch create.
#[derive(Clone)]
pub struct OrderService {
    store: JsonListStore<Order>,
}

impl OrderService {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { store: JsonListStore::new(path) }
    }

    /// Seed an empty document if the file is missing. Called at startup.
    pub async fn init(&self) -> Result<(), ServiceError> {
        self.store.ensure_exists().await
    }

    pub async fn get(&self, id: u64) -> Result<Order, ServiceError> {
        let orders = self.store.load().await?;
        orders
            .into_iter()
            .find(|o| o.id == id)
            .ok_or_else(|| ServiceError::not_found("order"))
    }

    pub async fn list(&self, params: &OrderListParams) -> Result<Page<Order>, ServiceError> {
        let orders = self.store.load().await?;
        let sort = params.sort_by.as_deref().and_then(sort_cmp);
        query::paginate(orders, &filters(params), sort, params.page)
    }

    pub async fn create(&self, input: OrderCreate) -> Result<Order, ServiceError> {
        input.validate()?;
        let mut orders = self.store.load().await?;
        let new_id = orders.iter().map(|o| o.id).max().unwrap_or(0) + 1;
        let order = input.into_record(new_id);
        orders.push(order.clone());
        self.store.save(&orders).await?;
        Ok(order)
    }

    pub async fn patch(&self, id: u64, patch: OrderPatch) -> Result<Order, ServiceError> {
        if patch.is_empty() {
            return Err(ServiceError::BadRequest("no fields provided for update".into()));
        }
        let mut orders = self.store.load().await?;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| ServiceError::not_found("order"))?;
        order.apply(patch);
        let updated = order.clone();
        self.store.save(&orders).await?;
        Ok(updated)
    }
}

fn filters(params: &OrderListParams) -> Vec<Filter<Order>> {
    let mut filters: Vec<Filter<Order>> = Vec::new();
    if let Some(status) = &params.status {
        let status = status.clone();
        filters.push(Box::new(move |o: &Order| o.status == status));
    }
    if let Some(name) = &params.customer_name {
        let needle = name.to_lowercase();
        filters.push(Box::new(move |o: &Order| o.customer.name.to_lowercase().contains(&needle)));
    }
    filters
}

fn sort_cmp(key: &str) -> Option<SortCmp<Order>> {
    let cmp: SortCmp<Order> = match key {
        "date_asc" => |a, b| a.created_at.cmp(&b.created_at),
        "date_desc" => |a, b| b.created_at.cmp(&a.created_at),
        "name_asc" => |a, b| a.customer.name.to_lowercase().cmp(&b.customer.name.to_lowercase()),
        "name_desc" => |a, b| b.customer.name.to_lowercase().cmp(&a.customer.name.to_lowercase()),
        // unrecognized keys are ignored, leaving file order
        _ => return None,
    };
    Some(cmp)
}

use std::path::PathBuf;

use models::product::{Product, ProductCreate, ProductPatch};

use crate::errors::ServiceError;
use crate::query::{self, Filter, Page, SortCmp};
use crate::storage::json_store::JsonListStore;

/// Listing parameters for the products collection.
#[derive(Clone, Debug)]
pub struct ProductListParams {
    pub page: usize,
    pub name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_quantity: Option<u32>,
    pub sort_by: Option<String>,
}

impl Default for ProductListParams {
    fn default() -> Self {
        Self { page: 1, name: None, min_price: None, max_price: None, min_quantity: None, sort_by: None }
    }
}

/// Business logic for the products collection, backed by one JSON document.
///
/// Every operation reloads the full record set from disk and writes the
/// full set back; nothing is cached across calls.
#[derive(Clone)]
pub struct ProductService {
    store: JsonListStore<Product>,
}

impl ProductService {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { store: JsonListStore::new(path) }
    }

    /// Seed an empty document if the file is missing. Called at startup.
    pub async fn init(&self) -> Result<(), ServiceError> {
        self.store.ensure_exists().await
    }

    pub async fn get(&self, id: u64) -> Result<Product, ServiceError> {
        let products = self.store.load().await?;
        products
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ServiceError::not_found("product"))
    }

    pub async fn list(&self, params: &ProductListParams) -> Result<Page<Product>, ServiceError> {
        let products = self.store.load().await?;
        let sort = params.sort_by.as_deref().and_then(sort_cmp);
        query::paginate(products, &filters(params), sort, params.page)
    }

    pub async fn create(&self, input: ProductCreate) -> Result<Product, ServiceError> {
        input.validate()?;
        let mut products = self.store.load().await?;
        let new_id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let product = input.into_record(new_id);
        products.push(product.clone());
        self.store.save(&products).await?;
        Ok(product)
    }

    /// Create several products in one load/save cycle. Ids are assigned
    /// sequentially from the max id observed once, so items within the
    /// batch cannot collide.
    pub async fn create_batch(&self, inputs: Vec<ProductCreate>) -> Result<Vec<Product>, ServiceError> {
        for input in &inputs {
            input.validate()?;
        }
        let mut products = self.store.load().await?;
        let current_max = products.iter().map(|p| p.id).max().unwrap_or(0);
        let created: Vec<Product> = inputs
            .into_iter()
            .enumerate()
            .map(|(idx, input)| input.into_record(current_max + idx as u64 + 1))
            .collect();
        products.extend(created.iter().cloned());
        self.store.save(&products).await?;
        Ok(created)
    }

    pub async fn patch(&self, id: u64, patch: ProductPatch) -> Result<Product, ServiceError> {
        if patch.is_empty() {
            return Err(ServiceError::BadRequest("no fields provided for update".into()));
        }
        let mut products = self.store.load().await?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ServiceError::not_found("product"))?;
        product.apply(patch);
        let updated = product.clone();
        self.store.save(&products).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        let products = self.store.load().await?;
        let remaining: Vec<Product> = products.iter().filter(|p| p.id != id).cloned().collect();
        if remaining.len() == products.len() {
            return Err(ServiceError::not_found("product"));
        }
        self.store.save(&remaining).await?;
        Ok(())
    }
}

fn filters(params: &ProductListParams) -> Vec<Filter<Product>> {
    let mut filters: Vec<Filter<Product>> = Vec::new();
    if let Some(name) = &params.name {
        let needle = name.to_lowercase();
        filters.push(Box::new(move |p: &Product| p.name.to_lowercase().contains(&needle)));
    }
    if let Some(min) = params.min_price {
        filters.push(Box::new(move |p: &Product| p.price >= min));
    }
    if let Some(max) = params.max_price {
        filters.push(Box::new(move |p: &Product| p.price <= max));
    }
    if let Some(min) = params.min_quantity {
        filters.push(Box::new(move |p: &Product| p.quantity >= min));
    }
    filters
}

fn sort_cmp(key: &str) -> Option<SortCmp<Product>> {
    let cmp: SortCmp<Product> = match key {
        "name_asc" => |a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        "name_desc" => |a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()),
        "price_asc" => |a, b| a.price.total_cmp(&b.price),
        "price_desc" => |a, b| b.price.total_cmp(&a.price),
        "quantity_asc" => |a, b| a.quantity.cmp(&b.quantity),
        "quantity_desc" => |a, b| b.quantity.cmp(&a.quantity),
        "date_asc" => |a, b| a.created_at.cmp(&b.created_at),
        "date_desc" => |a, b| b.created_at.cmp(&a.created_at),
        // unrecognized keys are ignored, leaving file order
        _ => return None,
    };
    Some(cmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, price: f64, quantity: u32) -> ProductCreate {
        ProductCreate {
            name: name.into(),
            description: format!("{name} description"),
            price,
            image_url: format!("https://img.example.com/{name}.png"),
            quantity,
            created_at: "2025-01-15T10:00:00Z".parse().unwrap(),
        }
    }

    fn temp_service() -> ProductService {
        let path = std::env::temp_dir().join(format!("products_{}.json", uuid::Uuid::new_v4()));
        ProductService::new(path)
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() -> Result<(), anyhow::Error> {
        let svc = temp_service();
        svc.init().await?;

        let first = svc.create(input("laptop", 1200.0, 3)).await?;
        assert_eq!(first.id, 1);
        let second = svc.create(input("mouse", 25.0, 10)).await?;
        assert_eq!(second.id, 2);

        // id is derived from the current max, not a counter
        svc.delete(second.id).await?;
        let third = svc.create(input("keyboard", 80.0, 7)).await?;
        assert_eq!(third.id, 2);
        Ok(())
    }

    #[tokio::test]
    async fn batch_assigns_ids_from_single_max() -> Result<(), anyhow::Error> {
        let svc = temp_service();
        svc.init().await?;
        for i in 0..7 {
            svc.create(input(&format!("p{i}"), 1.0, 1)).await?;
        }

        let created = svc
            .create_batch(vec![input("a", 1.0, 1), input("b", 2.0, 2), input("c", 3.0, 3)])
            .await?;
        let ids: Vec<u64> = created.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![8, 9, 10]);
        // returned in input order
        assert_eq!(created[0].name, "a");
        assert_eq!(created[2].name, "c");
        Ok(())
    }

    #[tokio::test]
    async fn patch_merges_only_supplied_fields() -> Result<(), anyhow::Error> {
        let svc = temp_service();
        svc.init().await?;
        let created = svc.create(input("laptop", 1200.0, 3)).await?;

        let err = svc.patch(created.id, ProductPatch::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));

        let updated = svc
            .patch(created.id, ProductPatch { price: Some(5.0), ..Default::default() })
            .await?;
        assert_eq!(updated.price, 5.0);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.created_at, created.created_at);

        let missing = svc.patch(999, ProductPatch { price: Some(1.0), ..Default::default() }).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_exactly_one() -> Result<(), anyhow::Error> {
        let svc = temp_service();
        svc.init().await?;
        let a = svc.create(input("a", 1.0, 1)).await?;
        let b = svc.create(input("b", 2.0, 2)).await?;

        let missing = svc.delete(999).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
        // failed delete leaves the stored set unchanged
        assert_eq!(svc.list(&ProductListParams::default()).await?.total_items, 2);

        svc.delete(a.id).await?;
        let page = svc.list(&ProductListParams::default()).await?;
        assert_eq!(page.total_items, 1);
        assert_eq!(page.data[0].id, b.id);
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_sorts_and_pages() -> Result<(), anyhow::Error> {
        let svc = temp_service();
        svc.init().await?;
        svc.create(input("cheap", 10.0, 5)).await?;
        svc.create(input("mid", 20.0, 5)).await?;
        svc.create(input("dear", 30.0, 5)).await?;

        let params = ProductListParams {
            min_price: Some(15.0),
            sort_by: Some("price_desc".into()),
            ..Default::default()
        };
        let page = svc.list(&params).await?;
        assert_eq!(page.total_items, 2);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next);
        let ids: Vec<u64> = page.data.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2]);
        let prices: Vec<f64> = page.data.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![30.0, 20.0]);
        Ok(())
    }

    #[tokio::test]
    async fn name_filter_is_case_insensitive_substring() -> Result<(), anyhow::Error> {
        let svc = temp_service();
        svc.init().await?;
        svc.create(input("Gaming Laptop", 1500.0, 2)).await?;
        svc.create(input("Mouse", 25.0, 10)).await?;

        let params = ProductListParams { name: Some("LAPTOP".into()), ..Default::default() };
        let page = svc.list(&params).await?;
        assert_eq!(page.total_items, 1);
        assert_eq!(page.data[0].name, "Gaming Laptop");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_sort_key_keeps_file_order() -> Result<(), anyhow::Error> {
        let svc = temp_service();
        svc.init().await?;
        svc.create(input("z", 3.0, 1)).await?;
        svc.create(input("a", 1.0, 1)).await?;

        let params = ProductListParams { sort_by: Some("bogus_key".into()), ..Default::default() };
        let names: Vec<String> = svc.list(&params).await?.data.into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["z", "a"]);
        Ok(())
    }

    #[tokio::test]
    async fn page_out_of_bounds_is_not_found() -> Result<(), anyhow::Error> {
        let svc = temp_service();
        svc.init().await?;
        svc.create(input("only", 1.0, 1)).await?;

        let params = ProductListParams { page: 2, ..Default::default() };
        assert!(matches!(svc.list(&params).await, Err(ServiceError::NotFound(_))));

        // page 1 of an empty filtered set is an empty success
        let params = ProductListParams { name: Some("nothing".into()), ..Default::default() };
        let page = svc.list(&params).await?;
        assert_eq!(page.total_items, 0);
        assert!(page.data.is_empty());
        Ok(())
    }
}

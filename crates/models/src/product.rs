use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// A product as stored in the products document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
}

/// Create payload: everything but the id, which the service assigns.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
}

/// Partial update payload. Only keys present on the wire are applied;
/// unknown keys are rejected.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub quantity: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
}

pub fn validate_image_url(u: &str) -> Result<(), ModelError> {
    if !(u.starts_with("http://") || u.starts_with("https://")) {
        return Err(ModelError::Validation("image_url must start with http(s)".into()));
    }
    Ok(())
}

pub fn validate_price(p: f64) -> Result<(), ModelError> {
    if !p.is_finite() || p < 0.0 {
        return Err(ModelError::Validation("price must be a non-negative number".into()));
    }
    Ok(())
}

impl ProductCreate {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_price(self.price)?;
        validate_image_url(&self.image_url)?;
        Ok(())
    }

    pub fn into_record(self, id: u64) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
            quantity: self.quantity,
            created_at: self.created_at,
        }
    }
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
            && self.quantity.is_none()
            && self.created_at.is_none()
    }
}

impl Product {
    /// Overwrite only the fields the patch carries.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name { self.name = name; }
        if let Some(description) = patch.description { self.description = description; }
        if let Some(price) = patch.price { self.price = price; }
        if let Some(image_url) = patch.image_url { self.image_url = image_url; }
        if let Some(quantity) = patch.quantity { self.quantity = quantity; }
        if let Some(created_at) = patch.created_at { self.created_at = created_at; }
    }
}

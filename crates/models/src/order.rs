use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::product::{validate_image_url, validate_price};

/// Shipping/contact details captured with an order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
    pub city: String,
    #[serde(rename = "zipCode")]
    pub zip_code: String,
}

/// One line of an order. A denormalized snapshot of the product at order
/// time, not a live reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: u64,
    pub quantity: u32,
    pub image: String,
    pub name: String,
    pub price: f64,
}

/// An order as stored in the orders document. `status` is an open string;
/// "accepted", "rejected" and "completed" are the conventional values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub decision_date: Option<DateTime<Utc>>,
    pub customer: CustomerInfo,
    pub total_price: f64,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub decision_date: Option<DateTime<Utc>>,
    pub customer: CustomerInfo,
    pub total_price: f64,
    pub status: String,
}

/// Partial update payload. A supplied `customer` replaces the stored one
/// wholly; nested fields are not merged.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderPatch {
    pub items: Option<Vec<OrderItem>>,
    pub created_at: Option<DateTime<Utc>>,
    pub decision_date: Option<DateTime<Utc>>,
    pub customer: Option<CustomerInfo>,
    pub total_price: Option<f64>,
    pub status: Option<String>,
}

impl OrderCreate {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_price(self.total_price)?;
        for item in &self.items {
            validate_price(item.price)?;
            validate_image_url(&item.image)?;
        }
        Ok(())
    }

    pub fn into_record(self, id: u64) -> Order {
        Order {
            id,
            items: self.items,
            created_at: self.created_at,
            decision_date: self.decision_date,
            customer: self.customer,
            total_price: self.total_price,
            status: self.status,
        }
    }
}

impl OrderPatch {
    pub fn is_empty(&self) -> bool {
        self.items.is_none()
            && self.created_at.is_none()
            && self.decision_date.is_none()
            && self.customer.is_none()
            && self.total_price.is_none()
            && self.status.is_none()
    }
}

impl Order {
    /// Overwrite only the fields the patch carries.
    pub fn apply(&mut self, patch: OrderPatch) {
        if let Some(items) = patch.items { self.items = items; }
        if let Some(created_at) = patch.created_at { self.created_at = created_at; }
        if let Some(decision_date) = patch.decision_date { self.decision_date = Some(decision_date); }
        if let Some(customer) = patch.customer { self.customer = customer; }
        if let Some(total_price) = patch.total_price { self.total_price = total_price; }
        if let Some(status) = patch.status { self.status = status; }
    }
}

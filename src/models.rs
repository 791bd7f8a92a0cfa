use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: i64,
    pub currency: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShippingMethod {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub rate: i64,
    pub estimated_days: Option<i32>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subtotal: i64,
    pub tax: i64,
    pub shipping: i64,
    pub discount: i64,
    pub total: i64,
    pub currency: String,
    pub status: String,
    pub promo_code: Option<String>,
    pub shipping_address_id: Uuid,
    pub shipping_method_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub qty: i64,
    pub price: i64,
    pub title: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub provider_reference: String,
    pub amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cart line joined against the product catalog at pricing time. Price,
/// currency, title and image are snapshots; later product edits never touch
/// an order built from them.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PricedCartItem {
    pub product_id: Uuid,
    pub qty: i64,
    pub price: i64,
    pub currency: String,
    pub title: String,
    pub image: Option<String>,
}

/// Raw session cart document as stored in the `sessions.cart` JSON column.
/// Quantities are kept as raw JSON values so junk written by older clients
/// coerces to zero instead of failing the whole cart.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CartDoc {
    #[serde(default)]
    pub items: Vec<RawCartLine>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RawCartLine {
    pub product_id: String,
    #[serde(default)]
    pub qty: serde_json::Value,
}

impl From<entity::products::Model> for Product {
    fn from(model: entity::products::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            price: model.price,
            currency: model.currency,
            images: serde_json::from_value(model.images).unwrap_or_default(),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::addresses::Model> for Address {
    fn from(model: entity::addresses::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            full_name: model.full_name,
            line1: model.line1,
            line2: model.line2,
            city: model.city,
            state: model.state,
            postal_code: model.postal_code,
            country: model.country,
            phone: model.phone,
            is_default: model.is_default,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::shipping_methods::Model> for ShippingMethod {
    fn from(model: entity::shipping_methods::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            rate: model.rate,
            estimated_days: model.estimated_days,
            active: model.active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::orders::Model> for Order {
    fn from(model: entity::orders::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            subtotal: model.subtotal,
            tax: model.tax,
            shipping: model.shipping,
            discount: model.discount,
            total: model.total,
            currency: model.currency,
            status: model.status,
            promo_code: model.promo_code,
            shipping_address_id: model.shipping_address_id,
            shipping_method_id: model.shipping_method_id,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::order_items::Model> for OrderItem {
    fn from(model: entity::order_items::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            qty: model.qty,
            price: model.price,
            title: model.title,
            image: model.image,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::payments::Model> for Payment {
    fn from(model: entity::payments::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            provider_reference: model.provider_reference,
            amount: model.amount,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

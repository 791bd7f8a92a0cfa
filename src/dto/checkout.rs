use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::{Address, Order, OrderItem, PricedCartItem, ShippingMethod},
    promotions::Promotion,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct PromoRequest {
    pub code: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompleteCheckoutRequest {
    pub address_id: Uuid,
    pub shipping_method_id: Uuid,
    pub promo_code: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    pub shipping_method_id: Option<Uuid>,
    pub promo_code: Option<String>,
}

/// Display-ready checkout quote. Never persisted, recomputed per request.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutSummary {
    pub cart: Vec<PricedCartItem>,
    pub subtotal: i64,
    pub tax: i64,
    pub shipping: i64,
    pub total: i64,
    pub currency: String,
    pub shipping_methods: Vec<ShippingMethod>,
    pub addresses: Vec<Address>,
    pub default_promo: Option<Promotion>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentOutcome {
    pub simulated: bool,
    pub status: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutOutcome {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub payment: PaymentOutcome,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentSessionOutcome {
    pub simulated: bool,
    pub url: Option<String>,
}

/// Asynchronous notification from the payment provider. Only
/// `payment.completed` events are acted on; everything else is acknowledged
/// and dropped.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessorNotification {
    pub event_type: String,
    pub order_id: Option<Uuid>,
    pub external_reference: Option<String>,
    pub amount: Option<i64>,
}

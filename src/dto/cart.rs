use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::pricing::CartLine;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    #[serde(default = "default_qty")]
    pub qty: i64,
}

fn default_qty() -> i64 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartRequest {
    pub product_id: Uuid,
    pub qty: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveFromCartRequest {
    pub product_id: Uuid,
}

/// Normalized cart as returned to the storefront.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLine>,
}

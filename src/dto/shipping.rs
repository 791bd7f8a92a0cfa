use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::ShippingMethod;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShippingMethodRequest {
    pub name: String,
    pub description: Option<String>,
    pub rate: i64,
    pub estimated_days: Option<i32>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateShippingMethodRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rate: Option<i64>,
    pub estimated_days: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShippingMethodList {
    pub items: Vec<ShippingMethod>,
}

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Order, OrderItem, Payment};

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
    /// Absent while a hosted payment is still pending confirmation.
    pub payment: Option<Payment>,
}

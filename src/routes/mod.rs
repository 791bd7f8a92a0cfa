use axum::Router;

use crate::state::AppState;

pub mod addresses;
pub mod cart;
pub mod checkout;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod shipping;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .nest("/checkout", checkout::router())
        .nest("/webhooks", checkout::webhook_router())
        .nest("/addresses", addresses::router())
        .nest("/shipping-methods", shipping::router())
        .nest("/orders", orders::router())
}

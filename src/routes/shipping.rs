use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::shipping::{CreateShippingMethodRequest, ShippingMethodList, UpdateShippingMethodRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::ShippingMethod,
    response::ApiResponse,
    services::shipping_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_shipping_methods).post(create_shipping_method))
        .route("/{id}", put(update_shipping_method).delete(delete_shipping_method))
}

#[utoipa::path(
    get,
    path = "/api/shipping-methods",
    responses(
        (status = 200, description = "Active shipping methods, cheapest first", body = ApiResponse<ShippingMethodList>)
    ),
    tag = "Shipping"
)]
pub async fn list_shipping_methods(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ShippingMethodList>>> {
    Ok(Json(shipping_service::list_active(&state).await?))
}

#[utoipa::path(
    post,
    path = "/api/shipping-methods",
    request_body = CreateShippingMethodRequest,
    responses(
        (status = 200, description = "Created shipping method", body = ApiResponse<ShippingMethod>),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shipping"
)]
pub async fn create_shipping_method(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateShippingMethodRequest>,
) -> AppResult<Json<ApiResponse<ShippingMethod>>> {
    Ok(Json(
        shipping_service::create_method(&state, &user, payload).await?,
    ))
}

#[utoipa::path(put, path = "/api/shipping-methods/{id}", tag = "Shipping", security(("bearer_auth" = [])))]
pub async fn update_shipping_method(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateShippingMethodRequest>,
) -> AppResult<Json<ApiResponse<ShippingMethod>>> {
    Ok(Json(
        shipping_service::update_method(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(delete, path = "/api/shipping-methods/{id}", tag = "Shipping", security(("bearer_auth" = [])))]
pub async fn delete_shipping_method(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        shipping_service::delete_method(&state, &user, id).await?,
    ))
}

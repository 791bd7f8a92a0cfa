use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::addresses::{AddressList, CreateAddressRequest, UpdateAddressRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Address,
    response::ApiResponse,
    services::address_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_addresses).post(create_address))
        .route("/{id}", put(update_address).delete(delete_address))
}

#[utoipa::path(
    get,
    path = "/api/addresses",
    responses(
        (status = 200, description = "Addresses, default first then newest", body = ApiResponse<AddressList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Addresses"
)]
pub async fn list_addresses(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AddressList>>> {
    Ok(Json(address_service::list_addresses(&state, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/addresses",
    request_body = CreateAddressRequest,
    responses(
        (status = 200, description = "Created address", body = ApiResponse<Address>),
        (status = 400, description = "Missing required field"),
    ),
    security(("bearer_auth" = [])),
    tag = "Addresses"
)]
pub async fn create_address(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateAddressRequest>,
) -> AppResult<Json<ApiResponse<Address>>> {
    Ok(Json(
        address_service::create_address(&state, &user, payload).await?,
    ))
}

#[utoipa::path(put, path = "/api/addresses/{id}", tag = "Addresses", security(("bearer_auth" = [])))]
pub async fn update_address(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAddressRequest>,
) -> AppResult<Json<ApiResponse<Address>>> {
    Ok(Json(
        address_service::update_address(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(delete, path = "/api/addresses/{id}", tag = "Addresses", security(("bearer_auth" = [])))]
pub async fn delete_address(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        address_service::delete_address(&state, &user, id).await?,
    ))
}

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::cart::{AddToCartRequest, CartView, RemoveFromCartRequest, UpdateCartRequest},
    error::AppResult,
    middleware::session::SessionId,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart))
        .route("/add", post(add_to_cart))
        .route("/update", post(update_cart).put(update_cart))
        .route("/remove", post(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    params(
        ("x-session-id" = Option<String>, Header, description = "Cart session id, defaults to anon")
    ),
    responses(
        (status = 200, description = "Normalized cart for the session", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(Json(cart_service::get_cart(&state, &session_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/cart/add",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Cart after the add", body = ApiResponse<CartView>),
        (status = 400, description = "Unknown product or bad quantity"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(Json(
        cart_service::add_to_cart(&state, &session_id, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/cart/update",
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Cart after the update; qty 0 removes the line", body = ApiResponse<CartView>),
        (status = 400, description = "Negative quantity"),
    ),
    tag = "Cart"
)]
pub async fn update_cart(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Json(payload): Json<UpdateCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(Json(
        cart_service::update_cart(&state, &session_id, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/cart/remove",
    request_body = RemoveFromCartRequest,
    responses(
        (status = 200, description = "Cart after removal", body = ApiResponse<CartView>),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Json(payload): Json<RemoveFromCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(Json(
        cart_service::remove_from_cart(&state, &session_id, payload).await?,
    ))
}

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::checkout::{
        CheckoutOutcome, CheckoutSummary, CompleteCheckoutRequest, CreateSessionRequest,
        PaymentSessionOutcome, ProcessorNotification, PromoRequest,
    },
    error::AppResult,
    middleware::{auth::AuthUser, session::SessionId},
    promotions::Promotion,
    response::ApiResponse,
    services::checkout_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(summary))
        .route("/promo", post(validate_promo))
        .route("/complete", post(complete))
        .route("/create-session", post(create_session))
}

// The provider calls back without a bearer token, so the webhook lives on
// its own unauthenticated router.
pub fn webhook_router() -> Router<AppState> {
    Router::new().route("/payment", post(payment_webhook))
}

#[utoipa::path(
    get,
    path = "/api/checkout/summary",
    params(
        ("x-session-id" = Option<String>, Header, description = "Cart session id")
    ),
    responses(
        (status = 200, description = "Display-ready quote for the session's cart", body = ApiResponse<CheckoutSummary>)
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
    SessionId(session_id): SessionId,
) -> AppResult<Json<ApiResponse<CheckoutSummary>>> {
    Ok(Json(
        checkout_service::summary(&state, &user, &session_id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/checkout/promo",
    request_body = PromoRequest,
    responses(
        (status = 200, description = "Resolved promotion", body = ApiResponse<Promotion>),
        (status = 400, description = "Unknown promo code"),
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn validate_promo(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<PromoRequest>,
) -> AppResult<Json<ApiResponse<Promotion>>> {
    Ok(Json(checkout_service::validate_promo(&state, payload)?))
}

#[utoipa::path(
    post,
    path = "/api/checkout/complete",
    request_body = CompleteCheckoutRequest,
    responses(
        (status = 200, description = "Order with payment outcome", body = ApiResponse<CheckoutOutcome>),
        (status = 400, description = "Empty cart or invalid promo"),
        (status = 404, description = "Address or shipping method not found"),
        (status = 502, description = "Hosted payment session failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn complete(
    State(state): State<AppState>,
    user: AuthUser,
    SessionId(session_id): SessionId,
    Json(payload): Json<CompleteCheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutOutcome>>> {
    Ok(Json(
        checkout_service::complete(&state, &user, &session_id, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/checkout/create-session",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Hosted session url, or simulated marker", body = ApiResponse<PaymentSessionOutcome>),
        (status = 502, description = "Hosted payment session failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn create_session(
    State(state): State<AppState>,
    _user: AuthUser,
    SessionId(session_id): SessionId,
    Json(payload): Json<CreateSessionRequest>,
) -> AppResult<Json<ApiResponse<PaymentSessionOutcome>>> {
    Ok(Json(
        checkout_service::create_payment_session(&state, &session_id, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/webhooks/payment",
    request_body = ProcessorNotification,
    responses(
        (status = 200, description = "Always acknowledged"),
    ),
    tag = "Checkout"
)]
pub async fn payment_webhook(
    State(state): State<AppState>,
    Json(notification): Json<ProcessorNotification>,
) -> Json<serde_json::Value> {
    // Acknowledge regardless; the provider retries on its own schedule and
    // confirmation is idempotent.
    if let Err(err) = checkout_service::confirm_payment(&state, notification).await {
        tracing::warn!(error = %err, "payment confirmation failed");
    }
    Json(serde_json::json!({ "received": true }))
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::response::{ApiResponse, Meta};

/// Checkout surfaces four user-correctable failures with stable codes; the
/// remaining variants cover ownership, validation and storage faults.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cart is empty")]
    CartEmpty,

    #[error("Address not found")]
    AddressNotFound,

    #[error("Shipping method not found")]
    ShippingNotFound,

    #[error("Invalid promo code")]
    InvalidPromo,

    #[error("Payment session could not be created")]
    PaymentFailed,

    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Serialization error")]
    Json(#[from] serde_json::Error),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Machine-readable code carried in the response body. Storage and
    /// serialization faults all collapse to INTERNAL; clients only branch on
    /// the business codes.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::CartEmpty => "CART_EMPTY",
            AppError::AddressNotFound => "ADDRESS_NOT_FOUND",
            AppError::ShippingNotFound => "SHIPPING_NOT_FOUND",
            AppError::InvalidPromo => "INVALID_PROMO",
            AppError::PaymentFailed => "PAYMENT_FAILED",
            AppError::NotFound => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Forbidden => "FORBIDDEN",
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Json(_) => "INTERNAL",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::CartEmpty => StatusCode::BAD_REQUEST,
            AppError::AddressNotFound => StatusCode::NOT_FOUND,
            AppError::ShippingNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidPromo => StatusCode::BAD_REQUEST,
            AppError::PaymentFailed => StatusCode::BAD_GATEWAY,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.code().to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (self.status(), axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

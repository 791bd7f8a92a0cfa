use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::shipping::{CreateShippingMethodRequest, ShippingMethodList, UpdateShippingMethodRequest},
    entity::shipping_methods::{
        ActiveModel as ShippingActive, Column as ShippingCol, Entity as ShippingMethods,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::ShippingMethod,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_active(state: &AppState) -> AppResult<ApiResponse<ShippingMethodList>> {
    let items: Vec<ShippingMethod> = ShippingMethods::find()
        .filter(ShippingCol::Active.eq(true))
        .order_by_asc(ShippingCol::Rate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ShippingMethod::from)
        .collect();

    Ok(ApiResponse::success("OK", ShippingMethodList { items }, None))
}

pub async fn create_method(
    state: &AppState,
    user: &AuthUser,
    payload: CreateShippingMethodRequest,
) -> AppResult<ApiResponse<ShippingMethod>> {
    ensure_admin(user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if payload.rate < 0 {
        return Err(AppError::BadRequest("rate must not be negative".to_string()));
    }

    let method = ShippingActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        description: Set(payload.description),
        rate: Set(payload.rate),
        estimated_days: Set(payload.estimated_days),
        active: Set(payload.active),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Shipping method created",
        ShippingMethod::from(method),
        None,
    ))
}

pub async fn update_method(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateShippingMethodRequest,
) -> AppResult<ApiResponse<ShippingMethod>> {
    ensure_admin(user)?;

    let existing = ShippingMethods::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(rate) = payload.rate {
        if rate < 0 {
            return Err(AppError::BadRequest("rate must not be negative".to_string()));
        }
    }

    let mut active: ShippingActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(rate) = payload.rate {
        active.rate = Set(rate);
    }
    if let Some(estimated_days) = payload.estimated_days {
        active.estimated_days = Set(Some(estimated_days));
    }
    if let Some(is_active) = payload.active {
        active.active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Shipping method updated",
        ShippingMethod::from(updated),
        None,
    ))
}

pub async fn delete_method(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let existing = ShippingMethods::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    ShippingMethods::delete_by_id(existing.id)
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Shipping method deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::addresses::{AddressList, CreateAddressRequest, UpdateAddressRequest},
    entity::addresses::{ActiveModel as AddressActive, Column as AddressCol, Entity as Addresses},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Address,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_addresses(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AddressList>> {
    let items: Vec<Address> = Addresses::find()
        .filter(AddressCol::UserId.eq(user.user_id))
        .order_by_desc(AddressCol::IsDefault)
        .order_by_desc(AddressCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Address::from)
        .collect();

    Ok(ApiResponse::success("OK", AddressList { items }, None))
}

/// Making an address the default un-defaults every other address of the same
/// user inside one transaction, so there is never more than one default.
pub async fn create_address(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAddressRequest,
) -> AppResult<ApiResponse<Address>> {
    for (value, field) in [
        (&payload.full_name, "full_name"),
        (&payload.line1, "line1"),
        (&payload.city, "city"),
        (&payload.postal_code, "postal_code"),
        (&payload.country, "country"),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{field} is required")));
        }
    }

    let txn = state.orm.begin().await?;

    if payload.is_default {
        Addresses::update_many()
            .col_expr(AddressCol::IsDefault, Expr::value(false))
            .filter(AddressCol::UserId.eq(user.user_id))
            .exec(&txn)
            .await?;
    }

    let address = AddressActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        full_name: Set(payload.full_name),
        line1: Set(payload.line1),
        line2: Set(payload.line2),
        city: Set(payload.city),
        state: Set(payload.state),
        postal_code: Set(payload.postal_code),
        country: Set(payload.country),
        phone: Set(payload.phone),
        is_default: Set(payload.is_default),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Address created",
        Address::from(address),
        None,
    ))
}

pub async fn update_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateAddressRequest,
) -> AppResult<ApiResponse<Address>> {
    let existing = Addresses::find()
        .filter(
            Condition::all()
                .add(AddressCol::Id.eq(id))
                .add(AddressCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let txn = state.orm.begin().await?;

    if payload.is_default == Some(true) {
        Addresses::update_many()
            .col_expr(AddressCol::IsDefault, Expr::value(false))
            .filter(AddressCol::UserId.eq(user.user_id))
            .exec(&txn)
            .await?;
    }

    let mut active: AddressActive = existing.into();
    if let Some(full_name) = payload.full_name {
        active.full_name = Set(full_name);
    }
    if let Some(line1) = payload.line1 {
        active.line1 = Set(line1);
    }
    if let Some(line2) = payload.line2 {
        active.line2 = Set(Some(line2));
    }
    if let Some(city) = payload.city {
        active.city = Set(city);
    }
    if let Some(state_field) = payload.state {
        active.state = Set(Some(state_field));
    }
    if let Some(postal_code) = payload.postal_code {
        active.postal_code = Set(postal_code);
    }
    if let Some(country) = payload.country {
        active.country = Set(country);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(is_default) = payload.is_default {
        active.is_default = Set(is_default);
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Address updated",
        Address::from(updated),
        None,
    ))
}

pub async fn delete_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = Addresses::find()
        .filter(
            Condition::all()
                .add(AddressCol::Id.eq(id))
                .add(AddressCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Addresses::delete_by_id(existing.id)
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Address deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartView, RemoveFromCartRequest, UpdateCartRequest},
    entity::{
        products::{Column as ProductCol, Entity as Products},
        sessions::{ActiveModel as SessionActive, Entity as Sessions},
    },
    error::{AppError, AppResult},
    models::{CartDoc, Product, RawCartLine},
    pricing::{self, CartLine, PricedCart},
    response::ApiResponse,
    state::AppState,
};

async fn fetch_doc<C: ConnectionTrait>(conn: &C, session_id: &str) -> AppResult<CartDoc> {
    let session = Sessions::find_by_id(session_id.to_owned()).one(conn).await?;
    Ok(session
        .map(|model| serde_json::from_value(model.cart).unwrap_or_default())
        .unwrap_or_default())
}

/// Persist the normalized cart, creating the session row on first write.
/// Passing a user id also (re)associates the session with that user.
async fn store_cart<C: ConnectionTrait>(
    conn: &C,
    session_id: &str,
    user_id: Option<Uuid>,
    lines: &[CartLine],
) -> AppResult<()> {
    let cart = json!({ "items": lines });
    match Sessions::find_by_id(session_id.to_owned()).one(conn).await? {
        Some(session) => {
            let mut active: SessionActive = session.into();
            active.cart = Set(cart);
            if let Some(user_id) = user_id {
                active.user_id = Set(Some(user_id));
            }
            active.updated_at = Set(Utc::now().into());
            active.update(conn).await?;
        }
        None => {
            SessionActive {
                session_id: Set(session_id.to_owned()),
                user_id: Set(user_id),
                cart: Set(cart),
                updated_at: Set(Utc::now().into()),
            }
            .insert(conn)
            .await?;
        }
    }
    Ok(())
}

pub async fn get_cart(state: &AppState, session_id: &str) -> AppResult<ApiResponse<CartView>> {
    let doc = fetch_doc(&state.orm, session_id).await?;
    let items = pricing::normalize(&doc);
    Ok(ApiResponse::success("OK", CartView { items }, None))
}

pub async fn add_to_cart(
    state: &AppState,
    session_id: &str,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    if payload.qty < 1 {
        return Err(AppError::BadRequest("qty must be at least 1".to_string()));
    }

    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?;
    if product.is_none() {
        return Err(AppError::BadRequest("product not found".to_string()));
    }

    let mut doc = fetch_doc(&state.orm, session_id).await?;
    doc.items.push(RawCartLine {
        product_id: payload.product_id.to_string(),
        qty: payload.qty.into(),
    });
    let items = pricing::normalize(&doc);
    store_cart(&state.orm, session_id, None, &items).await?;

    Ok(ApiResponse::success("OK", CartView { items }, None))
}

/// Set a line's quantity; zero removes the line. A session that does not
/// exist yet answers with an empty cart instead of creating one.
pub async fn update_cart(
    state: &AppState,
    session_id: &str,
    payload: UpdateCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    if payload.qty < 0 {
        return Err(AppError::BadRequest("qty must not be negative".to_string()));
    }

    let session = Sessions::find_by_id(session_id.to_owned())
        .one(&state.orm)
        .await?;
    let Some(session) = session else {
        return Ok(ApiResponse::success("OK", CartView { items: Vec::new() }, None));
    };

    let doc: CartDoc = serde_json::from_value(session.cart).unwrap_or_default();
    let mut items = pricing::normalize(&doc);
    let product_id = payload.product_id.to_string();
    if payload.qty == 0 {
        items.retain(|line| line.product_id != product_id);
    } else if let Some(line) = items.iter_mut().find(|line| line.product_id == product_id) {
        line.qty = payload.qty;
    } else {
        items.push(CartLine {
            product_id,
            qty: payload.qty,
        });
    }
    store_cart(&state.orm, session_id, None, &items).await?;

    Ok(ApiResponse::success("OK", CartView { items }, None))
}

pub async fn remove_from_cart(
    state: &AppState,
    session_id: &str,
    payload: RemoveFromCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    let session = Sessions::find_by_id(session_id.to_owned())
        .one(&state.orm)
        .await?;
    let Some(session) = session else {
        return Ok(ApiResponse::success("OK", CartView { items: Vec::new() }, None));
    };

    let doc: CartDoc = serde_json::from_value(session.cart).unwrap_or_default();
    let mut items = pricing::normalize(&doc);
    let product_id = payload.product_id.to_string();
    items.retain(|line| line.product_id != product_id);
    store_cart(&state.orm, session_id, None, &items).await?;

    Ok(ApiResponse::success(
        "Removed from cart",
        CartView { items },
        None,
    ))
}

/// Tie an existing session to a signed-in user. A session that was never
/// created is left alone.
pub async fn attach_user<C: ConnectionTrait>(
    conn: &C,
    session_id: &str,
    user_id: Uuid,
) -> AppResult<()> {
    if let Some(session) = Sessions::find_by_id(session_id.to_owned()).one(conn).await? {
        let mut active: SessionActive = session.into();
        active.user_id = Set(Some(user_id));
        active.updated_at = Set(Utc::now().into());
        active.update(conn).await?;
    }
    Ok(())
}

/// Empty the cart and keep the user association, as happens after a
/// completed checkout.
pub async fn clear_cart<C: ConnectionTrait>(
    conn: &C,
    session_id: &str,
    user_id: Uuid,
) -> AppResult<()> {
    store_cart(conn, session_id, Some(user_id), &[]).await
}

/// Load, normalize and price the session's cart against the current product
/// catalog. Stored ids that no longer parse are dropped here, at the storage
/// boundary; ids of deleted products survive and price to zero.
pub async fn load_priced_cart(state: &AppState, session_id: &str) -> AppResult<PricedCart> {
    let doc = fetch_doc(&state.orm, session_id).await?;
    let normalized = pricing::normalize(&doc);
    if normalized.is_empty() {
        return Ok(PricedCart::empty());
    }

    let mut lines: Vec<(Uuid, i64)> = Vec::with_capacity(normalized.len());
    for line in &normalized {
        match line.product_id.parse::<Uuid>() {
            Ok(id) => lines.push((id, line.qty)),
            Err(_) => {
                tracing::debug!(product_id = %line.product_id, "dropping malformed cart line")
            }
        }
    }
    if lines.is_empty() {
        return Ok(PricedCart::empty());
    }

    let ids: Vec<Uuid> = lines.iter().map(|(id, _)| *id).collect();
    let products: HashMap<Uuid, Product> = Products::find()
        .filter(ProductCol::Id.is_in(ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|model| (model.id, Product::from(model)))
        .collect();

    Ok(pricing::price(&lines, &products))
}

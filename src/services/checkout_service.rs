use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::checkout::{
        CheckoutOutcome, CheckoutSummary, CompleteCheckoutRequest, CreateSessionRequest,
        PaymentOutcome, PaymentSessionOutcome, ProcessorNotification, PromoRequest,
    },
    entity::{
        addresses::{Column as AddressCol, Entity as Addresses},
        order_items::ActiveModel as OrderItemActive,
        orders::{ActiveModel as OrderActive, Entity as Orders},
        payments::{ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments},
        shipping_methods::{Column as ShippingCol, Entity as ShippingMethods},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    events,
    middleware::auth::AuthUser,
    models::{Address, Order, OrderItem, ShippingMethod},
    payments::PaymentBackend,
    pricing, promotions,
    promotions::Promotion,
    response::{ApiResponse, Meta},
    services::cart_service,
    state::AppState,
};

pub async fn summary(
    state: &AppState,
    user: &AuthUser,
    session_id: &str,
) -> AppResult<ApiResponse<CheckoutSummary>> {
    let priced = cart_service::load_priced_cart(state, session_id).await?;
    if priced.items.is_empty() {
        return Ok(ApiResponse::success(
            "OK",
            CheckoutSummary {
                cart: Vec::new(),
                subtotal: 0,
                tax: 0,
                shipping: 0,
                total: 0,
                currency: priced.currency,
                shipping_methods: Vec::new(),
                addresses: Vec::new(),
                default_promo: None,
            },
            None,
        ));
    }

    // Best-effort: tie the anonymous session to the signed-in user so the
    // cart follows them. Failure must not spoil the quote.
    if let Err(err) = cart_service::attach_user(&state.orm, session_id, user.user_id).await {
        tracing::warn!(error = %err, session_id, "cart-user association failed");
    }

    let addresses: Vec<Address> = Addresses::find()
        .filter(AddressCol::UserId.eq(user.user_id))
        .order_by_desc(AddressCol::IsDefault)
        .order_by_desc(AddressCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Address::from)
        .collect();

    let shipping_methods: Vec<ShippingMethod> = ShippingMethods::find()
        .filter(ShippingCol::Active.eq(true))
        .order_by_asc(ShippingCol::Rate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ShippingMethod::from)
        .collect();

    let tax = pricing::sales_tax(priced.subtotal);
    // The shopper has not picked a method yet; quote the cheapest one.
    let shipping = shipping_methods.first().map(|method| method.rate).unwrap_or(0);
    let total = priced.subtotal + tax + shipping;

    Ok(ApiResponse::success(
        "OK",
        CheckoutSummary {
            cart: priced.items,
            subtotal: priced.subtotal,
            tax,
            shipping,
            total,
            currency: priced.currency,
            shipping_methods,
            addresses,
            default_promo: state.promos.suggested().cloned(),
        },
        None,
    ))
}

pub fn validate_promo(state: &AppState, payload: PromoRequest) -> AppResult<ApiResponse<Promotion>> {
    if payload.code.trim().is_empty() {
        return Err(AppError::BadRequest("code is required".to_string()));
    }
    let promo = state
        .promos
        .resolve(Some(payload.code.as_str()))
        .ok_or(AppError::InvalidPromo)?;
    Ok(ApiResponse::success("OK", promo.clone(), None))
}

/// Convert the session's cart into a persisted order with a payment outcome.
///
/// Totals are recomputed from the live cart and the live shipping rate;
/// client-submitted figures are never trusted. Order, item snapshots, the
/// simulated payment and the cart clear commit in one transaction; the
/// confirmation event and the hosted-session call happen after commit, the
/// latter compensated by rolling the order back to canceled on failure.
pub async fn complete(
    state: &AppState,
    user: &AuthUser,
    session_id: &str,
    payload: CompleteCheckoutRequest,
) -> AppResult<ApiResponse<CheckoutOutcome>> {
    let priced = cart_service::load_priced_cart(state, session_id).await?;
    if priced.items.is_empty() {
        return Err(AppError::CartEmpty);
    }

    let address = Addresses::find()
        .filter(
            Condition::all()
                .add(AddressCol::Id.eq(payload.address_id))
                .add(AddressCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::AddressNotFound)?;

    let method = ShippingMethods::find()
        .filter(
            Condition::all()
                .add(ShippingCol::Id.eq(payload.shipping_method_id))
                .add(ShippingCol::Active.eq(true)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::ShippingNotFound)?;

    let promo = state.promos.resolve(payload.promo_code.as_deref());
    if payload.promo_code.as_deref().is_some_and(|code| !code.is_empty()) && promo.is_none() {
        return Err(AppError::InvalidPromo);
    }

    let subtotal = priced.subtotal;
    let tax = pricing::sales_tax(subtotal);
    let shipping = method.rate;
    let discount = promotions::discount(promo, subtotal, shipping);
    let total = (subtotal + tax + shipping - discount).max(0);
    let status = if state.payments.is_configured() {
        "pending"
    } else {
        "paid"
    };

    let txn = state.orm.begin().await?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        subtotal: Set(subtotal),
        tax: Set(tax),
        shipping: Set(shipping),
        discount: Set(discount),
        total: Set(total),
        currency: Set(priced.currency.clone()),
        status: Set(status.to_string()),
        promo_code: Set(promo.map(|p| p.code.clone())),
        shipping_address_id: Set(address.id),
        shipping_method_id: Set(method.id),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(priced.items.len());
    for item in &priced.items {
        let model = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(item.product_id),
            qty: Set(item.qty),
            price: Set(item.price),
            title: Set(item.title.clone()),
            image: Set(item.image.clone()),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(OrderItem::from(model));
    }

    if !state.payments.is_configured() {
        PaymentActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            provider_reference: Set("simulated".to_string()),
            amount: Set(total),
            status: Set("succeeded".to_string()),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }

    cart_service::clear_cart(&txn, session_id, user.user_id).await?;
    txn.commit().await?;

    emit_confirmation_email(state, user.user_id, order.id, total).await;

    let order = Order::from(order);
    match &state.payments {
        PaymentBackend::NoProcessor => Ok(ApiResponse::success(
            "Checkout complete",
            CheckoutOutcome {
                order,
                items,
                payment: PaymentOutcome {
                    simulated: true,
                    status: Some("succeeded".to_string()),
                    url: None,
                },
            },
            Some(Meta::empty()),
        )),
        PaymentBackend::Hosted(processor) => {
            match processor
                .create_session(total, &order.currency, Some(order.id))
                .await
            {
                Ok(session) => Ok(ApiResponse::success(
                    "Checkout pending payment",
                    CheckoutOutcome {
                        order,
                        items,
                        payment: PaymentOutcome {
                            simulated: false,
                            status: Some("pending".to_string()),
                            url: Some(session.url),
                        },
                    },
                    Some(Meta::empty()),
                )),
                Err(err) => {
                    tracing::warn!(error = %err, order_id = %order.id, "hosted payment session failed");
                    roll_back_to_canceled(state, order.id).await;
                    Err(AppError::PaymentFailed)
                }
            }
        }
    }
}

/// Re-quote the cart and open a hosted session without creating an order.
pub async fn create_payment_session(
    state: &AppState,
    session_id: &str,
    payload: CreateSessionRequest,
) -> AppResult<ApiResponse<PaymentSessionOutcome>> {
    let PaymentBackend::Hosted(processor) = &state.payments else {
        return Ok(ApiResponse::success(
            "Simulated payment mode",
            PaymentSessionOutcome {
                simulated: true,
                url: None,
            },
            None,
        ));
    };

    let priced = cart_service::load_priced_cart(state, session_id).await?;
    let method = match payload.shipping_method_id {
        Some(id) => {
            ShippingMethods::find()
                .filter(
                    Condition::all()
                        .add(ShippingCol::Id.eq(id))
                        .add(ShippingCol::Active.eq(true)),
                )
                .one(&state.orm)
                .await?
        }
        None => {
            ShippingMethods::find()
                .filter(ShippingCol::Active.eq(true))
                .order_by_asc(ShippingCol::Rate)
                .one(&state.orm)
                .await?
        }
    };
    let shipping = method.map(|m| m.rate).unwrap_or(0);
    let tax = pricing::sales_tax(priced.subtotal);
    let promo = state.promos.resolve(payload.promo_code.as_deref());
    let discount = promotions::discount(promo, priced.subtotal, shipping);
    let total = (priced.subtotal + tax + shipping - discount).max(0);

    match processor.create_session(total, &priced.currency, None).await {
        Ok(session) => Ok(ApiResponse::success(
            "OK",
            PaymentSessionOutcome {
                simulated: false,
                url: Some(session.url),
            },
            None,
        )),
        Err(err) => {
            tracing::warn!(error = %err, "hosted payment session failed");
            Err(AppError::PaymentFailed)
        }
    }
}

/// Apply a provider confirmation: mark the order paid and upsert its payment
/// row. Re-delivery converges to the same state; unknown orders are ignored
/// since the provider may replay stale events.
pub async fn confirm_payment(
    state: &AppState,
    notification: ProcessorNotification,
) -> AppResult<()> {
    if notification.event_type != "payment.completed" {
        return Ok(());
    }
    let Some(order_id) = notification.order_id else {
        return Ok(());
    };
    let Some(order) = Orders::find_by_id(order_id).one(&state.orm).await? else {
        return Ok(());
    };

    let mut active: OrderActive = order.into();
    active.status = Set("paid".to_string());
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    if let Some(reference) = notification.external_reference {
        let payment = PaymentActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            provider_reference: Set(reference),
            amount: Set(notification.amount.unwrap_or(0)),
            status: Set("succeeded".to_string()),
            created_at: NotSet,
            updated_at: NotSet,
        };
        Payments::insert(payment)
            .on_conflict(
                OnConflict::column(PaymentCol::OrderId)
                    .update_columns([
                        PaymentCol::ProviderReference,
                        PaymentCol::Amount,
                        PaymentCol::Status,
                        PaymentCol::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&state.orm)
            .await?;
    }

    Ok(())
}

async fn emit_confirmation_email(state: &AppState, user_id: Uuid, order_id: Uuid, total: i64) {
    let email = match Users::find_by_id(user_id).one(&state.orm).await {
        Ok(found) => found.map(|user| user.email),
        Err(err) => {
            tracing::warn!(error = %err, "could not load user for confirmation email");
            None
        }
    };
    let payload = serde_json::json!({
        "order_id": order_id,
        "email": email,
        "total": total,
    });
    if let Err(err) = events::emit_event(
        &state.pool,
        Some(user_id),
        "order.confirmation_email",
        payload,
    )
    .await
    {
        tracing::warn!(error = %err, order_id = %order_id, "confirmation email event failed");
    }
}

/// Compensation for a failed hosted-session call: the order row is kept for
/// audit, only its status moves to canceled.
async fn roll_back_to_canceled(state: &AppState, order_id: Uuid) {
    let result = async {
        let Some(order) = Orders::find_by_id(order_id).one(&state.orm).await? else {
            return Ok(());
        };
        let mut active: OrderActive = order.into();
        active.status = Set("canceled".to_string());
        active.updated_at = Set(Utc::now().into());
        active.update(&state.orm).await?;
        Ok::<(), sea_orm::DbErr>(())
    }
    .await;

    if let Err(err) = result {
        tracing::error!(error = %err, order_id = %order_id, "order rollback failed after payment error");
    }
}

use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        addresses::{AddressList, CreateAddressRequest, UpdateAddressRequest},
        cart::{AddToCartRequest, CartView, RemoveFromCartRequest, UpdateCartRequest},
        checkout::{
            CheckoutOutcome, CheckoutSummary, CompleteCheckoutRequest, CreateSessionRequest,
            PaymentOutcome, PaymentSessionOutcome, ProcessorNotification, PromoRequest,
        },
        orders::{OrderList, OrderWithItems},
        products::ProductList,
        shipping::{CreateShippingMethodRequest, ShippingMethodList, UpdateShippingMethodRequest},
    },
    models::{Address, Order, OrderItem, Payment, PricedCartItem, Product, ShippingMethod},
    pricing::CartLine,
    promotions::{PromoKind, Promotion},
    response::{ApiResponse, Meta},
    routes::{
        addresses, cart, checkout, health, orders, params, products as product_routes, shipping,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_cart,
        cart::remove_from_cart,
        checkout::summary,
        checkout::validate_promo,
        checkout::complete,
        checkout::create_session,
        checkout::payment_webhook,
        product_routes::list_products,
        product_routes::get_product,
        addresses::list_addresses,
        addresses::create_address,
        addresses::update_address,
        addresses::delete_address,
        shipping::list_shipping_methods,
        shipping::create_shipping_method,
        shipping::update_shipping_method,
        shipping::delete_shipping_method,
        orders::list_orders,
        orders::get_order
    ),
    components(
        schemas(
            Product,
            Address,
            ShippingMethod,
            Order,
            OrderItem,
            Payment,
            PricedCartItem,
            CartLine,
            Promotion,
            PromoKind,
            CartView,
            AddToCartRequest,
            UpdateCartRequest,
            RemoveFromCartRequest,
            PromoRequest,
            CompleteCheckoutRequest,
            CreateSessionRequest,
            CheckoutSummary,
            PaymentOutcome,
            CheckoutOutcome,
            PaymentSessionOutcome,
            ProcessorNotification,
            AddressList,
            CreateAddressRequest,
            UpdateAddressRequest,
            ShippingMethodList,
            CreateShippingMethodRequest,
            UpdateShippingMethodRequest,
            ProductList,
            OrderList,
            OrderWithItems,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<CheckoutSummary>,
            ApiResponse<CheckoutOutcome>,
            ApiResponse<AddressList>,
            ApiResponse<ShippingMethodList>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithItems>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Cart", description = "Session cart endpoints"),
        (name = "Checkout", description = "Checkout and payment endpoints"),
        (name = "Addresses", description = "Address book endpoints"),
        (name = "Shipping", description = "Shipping method endpoints"),
        (name = "Orders", description = "Order history endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

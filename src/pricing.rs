use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{CartDoc, PricedCartItem, Product};

const TAX_RATE_PERCENT: i64 = 8;

/// Normalized cart line: one entry per product, quantities summed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartLine {
    pub product_id: String,
    pub qty: i64,
}

#[derive(Debug)]
pub struct PricedCart {
    pub items: Vec<PricedCartItem>,
    pub subtotal: i64,
    pub currency: String,
}

impl PricedCart {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: 0,
            currency: "usd".to_string(),
        }
    }
}

/// Collapse a raw cart document into one line per product id, preserving the
/// order of first appearance. Quantities coerce leniently: numbers truncate
/// toward zero, numeric strings parse, everything else counts as zero.
pub fn normalize(doc: &CartDoc) -> Vec<CartLine> {
    let mut lines: Vec<CartLine> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for raw in &doc.items {
        let qty = coerce_qty(&raw.qty);
        match index.get(raw.product_id.as_str()) {
            Some(&at) => lines[at].qty += qty,
            None => {
                index.insert(raw.product_id.as_str(), lines.len());
                lines.push(CartLine {
                    product_id: raw.product_id.clone(),
                    qty,
                });
            }
        }
    }
    lines
}

fn coerce_qty(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<f64>().map(|f| f as i64).unwrap_or(0),
        _ => 0,
    }
}

/// Join normalized lines against the fetched product snapshot. A product that
/// has vanished since it was added prices at zero with a placeholder title
/// rather than failing the cart.
pub fn price(lines: &[(Uuid, i64)], products: &HashMap<Uuid, Product>) -> PricedCart {
    let items: Vec<PricedCartItem> = lines
        .iter()
        .map(|&(product_id, qty)| match products.get(&product_id) {
            Some(product) => PricedCartItem {
                product_id,
                qty,
                price: product.price,
                currency: product.currency.clone(),
                title: product.title.clone(),
                image: product.images.first().cloned(),
            },
            None => PricedCartItem {
                product_id,
                qty,
                price: 0,
                currency: "usd".to_string(),
                title: "Product".to_string(),
                image: None,
            },
        })
        .collect();

    let subtotal = items.iter().map(|item| item.price * item.qty).sum();
    let currency = items
        .iter()
        .find(|item| !item.currency.is_empty())
        .map(|item| item.currency.clone())
        .unwrap_or_else(|| "usd".to_string());

    PricedCart {
        items,
        subtotal,
        currency,
    }
}

/// Flat 8% sales tax on the subtotal, minor units, half away from zero.
/// Quote and completion both go through here so the figures always agree.
pub fn sales_tax(subtotal: i64) -> i64 {
    (subtotal * TAX_RATE_PERCENT + 50) / 100
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn doc(items: Value) -> CartDoc {
        serde_json::from_value(json!({ "items": items })).unwrap()
    }

    fn product(id: Uuid, price: i64, currency: &str, title: &str) -> Product {
        Product {
            id,
            title: title.to_string(),
            description: None,
            price,
            currency: currency.to_string(),
            images: vec!["https://img.example/1.jpg".to_string()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn normalize_collapses_duplicates_and_sums_quantities() {
        let doc = doc(json!([
            { "product_id": "prod-1", "qty": 2 },
            { "product_id": "prod-2", "qty": 1 },
            { "product_id": "prod-1", "qty": 3 },
        ]));
        let lines = normalize(&doc);
        assert_eq!(
            lines,
            vec![
                CartLine { product_id: "prod-1".into(), qty: 5 },
                CartLine { product_id: "prod-2".into(), qty: 1 },
            ]
        );
    }

    #[test]
    fn normalize_is_order_insensitive_for_totals() {
        let forward = doc(json!([
            { "product_id": "a", "qty": 1 },
            { "product_id": "b", "qty": 4 },
            { "product_id": "a", "qty": 2 },
        ]));
        let reversed = doc(json!([
            { "product_id": "a", "qty": 2 },
            { "product_id": "b", "qty": 4 },
            { "product_id": "a", "qty": 1 },
        ]));
        let mut lhs = normalize(&forward);
        let mut rhs = normalize(&reversed);
        lhs.sort_by(|x, y| x.product_id.cmp(&y.product_id));
        rhs.sort_by(|x, y| x.product_id.cmp(&y.product_id));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn normalize_coerces_junk_quantities_to_zero() {
        let doc = doc(json!([
            { "product_id": "a", "qty": "3" },
            { "product_id": "b", "qty": null },
            { "product_id": "c", "qty": { "nested": true } },
            { "product_id": "d" },
            { "product_id": "e", "qty": 2.9 },
        ]));
        let lines = normalize(&doc);
        let by_id: HashMap<&str, i64> = lines
            .iter()
            .map(|line| (line.product_id.as_str(), line.qty))
            .collect();
        assert_eq!(by_id["a"], 3);
        assert_eq!(by_id["b"], 0);
        assert_eq!(by_id["c"], 0);
        assert_eq!(by_id["d"], 0);
        assert_eq!(by_id["e"], 2);
    }

    #[test]
    fn normalize_handles_malformed_document() {
        let doc: CartDoc = serde_json::from_value(json!({ "garbage": true }))
            .unwrap_or_default();
        assert!(normalize(&doc).is_empty());
    }

    #[test]
    fn price_sums_unit_price_times_qty() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let products = HashMap::from([
            (first, product(first, 1200, "usd", "Sneaker")),
            (second, product(second, 500, "usd", "Beanie")),
        ]);
        let priced = price(&[(first, 2), (second, 3)], &products);
        assert_eq!(priced.subtotal, 2 * 1200 + 3 * 500);
        assert_eq!(priced.currency, "usd");
        assert_eq!(priced.items.len(), 2);
        assert_eq!(priced.items[0].title, "Sneaker");
    }

    #[test]
    fn price_degrades_missing_products_to_zero() {
        let known = Uuid::new_v4();
        let gone = Uuid::new_v4();
        let products = HashMap::from([(known, product(known, 800, "eur", "Bag"))]);
        let priced = price(&[(gone, 5), (known, 1)], &products);
        assert_eq!(priced.subtotal, 800);
        assert_eq!(priced.items[0].price, 0);
        assert_eq!(priced.items[0].title, "Product");
        assert_eq!(priced.items[0].currency, "usd");
        // First non-empty currency wins, and the placeholder counts.
        assert_eq!(priced.currency, "usd");
    }

    #[test]
    fn price_of_empty_cart_is_empty() {
        let priced = price(&[], &HashMap::new());
        assert_eq!(priced.subtotal, 0);
        assert_eq!(priced.currency, "usd");
        assert!(priced.items.is_empty());
    }

    #[test]
    fn sales_tax_is_eight_percent_rounded_half_up() {
        assert_eq!(sales_tax(2000), 160);
        assert_eq!(sales_tax(2400), 192);
        assert_eq!(sales_tax(0), 0);
        // 8% of 1031 is 82.48 -> 82; 8% of 1063 is 85.04 -> 85
        assert_eq!(sales_tax(1031), 82);
        assert_eq!(sales_tax(1063), 85);
        // 8% of 619 is 49.52 -> rounds up to 50
        assert_eq!(sales_tax(619), 50);
    }
}

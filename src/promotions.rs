use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PromoKind {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Promotion {
    pub code: String,
    pub kind: PromoKind,
    pub value: i64,
    pub description: String,
}

/// Immutable promotion lookup table, built once at startup and injected
/// through the application state. Codes match case-insensitively after
/// trimming.
#[derive(Debug, Clone)]
pub struct PromoCatalog {
    promos: HashMap<String, Promotion>,
    suggested: Option<String>,
}

impl PromoCatalog {
    pub fn new(promos: impl IntoIterator<Item = Promotion>, suggested: Option<&str>) -> Self {
        let promos = promos
            .into_iter()
            .map(|promo| (promo.code.to_uppercase(), promo))
            .collect();
        Self {
            promos,
            suggested: suggested.map(str::to_uppercase),
        }
    }

    pub fn builtin() -> Self {
        Self::new(
            [
                Promotion {
                    code: "SAVE10".to_string(),
                    kind: PromoKind::Percentage,
                    value: 10,
                    description: "Save 10% on your order.".to_string(),
                },
                Promotion {
                    code: "FREESHIP".to_string(),
                    kind: PromoKind::Fixed,
                    value: 500,
                    description: "Take $5 off shipping fees.".to_string(),
                },
            ],
            Some("SAVE10"),
        )
    }

    /// `None` means "no usable code": absent, blank, or unknown. Callers that
    /// need to distinguish "unknown" from "absent" check whether the original
    /// input was non-empty.
    pub fn resolve(&self, code: Option<&str>) -> Option<&Promotion> {
        let code = code?.trim();
        if code.is_empty() {
            return None;
        }
        self.promos.get(&code.to_uppercase())
    }

    /// The promotion surfaced on the checkout summary for discoverability.
    pub fn suggested(&self) -> Option<&Promotion> {
        self.promos.get(self.suggested.as_deref()?)
    }
}

impl Default for PromoCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Discount in minor units, never negative, never more than the promotion
/// allows. Fixed amounts apply against shipping first, then subtotal, and
/// cap at their sum.
pub fn discount(promo: Option<&Promotion>, subtotal: i64, shipping: i64) -> i64 {
    let Some(promo) = promo else {
        return 0;
    };
    match promo.kind {
        PromoKind::Percentage => (subtotal * promo.value + 50) / 100,
        PromoKind::Fixed => promo.value.min(shipping + subtotal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percentage(value: i64) -> Promotion {
        Promotion {
            code: "PCT".to_string(),
            kind: PromoKind::Percentage,
            value,
            description: String::new(),
        }
    }

    fn fixed(value: i64) -> Promotion {
        Promotion {
            code: "FIX".to_string(),
            kind: PromoKind::Fixed,
            value,
            description: String::new(),
        }
    }

    #[test]
    fn resolve_is_case_insensitive_and_trims() {
        let catalog = PromoCatalog::builtin();
        assert_eq!(catalog.resolve(Some("save10")).map(|p| p.code.as_str()), Some("SAVE10"));
        assert_eq!(catalog.resolve(Some("  FreeShip  ")).map(|p| p.code.as_str()), Some("FREESHIP"));
    }

    #[test]
    fn resolve_rejects_absent_blank_and_unknown_codes() {
        let catalog = PromoCatalog::builtin();
        assert!(catalog.resolve(None).is_none());
        assert!(catalog.resolve(Some("")).is_none());
        assert!(catalog.resolve(Some("   ")).is_none());
        assert!(catalog.resolve(Some("BOGUS")).is_none());
    }

    #[test]
    fn suggested_promotion_comes_from_the_catalog() {
        let catalog = PromoCatalog::builtin();
        assert_eq!(catalog.suggested().map(|p| p.code.as_str()), Some("SAVE10"));

        let bare = PromoCatalog::new([], None);
        assert!(bare.suggested().is_none());
    }

    #[test]
    fn percentage_discount_rounds_on_the_subtotal() {
        assert_eq!(discount(Some(&percentage(10)), 2400, 0), 240);
        assert_eq!(discount(Some(&percentage(10)), 2405, 800), 241);
    }

    #[test]
    fn fixed_discount_caps_at_shipping_plus_subtotal() {
        assert_eq!(discount(Some(&fixed(500)), 2000, 800), 500);
        assert_eq!(discount(Some(&fixed(500)), 50, 100), 150);
    }

    #[test]
    fn no_promotion_means_no_discount() {
        assert_eq!(discount(None, 9999, 500), 0);
    }
}

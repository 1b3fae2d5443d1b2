use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartBrand {
    pub name: String,
    pub slug: String,
}

/// Product joined onto a cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartProduct {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brands: Option<CartBrand>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub product_id: i64,
    pub quantity: u32,
    #[serde(default)]
    pub added_at: Option<String>,
    #[serde(default)]
    pub products: Option<CartProduct>,
}

impl CartItem {
    /// Lines whose product is gone or inactive do not count.
    pub fn is_active(&self) -> bool {
        self.products
            .as_ref()
            .and_then(|p| p.is_active)
            .unwrap_or(false)
    }

    pub fn line_total(&self) -> Decimal {
        self.products
            .as_ref()
            .map(|p| p.price * Decimal::from(self.quantity))
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub item_count: usize,
}

impl CartSummary {
    /// Build a summary over the active lines of `items`.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let items: Vec<CartItem> = items.into_iter().filter(CartItem::is_active).collect();
        Self {
            total_items: items
                .iter()
                .fold(0u32, |total, item| total.saturating_add(item.quantity)),
            subtotal: items.iter().map(CartItem::line_total).sum(),
            item_count: items.len(),
            items,
        }
    }

    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Product summary echoed back by `POST /api/cart/add`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedProduct {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
}

/// Result of adding a product: what was added and the refreshed cart.
#[derive(Debug, Clone, PartialEq)]
pub struct AddedToCart {
    pub product: AddedProduct,
    pub cart: CartSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn line(id: i64, price: &str, quantity: u32, active: Option<bool>) -> CartItem {
        serde_json::from_value(json!({
            "id": id,
            "product_id": id * 10,
            "quantity": quantity,
            "products": { "id": id * 10, "name": "Producto", "price": price, "is_active": active }
        }))
        .unwrap()
    }

    #[test]
    fn summary_counts_active_lines_only() {
        let summary = CartSummary::from_items(vec![
            line(1, "1500.50", 2, Some(true)),
            line(2, "999.00", 1, Some(false)),
            line(3, "200", 3, None),
            line(4, "100", 1, Some(true)),
        ]);

        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.subtotal, Decimal::new(310100, 2));
        assert_eq!(
            summary.items.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![1, 4]
        );
    }

    #[test]
    fn empty_summary() {
        let summary = CartSummary::empty();
        assert!(summary.is_empty());
        assert_eq!(summary.subtotal, Decimal::ZERO);
        assert_eq!(summary.total_items, 0);
    }

    #[test]
    fn total_items_saturates() {
        let summary = CartSummary::from_items(vec![
            line(1, "1", u32::MAX, Some(true)),
            line(2, "1", 5, Some(true)),
        ]);
        assert_eq!(summary.total_items, u32::MAX);
        assert_eq!(summary.item_count, 2);
    }

    #[test]
    fn line_keeps_owner() {
        let item: CartItem = serde_json::from_value(json!({
            "id": 8, "user_id": 3, "product_id": 80, "quantity": 1
        }))
        .unwrap();
        assert_eq!(item.user_id, Some(3));
        assert!(!item.is_active());
    }
}

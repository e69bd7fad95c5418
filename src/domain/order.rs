use super::catalog::Product;
use super::money::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => f.write_str("pending"),
            OrderStatus::Paid => f.write_str("paid"),
        }
    }
}

/// One resolved line of a cart: the product as it was priced at intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: u64,
    pub slug: String,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            slug: product.slug.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
        }
    }

    pub fn subtotal(&self) -> Price {
        self.unit_price * self.quantity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub state: String,
    pub country: String,
}

impl ShippingAddress {
    /// Renders the address as the single line stored on the order.
    pub fn to_text(&self) -> String {
        let mut text = format!("{}, ", self.line1.trim());
        if let Some(line2) = self.line2.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            text.push_str(line2);
            text.push_str(", ");
        }
        text.push_str(&format!(
            "{} - {}, {}, {}",
            self.city.trim(),
            self.postal_code.trim(),
            self.state.trim(),
            self.country.trim()
        ));
        text
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// An order that has not been persisted yet and therefore has no id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub owner: u64,
    pub cart: Vec<CartLine>,
    pub total: Price,
    pub address: String,
    pub contact: Contact,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    /// Builds a pending order whose total is the sum of its line subtotals.
    pub fn new(
        owner: u64,
        cart: Vec<CartLine>,
        address: String,
        contact: Contact,
        created_at: DateTime<Utc>,
    ) -> Self {
        let total = cart.iter().map(CartLine::subtotal).sum();
        Self {
            owner,
            cart,
            total,
            address,
            contact,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub owner: u64,
    pub cart: Vec<CartLine>,
    pub total: Price,
    pub address: String,
    pub contact: Contact,
    pub transaction_id: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn from_new(id: u64, new: NewOrder) -> Self {
        Self {
            id,
            owner: new.owner,
            cart: new.cart,
            total: new.total,
            address: new.address,
            contact: new.contact,
            transaction_id: None,
            status: OrderStatus::Pending,
            created_at: new.created_at,
        }
    }

    /// Moves the order to `Paid`. Returns false if it was already paid.
    pub fn mark_paid(&mut self) -> bool {
        if self.status == OrderStatus::Paid {
            return false;
        }
        self.status = OrderStatus::Paid;
        true
    }

    /// Case-insensitive substring match used by the `_q` search.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [
            self.address.as_str(),
            self.contact.name.as_str(),
            self.contact.email.as_str(),
            self.contact.phone.as_str(),
            self.transaction_id.as_deref().unwrap_or_default(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
            || self
                .cart
                .iter()
                .any(|line| line.name.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(slug: &str, price: Price) -> Product {
        Product {
            id: 1,
            slug: slug.to_string(),
            name: format!("Product {slug}"),
            price,
        }
    }

    fn address(line2: Option<&str>) -> ShippingAddress {
        ShippingAddress {
            line1: "12 Market Road".to_string(),
            line2: line2.map(str::to_string),
            city: "Chennai".to_string(),
            postal_code: "600001".to_string(),
            state: "TN".to_string(),
            country: "IN".to_string(),
        }
    }

    #[test]
    fn test_new_order_total_is_sum_of_lines() {
        let lines = vec![
            CartLine::new(&product("a", Price::new(dec!(100))), 2),
            CartLine::new(&product("b", Price::new(dec!(12.5))), 3),
        ];
        let order = NewOrder::new(7, lines, String::new(), Contact::default(), Utc::now());
        assert_eq!(order.total, Price::new(dec!(237.5)));
    }

    #[test]
    fn test_address_text() {
        assert_eq!(
            address(Some("Flat 4")).to_text(),
            "12 Market Road, Flat 4, Chennai - 600001, TN, IN"
        );
        assert_eq!(
            address(None).to_text(),
            "12 Market Road, Chennai - 600001, TN, IN"
        );
        assert_eq!(
            address(Some("  ")).to_text(),
            "12 Market Road, Chennai - 600001, TN, IN"
        );
    }

    #[test]
    fn test_mark_paid_only_transitions_once() {
        let new = NewOrder::new(1, vec![], String::new(), Contact::default(), Utc::now());
        let mut order = Order::from_new(1, new);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.mark_paid());
        assert!(!order.mark_paid());
        assert_eq!(order.status, OrderStatus::Paid);
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let new = NewOrder::new(
            1,
            vec![CartLine::new(&product("ghee", Price::new(dec!(1))), 1)],
            address(None).to_text(),
            Contact {
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                phone: "999".to_string(),
            },
            Utc::now(),
        );
        let order = Order::from_new(1, new);
        assert!(order.matches("CHENNAI"));
        assert!(order.matches("product ghee"));
        assert!(!order.matches("mumbai"));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Paid).unwrap(),
            "\"paid\""
        );
    }
}

use core::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rocketcart_core::{DomainError, DomainResult, Entity, ProductId, ValueObject};

/// Number of units of one product in the cart.
///
/// Always at least 1; a line whose quantity would drop to zero is removed
/// instead.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    pub const ONE: Quantity = Quantity(NonZeroU32::MIN);

    pub fn new(units: u32) -> DomainResult<Self> {
        NonZeroU32::new(units)
            .map(Self)
            .ok_or_else(|| DomainError::validation("quantity must be at least 1"))
    }

    /// Converts an externally supplied amount, rejecting zero, negatives and
    /// values too large to hold.
    pub fn try_from_amount(amount: i64) -> DomainResult<Self> {
        let units = u32::try_from(amount)
            .map_err(|_| DomainError::validation(format!("amount {amount} is out of range")))?;
        Self::new(units)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// The next quantity up, or `None` on overflow.
    pub fn incremented(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl ValueObject for Quantity {}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Catalog record for a product (`GET /products/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    #[serde(alias = "imageUrl", alias = "image_url")]
    pub image: String,
}

/// Stock record for a product (`GET /stock/{id}`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub id: ProductId,
    /// Units available for sale.
    pub amount: u32,
}

impl StockLevel {
    /// Whether the stock can cover `requested` units.
    pub fn covers(&self, requested: u64) -> bool {
        requested <= u64::from(self.amount)
    }
}

/// One product's entry in the cart.
///
/// Serialized with the storefront's field names (`image`, `amount`) so that
/// snapshots written by earlier clients load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    #[serde(alias = "imageUrl", alias = "image_url")]
    pub image: String,
    #[serde(rename = "amount", alias = "quantity")]
    pub quantity: Quantity,
}

impl LineItem {
    /// A fresh line for a product being added for the first time.
    pub fn from_product(product: ProductDetails) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            quantity: Quantity::ONE,
        }
    }

    /// Copy of this line carrying a different quantity.
    pub fn with_quantity(&self, quantity: Quantity) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    /// Price × quantity.
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity.get())
    }
}

impl Entity for LineItem {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sneaker() -> ProductDetails {
        ProductDetails {
            id: ProductId::new(1),
            title: "Tênis de Caminhada Leve Confortável".to_string(),
            price: Decimal::new(17990, 2),
            image: "https://cdn.example.com/shoes/1.jpg".to_string(),
        }
    }

    #[test]
    fn quantity_rejects_zero() {
        let err = Quantity::new(0).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for zero quantity"),
        }
    }

    #[test]
    fn quantity_from_amount_rejects_negative_and_oversized() {
        assert!(Quantity::try_from_amount(-3).is_err());
        assert!(Quantity::try_from_amount(0).is_err());
        assert!(Quantity::try_from_amount(i64::from(u32::MAX) + 1).is_err());
        assert_eq!(Quantity::try_from_amount(4).unwrap().get(), 4);
    }

    #[test]
    fn quantity_increment_stops_at_max() {
        assert_eq!(Quantity::ONE.incremented().unwrap().get(), 2);
        assert!(Quantity::new(u32::MAX).unwrap().incremented().is_none());
    }

    #[test]
    fn from_product_starts_at_one() {
        let item = LineItem::from_product(sneaker());
        assert_eq!(item.id, ProductId::new(1));
        assert_eq!(item.quantity, Quantity::ONE);
    }

    #[test]
    fn subtotal_multiplies_price_by_quantity() {
        let item = LineItem::from_product(sneaker()).with_quantity(Quantity::new(3).unwrap());
        assert_eq!(item.subtotal(), Decimal::new(53970, 2));
    }

    #[test]
    fn line_item_uses_storefront_field_names() {
        let item = LineItem::from_product(sneaker());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["amount"], 1);
        assert_eq!(json["image"], "https://cdn.example.com/shoes/1.jpg");
        assert!(json.get("quantity").is_none());
    }

    #[test]
    fn line_item_accepts_aliases() {
        let json = r#"{"id":2,"title":"Tênis VR","price":139.9,"imageUrl":"x.jpg","quantity":2}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity.get(), 2);
        assert_eq!(item.image, "x.jpg");
        assert_eq!(item.price, Decimal::new(1399, 1));
    }

    #[test]
    fn line_item_with_zero_amount_does_not_parse() {
        let json = r#"{"id":2,"title":"Tênis VR","price":139.9,"image":"x.jpg","amount":0}"#;
        assert!(serde_json::from_str::<LineItem>(json).is_err());
    }

    #[test]
    fn stock_covers_up_to_amount() {
        let stock = StockLevel {
            id: ProductId::new(1),
            amount: 2,
        };
        assert!(stock.covers(2));
        assert!(!stock.covers(3));
    }
}

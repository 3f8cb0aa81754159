use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rocketcart_core::{DomainError, DomainResult, Entity, ProductId};

use crate::line_item::{LineItem, Quantity};

/// Ordered cart contents, at most one line per product.
///
/// `Cart` is a value: every mutation returns a new cart and leaves the
/// receiver untouched, so a failed persist can simply drop the candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| *item.id() == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Units of `product_id` in the cart (0 when absent).
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map_or(0, |item| item.quantity.get())
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| *item.id() == product_id)
    }

    /// New cart with `item` appended at the end.
    pub fn with_appended(&self, item: LineItem) -> DomainResult<Cart> {
        if self.contains(item.id) {
            return Err(DomainError::conflict(format!(
                "product {} is already in the cart",
                item.id
            )));
        }
        let mut items = self.items.clone();
        items.push(item);
        Ok(Cart { items })
    }

    /// New cart with the line for `product_id` one unit larger.
    pub fn with_incremented(&self, product_id: ProductId) -> DomainResult<Cart> {
        let current = self.get(product_id).ok_or_else(DomainError::not_found)?;
        let next = current
            .quantity
            .incremented()
            .ok_or_else(|| DomainError::invariant("quantity overflow"))?;
        self.with_quantity(product_id, next)
    }

    /// New cart with the line for `product_id` set to exactly `quantity`.
    pub fn with_quantity(&self, product_id: ProductId, quantity: Quantity) -> DomainResult<Cart> {
        let idx = self.position(product_id).ok_or_else(DomainError::not_found)?;
        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if i == idx {
                    item.with_quantity(quantity)
                } else {
                    item.clone()
                }
            })
            .collect();
        Ok(Cart { items })
    }

    /// New cart without the line for `product_id`.
    pub fn without(&self, product_id: ProductId) -> DomainResult<Cart> {
        if !self.contains(product_id) {
            return Err(DomainError::not_found());
        }
        let items = self
            .items
            .iter()
            .filter(|item| item.id != product_id)
            .cloned()
            .collect();
        Ok(Cart { items })
    }

    /// JSON snapshot written to the durable store.
    pub fn to_snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a snapshot; duplicate ids or zero quantities are rejected.
    pub fn from_snapshot(snapshot: &str) -> serde_json::Result<Cart> {
        serde_json::from_str(snapshot)
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = DomainError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        for (idx, item) in items.iter().enumerate() {
            if items[..idx].iter().any(|earlier| earlier.id() == item.id()) {
                return Err(DomainError::invariant(format!(
                    "duplicate line for product {}",
                    item.id
                )));
            }
        }
        Ok(Cart { items })
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = core::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::ProductDetails;

    fn item(id: u64, price_cents: i64) -> LineItem {
        LineItem::from_product(ProductDetails {
            id: ProductId::new(id),
            title: format!("Tênis {id}"),
            price: Decimal::new(price_cents, 2),
            image: format!("https://cdn.example.com/shoes/{id}.jpg"),
        })
    }

    fn cart_of(ids: &[u64]) -> Cart {
        ids.iter()
            .fold(Cart::new(), |cart, id| cart.with_appended(item(*id, 10000)).unwrap())
    }

    #[test]
    fn append_adds_line_at_end() {
        let cart = cart_of(&[1, 2]);
        let ids: Vec<u64> = cart.items().iter().map(|i| i.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(cart.quantity_of(ProductId::new(2)), 1);
    }

    #[test]
    fn append_rejects_duplicate_product() {
        let cart = cart_of(&[1]);
        let err = cart.with_appended(item(1, 10000)).unwrap_err();
        match err {
            DomainError::Conflict(_) => {}
            _ => panic!("Expected Conflict error for duplicate line"),
        }
    }

    #[test]
    fn increment_produces_new_value_and_keeps_original() {
        let cart = cart_of(&[1, 2]);
        let next = cart.with_incremented(ProductId::new(1)).unwrap();
        assert_eq!(next.quantity_of(ProductId::new(1)), 2);
        assert_eq!(next.quantity_of(ProductId::new(2)), 1);
        assert_eq!(cart.quantity_of(ProductId::new(1)), 1);
    }

    #[test]
    fn increment_of_absent_product_is_not_found() {
        let err = Cart::new().with_incremented(ProductId::new(9)).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn with_quantity_sets_exact_value_in_place() {
        let cart = cart_of(&[1, 2, 3]);
        let next = cart
            .with_quantity(ProductId::new(2), Quantity::new(5).unwrap())
            .unwrap();
        let ids: Vec<u64> = next.items().iter().map(|i| i.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(next.quantity_of(ProductId::new(2)), 5);
    }

    #[test]
    fn without_removes_only_that_line() {
        let cart = cart_of(&[1, 2, 3]);
        let next = cart.without(ProductId::new(2)).unwrap();
        let ids: Vec<u64> = next.items().iter().map(|i| i.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn without_absent_product_is_not_found() {
        let cart = cart_of(&[1]);
        assert_eq!(cart.without(ProductId::new(2)).unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn totals() {
        let cart = Cart::new()
            .with_appended(item(1, 17990))
            .unwrap()
            .with_appended(item(2, 13990))
            .unwrap()
            .with_quantity(ProductId::new(1), Quantity::new(2).unwrap())
            .unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.subtotal(), Decimal::new(49970, 2));
    }

    #[test]
    fn snapshot_with_duplicate_ids_is_rejected() {
        let json = r#"[
            {"id":1,"title":"a","price":10.0,"image":"a.jpg","amount":1},
            {"id":1,"title":"a","price":10.0,"image":"a.jpg","amount":2}
        ]"#;
        assert!(Cart::from_snapshot(json).is_err());
    }

    #[test]
    fn snapshot_from_storefront_client_loads() {
        let json = r#"[{"id":3,"title":"Tênis Adidas Duramo Lite 2.0","price":219.9,"image":"https://cdn.example.com/3.jpg","amount":2}]"#;
        let cart = Cart::from_snapshot(json).unwrap();
        assert_eq!(cart.quantity_of(ProductId::new(3)), 2);
        assert_eq!(cart.subtotal(), Decimal::new(4398, 1));
    }

    #[test]
    fn empty_snapshot_is_empty_cart() {
        assert!(Cart::from_snapshot("[]").unwrap().is_empty());
        assert_eq!(Cart::new().to_snapshot().unwrap(), "[]");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_cart() -> impl Strategy<Value = Cart> {
            prop::collection::btree_map(1u64..500, (1u32..50, 1i64..1_000_000), 0..12).prop_map(
                |lines| {
                    lines.into_iter().fold(Cart::new(), |cart, (id, (qty, cents))| {
                        let line = item(id, cents).with_quantity(Quantity::new(qty).unwrap());
                        cart.with_appended(line).unwrap()
                    })
                },
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: a snapshot reloads into a structurally identical cart.
            #[test]
            fn snapshot_round_trip(cart in arb_cart()) {
                let snapshot = cart.to_snapshot().unwrap();
                let reloaded = Cart::from_snapshot(&snapshot).unwrap();
                prop_assert_eq!(reloaded, cart);
            }

            /// Property: incrementing touches exactly one line, by exactly one unit.
            #[test]
            fn increment_touches_one_line(cart in arb_cart(), pick in any::<prop::sample::Index>()) {
                prop_assume!(!cart.is_empty());
                let target = cart.items()[pick.index(cart.len())].id;
                let next = cart.with_incremented(target).unwrap();

                prop_assert_eq!(next.len(), cart.len());
                for (before, after) in cart.items().iter().zip(next.items()) {
                    prop_assert_eq!(before.id, after.id);
                    if before.id == target {
                        prop_assert_eq!(after.quantity.get(), before.quantity.get() + 1);
                    } else {
                        prop_assert_eq!(before, after);
                    }
                }
            }

            /// Property: removal drops exactly one line and keeps the others in order.
            #[test]
            fn removal_drops_one_line(cart in arb_cart(), pick in any::<prop::sample::Index>()) {
                prop_assume!(!cart.is_empty());
                let target = cart.items()[pick.index(cart.len())].id;
                let next = cart.without(target).unwrap();

                let expected: Vec<&LineItem> =
                    cart.items().iter().filter(|i| i.id != target).collect();
                let actual: Vec<&LineItem> = next.items().iter().collect();
                prop_assert_eq!(actual, expected);
                prop_assert!(next.without(target).is_err());
            }
        }
    }
}

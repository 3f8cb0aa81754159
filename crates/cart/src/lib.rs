//! Shopping-cart domain module.
//!
//! The cart model ([`Cart`], [`LineItem`]) is pure and value-typed. [`CartStore`]
//! reconciles it against remote stock and a product catalog and keeps a
//! durable snapshot in sync; [`NotifyingCartStore`] is the error-free surface
//! UI layers talk to.

pub mod cart;
pub mod error;
pub mod line_item;
pub mod memory;
pub mod notify;
pub mod ports;
pub mod store;

pub use cart::Cart;
pub use error::{CartError, CartResult, FailureKind};
pub use line_item::{LineItem, ProductDetails, Quantity, StockLevel};
pub use notify::{CartOperation, NotifyingCartStore, user_message};
pub use ports::{DurableStore, LookupError, Notifier, ProductCatalog, StockLookup, StorageError};
pub use store::{CART_STORAGE_KEY, CartDependencies, CartStore, UpdateProductAmount};

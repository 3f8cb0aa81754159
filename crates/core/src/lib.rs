//! `rocketcart-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the cart model and
//! its adapters (no IO, no HTTP, no storage).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::ProductId;
pub use value_object::ValueObject;

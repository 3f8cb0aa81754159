//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Cart line items are entities: two entries with the same product id are the
/// same line, whatever their quantity.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

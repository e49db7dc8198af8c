//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Remote records that are looked up and later mutated implement this so the
/// synchronization core can tell whether a mutation result still refers to the
/// record currently on screen.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Returns `true` when both values describe the same remote record.
    fn same_entity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Identity is assigned by the persistence collaborator, so a freshly built
/// entity has none until its first save.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier, if one has been assigned.
    fn id(&self) -> Option<&Self::Id>;

    /// Whether the entity has been saved at least once.
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}

//! Entity traits: identity access and the REST marker.

/// Identity access for persisted entities.
///
/// `Id` is whatever the repository is keyed by. An entity starts out
/// unsaved with no identity; the repository assigns one on first save.
pub trait Entity<Id> {
    /// The current identity, if one has been assigned.
    fn id(&self) -> Option<Id>;

    /// Record the identity the repository assigned.
    fn assign_id(&mut self, id: Id);
}

/// Marker for entities that get a generated REST repository.
///
/// Implemented by `#[derive(RestEntity)]`. The derive adds no behavior;
/// the marker's presence in the source text is what the build-time scanner
/// looks for.
pub trait RestEntity {}

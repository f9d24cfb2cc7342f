//! The generic repository interface and an in-memory reference backend.

use std::collections::BTreeMap;

use crate::entity::Entity;
use crate::errors::RepositoryError;

/// Generic CRUD surface every generated repository extends.
///
/// `E` is the entity type and `Id` the identity it is keyed by. Generated
/// repository traits never add methods of their own; they give each entity
/// a named, discoverable interface over this one.
pub trait Repository<E, Id> {
    /// Persist `entity`, assigning an identity if it has none yet.
    ///
    /// Returns the saved entity with its identity filled in.
    fn save(&mut self, entity: E) -> Result<E, RepositoryError>;

    fn find_by_id(&self, id: &Id) -> Result<Option<E>, RepositoryError>;

    fn find_all(&self) -> Result<Vec<E>, RepositoryError>;

    fn exists_by_id(&self, id: &Id) -> Result<bool, RepositoryError>;

    fn count(&self) -> Result<u64, RepositoryError>;

    /// Delete the entity with the given identity.
    ///
    /// Deleting an identity that was never saved is an error.
    fn delete_by_id(&mut self, id: &Id) -> Result<(), RepositoryError>;

    fn delete_all(&mut self) -> Result<(), RepositoryError>;
}

/// In-memory repository keyed by `i64`, for demos and tests.
///
/// Identities are assigned sequentially from 1 on first save, the way a
/// database identity column would.
#[derive(Debug)]
pub struct InMemoryRepository<E> {
    entries: BTreeMap<i64, E>,
    next_id: i64,
}

impl<E> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Repository<E, i64> for InMemoryRepository<E>
where
    E: Entity<i64> + Clone,
{
    fn save(&mut self, mut entity: E) -> Result<E, RepositoryError> {
        let id = match entity.id() {
            Some(id) => {
                // Keep the sequence ahead of explicitly assigned identities.
                if id >= self.next_id {
                    self.next_id = id + 1;
                }
                id
            }
            None => {
                let id = self.next_id;
                self.next_id += 1;
                entity.assign_id(id);
                id
            }
        };
        self.entries.insert(id, entity.clone());
        Ok(entity)
    }

    fn find_by_id(&self, id: &i64) -> Result<Option<E>, RepositoryError> {
        Ok(self.entries.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<E>, RepositoryError> {
        Ok(self.entries.values().cloned().collect())
    }

    fn exists_by_id(&self, id: &i64) -> Result<bool, RepositoryError> {
        Ok(self.entries.contains_key(id))
    }

    fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.entries.len() as u64)
    }

    fn delete_by_id(&mut self, id: &i64) -> Result<(), RepositoryError> {
        self.entries
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found(id))
    }

    fn delete_all(&mut self) -> Result<(), RepositoryError> {
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Widget {
        id: Option<i64>,
        label: String,
    }

    impl Widget {
        fn new(label: &str) -> Self {
            Self {
                id: None,
                label: label.to_string(),
            }
        }
    }

    impl Entity<i64> for Widget {
        fn id(&self) -> Option<i64> {
            self.id
        }

        fn assign_id(&mut self, id: i64) {
            self.id = Some(id);
        }
    }

    #[test]
    fn save_assigns_sequential_identities() {
        let mut repo = InMemoryRepository::new();
        let first = repo.save(Widget::new("a")).unwrap();
        let second = repo.save(Widget::new("b")).unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn saving_with_an_identity_updates_in_place() {
        let mut repo = InMemoryRepository::new();
        let saved = repo.save(Widget::new("draft")).unwrap();

        let mut revised = saved.clone();
        revised.label = "final".to_string();
        repo.save(revised).unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        let found = repo.find_by_id(&saved.id.unwrap()).unwrap().unwrap();
        assert_eq!(found.label, "final");
    }

    #[test]
    fn the_sequence_skips_past_explicit_identities() {
        let mut repo = InMemoryRepository::new();
        repo.save(Widget {
            id: Some(10),
            label: "imported".to_string(),
        })
        .unwrap();

        let fresh = repo.save(Widget::new("new")).unwrap();
        assert_eq!(fresh.id, Some(11));
    }

    #[test]
    fn find_all_is_ordered_by_identity() {
        let mut repo = InMemoryRepository::new();
        repo.save(Widget {
            id: Some(3),
            label: "c".to_string(),
        })
        .unwrap();
        repo.save(Widget {
            id: Some(1),
            label: "a".to_string(),
        })
        .unwrap();

        let labels: Vec<String> = repo
            .find_all()
            .unwrap()
            .into_iter()
            .map(|widget| widget.label)
            .collect();
        assert_eq!(labels, vec!["a", "c"]);
    }

    #[test]
    fn deleting_a_missing_identity_is_not_found() {
        let mut repo: InMemoryRepository<Widget> = InMemoryRepository::new();
        let err = repo.delete_by_id(&42).unwrap_err();
        match err {
            RepositoryError::NotFound { id } => assert_eq!(id, "42"),
            other => panic!("expected NotFound, got {other}"),
        }
    }

    #[test]
    fn delete_all_clears_without_resetting_the_sequence() {
        let mut repo = InMemoryRepository::new();
        repo.save(Widget::new("a")).unwrap();
        repo.save(Widget::new("b")).unwrap();
        repo.delete_all().unwrap();

        assert_eq!(repo.count().unwrap(), 0);
        let next = repo.save(Widget::new("c")).unwrap();
        assert_eq!(next.id, Some(3));
    }

    #[test]
    fn exists_tracks_saves_and_deletes() {
        let mut repo = InMemoryRepository::new();
        let saved = repo.save(Widget::new("a")).unwrap();
        let id = saved.id.unwrap();

        assert!(repo.exists_by_id(&id).unwrap());
        repo.delete_by_id(&id).unwrap();
        assert!(!repo.exists_by_id(&id).unwrap());
        assert!(repo.find_by_id(&id).unwrap().is_none());
    }
}

//! Collection cache held by a resource view between fetches.

use crate::error::ValidationError;
use crate::models::Entity;

/// Client-side copy of one server collection.
///
/// Replaced wholesale by a full refetch, or patched one entity at a time
/// after a mutation succeeds.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    noun: &'static str,
    items: Vec<T>,
    loaded: bool,
}

impl<T: Entity> Collection<T> {
    /// Empty, not-yet-loaded cache for entities called `noun` ("User").
    #[must_use]
    pub const fn new(noun: &'static str) -> Self {
        Self {
            noun,
            items: Vec::new(),
            loaded: false,
        }
    }

    /// Replace the cache with a fresh server listing.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.loaded = true;
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Whether a listing has completed since the cache was created.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: T::Id) -> bool {
        self.get(id).is_some()
    }

    /// Ensure `id` was present in the last listing.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownEntity` otherwise.
    pub fn require(&self, id: T::Id) -> Result<&T, ValidationError> {
        self.get(id).ok_or_else(|| ValidationError::UnknownEntity {
            noun: self.noun,
            id: id.to_string(),
        })
    }

    /// Replace the cached entity with the same id, or append it.
    pub fn upsert(&mut self, item: T) {
        let id = item.id();
        match self.items.iter_mut().find(|existing| existing.id() == id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Drop the entity with `id`, returning it if it was cached.
    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    /// Mutate the cached entity with `id` in place.
    ///
    /// Returns `false` if it is not cached.
    pub fn patch(&mut self, id: T::Id, f: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                f(item);
                true
            }
            None => false,
        }
    }

    /// Entities matching `predicate`, in cache order.
    pub fn filtered<'a>(&'a self, predicate: impl Fn(&T) -> bool + 'a) -> Vec<&'a T> {
        self.items.iter().filter(|item| predicate(item)).collect()
    }
}

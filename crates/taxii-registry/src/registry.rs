use std::collections::HashMap;
use std::sync::RwLock;

use taxii_types::CollectionId;

use crate::collection::Collection;
use crate::error::{RegistryError, RegistryResult};

/// Id and alias resolution over the configured collections.
///
/// Registration happens at configuration time; request processing only
/// resolves. Both maps live under one lock so an alias can never point at
/// a collection that is not (yet) registered.
pub struct CollectionRegistry {
    inner: RwLock<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    collections: HashMap<CollectionId, Collection>,
    aliases: HashMap<String, CollectionId>,
}

impl CollectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryState::default()),
        }
    }

    /// Register a collection (administrative configuration).
    ///
    /// Rejects duplicate ids and already-bound aliases; a rejected
    /// registration leaves the registry unchanged.
    pub fn register(&self, collection: Collection) -> RegistryResult<()> {
        let mut state = self.write_state()?;

        if state.collections.contains_key(&collection.id) {
            return Err(RegistryError::DuplicateCollection { id: collection.id });
        }
        if let Some(alias) = &collection.alias {
            if state.aliases.contains_key(alias) {
                return Err(RegistryError::AliasTaken {
                    alias: alias.clone(),
                });
            }
            state.aliases.insert(alias.clone(), collection.id);
        }
        state.collections.insert(collection.id, collection);
        Ok(())
    }

    /// Resolve a collection by id.
    pub fn resolve(&self, id: CollectionId) -> RegistryResult<Collection> {
        let state = self.read_state()?;
        state
            .collections
            .get(&id)
            .cloned()
            .ok_or_else(|| RegistryError::CollectionNotFound {
                selector: id.to_string(),
            })
    }

    /// Resolve a collection by its alias.
    pub fn resolve_alias(&self, alias: &str) -> RegistryResult<Collection> {
        let state = self.read_state()?;
        state
            .aliases
            .get(alias)
            .and_then(|id| state.collections.get(id))
            .cloned()
            .ok_or_else(|| RegistryError::CollectionNotFound {
                selector: alias.to_string(),
            })
    }

    /// All registered collections, ordered by title.
    pub fn list(&self) -> RegistryResult<Vec<Collection>> {
        let state = self.read_state()?;
        let mut collections: Vec<Collection> = state.collections.values().cloned().collect();
        collections.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(collections)
    }

    /// Report whether the collection offers reads.
    ///
    /// Pure check: the caller decides what to do with a denial.
    pub fn check_readable(&self, collection: &Collection) -> RegistryResult<()> {
        if collection.can_read {
            Ok(())
        } else {
            Err(RegistryError::ReadDenied { id: collection.id })
        }
    }

    /// Report whether the collection offers writes.
    pub fn check_writable(&self, collection: &Collection) -> RegistryResult<()> {
        if collection.can_write {
            Ok(())
        } else {
            Err(RegistryError::WriteDenied { id: collection.id })
        }
    }

    /// Number of registered collections.
    pub fn len(&self) -> usize {
        self.inner.read().expect("registry lock poisoned").collections.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_state(&self) -> RegistryResult<std::sync::RwLockReadGuard<'_, RegistryState>> {
        self.inner.read().map_err(|_| RegistryError::Unavailable {
            reason: "registry read lock poisoned".into(),
        })
    }

    fn write_state(&self) -> RegistryResult<std::sync::RwLockWriteGuard<'_, RegistryState>> {
        self.inner.write().map_err(|_| RegistryError::Unavailable {
            reason: "registry write lock poisoned".into(),
        })
    }
}

impl Default for CollectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_resolve_by_id_and_alias() {
        let registry = CollectionRegistry::new();
        let coll = Collection::new("Indicators").with_alias("indicators");
        let id = coll.id;
        registry.register(coll).unwrap();

        assert_eq!(registry.resolve(id).unwrap().title, "Indicators");
        assert_eq!(registry.resolve_alias("indicators").unwrap().id, id);
    }

    #[test]
    fn unknown_selectors_are_not_found() {
        let registry = CollectionRegistry::new();
        let err = registry.resolve(CollectionId::new()).unwrap_err();
        assert!(matches!(err, RegistryError::CollectionNotFound { .. }));
        let err = registry.resolve_alias("nope").unwrap_err();
        assert!(matches!(err, RegistryError::CollectionNotFound { .. }));
    }

    #[test]
    fn duplicate_ids_and_aliases_are_rejected() {
        let registry = CollectionRegistry::new();
        let coll = Collection::new("First").with_alias("shared");
        let id = coll.id;
        registry.register(coll).unwrap();

        let err = registry
            .register(Collection::new("Same id").with_id(id))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCollection { .. }));

        let err = registry
            .register(Collection::new("Same alias").with_alias("shared"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::AliasTaken { .. }));
        // The rejected registration left nothing behind.
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn permission_checks_report_without_enforcing() {
        let registry = CollectionRegistry::new();
        let readable = Collection::new("Open");
        let dropbox = Collection::new("Drop box").write_only();

        registry.check_readable(&readable).unwrap();
        registry.check_writable(&readable).unwrap();

        let err = registry.check_readable(&dropbox).unwrap_err();
        assert!(matches!(err, RegistryError::ReadDenied { .. }));
        registry.check_writable(&dropbox).unwrap();
    }

    #[test]
    fn list_is_ordered_by_title() {
        let registry = CollectionRegistry::new();
        registry.register(Collection::new("zeta")).unwrap();
        registry.register(Collection::new("alpha")).unwrap();

        let titles: Vec<String> = registry
            .list()
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, ["alpha", "zeta"]);
    }
}

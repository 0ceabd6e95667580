//! Concurrent read-through memoization of resolution results.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::ResolveError;
use crate::registry::model::{ArchId, Registry};
use crate::types::ResolutionResult;

/// A concurrent-safe read-through cache of `resolve` results.
///
/// Keys combine the architecture id with the registry content fingerprint,
/// so results from a stale registry are never served after a reload: a
/// reloaded registry carries a new fingerprint and misses the old entries.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: RwLock<HashMap<(ArchId, u64), Arc<ResolutionResult>>>,
}

impl ResolutionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves through the cache.
    ///
    /// On a lock poisoned by a panicking thread the cache degrades to
    /// computing without memoization.
    ///
    /// # Errors
    ///
    /// Propagates [`ResolveError`] from the underlying resolution.
    pub fn resolve(
        &self,
        registry: &Registry,
        arch_id: &ArchId,
    ) -> Result<Arc<ResolutionResult>, ResolveError> {
        let key = (arch_id.clone(), registry.fingerprint());

        if let Ok(entries) = self.entries.read() {
            if let Some(cached) = entries.get(&key) {
                tracing::debug!(arch = %arch_id, "resolution cache hit");
                return Ok(Arc::clone(cached));
            }
        }

        let result = Arc::new(crate::resolve::resolve(registry, arch_id)?);
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key, Arc::clone(&result));
        }
        Ok(result)
    }

    /// Number of cached results.
    ///
    /// Returns 0 when the lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::model::ArchitectureNode;

    fn id(s: &str) -> ArchId {
        ArchId::new(s).unwrap()
    }

    fn registry_with(names: &[&str]) -> Registry {
        Registry::new(
            names
                .iter()
                .map(|n| ArchitectureNode::new(id(n)))
                .collect(),
            vec![],
        )
    }

    #[test]
    fn second_resolve_hits_cache() {
        let cache = ResolutionCache::new();
        let registry = registry_with(&["svc"]);

        let first = cache.resolve(&registry, &id("svc")).unwrap();
        let second = cache.resolve(&registry, &id("svc")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn changed_registry_misses() {
        let cache = ResolutionCache::new();
        let a = registry_with(&["svc"]);
        let b = registry_with(&["svc", "other"]);

        let first = cache.resolve(&a, &id("svc")).unwrap();
        let second = cache.resolve(&b, &id("svc")).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = ResolutionCache::new();
        let registry = registry_with(&["svc"]);
        assert!(cache.resolve(&registry, &id("missing")).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_resolves_agree() {
        let cache = Arc::new(ResolutionCache::new());
        let registry = Arc::new(registry_with(&["svc"]));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    cache.resolve(&registry, &id("svc")).unwrap().architecture.arch_id.clone()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), id("svc"));
        }
    }
}

use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Memoizes derived per-entity features for the lifetime of the cache.
///
/// Lookups and inserts are safe from any number of scoring workers. Two workers
/// missing the same key at once may both compute the value; the first insert wins
/// and every caller, including the loser, gets the stored value back.
pub struct FeatureCache<K, V> {
    entries: DashMap<K, Arc<V>>,
}

impl<K, V> Default for FeatureCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FeatureCache<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns the cached features for `key`, computing them with `compute` on a miss
    pub fn get_or_compute<F>(&self, key: K, compute: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        if let Some(hit) = self.entries.get(&key) {
            return Arc::clone(hit.value());
        }

        // computed outside any shard lock so slow extraction never blocks readers
        let computed = Arc::new(compute());
        let stored = self.entries.entry(key).or_insert(computed);
        Arc::clone(stored.value())
    }

    #[cfg(test)]
    pub(crate) fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.get(key).map(|hit| Arc::clone(hit.value()))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_computes_once_per_key() {
        let cache: FeatureCache<u32, Vec<String>> = FeatureCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_compute(7, || {
            calls.fetch_add(1, Ordering::SeqCst);
            vec!["pixar".to_string()]
        });
        let second = cache.get_or_compute(7, || {
            calls.fetch_add(1, Ordering::SeqCst);
            vec!["other".to_string()]
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(*cache.get(&7).unwrap(), vec!["pixar".to_string()]);
        assert!(cache.get(&8).is_none());
    }

    #[test]
    fn test_concurrent_lookups_agree() {
        let cache: FeatureCache<u32, u64> = FeatureCache::new();

        let values: Vec<Arc<u64>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| cache.get_or_compute(1, || 42)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(values.iter().all(|value| **value == 42));
        let stored = cache.get(&1).unwrap();
        assert!(values.iter().all(|value| Arc::ptr_eq(value, &stored)));
    }
}

//! Fingerprint-keyed memoization for resolved fragments and assembled output.
//!
//! The cache is purely an optimization layer: with caching enabled the final
//! stylesheet must be byte-identical to a run with caching disabled. Keys are
//! SHA-256 content fingerprints (see [`crate::utils::content_fingerprint`]),
//! so any change to a package's id or CSS source produces a miss, and there is
//! no separate invalidation step. The store is bounded by the number of
//! installed packages, so no eviction policy is needed.
//!
//! Both maps are [`DashMap`]s: shard-level locking serializes concurrent
//! `get`/`put` for the same key, and [`FragmentCache::get_or_compute`] holds
//! the key's entry while computing so at most one computation per key is in
//! flight. The pipeline itself is single-pass and synchronous, but the cache
//! is safe to share should resolution ever be parallelized.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::core::{CssFragment, Result};

/// Memoization store for the bundling pipeline.
///
/// Holds resolved fragments keyed by per-package content fingerprints and
/// assembled stylesheets keyed by the graph's structural fingerprint. When
/// constructed disabled, every lookup is a pass-through miss and every store
/// is a no-op.
pub struct FragmentCache {
    enabled: bool,
    fragments: DashMap<String, CssFragment>,
    outputs: DashMap<String, String>,
}

impl FragmentCache {
    /// Create a cache; `enabled = false` yields pass-through behavior.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            fragments: DashMap::new(),
            outputs: DashMap::new(),
        }
    }

    /// Create a pass-through cache.
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Whether lookups can ever hit.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Look up a previously resolved fragment.
    pub fn get(&self, key: &str) -> Option<CssFragment> {
        if !self.enabled {
            return None;
        }
        self.fragments.get(key).map(|entry| entry.clone())
    }

    /// Store a resolved fragment.
    pub fn put(&self, key: impl Into<String>, fragment: CssFragment) {
        if self.enabled {
            self.fragments.insert(key.into(), fragment);
        }
    }

    /// Fetch the fragment for `key`, computing and storing it on a miss.
    ///
    /// The key's map entry is held for the duration of `compute`, so two
    /// concurrent callers with the same key perform the computation at most
    /// once. A failed computation stores nothing.
    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> Result<CssFragment>
    where
        F: FnOnce() -> Result<CssFragment>,
    {
        if !self.enabled {
            return compute();
        }
        match self.fragments.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                tracing::debug!("fragment cache hit for {key}");
                Ok(entry.get().clone())
            }
            Entry::Vacant(entry) => {
                let fragment = compute()?;
                entry.insert(fragment.clone());
                Ok(fragment)
            }
        }
    }

    /// Look up a previously assembled stylesheet.
    pub fn get_output(&self, key: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.outputs.get(key).map(|entry| entry.clone())
    }

    /// Store an assembled stylesheet.
    pub fn put_output(&self, key: impl Into<String>, css: impl Into<String>) {
        if self.enabled {
            self.outputs.insert(key.into(), css.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StylepackError;

    #[test]
    fn test_disabled_cache_is_a_pass_through_miss() {
        let cache = FragmentCache::disabled();
        cache.put("k", CssFragment::new("drums", ".drums { }"));
        assert!(cache.get("k").is_none());
        cache.put_output("o", "css");
        assert!(cache.get_output("o").is_none());
    }

    #[test]
    fn test_enabled_cache_round_trips() {
        let cache = FragmentCache::new(true);
        let fragment = CssFragment::new("drums", ".drums { }");
        cache.put("k", fragment.clone());
        assert_eq!(cache.get("k"), Some(fragment));
        assert!(cache.get("other").is_none());
    }

    #[test]
    fn test_get_or_compute_runs_once_per_key() {
        let cache = FragmentCache::new(true);
        let mut calls = 0;
        for _ in 0..3 {
            let fragment = cache
                .get_or_compute("k", || {
                    calls += 1;
                    Ok(CssFragment::new("drums", ".drums { }"))
                })
                .unwrap();
            assert_eq!(fragment.package, "drums");
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_get_or_compute_disabled_always_computes() {
        let cache = FragmentCache::disabled();
        let mut calls = 0;
        for _ in 0..3 {
            cache
                .get_or_compute("k", || {
                    calls += 1;
                    Ok(CssFragment::new("drums", ".drums { }"))
                })
                .unwrap();
        }
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_failed_computation_is_not_cached() {
        let cache = FragmentCache::new(true);
        let err = cache.get_or_compute("k", || {
            Err(StylepackError::FragmentNotFound {
                package: "drums".to_string(),
            })
        });
        assert!(err.is_err());
        assert!(cache.get("k").is_none());
    }
}

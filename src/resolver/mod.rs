//! Maps ordered package ids to their CSS fragments.
//!
//! The resolver is the only pipeline stage that consults the cache: fragment
//! lookups go through [`FragmentCache::get_or_compute`] keyed by a fingerprint
//! of the package id and its CSS source content, so an unchanged package is
//! resolved once however many runs share the cache, and an edited source
//! always misses.

use std::collections::HashMap;

use crate::cache::FragmentCache;
use crate::core::{CssFragment, Result, StylepackError};
use crate::manifest::PackageDescriptor;
use crate::utils::content_fingerprint;

/// Resolves package ids to CSS fragments, consulting a shared cache.
pub struct FragmentResolver<'a> {
    /// Index from package id to its descriptor.
    index: HashMap<&'a str, &'a PackageDescriptor>,
    /// Shared memoization store; may be a pass-through when caching is off.
    cache: &'a FragmentCache,
}

impl<'a> FragmentResolver<'a> {
    /// Build a resolver over the installed package set.
    pub fn new(packages: &'a [PackageDescriptor], cache: &'a FragmentCache) -> Self {
        let index = packages
            .iter()
            .map(|package| (package.id.as_str(), package))
            .collect();
        Self { index, cache }
    }

    /// Resolve the CSS fragment for one package.
    ///
    /// Fails with [`StylepackError::FragmentNotFound`] when the package is
    /// unknown or ships no CSS source. Trailing whitespace is trimmed from
    /// the rule body so every fragment occupies exactly one slot in the
    /// line-per-rule output.
    pub fn resolve(&self, package_id: &str) -> Result<CssFragment> {
        let descriptor = self.index.get(package_id).ok_or_else(|| {
            StylepackError::FragmentNotFound {
                package: package_id.to_string(),
            }
        })?;
        let css = descriptor
            .css
            .as_deref()
            .ok_or_else(|| StylepackError::FragmentNotFound {
                package: package_id.to_string(),
            })?;

        let key = content_fingerprint(&[package_id, css]);
        self.cache.get_or_compute(&key, || {
            tracing::debug!("resolved fragment for '{package_id}'");
            Ok(CssFragment::new(package_id, css.trim_end()))
        })
    }

    /// Resolve every package in `order`, preserving sequence positions.
    ///
    /// The result is indexed by position in `order`, never by completion
    /// order, which is what keeps the contract safe under a future parallel
    /// resolver.
    pub fn resolve_all(&self, order: &[String]) -> Result<Vec<CssFragment>> {
        order.iter().map(|id| self.resolve(id)).collect()
    }
}

//! Core types shared across the bundling pipeline.
//!
//! This module hosts the crate error type and the [`CssFragment`] value that
//! flows from the resolver through the cache to the assembler.

pub mod error;

pub use error::StylepackError;

/// Convenience alias used throughout the library seams.
pub type Result<T> = std::result::Result<T, StylepackError>;

/// The CSS rule text attributed to a single package.
///
/// Fragments are produced fresh by the resolver or served from the cache and
/// are never mutated once created. The `rule` field holds the raw source text;
/// URL-reference rendering happens later in the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssFragment {
    /// Id of the package this rule belongs to.
    pub package: String,
    /// The literal rule body as read from the package's CSS source.
    pub rule: String,
}

impl CssFragment {
    /// Create a fragment for a package.
    pub fn new(package: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            rule: rule.into(),
        }
    }
}

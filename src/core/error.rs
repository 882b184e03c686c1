//! Error handling for stylepack.
//!
//! All failure modes in the bundling pipeline are malformed-input conditions
//! rather than transient ones, so nothing here is retryable: the pipeline
//! aborts on the first error and no partial stylesheet is ever emitted.
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** for precise handling in code
//! 2. **Plain `Display` messages** that the CLI layer turns into user-facing
//!    output — the library itself never formats for end users
//!
//! # Error Categories
//!
//! - **Graph construction**: [`StylepackError::DanglingDependency`],
//!   [`StylepackError::DuplicatePackage`]
//! - **Ordering**: [`StylepackError::CircularDependency`]
//! - **Fragment resolution**: [`StylepackError::FragmentNotFound`]
//! - **Package discovery**: [`StylepackError::ManifestParseError`]
//! - **Filesystem**: [`StylepackError::Io`] (converted from [`std::io::Error`])

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for stylepack operations.
///
/// Each variant represents a specific failure mode and carries the context
/// needed to report it (package ids, paths, the offending cycle). The three
/// pipeline errors — dangling dependency, circular dependency, and missing
/// fragment — are all fatal to an assembly run.
#[derive(Error, Debug)]
pub enum StylepackError {
    /// A package declares a dependency that is not in the installed set.
    ///
    /// This is checked against the full installed set before any whitelist
    /// filtering, so a whitelist can never mask a genuinely missing package.
    #[error("package '{package}' depends on '{dependency}', which is not installed")]
    DanglingDependency {
        /// The package whose manifest declares the dependency.
        package: String,
        /// The dependency id that could not be found.
        dependency: String,
    },

    /// Two installed packages share the same id.
    #[error("duplicate package id '{package}' in installed set")]
    DuplicatePackage {
        /// The id that appeared more than once.
        package: String,
    },

    /// The dependency graph contains a cycle, so no valid bundle order exists.
    #[error("circular dependency detected: {cycle}")]
    CircularDependency {
        /// The cycle path, rendered as `a -> b -> a`.
        cycle: String,
    },

    /// A package that survived whitelist filtering has no CSS source.
    #[error("no CSS source found for package '{package}'")]
    FragmentNotFound {
        /// The package missing a CSS rule.
        package: String,
    },

    /// A package manifest exists but could not be parsed.
    #[error("failed to parse manifest at {path}: {reason}")]
    ManifestParseError {
        /// Path to the offending manifest file.
        path: PathBuf,
        /// The underlying TOML error, flattened to a string.
        reason: String,
    },

    /// A filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

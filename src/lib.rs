//! stylepack - dependency-ordered CSS bundler
//!
//! Concatenates per-package CSS fragments into a single stylesheet, ordered
//! so that a package's CSS never precedes the CSS of a package it depends on,
//! and copies each package's static image assets alongside, rewriting
//! background URLs to the copied location.
//!
//! # Architecture Overview
//!
//! The pipeline is a single linear pass over a bounded set of installed
//! packages:
//!
//! ```text
//! installed packages + whitelist
//!         │
//!         ▼
//!   DependencyGraph ──▶ topological order ──▶ FragmentResolver ──▶ assemble
//!                                                    │
//!                                              FragmentCache
//! ```
//!
//! Failure at any stage (dangling dependency, cycle, missing CSS source)
//! aborts the whole run; no partial stylesheet is emitted.
//!
//! # Core Modules
//!
//! - [`manifest`] - Package discovery and `stylepack.toml` parsing
//! - [`graph`] - Dependency graph construction, cycle detection, and
//!   deterministic topological ordering
//! - [`resolver`] - Per-package CSS fragment resolution
//! - [`cache`] - Fingerprint-keyed memoization of fragments and output
//! - [`assembler`] - Stylesheet concatenation and URL-reference rendering
//! - [`bundle`] - Pipeline orchestration and asset copying
//!
//! # Supporting Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - Bundle configuration with TOML loading
//! - [`core`] - Shared types and error handling
//! - [`utils`] - Fingerprinting and file-copy helpers
//!
//! # Example
//!
//! ```rust
//! use stylepack::bundle::bundle;
//! use stylepack::config::BundleConfig;
//! use stylepack::manifest::PackageDescriptor;
//!
//! # fn main() -> Result<(), stylepack::core::StylepackError> {
//! let packages = vec![
//!     PackageDescriptor::new("drums")
//!         .with_css(".drums { background: url(\"images/drums.png\"); }"),
//!     PackageDescriptor::new("brakes")
//!         .with_dependencies(["drums"])
//!         .with_css(".brakes { background: url(\"images/brakes.png\"); }"),
//! ];
//!
//! let output = bundle(&packages, &BundleConfig::default())?;
//! assert!(output.css.starts_with(".drums"));
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod bundle;
pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod graph;
pub mod manifest;
pub mod resolver;
pub mod utils;

pub use assembler::UrlStyle;
pub use bundle::{BundleOutput, bundle, bundle_with_cache, copy_assets};
pub use cache::FragmentCache;
pub use config::BundleConfig;
pub use core::{CssFragment, StylepackError};
pub use graph::DependencyGraph;
pub use manifest::{PackageDescriptor, discover_packages};
pub use resolver::FragmentResolver;

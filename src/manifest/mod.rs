//! Package discovery and manifest parsing.
//!
//! An installed package tree looks like:
//!
//! ```text
//! packages/
//! ├── brakes/
//! │   ├── stylepack.toml      # name + declared dependencies
//! │   ├── brakes.css          # the package's single CSS rule
//! │   └── images/             # static assets referenced by the rule
//! │       └── brakes.png
//! └── drums/
//!     ├── stylepack.toml
//!     └── drums.css
//! ```
//!
//! Discovery scans the tree once and produces immutable [`PackageDescriptor`]
//! values; everything downstream (graph construction, ordering, resolution)
//! consumes descriptors and never touches the filesystem again. Directories
//! are visited in sorted name order so that the descriptor sequence — and with
//! it the graph's node insertion order — is reproducible across runs.
//!
//! # Manifest Format (`stylepack.toml`)
//!
//! ```toml
//! name = "brakes"
//! dependencies = ["drums", "calipers"]
//!
//! # Optional overrides; these are the defaults:
//! # style = "brakes.css"     # falls back to <name>.css, then index.css
//! # assets = "images"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::{Result, StylepackError};

/// Default asset subdirectory inside a package.
const DEFAULT_ASSET_DIR: &str = "images";

/// Manifest file name looked up inside each package directory.
pub const MANIFEST_FILENAME: &str = "stylepack.toml";

/// An installed package as seen by the bundling pipeline.
///
/// Descriptors are created during discovery (or directly by an embedding
/// application) and are immutable thereafter. The dependency list preserves
/// the declaration order from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// Package id, unique within the installed set.
    pub id: String,
    /// Declared dependency ids, in declaration order.
    pub dependencies: Vec<String>,
    /// The package's CSS source content, if it ships one.
    pub css: Option<String>,
    /// Directory holding the package's static assets, if any.
    pub asset_dir: Option<PathBuf>,
}

impl PackageDescriptor {
    /// Create a descriptor with no dependencies, CSS, or assets.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dependencies: Vec::new(),
            css: None,
            asset_dir: None,
        }
    }

    /// Set the declared dependencies.
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Set the CSS source content.
    #[must_use]
    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = Some(css.into());
        self
    }

    /// Set the asset directory.
    #[must_use]
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = Some(dir.into());
        self
    }
}

/// On-disk manifest schema for a single package.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PackageManifest {
    /// Package id. Must match across manifests that reference it.
    name: String,
    /// Ids of packages whose CSS must precede this package's CSS.
    #[serde(default)]
    dependencies: Vec<String>,
    /// Path to the CSS source, relative to the package directory.
    #[serde(default)]
    style: Option<PathBuf>,
    /// Path to the asset directory, relative to the package directory.
    #[serde(default)]
    assets: Option<PathBuf>,
}

/// Scans `root` for package directories and loads their manifests.
///
/// Every direct subdirectory of `root` containing a `stylepack.toml` is
/// treated as an installed package; subdirectories without one are skipped.
/// Returns descriptors sorted by directory name.
pub fn discover_packages(root: &Path) -> Result<Vec<PackageDescriptor>> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut packages = Vec::new();
    for dir in dirs {
        let manifest_path = dir.join(MANIFEST_FILENAME);
        if !manifest_path.is_file() {
            tracing::debug!("skipping {}: no {}", dir.display(), MANIFEST_FILENAME);
            continue;
        }
        packages.push(load_package(&dir, &manifest_path)?);
    }

    tracing::debug!("discovered {} packages under {}", packages.len(), root.display());
    Ok(packages)
}

/// Loads one package directory into a descriptor.
fn load_package(dir: &Path, manifest_path: &Path) -> Result<PackageDescriptor> {
    let content = std::fs::read_to_string(manifest_path)?;
    let manifest: PackageManifest =
        toml::from_str(&content).map_err(|e| StylepackError::ManifestParseError {
            path: manifest_path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let css = read_css_source(dir, &manifest)?;

    let asset_dir = manifest
        .assets
        .map(|rel| dir.join(rel))
        .unwrap_or_else(|| dir.join(DEFAULT_ASSET_DIR));
    let asset_dir = asset_dir.is_dir().then_some(asset_dir);

    Ok(PackageDescriptor {
        id: manifest.name,
        dependencies: manifest.dependencies,
        css,
        asset_dir,
    })
}

/// Reads the package's CSS source, trying the manifest override first, then
/// `<name>.css`, then `index.css`. Absence is not an error at discovery time:
/// the resolver reports it only for packages that actually end up in the
/// bundle order.
fn read_css_source(dir: &Path, manifest: &PackageManifest) -> Result<Option<String>> {
    let candidates = match &manifest.style {
        Some(rel) => vec![dir.join(rel)],
        None => vec![
            dir.join(format!("{}.css", manifest.name)),
            dir.join("index.css"),
        ],
    };

    for candidate in candidates {
        if candidate.is_file() {
            return Ok(Some(std::fs::read_to_string(candidate)?));
        }
    }
    Ok(None)
}

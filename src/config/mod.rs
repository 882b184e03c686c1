//! Bundle configuration.
//!
//! Configuration is an explicit structure with named options rather than a
//! bag of flags; it can be deserialized from a project-level TOML file and
//! individual fields can then be overridden by CLI flags (flags win).
//!
//! ```toml
//! cached = true
//! url_style = "helper"
//! whitelist = ["delorean", "focus", "brakes", "drums", "calipers", "mr-fusion"]
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::assembler::UrlStyle;
use crate::core::{Result, StylepackError};

/// Options controlling a bundle run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleConfig {
    /// Enable the memoization layer. Off by default; output is identical
    /// either way.
    #[serde(default)]
    pub cached: bool,

    /// How rewritten asset references are rendered.
    #[serde(default)]
    pub url_style: UrlStyle,

    /// Restrict output to these packages. `None` or an empty set means no
    /// filtering.
    #[serde(default)]
    pub whitelist: Option<BTreeSet<String>>,
}

impl BundleConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| StylepackError::ManifestParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// The effective whitelist filter: `None` when unset or empty.
    pub fn whitelist_filter(&self) -> Option<&BTreeSet<String>> {
        self.whitelist.as_ref().filter(|w| !w.is_empty())
    }
}

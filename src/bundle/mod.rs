//! The bundling pipeline: graph → order → fragments → stylesheet.
//!
//! A single linear pass with no retries and no intermediate persisted state;
//! the first error at any stage aborts the whole run and no partial output is
//! produced. Concretely:
//!
//! 1. Build the dependency graph from the installed set, applying the
//!    whitelist filter.
//! 2. Compute the deterministic dependency-first order.
//! 3. Resolve one CSS fragment per ordered package, through the cache.
//! 4. Assemble the fragments into the final stylesheet text.
//!
//! Assembled output is additionally memoized under a fingerprint combining
//! the graph structure with every ordered package's CSS content, so a repeat
//! run against a shared enabled cache skips resolution and assembly entirely.

use std::path::Path;

use crate::assembler;
use crate::cache::FragmentCache;
use crate::config::BundleConfig;
use crate::core::{Result, StylepackError};
use crate::graph::DependencyGraph;
use crate::manifest::PackageDescriptor;
use crate::resolver::FragmentResolver;
use crate::utils;

/// Result of a bundle run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOutput {
    /// The assembled stylesheet, one rule per line.
    pub css: String,
    /// The package order the stylesheet follows; also drives asset copying.
    pub order: Vec<String>,
}

/// Run the pipeline with a private cache configured from `config.cached`.
pub fn bundle(packages: &[PackageDescriptor], config: &BundleConfig) -> Result<BundleOutput> {
    let cache = FragmentCache::new(config.cached);
    bundle_with_cache(packages, config, &cache)
}

/// Run the pipeline against a caller-owned cache.
///
/// Sharing one enabled cache across runs is what makes repeat bundles cheap;
/// correctness never depends on it, and a disabled cache degrades every
/// lookup to a recomputation with byte-identical output.
pub fn bundle_with_cache(
    packages: &[PackageDescriptor],
    config: &BundleConfig,
    cache: &FragmentCache,
) -> Result<BundleOutput> {
    let graph = DependencyGraph::build(packages, config.whitelist_filter())?;
    let order = graph.topological_order()?;
    tracing::debug!(
        "ordered {} of {} installed packages",
        order.len(),
        packages.len()
    );

    let resolver = FragmentResolver::new(packages, cache);

    let output_key = output_fingerprint(&graph, &order, packages, config)?;
    if let Some(css) = cache.get_output(&output_key) {
        tracing::debug!("serving assembled output from cache");
        return Ok(BundleOutput { css, order });
    }

    let fragments = resolver.resolve_all(&order)?;
    let css = assembler::assemble(&fragments, config.url_style);
    cache.put_output(output_key, css.clone());

    Ok(BundleOutput { css, order })
}

/// Key for the assembled-output cache: graph structure plus the id and CSS
/// content of every ordered package, plus the rendering style. A package
/// without CSS fails here, before the cache is consulted, with the same
/// error resolution itself would raise.
fn output_fingerprint(
    graph: &DependencyGraph,
    order: &[String],
    packages: &[PackageDescriptor],
    config: &BundleConfig,
) -> Result<String> {
    let mut parts: Vec<&str> = Vec::with_capacity(order.len() * 2 + 2);
    let structure = graph.fingerprint();
    parts.push(&structure);
    for id in order {
        let descriptor = packages
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| StylepackError::FragmentNotFound {
                package: id.clone(),
            })?;
        let css = descriptor
            .css
            .as_deref()
            .ok_or_else(|| StylepackError::FragmentNotFound {
                package: id.clone(),
            })?;
        parts.push(id);
        parts.push(css);
    }
    let style = config.url_style.to_string();
    parts.push(&style);
    Ok(utils::content_fingerprint(&parts))
}

/// Copy each ordered package's static assets into `dest/<package-id>/`.
///
/// Only packages that survived filtering into the bundle order are copied;
/// packages without an asset directory are skipped. Returns the number of
/// files copied.
pub fn copy_assets(
    packages: &[PackageDescriptor],
    order: &[String],
    dest: &Path,
) -> Result<usize> {
    let mut copied = 0;
    for id in order {
        let Some(descriptor) = packages.iter().find(|p| &p.id == id) else {
            continue;
        };
        let Some(asset_dir) = descriptor.asset_dir.as_deref() else {
            continue;
        };
        copied += utils::copy_dir_flat(asset_dir, &dest.join(id))?;
    }
    tracing::debug!("copied {copied} asset files to {}", dest.display());
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::UrlStyle;
    use std::collections::BTreeSet;

    fn pkg(id: &str, deps: &[&str]) -> PackageDescriptor {
        PackageDescriptor::new(id)
            .with_dependencies(deps.iter().copied())
            .with_css(format!(
                ".{id} {{ background: url(\"images/{id}.png\"); }}\n"
            ))
    }

    fn time_machine() -> Vec<PackageDescriptor> {
        vec![
            pkg("drums", &[]),
            pkg("calipers", &[]),
            pkg("brakes", &["drums", "calipers"]),
            pkg("delorean", &["brakes", "mr-fusion"]),
            pkg("mr-fusion", &[]),
            pkg("focus", &["brakes"]),
        ]
    }

    fn line_of(css: &str, id: &str) -> usize {
        let selector = format!(".{id} ");
        css.lines().position(|l| l.starts_with(&selector)).unwrap()
    }

    #[test]
    fn test_bundle_orders_rules_by_dependencies() {
        let output = bundle(&time_machine(), &BundleConfig::default()).unwrap();

        assert_eq!(output.css.lines().count(), 6);
        assert!(line_of(&output.css, "drums") < line_of(&output.css, "brakes"));
        assert!(line_of(&output.css, "calipers") < line_of(&output.css, "brakes"));
        assert!(line_of(&output.css, "brakes") < line_of(&output.css, "delorean"));
        assert!(line_of(&output.css, "mr-fusion") < line_of(&output.css, "delorean"));
        assert!(line_of(&output.css, "brakes") < line_of(&output.css, "focus"));
    }

    #[test]
    fn test_bundle_has_no_duplicate_rules() {
        let output = bundle(&time_machine(), &BundleConfig::default()).unwrap();
        for id in ["drums", "calipers", "brakes", "delorean", "mr-fusion", "focus"] {
            let selector = format!(".{id} ");
            let count = output
                .css
                .lines()
                .filter(|l| l.starts_with(&selector))
                .count();
            assert_eq!(count, 1, "rule for '{id}' should appear exactly once");
        }
    }

    #[test]
    fn test_whitelist_omits_packages_without_error() {
        let mut packages = time_machine();
        packages.push(pkg("truck-bed", &[]));
        packages.push(pkg("cowboy-hat", &["truck-bed"]));

        let whitelist: BTreeSet<String> =
            ["delorean", "focus", "brakes", "drums", "calipers", "mr-fusion"]
                .iter()
                .map(|s| s.to_string())
                .collect();
        let config = BundleConfig {
            whitelist: Some(whitelist),
            ..Default::default()
        };

        let output = bundle(&packages, &config).unwrap();
        assert_eq!(output.css.lines().count(), 6);
        assert!(!output.css.contains("truck-bed"));
        assert!(!output.css.contains("cowboy-hat"));
    }

    #[test]
    fn test_cache_transparency() {
        let packages = time_machine();
        let plain = bundle(&packages, &BundleConfig::default()).unwrap();
        let cached = bundle(
            &packages,
            &BundleConfig {
                cached: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(plain.css, cached.css);
        assert_eq!(plain.order, cached.order);
    }

    #[test]
    fn test_shared_cache_serves_repeat_runs_identically() {
        let packages = time_machine();
        let config = BundleConfig {
            cached: true,
            ..Default::default()
        };
        let cache = FragmentCache::new(true);

        let first = bundle_with_cache(&packages, &config, &cache).unwrap();
        let second = bundle_with_cache(&packages, &config, &cache).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_content_change_invalidates_shared_cache() {
        let config = BundleConfig {
            cached: true,
            ..Default::default()
        };
        let cache = FragmentCache::new(true);

        let packages = vec![pkg("drums", &[])];
        let before = bundle_with_cache(&packages, &config, &cache).unwrap();

        let edited = vec![
            PackageDescriptor::new("drums")
                .with_css(".drums { background: url(\"images/drums.gif\"); }\n"),
        ];
        let after = bundle_with_cache(&edited, &config, &cache).unwrap();
        assert_ne!(before.css, after.css);
        assert!(after.css.contains("drums.gif"));
    }

    #[test]
    fn test_cycle_aborts_with_no_output() {
        let packages = vec![pkg("a", &["b"]), pkg("b", &["a"])];
        let err = bundle(&packages, &BundleConfig::default()).unwrap_err();
        assert!(matches!(err, StylepackError::CircularDependency { .. }));
    }

    #[test]
    fn test_missing_fragment_aborts() {
        let packages = vec![
            pkg("drums", &[]),
            PackageDescriptor::new("bare").with_dependencies(["drums"]),
        ];
        let err = bundle(&packages, &BundleConfig::default()).unwrap_err();
        assert!(
            matches!(err, StylepackError::FragmentNotFound { package } if package == "bare")
        );
    }

    #[test]
    fn test_url_style_flows_through_to_output() {
        let packages = vec![pkg("drums", &[])];
        let config = BundleConfig {
            url_style: UrlStyle::Helper,
            ..Default::default()
        };
        let output = bundle(&packages, &config).unwrap();
        assert_eq!(
            output.css,
            ".drums { background: asset-url(\"drums/drums.png\"); }"
        );
    }

    #[test]
    fn test_copy_assets_respects_the_filtered_order() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        let drums_assets = src.path().join("drums-images");
        std::fs::create_dir_all(&drums_assets).unwrap();
        std::fs::write(drums_assets.join("drums.png"), b"png").unwrap();

        let gate_assets = src.path().join("gate-images");
        std::fs::create_dir_all(&gate_assets).unwrap();
        std::fs::write(gate_assets.join("gate.png"), b"png").unwrap();

        let packages = vec![
            pkg("drums", &[]).with_asset_dir(&drums_assets),
            pkg("gate", &[]).with_asset_dir(&gate_assets),
        ];
        // gate filtered out of the order
        let order = vec!["drums".to_string()];

        let copied = copy_assets(&packages, &order, dest.path()).unwrap();
        assert_eq!(copied, 1);
        assert!(dest.path().join("drums").join("drums.png").is_file());
        assert!(!dest.path().join("gate").exists());
    }
}

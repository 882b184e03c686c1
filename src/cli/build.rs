//! The `build` command: discover, bundle, write, copy.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::assembler::UrlStyle;
use crate::bundle;
use crate::config::BundleConfig;
use crate::manifest;

/// Bundle package CSS in dependency order and copy static assets.
#[derive(Args, Debug)]
pub struct BuildCommand {
    /// Directory containing the installed packages.
    #[arg(short, long)]
    packages: PathBuf,

    /// Path to write the bundled stylesheet to.
    #[arg(short, long)]
    out: PathBuf,

    /// Directory to copy package assets into (skipped when omitted).
    #[arg(short, long)]
    asset_dir: Option<PathBuf>,

    /// Optional configuration file; flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated package whitelist.
    #[arg(short, long, value_delimiter = ',')]
    whitelist: Vec<String>,

    /// Enable fragment and output caching.
    #[arg(long)]
    cached: bool,

    /// URL reference style: 'literal' or 'helper'.
    #[arg(long)]
    url_style: Option<UrlStyle>,
}

impl BuildCommand {
    /// Execute the build.
    pub fn execute(self) -> Result<()> {
        let config = self.effective_config()?;

        let packages = manifest::discover_packages(&self.packages).with_context(|| {
            format!("failed to discover packages under {}", self.packages.display())
        })?;

        let output = bundle::bundle(&packages, &config)
            .context("failed to assemble the stylesheet")?;

        if let Some(parent) = self.out.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.out, &output.css)
            .with_context(|| format!("failed to write {}", self.out.display()))?;

        if let Some(asset_dir) = &self.asset_dir {
            let copied = bundle::copy_assets(&packages, &output.order, asset_dir)
                .with_context(|| format!("failed to copy assets to {}", asset_dir.display()))?;
            tracing::info!("copied {copied} asset files");
        }

        println!(
            "{} {} packages into {}",
            "Bundled".green().bold(),
            output.order.len(),
            self.out.display()
        );
        Ok(())
    }

    /// Merge the optional config file with CLI flags; flags win.
    fn effective_config(&self) -> Result<BundleConfig> {
        let mut config = match &self.config {
            Some(path) => BundleConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => BundleConfig::default(),
        };
        if self.cached {
            config.cached = true;
        }
        if let Some(style) = self.url_style {
            config.url_style = style;
        }
        if !self.whitelist.is_empty() {
            config.whitelist = Some(self.whitelist.iter().cloned().collect::<BTreeSet<_>>());
        }
        Ok(config)
    }
}

//! Final stylesheet assembly and URL-reference rendering.
//!
//! Fragments arrive already deduplicated and in dependency order; assembly is
//! a plain join with a single line break and no trailing transformation. The
//! one piece of text processing that happens here is background-URL
//! rewriting: every `url(...)` reference in a rule is repointed at the copied
//! asset location `<package>/<file>` and rendered in the configured reference
//! style.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Deserialize;

use crate::core::CssFragment;

/// Matches a CSS url reference, capturing the raw target between the parens.
static URL_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)url\(([^)]*)\)").unwrap());

/// How rewritten asset references are rendered in the output stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlStyle {
    /// Literal CSS: `url("pkg/file.png")`.
    #[default]
    Literal,
    /// Build-tool helper template: `asset-url("pkg/file.png")`.
    Helper,
}

impl UrlStyle {
    fn function_name(self) -> &'static str {
        match self {
            Self::Literal => "url",
            Self::Helper => "asset-url",
        }
    }
}

impl FromStr for UrlStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "literal" => Ok(Self::Literal),
            "helper" => Ok(Self::Helper),
            other => Err(format!(
                "unknown url style '{other}' (expected 'literal' or 'helper')"
            )),
        }
    }
}

impl fmt::Display for UrlStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Literal => "literal",
            Self::Helper => "helper",
        })
    }
}

/// Concatenate ordered fragments into the final stylesheet text.
///
/// One rule per line, single `\n` separators, nothing appended after the last
/// rule. No deduplication happens here: the orderer guarantees each package
/// appears exactly once and the assembler trusts that invariant.
pub fn assemble(fragments: &[CssFragment], style: UrlStyle) -> String {
    fragments
        .iter()
        .map(|fragment| render_rule(fragment, style))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one rule, rewriting each url reference to the copied asset path.
fn render_rule(fragment: &CssFragment, style: UrlStyle) -> String {
    URL_REFERENCE
        .replace_all(&fragment.rule, |caps: &Captures| {
            let target = caps[1].trim().trim_matches(|c| c == '"' || c == '\'');
            let file = target.rsplit(['/', '\\']).next().unwrap_or_default();
            if file.is_empty() {
                // Malformed reference, leave it untouched
                return caps[0].to_string();
            }
            format!("{}(\"{}/{}\")", style.function_name(), fragment.package, file)
        })
        .into_owned()
}

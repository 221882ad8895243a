//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a `config.toml` in the content root overrides them.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml              # Site config (overrides stock defaults)
//! ├── articles/
//! └── weeknotes/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Tom Ward's Blog"
//! url = "https://tomafro.net"          # Absolute; feed links are built on it
//! description = "Notes, weeknotes and projects."
//! language = "en-gb"
//!
//! [build]
//! include_drafts = false               # Also publish draft entries
//! sitemap = true                       # Write sitemap.xml
//!
//! [sections.home]                      # One table per navigation section:
//! name = "Home"                        #   home, about, articles, weeknotes,
//! url = "/"                            #   projects, scraps, stream
//! enabled = true
//!
//! [feeds.weeknotes]                    # Feeds: weeknotes, posts
//! enabled = true
//! path = "weeknotes/rss.xml"
//! title = "Tom Ward's Blog - Weeknotes"
//! description = "My Weeknotes. Unlikely to be weekly."
//! stylesheet = "/pretty-feed-v3.xsl"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [sections.stream]
//! enabled = true
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::{Kind, NavItem};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity, used in page titles and feed channels.
    pub site: SiteInfo,
    /// Build behaviour.
    pub build: BuildConfig,
    /// Navigation sections and their listing pages.
    pub sections: SectionsConfig,
    /// RSS feeds.
    pub feeds: FeedsConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.site.url.as_str();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::Validation(
                "site.url must be an absolute http(s) URL".into(),
            ));
        }
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation("site.title must not be empty".into()));
        }

        for (key, section) in self.sections.named() {
            if !section.url.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "sections.{key}.url must start with '/'"
                )));
            }
            if section.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "sections.{key}.name must not be empty"
                )));
            }
        }

        for (key, feed) in self.feeds.named() {
            if !feed.path.ends_with(".xml") || feed.output_path().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "feeds.{key}.path must name an .xml file"
                )));
            }
        }
        let [(_, weeknotes), (_, posts)] = self.feeds.named();
        if weeknotes.enabled && posts.enabled && weeknotes.output_path() == posts.output_path() {
            return Err(ConfigError::Validation(
                "feeds.weeknotes.path and feeds.posts.path must differ".into(),
            ));
        }
        Ok(())
    }

    /// `site.url` without a trailing slash, ready to prefix a path.
    pub fn base_url(&self) -> &str {
        self.site.url.trim_end_matches('/')
    }
}

/// Site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Site title, shown in the header and used as the posts feed title.
    pub title: String,
    /// Absolute URL the site is served from.
    pub url: String,
    /// Short description for the home page and posts feed.
    pub description: String,
    /// Language tag for `<html lang>` and feed channels.
    pub language: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Tom Ward's Blog".to_string(),
            url: "https://tomafro.net".to_string(),
            description: "Notes, weeknotes and projects.".to_string(),
            language: "en-gb".to_string(),
        }
    }
}

/// Build behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Publish draft entries too. Feeds and the sitemap never include drafts.
    pub include_drafts: bool,
    /// Write `sitemap.xml` listing every published page.
    pub sitemap: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            include_drafts: false,
            sitemap: true,
        }
    }
}

/// One navigation section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    /// Link text.
    pub name: String,
    /// Root-relative URL of the section's listing page.
    pub url: String,
    /// Disabled sections get neither a nav link nor a listing page.
    pub enabled: bool,
}

impl Section {
    fn new(name: &str, url: &str, enabled: bool) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            enabled,
        }
    }
}

/// Navigation sections, in nav order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionsConfig {
    pub home: Section,
    /// Rendered from `about.md` at the content root.
    pub about: Section,
    pub articles: Section,
    pub weeknotes: Section,
    pub projects: Section,
    pub scraps: Section,
    pub stream: Section,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            home: Section::new("Home", "/", true),
            about: Section::new("About", "/about", true),
            articles: Section::new("Articles", "/articles", true),
            weeknotes: Section::new("Weeknotes", "/weeknotes", true),
            projects: Section::new("Projects", "/projects", true),
            scraps: Section::new("Scraps", "/scraps", false),
            stream: Section::new("Stream", "/stream", false),
        }
    }
}

impl SectionsConfig {
    /// Every section with its config key, in nav order.
    pub fn named(&self) -> [(&'static str, &Section); 7] {
        [
            ("home", &self.home),
            ("about", &self.about),
            ("articles", &self.articles),
            ("weeknotes", &self.weeknotes),
            ("projects", &self.projects),
            ("scraps", &self.scraps),
            ("stream", &self.stream),
        ]
    }

    /// The section listing a kind.
    pub fn for_kind(&self, kind: Kind) -> &Section {
        match kind {
            Kind::Articles => &self.articles,
            Kind::Weeknotes => &self.weeknotes,
            Kind::Projects => &self.projects,
            Kind::Scraps => &self.scraps,
            Kind::Stream => &self.stream,
        }
    }

    /// Navigation links for enabled sections.
    pub fn nav(&self) -> Vec<NavItem> {
        self.named()
            .into_iter()
            .filter(|(_, s)| s.enabled)
            .map(|(_, s)| NavItem {
                name: s.name.clone(),
                url: s.url.clone(),
            })
            .collect()
    }
}

/// One RSS feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub enabled: bool,
    /// Output path relative to the output directory.
    pub path: String,
    /// Channel title.
    pub title: String,
    /// Channel description.
    pub description: String,
    /// Root-relative XSL stylesheet for browsers; omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "rss.xml".to_string(),
            title: SiteInfo::default().title,
            description: SiteInfo::default().description,
            stylesheet: None,
        }
    }
}

impl FeedConfig {
    /// `path` with any leading `/` removed.
    pub fn output_path(&self) -> &str {
        self.path.trim_start_matches('/')
    }

    /// Root-relative URL of the feed.
    pub fn url(&self) -> String {
        format!("/{}", self.output_path())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedsConfig {
    /// Weeknotes only.
    pub weeknotes: FeedConfig,
    /// Weeknotes and articles.
    pub posts: FeedConfig,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            weeknotes: FeedConfig {
                path: "weeknotes/rss.xml".to_string(),
                title: "Tom Ward's Blog - Weeknotes".to_string(),
                description: "My Weeknotes. Unlikely to be weekly.".to_string(),
                stylesheet: Some("/pretty-feed-v3.xsl".to_string()),
                ..FeedConfig::default()
            },
            posts: FeedConfig::default(),
        }
    }
}

impl FeedsConfig {
    pub fn named(&self) -> [(&'static str, &FeedConfig); 2] {
        [("weeknotes", &self.weeknotes), ("posts", &self.posts)]
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Site Configuration
# ==================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the content root: content/config.toml
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
title = "Tom Ward's Blog"

# Absolute URL the site is served from. Feed links are built on it.
url = "https://tomafro.net"

description = "Notes, weeknotes and projects."

# Language tag for <html lang> and feed channels.
language = "en-gb"

# ---------------------------------------------------------------------------
# Build
# ---------------------------------------------------------------------------
[build]
# Publish draft entries as pages too. Feeds and the sitemap never include drafts.
include_drafts = false

# Write sitemap.xml with the absolute URL of every published page.
sitemap = true

# ---------------------------------------------------------------------------
# Navigation sections
# ---------------------------------------------------------------------------
# Each section is a nav link plus a listing page at its url.
# Disabled sections get neither.
[sections.home]
name = "Home"
url = "/"
enabled = true

# Rendered from about.md at the content root; skipped if there is none.
[sections.about]
name = "About"
url = "/about"
enabled = true

[sections.articles]
name = "Articles"
url = "/articles"
enabled = true

[sections.weeknotes]
name = "Weeknotes"
url = "/weeknotes"
enabled = true

[sections.projects]
name = "Projects"
url = "/projects"
enabled = true

[sections.scraps]
name = "Scraps"
url = "/scraps"
enabled = false

[sections.stream]
name = "Stream"
url = "/stream"
enabled = false

# ---------------------------------------------------------------------------
# Feeds
# ---------------------------------------------------------------------------
# Feeds list published entries, most recent first.
# path is relative to the output directory.
[feeds.weeknotes]
enabled = true
path = "weeknotes/rss.xml"
title = "Tom Ward's Blog - Weeknotes"
description = "My Weeknotes. Unlikely to be weekly."
# XSL stylesheet for viewing the feed in a browser. Omit for none.
stylesheet = "/pretty-feed-v3.xsl"

# Weeknotes and articles together.
[feeds.posts]
enabled = true
path = "rss.xml"
title = "Tom Ward's Blog"
description = "Notes, weeknotes and projects."
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn overlay(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn default_config_is_valid() {
        SiteConfig::default().validate().unwrap();
    }

    #[test]
    fn default_feeds() {
        let config = SiteConfig::default();
        assert_eq!(config.feeds.weeknotes.path, "weeknotes/rss.xml");
        assert_eq!(config.feeds.weeknotes.title, "Tom Ward's Blog - Weeknotes");
        assert_eq!(
            config.feeds.weeknotes.stylesheet.as_deref(),
            Some("/pretty-feed-v3.xsl")
        );
        assert_eq!(config.feeds.posts.path, "rss.xml");
        assert_eq!(config.feeds.posts.stylesheet, None);
    }

    #[test]
    fn default_nav_skips_disabled_sections() {
        let nav = SiteConfig::default().sections.nav();
        let names: Vec<&str> = nav.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Home", "About", "Articles", "Weeknotes", "Projects"]
        );
    }

    #[test]
    fn section_for_kind() {
        let sections = SectionsConfig::default();
        assert_eq!(sections.for_kind(Kind::Weeknotes).url, "/weeknotes");
        assert!(!sections.for_kind(Kind::Stream).enabled);
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let mut config = SiteConfig::default();
        config.site.url = "https://example.com/".into();
        assert_eq!(config.base_url(), "https://example.com");
    }

    #[test]
    fn feed_url_is_root_relative() {
        let mut feed = FeedConfig::default();
        assert_eq!(feed.url(), "/rss.xml");
        feed.path = "/feeds/all.xml".into();
        assert_eq!(feed.output_path(), "feeds/all.xml");
        assert_eq!(feed.url(), "/feeds/all.xml");
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str(
            r#"
[site]
title = "Elsewhere"
"#,
        )
        .unwrap();
        assert_eq!(config.site.title, "Elsewhere");
        assert_eq!(config.site.language, "en-gb");
        assert!(config.sections.home.enabled);
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
[site]
titel = "Typo"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
[sections.contact]
name = "Contact"
url = "/contact"
enabled = true
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn about_section_can_be_moved_or_disabled() {
        let config = resolve_config(
            stock_defaults_value(),
            Some(overlay("[sections.about]\nurl = \"/me\"\n[build]\nsitemap = false")),
        )
        .unwrap();
        assert_eq!(config.sections.about.url, "/me");
        assert_eq!(config.sections.about.name, "About");
        assert!(!config.build.sitemap);

        let config = resolve_config(
            stock_defaults_value(),
            Some(overlay("[sections.about]\nenabled = false")),
        )
        .unwrap();
        assert!(config.sections.nav().iter().all(|n| n.name != "About"));
    }

    // =========================================================================
    // merge_toml
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let merged = merge_toml(overlay("a = 1\nb = 2"), overlay("b = 3"));
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(1));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base = stock_defaults_value();
        let merged = merge_toml(base, overlay("[sections.stream]\nenabled = true"));
        let stream = merged.get("sections").unwrap().get("stream").unwrap();
        assert_eq!(stream.get("enabled").unwrap().as_bool(), Some(true));
        assert_eq!(stream.get("name").unwrap().as_str(), Some("Stream"));
    }

    // =========================================================================
    // resolve_config / validate
    // =========================================================================

    #[test]
    fn resolve_config_with_no_overlay() {
        let config = resolve_config(stock_defaults_value(), None).unwrap();
        assert_eq!(config.site.url, "https://tomafro.net");
        assert!(!config.build.include_drafts);
        assert!(config.build.sitemap);
    }

    #[test]
    fn resolve_config_with_overlay() {
        let config = resolve_config(
            stock_defaults_value(),
            Some(overlay("[build]\ninclude_drafts = true\n[feeds.posts]\nenabled = false")),
        )
        .unwrap();
        assert!(config.build.include_drafts);
        assert!(!config.feeds.posts.enabled);
        assert_eq!(config.feeds.posts.path, "rss.xml");
        assert!(config.feeds.weeknotes.enabled);
    }

    #[test]
    fn overlay_sets_optional_stylesheet() {
        let config = resolve_config(
            stock_defaults_value(),
            Some(overlay("[feeds.posts]\nstylesheet = \"/feed.xsl\"")),
        )
        .unwrap();
        assert_eq!(config.feeds.posts.stylesheet.as_deref(), Some("/feed.xsl"));
        assert_eq!(
            config.feeds.weeknotes.stylesheet.as_deref(),
            Some("/pretty-feed-v3.xsl")
        );
    }

    #[test]
    fn relative_site_url_rejected() {
        let result = resolve_config(
            stock_defaults_value(),
            Some(overlay("[site]\nurl = \"tomafro.net\"")),
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn section_url_must_be_root_relative() {
        let result = resolve_config(
            stock_defaults_value(),
            Some(overlay("[sections.articles]\nurl = \"articles\"")),
        );
        assert!(matches!(result, Err(ConfigError::Validation(m)) if m.contains("sections.articles")));
    }

    #[test]
    fn feed_path_must_be_xml() {
        let result = resolve_config(
            stock_defaults_value(),
            Some(overlay("[feeds.weeknotes]\npath = \"weeknotes/feed\"")),
        );
        assert!(matches!(result, Err(ConfigError::Validation(m)) if m.contains("feeds.weeknotes")));
    }

    #[test]
    fn feed_paths_must_differ_when_both_enabled() {
        let clash = "[feeds.weeknotes]\npath = \"/rss.xml\"";
        let result = resolve_config(stock_defaults_value(), Some(overlay(clash)));
        assert!(matches!(result, Err(ConfigError::Validation(_))));

        let disabled = format!("{clash}\n[feeds.posts]\nenabled = false");
        assert!(resolve_config(stock_defaults_value(), Some(overlay(&disabled))).is_ok());
    }

    // =========================================================================
    // load_config
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        assert!(load_raw_config(tmp.path()).unwrap().is_none());
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Tom Ward's Blog");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[site]\ntitle = \"Test Site\"\nurl = \"https://example.com\"\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Test Site");
        assert_eq!(config.base_url(), "https://example.com");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[site\n").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[build]\ndrafts = true\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    // =========================================================================
    // stock_config_toml
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site.title, defaults.site.title);
        assert_eq!(config.site.url, defaults.site.url);
        assert_eq!(config.sections.nav(), defaults.sections.nav());
        assert_eq!(config.feeds.weeknotes.path, defaults.feeds.weeknotes.path);
        assert_eq!(
            config.feeds.weeknotes.stylesheet,
            defaults.feeds.weeknotes.stylesheet
        );
        assert_eq!(config.feeds.posts.title, defaults.feeds.posts.title);
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in [
            "[site]",
            "[build]",
            "[sections.home]",
            "[sections.stream]",
            "[feeds.weeknotes]",
            "[feeds.posts]",
        ] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        for key in ["site", "build", "sections", "feeds"] {
            assert!(val.get(key).is_some(), "missing {key}");
        }
    }
}

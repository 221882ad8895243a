//! HTML site generation.
//!
//! Takes the loaded [`Site`] and writes the final static site: one page per
//! entry, a listing page per enabled section, and the RSS feeds.
//!
//! ## Generated Pages
//!
//! - **Entry pages** (`<path>.html`): one per static path of every kind
//! - **Home page** (`/index.html`): posts, most recent first
//! - **About page** (`/about.html`): `about.md` from the content root
//! - **Section pages** (`/articles.html`, ...): one listing per enabled section
//! - **Feeds** (`/rss.xml`, `/weeknotes/rss.xml`): published entries only
//! - **Sitemap** (`/sitemap.xml`): every published page
//!
//! ## Output Structure
//!
//! Paths are written as files, not directories: `/2024/03/hello-world`
//! becomes `2024/03/hello-world.html`.
//!
//! ```text
//! dist/
//! ├── index.html                 # Home
//! ├── about.html                 # About page
//! ├── sitemap.xml
//! ├── articles.html              # Section listing
//! ├── rss.xml                    # Posts feed
//! ├── 2024/
//! │   └── 03/
//! │       └── hello-world.html   # Article
//! ├── weeknotes.html
//! ├── weeknotes/
//! │   ├── 42.html                # Weeknote
//! │   └── rss.xml                # Weeknotes feed
//! └── projects/
//!     └── dotfiles.html
//! ```
//!
//! ## CSS
//!
//! `static/style.css` is embedded at compile time and inlined in every page.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. Entry pages
//! render in parallel on rayon's pool.

use crate::collection::Collection;
use crate::config::{Section, SiteConfig};
use crate::entry::{AnyEntry, Entry};
use crate::feed::{self, FeedError};
use crate::record::Page;
use crate::site::Site;
use crate::sitemap::{SITEMAP_FILE, Sitemap};
use crate::types::{Kind, NavItem};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),
    #[error("{first} and {second} both write {file}")]
    Conflict {
        file: PathBuf,
        first: String,
        second: String,
    },
}

/// What a build wrote, as paths relative to the output directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    pub pages: Vec<PathBuf>,
    pub feeds: Vec<PathBuf>,
    pub sitemap: Option<PathBuf>,
}

/// A rendered page waiting to be written.
struct PendingPage {
    /// Root-relative URL path.
    url: String,
    html: String,
    /// Drafts are written with `include_drafts` but never listed in the sitemap.
    draft: bool,
    lastmod: Option<DateTime<Utc>>,
}

impl PendingPage {
    fn new(url: &str, html: Markup) -> Self {
        Self {
            url: url.to_string(),
            html: html.into_string(),
            draft: false,
            lastmod: None,
        }
    }
}

/// Shared page chrome.
struct Layout<'a> {
    config: &'a SiteConfig,
    nav: Vec<NavItem>,
}

const CSS: &str = include_str!("../static/style.css");

pub fn generate(
    site: &Site,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let pages_site = if config.build.include_drafts {
        site.clone()
    } else {
        site.published()
    };
    let mut nav = config.sections.nav();
    if site.about.is_none() {
        nav.retain(|item| item.url != config.sections.about.url);
    }
    let layout = Layout { config, nav };

    let entries = pages_site.all().static_paths();
    let mut pages: Vec<PendingPage> = entries
        .par_iter()
        .map(|static_path| {
            let entry = &static_path.props;
            PendingPage {
                url: entry.path(),
                html: render_entry_page(entry, &layout).into_string(),
                draft: entry.is_draft(),
                lastmod: entry.date(),
            }
        })
        .collect();

    let sections = &config.sections;
    if sections.home.enabled {
        pages.push(PendingPage::new(
            &sections.home.url,
            render_home(&pages_site.posts(), &layout),
        ));
    }
    if sections.about.enabled {
        match &site.about {
            Some(about) => pages.push(PendingPage::new(
                &sections.about.url,
                render_about(about, &sections.about, &layout),
            )),
            None => warn!("sections.about is enabled but there is no about.md; skipping"),
        }
    }
    for kind in Kind::ALL {
        let section = sections.for_kind(kind);
        if section.enabled {
            pages.push(PendingPage::new(
                &section.url,
                render_listing(section, kind, &pages_site.of_kind(kind), &layout),
            ));
        }
    }

    let files = check_conflicts(&pages)?;

    fs::create_dir_all(output_dir)?;
    let mut report = GenerateReport {
        output_dir: output_dir.to_path_buf(),
        ..GenerateReport::default()
    };
    for (page, file) in pages.iter().zip(files) {
        write_file(output_dir, &file, &page.html)?;
        debug!("Generated {}", file.display());
        report.pages.push(file);
    }

    // Feeds read the full site; drafts are dropped there regardless of config.
    let feeds = [
        (&config.feeds.weeknotes, site.weeknotes.clone().into_any()),
        (&config.feeds.posts, site.posts()),
    ];
    for (feed_config, entries) in feeds {
        if !feed_config.enabled {
            continue;
        }
        let xml = feed::build_feed(&entries, feed_config, config)?;
        let file = PathBuf::from(feed_config.output_path());
        write_file(output_dir, &file, &xml)?;
        debug!("Generated {}", file.display());
        report.feeds.push(file);
    }

    if config.build.sitemap {
        let mut sitemap = Sitemap::new();
        for page in pages.iter().filter(|p| !p.draft) {
            sitemap.push(config.base_url(), &page.url, page.lastmod);
        }
        let file = PathBuf::from(SITEMAP_FILE);
        write_file(output_dir, &file, &sitemap.to_xml())?;
        debug!("Generated {} ({} urls)", file.display(), sitemap.len());
        report.sitemap = Some(file);
    }

    report.pages.sort();
    info!(
        "Site generated at {} ({} pages, {} feeds)",
        output_dir.display(),
        report.pages.len(),
        report.feeds.len()
    );
    Ok(report)
}

/// Output file for a root-relative URL path.
///
/// - `/` → `index.html`
/// - `/2024/03/hello` → `2024/03/hello.html`
/// - `/notes/` → `notes/index.html`
pub fn output_file(url_path: &str) -> PathBuf {
    let trimmed = url_path.trim_matches('/');
    if trimmed.is_empty() {
        PathBuf::from("index.html")
    } else if url_path.ends_with('/') {
        PathBuf::from(trimmed).join("index.html")
    } else {
        PathBuf::from(format!("{trimmed}.html"))
    }
}

/// Map every page to its file, failing if two pages share one.
fn check_conflicts(pages: &[PendingPage]) -> Result<Vec<PathBuf>, GenerateError> {
    let mut seen: HashMap<PathBuf, &str> = HashMap::with_capacity(pages.len());
    let mut files = Vec::with_capacity(pages.len());
    for page in pages {
        let file = output_file(&page.url);
        if let Some(first) = seen.insert(file.clone(), &page.url) {
            return Err(GenerateError::Conflict {
                file,
                first: first.to_string(),
                second: page.url.clone(),
            });
        }
        files.push(file);
    }
    Ok(files)
}

fn write_file(output_dir: &Path, file: &Path, contents: &str) -> std::io::Result<()> {
    let path = output_dir.join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, layout: &Layout, current: &str, content: Markup) -> Markup {
    let config = layout.config;
    let full_title = if title == config.site.title {
        title.to_string()
    } else {
        format!("{} - {}", title, config.site.title)
    };
    html! {
        (DOCTYPE)
        html lang=(config.site.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (full_title) }
                @for (_, feed) in config.feeds.named() {
                    @if feed.enabled {
                        link rel="alternate" type="application/rss+xml" title=(feed.title) href=(feed.url());
                    }
                }
                style { (PreEscaped(CSS)) }
            }
            body {
                (site_header(config, &layout.nav, current))
                main { (content) }
                footer.site-footer {
                    (config.site.title)
                }
            }
        }
    }
}

/// Renders the site header with title link and navigation
fn site_header(config: &SiteConfig, nav: &[NavItem], current: &str) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (config.site.title) }
            nav.site-nav {
                (render_nav(nav, current))
            }
        }
    }
}

/// Renders the navigation links, marking the current section
pub fn render_nav(items: &[NavItem], current: &str) -> Markup {
    html! {
        ul {
            @for item in items {
                @let is_current = item.url == current;
                li class=[is_current.then_some("current")] {
                    a href=(item.url) { (item.name) }
                }
            }
        }
    }
}

fn render_date(date: DateTime<Utc>) -> Markup {
    html! {
        time datetime=(date.format("%Y-%m-%d").to_string()) { (date.format("%-d %B %Y").to_string()) }
    }
}

fn render_entry_list(entries: &Collection<AnyEntry>) -> Markup {
    html! {
        ul.entry-list {
            @for entry in entries {
                li {
                    @if let Some(date) = entry.date() {
                        (render_date(date))
                    }
                    a href=(entry.path()) { (entry.list_title()) }
                    @if entry.is_draft() {
                        span.draft { "Draft" }
                    }
                    @if let Some(description) = entry.description() {
                        span.description { (description) }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders one entry's own page
fn render_entry_page(entry: &AnyEntry, layout: &Layout) -> Markup {
    let rendered = entry.render();
    let tags = entry.tags();
    let current = &layout.config.sections.for_kind(entry.kind()).url;

    let content = html! {
        article class={ "entry " (entry.kind().as_str()) } {
            header {
                @if let Some(title) = entry.display_title() {
                    h1 { (title) }
                }
                @if let Some(date) = entry.date() {
                    (render_date(date))
                }
                @if entry.is_draft() {
                    span.draft { "Draft" }
                }
            }
            @if rendered.headings.len() >= 2 {
                nav.toc {
                    ol {
                        @for heading in &rendered.headings {
                            li class={ "depth-" (heading.depth) } {
                                a href={ "#" (heading.slug) } { (heading.text) }
                            }
                        }
                    }
                }
            }
            div.entry-body {
                (PreEscaped(&rendered.html))
            }
            @if let AnyEntry::Project(project) = entry {
                @if !project.is_private() {
                    p.project-link {
                        a href=(project.url()) rel="noopener" { "Visit " (project.title()) }
                    }
                }
            }
            @if !tags.is_empty() {
                ul.tags {
                    @for tag in &tags {
                        li { (tag) }
                    }
                }
            }
        }
    };

    base_document(&entry.list_title(), layout, current, content)
}

/// Renders the home page: site description plus every post
fn render_home(posts: &Collection<AnyEntry>, layout: &Layout) -> Markup {
    let config = layout.config;
    let content = html! {
        section.home {
            p.intro { (config.site.description) }
            (render_entry_list(&posts.by_most_recent()))
        }
    };
    base_document(&config.site.title, layout, &config.sections.home.url, content)
}

/// Renders a standalone page under its section. The page's own title wins
/// over the section name.
fn render_about(page: &Page, section: &Section, layout: &Layout) -> Markup {
    let rendered = page.render();
    let title = page.title().unwrap_or(&section.name);
    let content = html! {
        article class={ "page " (page.name) } {
            header {
                h1 { (title) }
            }
            div.entry-body {
                (PreEscaped(&rendered.html))
            }
        }
    };
    base_document(title, layout, &section.url, content)
}

/// Renders a section listing. Projects, having no dates, list by title.
fn render_listing(
    section: &Section,
    kind: Kind,
    entries: &Collection<AnyEntry>,
    layout: &Layout,
) -> Markup {
    let ordered = match kind {
        Kind::Projects => entries.sort_by(|e| e.title().to_lowercase()),
        _ => entries.by_most_recent(),
    };
    let feed_url = (kind == Kind::Weeknotes && layout.config.feeds.weeknotes.enabled)
        .then(|| layout.config.feeds.weeknotes.url());

    let content = html! {
        section class={ "listing " (kind.as_str()) } {
            h1 { (section.name) }
            @if let Some(href) = feed_url {
                p { a href=(href) { "RSS" } }
            }
            (render_entry_list(&ordered))
        }
    };
    base_document(&section.name, layout, &section.url, content)
}

// ============================================================================
// Tests
// ============================================================================

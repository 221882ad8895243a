//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every entry leads
//! with its positional index, title and public path; the content file it came
//! from is secondary context on an indented `Source:` line. The output reads
//! as a content inventory while still letting users trace an entry back to
//! its file.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Articles (2)
//!     001 Hello world → /2024/03/hello-world
//!         Source: articles/2024-03-02-hello-world.md
//!     002 Half finished → /2023/06/half-finished
//!         Source: articles/2023-06-01-half-finished.md
//!         Draft
//! Weeknotes (1)
//!     001 Week 42: Ship it → /weeknotes/42
//!         Source: weeknotes/42.md
//!
//! 3 entries, 1 draft
//! ```
//!
//! ## Build
//!
//! ```text
//! Pages
//!     2024/03/hello-world.html
//!     index.html
//! Feeds
//!     rss.xml
//! Sitemap
//!     sitemap.xml
//!
//! Generated 2 pages, 1 feed in dist
//! ```
//!
//! ## Routes
//!
//! A JSON array, one object per static path:
//!
//! ```text
//! [{"kind": "articles", "path": "/2024/03/hello-world",
//!   "params": {"slug": "hello-world", "year": 2024, "month": "03"}}]
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>` or a
//! `String`) for testability and a `print_*` wrapper that writes to stdout.
//! Format functions are pure — no I/O, no side effects.

use crate::entry::{AnyEntry, Entry, RouteParams};
use crate::generate::GenerateReport;
use crate::site::Site;
use crate::types::Kind;
use serde::Serialize;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

/// Entry header: index, display title, public path.
///
/// ```text
/// 001 Week 42: Ship it → /weeknotes/42
/// ```
fn entry_line(index: usize, entry: &AnyEntry) -> String {
    format!(
        "{} {} \u{2192} {}",
        format_index(index),
        entry.list_title(),
        entry.path()
    )
}

// ============================================================================
// Check
// ============================================================================

/// Format the content inventory of a loaded site, kind by kind.
///
/// Empty kinds are skipped. Drafts are listed with a `Draft` context line.
pub fn format_load_output(site: &Site) -> Vec<String> {
    let mut lines = Vec::new();
    let mut total = 0;
    let mut drafts = 0;

    for kind in Kind::ALL {
        let entries = site.of_kind(kind);
        if entries.is_empty() {
            continue;
        }
        lines.push(format!("{} ({})", kind.label(), entries.len()));
        for (i, entry) in entries.iter().enumerate() {
            lines.push(format!("{}{}", indent(1), entry_line(i + 1, entry)));
            lines.push(format!(
                "{}Source: {}",
                indent(2),
                entry.record().source.display()
            ));
            if let Some(desc) = entry.description() {
                let preview = truncate_desc(desc.trim(), 60);
                if !preview.is_empty() {
                    lines.push(format!("{}{}", indent(2), preview));
                }
            }
            if entry.is_draft() {
                lines.push(format!("{}Draft", indent(2)));
                drafts += 1;
            }
            total += 1;
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{}, {}",
        plural(total, "entry", "entries"),
        plural(drafts, "draft", "drafts")
    ));
    lines
}

/// Print check output to stdout.
pub fn print_load_output(site: &Site) {
    for line in format_load_output(site) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format what a build wrote.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Pages".to_string());
    for page in &report.pages {
        lines.push(format!("{}{}", indent(1), page.display()));
    }
    if !report.feeds.is_empty() {
        lines.push("Feeds".to_string());
        for feed in &report.feeds {
            lines.push(format!("{}{}", indent(1), feed.display()));
        }
    }
    if let Some(sitemap) = &report.sitemap {
        lines.push("Sitemap".to_string());
        lines.push(format!("{}{}", indent(1), sitemap.display()));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {} in {}",
        plural(report.pages.len(), "page", "pages"),
        plural(report.feeds.len(), "feed", "feeds"),
        report.output_dir.display()
    ));
    lines
}

/// Print build output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Routes
// ============================================================================

#[derive(Debug, Serialize)]
struct Route {
    kind: Kind,
    path: String,
    params: RouteParams,
}

/// The static-path manifest as pretty-printed JSON.
pub fn format_routes(site: &Site) -> Result<String, serde_json::Error> {
    let routes: Vec<Route> = site
        .all()
        .static_paths()
        .into_iter()
        .map(|static_path| Route {
            kind: static_path.props.kind(),
            path: static_path.props.path(),
            params: static_path.params,
        })
        .collect();
    serde_json::to_string_pretty(&routes)
}

/// Print the route manifest to stdout.
pub fn print_routes(site: &Site) -> Result<(), serde_json::Error> {
    println!("{}", format_routes(site)?);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

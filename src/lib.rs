//! # Tomafro Site
//!
//! The content layer of a personal website: blog articles, weeknotes,
//! projects, and short scrap and stream posts, each kept as a directory of
//! Markdown files with YAML front matter. Content is loaded into typed,
//! ordered collections, then turned into static pages and RSS feeds.
//!
//! # Architecture: Records, Entries, Collections
//!
//! ```text
//! 1. Load      content/<kind>/*.md  →  RawRecord        (front matter + body)
//! 2. Wrap      RawRecord            →  Article, ...     (validated, derived fields)
//! 3. Collect   entries              →  Collection<T>    (sort, filter, route)
//! 4. Generate  Site                 →  dist/            (HTML pages, feeds, sitemap)
//! ```
//!
//! Records are immutable once loaded. Entry wrappers share them behind an
//! `Arc` and parse everything they derive (slug dates, week numbers) at
//! construction, so every accessor after that is infallible and a collection
//! view never copies content.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Slug conventions: `YYYY-MM-DD-rest` dates, weeknote numbers |
//! | [`record`] | Raw records and standalone pages, front matter, Markdown rendering |
//! | [`entry`] | One wrapper per kind plus the closed [`entry::AnyEntry`] sum |
//! | [`collection`] | Ordered collections and their views (`by_most_recent`, `where_published`) |
//! | [`source`] | The [`source::ContentSource`] seam and the filesystem loader |
//! | [`site`] | Every kind loaded concurrently, and the mixed `posts` view |
//! | [`feed`] | RSS feeds for weeknotes and posts |
//! | [`sitemap`] | `sitemap.xml` of every published page |
//! | [`generate`] | Static HTML pages using Maud |
//! | [`config`] | `config.toml` loading, validation and merging |
//! | [`types`] | Shared types (`Kind`, `NavItem`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## A Closed Set of Kinds
//!
//! The five kinds are an enum, not a plugin point. Each has its own wrapper
//! with its own schema (weeknotes need a `date`, projects a `url`), and
//! [`entry::AnyEntry`] covers them all when kinds are mixed. Adding a kind
//! is a compile error everywhere it needs handling.
//!
//! ## Most-Recent Ordering Reverses Ties
//!
//! `by_most_recent` is a stable ascending sort followed by a reversal, so
//! entries with the same date come out in reverse of their input order.
//! Published feeds have always been ordered this way; changing it would
//! reorder existing feed items.
//!
//! ## One Draft Field
//!
//! `draft: true` keeps an entry out of pages and feeds. Older files spell it
//! `isDraft`; the loader accepts that and rewrites it to `draft` with a
//! warning, so nothing downstream has to know both names.

pub mod collection;
pub mod config;
pub mod entry;
pub mod feed;
pub mod generate;
pub mod naming;
pub mod output;
pub mod record;
pub mod site;
pub mod sitemap;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

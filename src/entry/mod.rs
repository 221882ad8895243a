//! Typed entry wrappers over raw records.
//!
//! Every content kind gets its own wrapper ([`Article`], [`Weeknote`],
//! [`Project`], [`Scrap`], [`Stream`]) implementing the shared [`Entry`]
//! capability set, plus [`AnyEntry`], the closed sum over all of them used
//! when kinds are mixed (the `posts` feed, route enumeration).
//!
//! # Construction Validates, Accessors Don't Fail
//!
//! [`TypedEntry::from_record`] checks the kind's required fields and parses
//! the slug date or declared date once. A record that gets wrapped is known to
//! be well-formed, so `title`, `date`, `path` and friends are plain accessors.
//! Records are immutable after loading, so nothing derived can go stale.
//!
//! | Kind | Date | Path |
//! |------|------|------|
//! | Article, Scrap, Stream | slug prefix | `/{year}/{month}/{rest}` |
//! | Weeknote | `date` field | `/weeknotes/{slug}` |
//! | Project | — | `/projects/{slug}` |

mod article;
mod project;
mod stream;
mod weeknote;

pub use article::Article;
pub use project::Project;
pub use stream::{Scrap, Stream};
pub use weeknote::Weeknote;

use crate::naming::DatedSlug;
use crate::record::{RawRecord, Rendered};
use crate::types::Kind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntryError {
    #[error("{slug}: missing required field `{field}`")]
    MissingField { slug: String, field: &'static str },
    #[error("{slug}: slug must start with a YYYY-MM-DD- date prefix")]
    InvalidSlugDate { slug: String },
    #[error("{slug}: `{field}` is not a date: {value:?}")]
    InvalidDate {
        slug: String,
        field: &'static str,
        value: String,
    },
    #[error("{slug}: record is from {found}, expected {expected}")]
    WrongKind {
        slug: String,
        expected: Kind,
        found: Kind,
    },
}

/// Route parameters handed to the page generator for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteParams {
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Two digits, e.g. `"03"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

impl RouteParams {
    pub fn slug(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            year: None,
            month: None,
        }
    }

    pub fn dated(dated: &DatedSlug) -> Self {
        Self {
            slug: dated.rest.clone(),
            year: Some(dated.year()),
            month: Some(dated.month()),
        }
    }
}

/// One route to build: its parameters plus the entry that renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticPath<T> {
    pub params: RouteParams,
    pub props: T,
}

/// The capability set shared by every entry kind.
pub trait Entry: Clone + Send + Sync {
    /// The wrapped record.
    fn record(&self) -> &RawRecord;

    fn kind(&self) -> Kind {
        self.record().kind
    }

    fn slug(&self) -> &str {
        &self.record().slug
    }

    fn title(&self) -> &str {
        self.record().title()
    }

    /// Publication date; `None` for kinds that carry no date.
    fn date(&self) -> Option<DateTime<Utc>>;

    fn is_draft(&self) -> bool {
        self.record().bool_field("draft")
    }

    fn description(&self) -> Option<&str> {
        self.record().str_field("description")
    }

    fn tags(&self) -> Vec<&str> {
        self.record().tags()
    }

    fn route_params(&self) -> RouteParams;

    /// Canonical public URL path, e.g. `/2024/03/hello-world`.
    fn path(&self) -> String;

    fn static_path(&self) -> StaticPath<Self> {
        StaticPath {
            params: self.route_params(),
            props: self.clone(),
        }
    }

    fn render(&self) -> Rendered {
        self.record().render()
    }
}

/// An entry type bound to exactly one kind, constructible from its records.
pub trait TypedEntry: Entry + Into<AnyEntry> {
    const KIND: Kind;

    fn from_record(record: Arc<RawRecord>) -> Result<Self, EntryError>;
}

/// Path shared by every slug-dated kind.
fn dated_path(dated: &DatedSlug) -> String {
    format!("/{}/{}/{}", dated.year(), dated.month(), dated.rest)
}

/// Checks every kind runs before its own schema.
fn check_record(record: &RawRecord, expected: Kind) -> Result<(), EntryError> {
    if record.kind != expected {
        return Err(EntryError::WrongKind {
            slug: record.slug.clone(),
            expected,
            found: record.kind,
        });
    }
    if record.title().trim().is_empty() {
        return Err(EntryError::MissingField {
            slug: record.slug.clone(),
            field: "title",
        });
    }
    Ok(())
}

/// Any entry, whatever its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyEntry {
    Article(Article),
    Weeknote(Weeknote),
    Project(Project),
    Scrap(Scrap),
    Stream(Stream),
}

/// Run `$body` against whichever variant `$entry` holds.
macro_rules! with_variant {
    ($entry:expr, $inner:ident => $body:expr) => {
        match $entry {
            AnyEntry::Article($inner) => $body,
            AnyEntry::Weeknote($inner) => $body,
            AnyEntry::Project($inner) => $body,
            AnyEntry::Scrap($inner) => $body,
            AnyEntry::Stream($inner) => $body,
        }
    };
}

impl AnyEntry {
    /// Title as displayed on the entry's own page: weeknotes are prefixed
    /// with their week, scraps can hide theirs.
    pub fn display_title(&self) -> Option<String> {
        match self {
            AnyEntry::Weeknote(w) => Some(w.title_with_week()),
            AnyEntry::Scrap(s) if s.hide_title() => None,
            other => Some(other.title().to_string()),
        }
    }

    /// Title in listings and the page `<title>`: always present, weeknotes
    /// still prefixed.
    pub fn list_title(&self) -> String {
        match self {
            AnyEntry::Weeknote(w) => w.title_with_week(),
            other => other.title().to_string(),
        }
    }
}

impl Entry for AnyEntry {
    fn record(&self) -> &RawRecord {
        with_variant!(self, e => e.record())
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        with_variant!(self, e => e.date())
    }

    fn route_params(&self) -> RouteParams {
        with_variant!(self, e => e.route_params())
    }

    fn path(&self) -> String {
        with_variant!(self, e => e.path())
    }
}

macro_rules! any_entry_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for AnyEntry {
                fn from(entry: $variant) -> Self {
                    AnyEntry::$variant(entry)
                }
            }
        )*
    };
}

any_entry_from!(Article, Weeknote, Project, Scrap, Stream);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{record, wrap};
    use serde_json::json;

    #[test]
    fn missing_title_is_rejected_for_every_kind() {
        let err = Article::from_record(record(Kind::Articles, "2024-01-01-x", json!({})))
            .unwrap_err();
        assert_eq!(
            err,
            EntryError::MissingField {
                slug: "2024-01-01-x".into(),
                field: "title"
            }
        );
        assert!(
            Project::from_record(record(Kind::Projects, "p", json!({"url": "https://x.io"})))
                .is_err()
        );
        assert!(Stream::from_record(record(Kind::Stream, "2024-01-01-s", json!({}))).is_err());
    }

    #[test]
    fn blank_title_is_missing() {
        let result = Scrap::from_record(record(Kind::Scraps, "2024-01-01-s", json!({"title": "  "})));
        assert!(matches!(result, Err(EntryError::MissingField { .. })));
    }

    #[test]
    fn record_of_other_kind_is_rejected() {
        let result = Article::from_record(record(
            Kind::Scraps,
            "2024-01-01-x",
            json!({"title": "X"}),
        ));
        assert!(matches!(
            result,
            Err(EntryError::WrongKind {
                expected: Kind::Articles,
                found: Kind::Scraps,
                ..
            })
        ));
    }

    #[test]
    fn any_entry_delegates_to_variant() {
        let article: Article = wrap(Kind::Articles, "2024-03-02-hello-world", json!({"title": "Hello"}));
        let any = AnyEntry::from(article.clone());
        assert_eq!(any.title(), "Hello");
        assert_eq!(any.path(), article.path());
        assert_eq!(any.date(), article.date());
        assert_eq!(any.route_params(), article.route_params());
        assert_eq!(any.kind(), Kind::Articles);
    }

    #[test]
    fn static_path_carries_entry_as_props() {
        let weeknote: Weeknote =
            wrap(Kind::Weeknotes, "42", json!({"title": "Ship it", "date": "2023-10-20"}));
        let static_path = weeknote.static_path();
        assert_eq!(static_path.params, RouteParams::slug("42"));
        assert_eq!(static_path.props, weeknote);
    }

    #[test]
    fn display_title_per_kind() {
        let weeknote: Weeknote =
            wrap(Kind::Weeknotes, "42", json!({"title": "Ship it", "date": "2023-10-20"}));
        assert_eq!(
            AnyEntry::from(weeknote).display_title().as_deref(),
            Some("Week 42: Ship it")
        );

        let hidden: Scrap = wrap(
            Kind::Scraps,
            "2024-01-01-quote",
            json!({"title": "Quote", "hideTitle": true}),
        );
        assert_eq!(AnyEntry::from(hidden).display_title(), None);

        let article: Article = wrap(Kind::Articles, "2024-01-01-a", json!({"title": "A"}));
        assert_eq!(AnyEntry::from(article).display_title().as_deref(), Some("A"));
    }

    #[test]
    fn list_title_never_hides() {
        let hidden: Scrap = wrap(
            Kind::Scraps,
            "2024-01-01-quote",
            json!({"title": "Quote", "hideTitle": true}),
        );
        assert_eq!(AnyEntry::from(hidden).list_title(), "Quote");

        let weeknote: Weeknote =
            wrap(Kind::Weeknotes, "42", json!({"title": "Ship it", "date": "2023-10-20"}));
        assert_eq!(AnyEntry::from(weeknote).list_title(), "Week 42: Ship it");
    }

    #[test]
    fn route_params_serialize_without_empty_date_parts() {
        let json = serde_json::to_value(RouteParams::slug("dotfiles")).unwrap();
        assert_eq!(json, json!({"slug": "dotfiles"}));
    }

    #[test]
    fn description_and_tags_exposed() {
        let article: Article = wrap(
            Kind::Articles,
            "2024-01-01-a",
            json!({"title": "A", "description": "About A", "tags": ["x", "y"]}),
        );
        assert_eq!(article.description(), Some("About A"));
        assert_eq!(article.tags(), vec!["x", "y"]);
    }
}

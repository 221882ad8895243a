//! Short-form posts: scraps and the stream.
//!
//! Both are dated by slug and share the article URL shape. Scraps may hide
//! their title (quotes, photos, one-liners).

use super::{Entry, EntryError, RouteParams, TypedEntry, check_record, dated_path};
use crate::naming::{DatedSlug, parse_dated_slug};
use crate::record::RawRecord;
use crate::types::Kind;
use chrono::{DateTime, Utc};
use std::sync::Arc;

fn parse_dated(record: &RawRecord, kind: Kind) -> Result<DatedSlug, EntryError> {
    check_record(record, kind)?;
    parse_dated_slug(&record.slug).ok_or_else(|| EntryError::InvalidSlugDate {
        slug: record.slug.clone(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scrap {
    record: Arc<RawRecord>,
    dated: DatedSlug,
}

impl Scrap {
    /// `hideTitle` in front matter.
    pub fn hide_title(&self) -> bool {
        self.record.bool_field("hideTitle")
    }
}

impl TypedEntry for Scrap {
    const KIND: Kind = Kind::Scraps;

    fn from_record(record: Arc<RawRecord>) -> Result<Self, EntryError> {
        let dated = parse_dated(&record, Self::KIND)?;
        Ok(Self { record, dated })
    }
}

impl Entry for Scrap {
    fn record(&self) -> &RawRecord {
        &self.record
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        Some(self.dated.datetime())
    }

    fn route_params(&self) -> RouteParams {
        RouteParams::dated(&self.dated)
    }

    fn path(&self) -> String {
        dated_path(&self.dated)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    record: Arc<RawRecord>,
    dated: DatedSlug,
}

impl TypedEntry for Stream {
    const KIND: Kind = Kind::Stream;

    fn from_record(record: Arc<RawRecord>) -> Result<Self, EntryError> {
        let dated = parse_dated(&record, Self::KIND)?;
        Ok(Self { record, dated })
    }
}

impl Entry for Stream {
    fn record(&self) -> &RawRecord {
        &self.record
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        Some(self.dated.datetime())
    }

    fn route_params(&self) -> RouteParams {
        RouteParams::dated(&self.dated)
    }

    fn path(&self) -> String {
        dated_path(&self.dated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{record, wrap};
    use serde_json::json;

    #[test]
    fn scrap_path_and_params() {
        let scrap: Scrap = wrap(Kind::Scraps, "2023-09-07-a-quote", json!({"title": "A quote"}));
        assert_eq!(scrap.path(), "/2023/09/a-quote");
        assert_eq!(scrap.route_params().slug, "a-quote");
        assert!(!scrap.hide_title());
    }

    #[test]
    fn scrap_hide_title() {
        let scrap: Scrap = wrap(
            Kind::Scraps,
            "2023-09-07-a-quote",
            json!({"title": "A quote", "hideTitle": true}),
        );
        assert!(scrap.hide_title());
    }

    #[test]
    fn stream_path_contains_year_and_month() {
        let post: Stream = wrap(Kind::Stream, "2020-01-31-link", json!({"title": "Link"}));
        let path = post.path();
        assert!(path.contains("2020"));
        assert!(path.contains("/01/"));
        assert_eq!(
            post.date().unwrap().format("%Y-%m-%d").to_string(),
            "2020-01-31"
        );
    }

    #[test]
    fn undated_stream_slug_is_rejected() {
        let result = Stream::from_record(record(Kind::Stream, "link", json!({"title": "Link"})));
        assert!(matches!(result, Err(EntryError::InvalidSlugDate { .. })));
    }
}

use super::{Entry, EntryError, RouteParams, TypedEntry, check_record};
use crate::naming::parse_week;
use crate::record::{RawRecord, parse_date};
use crate::types::Kind;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A weeknote. The slug is the week number; the date is declared in front
/// matter.
#[derive(Debug, Clone, PartialEq)]
pub struct Weeknote {
    record: Arc<RawRecord>,
    date: DateTime<Utc>,
}

impl Weeknote {
    /// Leading integer of the slug (`"42"` → 42).
    pub fn week(&self) -> Option<u32> {
        parse_week(&self.record.slug)
    }

    /// `"Week 42: Ship it"`; just the title when the slug carries no number.
    pub fn title_with_week(&self) -> String {
        match self.week() {
            Some(week) => format!("Week {}: {}", week, self.title()),
            None => self.title().to_string(),
        }
    }
}

impl TypedEntry for Weeknote {
    const KIND: Kind = Kind::Weeknotes;

    fn from_record(record: Arc<RawRecord>) -> Result<Self, EntryError> {
        check_record(&record, Self::KIND)?;
        let raw = record
            .str_field("date")
            .ok_or_else(|| EntryError::MissingField {
                slug: record.slug.clone(),
                field: "date",
            })?;
        let date = parse_date(raw).ok_or_else(|| EntryError::InvalidDate {
            slug: record.slug.clone(),
            field: "date",
            value: raw.to_string(),
        })?;
        Ok(Self { record, date })
    }
}

impl Entry for Weeknote {
    fn record(&self) -> &RawRecord {
        &self.record
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        Some(self.date)
    }

    fn route_params(&self) -> RouteParams {
        RouteParams::slug(&self.record.slug)
    }

    fn path(&self) -> String {
        format!("/weeknotes/{}", self.record.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{record, wrap};
    use serde_json::json;

    fn weeknote(slug: &str, title: &str) -> Weeknote {
        wrap(Kind::Weeknotes, slug, json!({"title": title, "date": "2023-10-20"}))
    }

    #[test]
    fn title_with_week_and_path() {
        let w = weeknote("42", "Ship it");
        assert_eq!(w.week(), Some(42));
        assert_eq!(w.title_with_week(), "Week 42: Ship it");
        assert_eq!(w.path(), "/weeknotes/42");
    }

    #[test]
    fn week_parsed_from_leading_digits() {
        let w = weeknote("07-holiday", "Holiday");
        assert_eq!(w.week(), Some(7));
        assert_eq!(w.path(), "/weeknotes/07-holiday");
    }

    #[test]
    fn unnumbered_weeknote_keeps_plain_title() {
        let w = weeknote("summer", "Summer");
        assert_eq!(w.week(), None);
        assert_eq!(w.title_with_week(), "Summer");
    }

    #[test]
    fn date_is_declared_not_derived() {
        let w = weeknote("42", "Ship it");
        assert_eq!(
            w.date().unwrap().format("%Y-%m-%d").to_string(),
            "2023-10-20"
        );
    }

    #[test]
    fn static_path_uses_full_slug() {
        let params = weeknote("42", "Ship it").route_params();
        assert_eq!(params, RouteParams::slug("42"));
    }

    #[test]
    fn missing_date_is_rejected() {
        let result = Weeknote::from_record(record(Kind::Weeknotes, "42", json!({"title": "T"})));
        assert_eq!(
            result.unwrap_err(),
            EntryError::MissingField {
                slug: "42".into(),
                field: "date"
            }
        );
    }

    #[test]
    fn unparseable_date_is_rejected() {
        let result = Weeknote::from_record(record(
            Kind::Weeknotes,
            "42",
            json!({"title": "T", "date": "next friday"}),
        ));
        assert!(matches!(result, Err(EntryError::InvalidDate { .. })));
    }
}

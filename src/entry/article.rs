use super::{Entry, EntryError, RouteParams, TypedEntry, check_record, dated_path};
use crate::naming::{DatedSlug, parse_dated_slug};
use crate::record::RawRecord;
use crate::types::Kind;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A long-form blog article. Slug: `YYYY-MM-DD-remainder`.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    record: Arc<RawRecord>,
    dated: DatedSlug,
}

impl TypedEntry for Article {
    const KIND: Kind = Kind::Articles;

    fn from_record(record: Arc<RawRecord>) -> Result<Self, EntryError> {
        check_record(&record, Self::KIND)?;
        let dated = parse_dated_slug(&record.slug).ok_or_else(|| EntryError::InvalidSlugDate {
            slug: record.slug.clone(),
        })?;
        Ok(Self { record, dated })
    }
}

impl Entry for Article {
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

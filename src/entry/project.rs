use super::{Entry, EntryError, RouteParams, TypedEntry, check_record};
use crate::record::RawRecord;
use crate::types::Kind;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A project listing, linking out to the project itself. Projects are undated.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    record: Arc<RawRecord>,
}

impl Project {
    /// External link to the project.
    pub fn url(&self) -> &str {
        self.record.str_field("url").unwrap_or_default()
    }

    /// `private` in front matter: listed, but without the external link.
    pub fn is_private(&self) -> bool {
        self.record.bool_field("private")
    }
}

impl TypedEntry for Project {
    const KIND: Kind = Kind::Projects;

    fn from_record(record: Arc<RawRecord>) -> Result<Self, EntryError> {
        check_record(&record, Self::KIND)?;
        if record.str_field("url").is_none_or(|url| url.trim().is_empty()) {
            return Err(EntryError::MissingField {
                slug: record.slug.clone(),
                field: "url",
            });
        }
        Ok(Self { record })
    }
}

impl Entry for Project {
    fn record(&self) -> &RawRecord {
        &self.record
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn route_params(&self) -> RouteParams {
        RouteParams::slug(&self.record.slug)
    }

    fn path(&self) -> String {
        format!("/projects/{}", self.record.slug)
    }
}

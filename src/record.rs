//! Raw content records and Markdown rendering.
//!
//! A [`RawRecord`] is one content file after loading: its slug, the data bag
//! from the YAML front matter, and the Markdown body. Records are immutable
//! once loaded; entry wrappers share them behind an `Arc`.
//!
//! ## File Format
//!
//! ```text
//! ---
//! title: Hello world
//! draft: true
//! tags: [rust, notes]
//! ---
//!
//! The body, in Markdown.
//! ```
//!
//! The front matter block is optional at this layer. Which fields are
//! required is decided per kind when the record is wrapped in an entry.

use crate::types::Kind;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::warn;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html as md_html};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("front matter is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("front matter must be a mapping of fields")]
    NotAMapping,
    #[error("front matter is not closed with ---")]
    Unterminated,
}

/// One loaded content file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub kind: Kind,
    /// Unique within the kind; derived from the file path.
    pub slug: String,
    /// Front matter fields.
    pub data: Map<String, Value>,
    /// Markdown body after the front matter.
    pub body: String,
    /// File path relative to the content root.
    pub source: PathBuf,
}

/// Output of [`RawRecord::render`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    pub html: String,
    pub headings: Vec<Heading>,
}

/// One heading in the rendered outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub depth: u8,
    /// The `id` attribute written on the heading element.
    pub slug: String,
    pub text: String,
}

impl RawRecord {
    /// Build a record from already-parsed parts.
    pub fn new(
        kind: Kind,
        slug: impl Into<String>,
        data: Map<String, Value>,
        body: impl Into<String>,
    ) -> Self {
        let slug = slug.into();
        let source = PathBuf::from(kind.as_str()).join(format!("{slug}.md"));
        Self {
            kind,
            slug,
            data,
            body: body.into(),
            source,
        }
    }

    /// Parse a content file's text into a record.
    pub fn parse(
        kind: Kind,
        slug: impl Into<String>,
        text: &str,
        source: PathBuf,
    ) -> Result<Self, RecordError> {
        let slug = slug.into();
        let (mut data, body) = parse_front_matter(text)?;
        if normalize_draft_flag(&mut data) {
            warn!("{kind}/{slug}: `isDraft` is deprecated, use `draft`");
        }
        Ok(Self {
            kind,
            slug,
            data,
            body: body.to_string(),
            source,
        })
    }

    /// The `title` field, or `""` when absent. Entries reject records without one.
    pub fn title(&self) -> &str {
        self.str_field("title").unwrap_or_default()
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Boolean flag; missing or non-boolean values read as `false`.
    pub fn bool_field(&self, key: &str) -> bool {
        self.data.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// The `tags` list, skipping anything that isn't a string.
    pub fn tags(&self) -> Vec<&str> {
        match self.data.get("tags") {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(tag)) => vec![tag.as_str()],
            _ => Vec::new(),
        }
    }

    /// Render the Markdown body to HTML and collect the heading outline.
    ///
    /// Pure over the record: repeated calls return identical output.
    pub fn render(&self) -> Rendered {
        render_markdown(&self.body)
    }
}

/// A standalone page such as `about.md`: front matter and Markdown, but no
/// kind, collection or slug conventions.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// File stem, e.g. `about`.
    pub name: String,
    pub data: Map<String, Value>,
    pub body: String,
    /// File path relative to the content root.
    pub source: PathBuf,
}

impl Page {
    pub fn parse(name: impl Into<String>, text: &str, source: PathBuf) -> Result<Self, RecordError> {
        let (data, body) = parse_front_matter(text)?;
        Ok(Self {
            name: name.into(),
            data,
            body: body.to_string(),
            source,
        })
    }

    /// The `title` field, if the page sets one.
    pub fn title(&self) -> Option<&str> {
        self.data
            .get("title")
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
    }

    /// Same renderer as entries: heading ids and an outline.
    pub fn render(&self) -> Rendered {
        render_markdown(&self.body)
    }
}

/// Split a `---` fenced YAML block off the start of `text`.
///
/// Text without an opening fence has no front matter: the data is empty and
/// the whole text is the body.
pub fn parse_front_matter(text: &str) -> Result<(Map<String, Value>, &str), RecordError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return Ok((Map::new(), text));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            let data = parse_yaml_mapping(yaml)?;
            return Ok((data, body.trim_start_matches(['\r', '\n'])));
        }
        offset += line.len();
    }
    Err(RecordError::Unterminated)
}

/// Rename the legacy `isDraft` field to `draft`. Returns whether it was present.
///
/// An explicit `draft` field takes precedence over the legacy spelling.
pub fn normalize_draft_flag(data: &mut Map<String, Value>) -> bool {
    let Some(legacy) = data.remove("isDraft") else {
        return false;
    };
    data.entry("draft").or_insert(legacy);
    true
}

fn parse_yaml_mapping(yaml: &str) -> Result<Map<String, Value>, RecordError> {
    if yaml.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(RecordError::NotAMapping),
    }
}

/// Parse a declared date: `YYYY-MM-DD` (midnight UTC), RFC 3339, or a YAML
/// style `YYYY-MM-DD HH:MM:SS` timestamp (read as UTC).
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_SMART_PUNCTUATION
}

fn render_markdown(body: &str) -> Rendered {
    let mut events: Vec<Event> = Parser::new_ext(body, markdown_options()).collect();
    let mut headings = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    let mut i = 0;
    while i < events.len() {
        let (depth, explicit_id) = match &events[i] {
            Event::Start(Tag::Heading { level, id, .. }) => {
                (*level as u8, id.as_ref().map(|id| id.to_string()))
            }
            _ => {
                i += 1;
                continue;
            }
        };

        let mut text = String::new();
        let mut end = i + 1;
        while end < events.len() {
            match &events[end] {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
            end += 1;
        }

        let slug = match explicit_id {
            Some(id) => id,
            None => {
                let slug = unique_slug(&text, &mut seen);
                if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
                    *id = Some(CowStr::from(slug.clone()));
                }
                slug
            }
        };
        headings.push(Heading { depth, slug, text });
        i = end + 1;
    }

    let mut html = String::with_capacity(body.len() * 3 / 2);
    md_html::push_html(&mut html, events.into_iter());
    Rendered { html, headings }
}

/// Slugify heading text, suffixing `-1`, `-2`, … on repeats.
fn unique_slug(text: &str, seen: &mut HashMap<String, usize>) -> String {
    let mut base = slug::slugify(text);
    if base.is_empty() {
        base = "section".to_string();
    }
    let count = seen.entry(base.clone()).or_insert(0);
    let slug = if *count == 0 {
        base
    } else {
        format!("{base}-{count}")
    };
    *count += 1;
    slug
}

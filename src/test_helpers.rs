//! Shared test utilities for the site test suite.
//!
//! Provides record builders, an in-memory content source, and fixture setup
//! for tests that need real files on disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let article: Article = wrap(Kind::Articles, "2024-03-02-hello", json!({"title": "Hi"}));
//!
//! let source = MemorySource::new()
//!     .with(Kind::Weeknotes, "42", json!({"title": "Ship it", "date": "2023-10-20"}));
//! let site = Site::load(&source).await.unwrap();
//!
//! let tmp = setup_fixtures();
//! let site = Site::load(&FsSource::new(tmp.path())).await.unwrap();
//! assert_eq!(slugs(&site.weeknotes), vec!["41", "42"]);
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use serde_json::Value;

use crate::collection::Collection;
use crate::entry::{Entry, TypedEntry};
use crate::record::{Page, RawRecord};
use crate::source::{ContentSource, LoadError};
use crate::types::Kind;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Record builders
// =========================================================================

/// Build a record from a `json!({...})` object of front matter fields.
pub fn record(kind: Kind, slug: &str, data: Value) -> Arc<RawRecord> {
    Arc::new(raw(kind, slug, data))
}

fn raw(kind: Kind, slug: &str, data: Value) -> RawRecord {
    let Value::Object(data) = data else {
        panic!("front matter for {kind}/{slug} must be a JSON object");
    };
    RawRecord::new(kind, slug, data, "")
}

/// Build and wrap a record, panicking with the entry error if it's invalid.
pub fn wrap<T: TypedEntry>(kind: Kind, slug: &str, data: Value) -> T {
    T::from_record(record(kind, slug, data))
        .unwrap_or_else(|e| panic!("{kind}/{slug} should wrap: {e}"))
}

// =========================================================================
// In-memory content source
// =========================================================================

/// A [`ContentSource`] backed by records added in code, returned in insertion
/// order.
#[derive(Debug, Default)]
pub struct MemorySource {
    records: HashMap<Kind, Vec<RawRecord>>,
    pages: HashMap<String, Page>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, kind: Kind, slug: &str, data: Value) -> Self {
        self.with_body(kind, slug, data, "")
    }

    pub fn with_body(mut self, kind: Kind, slug: &str, data: Value, body: &str) -> Self {
        let mut record = raw(kind, slug, data);
        record.body = body.to_string();
        self.records.entry(kind).or_default().push(record);
        self
    }

    /// Add a standalone page parsed from full file text.
    pub fn with_page(mut self, name: &str, text: &str) -> Self {
        let page = Page::parse(name, text, format!("{name}.md").into())
            .unwrap_or_else(|e| panic!("page {name} should parse: {e}"));
        self.pages.insert(name.to_string(), page);
        self
    }
}

impl ContentSource for MemorySource {
    async fn load(&self, kind: Kind) -> Result<Vec<RawRecord>, LoadError> {
        Ok(self.records.get(&kind).cloned().unwrap_or_default())
    }

    async fn load_page(&self, name: &str) -> Result<Option<Page>, LoadError> {
        Ok(self.pages.get(name).cloned())
    }
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Slugs in collection order.
pub fn slugs<T: Entry>(collection: &Collection<T>) -> Vec<String> {
    collection.iter().map(|e| e.slug().to_string()).collect()
}

/// Paths in collection order.
pub fn paths<T: Entry>(collection: &Collection<T>) -> Vec<String> {
    collection.iter().map(|e| e.path()).collect()
}

/// Find an entry by slug. Panics with the available slugs if missing.
pub fn find<'a, T: Entry>(collection: &'a Collection<T>, slug: &str) -> &'a T {
    collection
        .iter()
        .find(|e| e.slug() == slug)
        .unwrap_or_else(|| {
            panic!(
                "entry '{}' not found; have: {:?}",
                slug,
                slugs(collection)
            )
        })
}

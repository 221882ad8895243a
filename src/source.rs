//! Content loading.
//!
//! A [`ContentSource`] hands out every raw record of one kind. The build uses
//! [`FsSource`], which reads Markdown files from a directory per kind:
//!
//! ```text
//! content/
//! ├── config.toml                      # Site config (optional)
//! ├── about.md                         # Standalone page (optional)
//! ├── articles/
//! │   └── 2024-03-02-hello-world.md    # slug: 2024-03-02-hello-world
//! ├── weeknotes/
//! │   └── 42.md                        # slug: 42
//! ├── projects/
//! │   └── dotfiles.md
//! ├── scraps/
//! │   └── 2023-09-07-a-quote.md
//! └── stream/
//!     └── 2024/2024-01-31-link.md      # slug: 2024-01-31-link
//! ```
//!
//! Slugs are the path relative to the kind directory without its extension.
//! Kinds whose slugs carry a date use the file stem alone, so dated files can
//! be grouped into directories (by year, say) without changing their slug.
//! Hidden files and `_`-prefixed files are skipped; a missing kind directory
//! is an empty kind. Files are read in sorted order so loads are repeatable.

use crate::entry::EntryError;
use crate::record::{Page, RawRecord, RecordError};
use crate::types::Kind;
use log::debug;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{path}: {source}")]
    Record {
        path: PathBuf,
        #[source]
        source: RecordError,
    },
    #[error("Invalid {kind} entry {source}")]
    Entry {
        kind: Kind,
        #[source]
        source: EntryError,
    },
    #[error("Slugs {first} and {second} in {kind} both map to {path}")]
    DuplicatePath {
        kind: Kind,
        path: String,
        first: String,
        second: String,
    },
    #[error("Loader task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Something that can enumerate the raw records of a content kind.
pub trait ContentSource: Sync {
    fn load(&self, kind: Kind)
    -> impl Future<Output = Result<Vec<RawRecord>, LoadError>> + Send;

    /// A standalone page by name, `None` when the source has none.
    fn load_page(&self, name: &str)
    -> impl Future<Output = Result<Option<Page>, LoadError>> + Send;
}

/// Reads content from `<root>/<kind>/**/*.md`.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

const CONTENT_EXTENSIONS: &[&str] = &["md", "markdown"];

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentSource for FsSource {
    async fn load(&self, kind: Kind) -> Result<Vec<RawRecord>, LoadError> {
        let root = self.root.clone();
        let records = tokio::task::spawn_blocking(move || read_kind(&root, kind)).await??;
        debug!("Loaded {} {} records", records.len(), kind);
        Ok(records)
    }

    async fn load_page(&self, name: &str) -> Result<Option<Page>, LoadError> {
        let root = self.root.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || read_page(&root, &name)).await?
    }
}

/// `<root>/<name>.md` (or `.markdown`), if present.
fn read_page(root: &Path, name: &str) -> Result<Option<Page>, LoadError> {
    let Some(path) = CONTENT_EXTENSIONS
        .iter()
        .map(|ext| root.join(format!("{name}.{ext}")))
        .find(|p| p.is_file())
    else {
        debug!("No {name} page in {}", root.display());
        return Ok(None);
    };

    let source = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
    let text = fs::read_to_string(&path).map_err(|e| LoadError::Io {
        path: source.clone(),
        source: e,
    })?;
    let page = Page::parse(name, &text, source.clone())
        .map_err(|e| LoadError::Record { path: source, source: e })?;
    Ok(Some(page))
}

fn read_kind(root: &Path, kind: Kind) -> Result<Vec<RawRecord>, LoadError> {
    let dir = root.join(kind.as_str());
    if !dir.is_dir() {
        debug!("No {} directory at {}", kind, dir.display());
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    let walker = WalkDir::new(&dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(e));

    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_content_file(path) {
            continue;
        }

        let slug = slug_for(kind, path.strip_prefix(&dir).unwrap_or(path));
        let source = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        let text = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: source.clone(),
            source: e,
        })?;
        let record = RawRecord::parse(kind, slug, &text, source.clone())
            .map_err(|e| LoadError::Record { path: source, source: e })?;
        records.push(record);
    }
    Ok(records)
}

fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name.starts_with('_')
}

fn is_content_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext.as_str()))
}

/// `guides/setup.md` → `guides/setup`; for dated kinds
/// `2024/2024-01-31-link.md` → `2024-01-31-link`
fn slug_for(kind: Kind, relative: &Path) -> String {
    if let Some(stem) = relative.file_stem().filter(|_| kind.is_slug_dated()) {
        return stem.to_string_lossy().into_owned();
    }
    relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

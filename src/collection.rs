//! Ordered collections of entries and their derived views.
//!
//! A [`Collection`] owns the entries of one kind (or, for `posts`, a mix of
//! kinds as [`AnyEntry`]) in a fixed order. Every view returns a new
//! collection and leaves the receiver untouched; entries share their record
//! behind an `Arc`, so views are cheap.
//!
//! ```text
//! articles.by_most_recent().where_published()   // newest first, drafts removed
//! articles.static_paths()                       // one route per entry
//! ```
//!
//! ## Ordering
//!
//! [`Collection::sort_by`] is a stable ascending sort. [`Collection::by_most_recent`]
//! is that sort by date followed by a reversal, which means entries sharing a
//! date come out in the *reverse* of their input order. Feeds and listings
//! have always been ordered this way, so it is kept as is.

use crate::entry::{AnyEntry, Entry, StaticPath, TypedEntry};
use crate::source::{ContentSource, LoadError};
use log::debug;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::Index;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    entries: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

/// Three-way comparison where incomparable keys count as equal.
fn compare<K: PartialOrd>(a: &K, b: &K) -> Ordering {
    if a < b {
        Ordering::Less
    } else if a > b {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

impl<T> Collection<T> {
    pub fn new(entries: Vec<T>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.entries.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }
}

impl<T: Clone> Collection<T> {
    /// Re-order ascending by `key`. Stable: equal keys keep their input order.
    pub fn sort_by<K, F>(&self, key: F) -> Self
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| compare(&key(a), &key(b)));
        Self { entries }
    }

    /// Keep only the entries for which `predicate` is false.
    pub fn remove<F>(&self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool,
    {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| !predicate(entry))
                .cloned()
                .collect(),
        }
    }

    /// This collection followed by `other`.
    pub fn chain(&self, other: &Self) -> Self {
        let mut entries = self.entries.clone();
        entries.extend(other.entries.iter().cloned());
        Self { entries }
    }
}

impl<T: Entry> Collection<T> {
    /// Descending by date: ascending sort, then reversed.
    pub fn by_most_recent(&self) -> Self {
        let mut sorted = self.sort_by(|entry| entry.date());
        sorted.entries.reverse();
        sorted
    }

    /// Drafts removed.
    pub fn where_published(&self) -> Self {
        self.remove(|entry| entry.is_draft())
    }

    /// One static path per entry, in collection order.
    pub fn static_paths(&self) -> Vec<StaticPath<T>> {
        self.entries.iter().map(Entry::static_path).collect()
    }

    /// Widen to a mixed-kind collection, preserving order.
    pub fn into_any(self) -> Collection<AnyEntry>
    where
        T: Into<AnyEntry>,
    {
        self.entries.into_iter().map(Into::into).collect()
    }
}

impl<T: TypedEntry> Collection<T> {
    /// Load and wrap every record of `T`'s kind, in the source's order.
    ///
    /// Fails on the first record that doesn't fit the kind's schema, and when
    /// two slugs produce the same path.
    pub async fn load<S: ContentSource>(source: &S) -> Result<Self, LoadError> {
        let records = source.load(T::KIND).await?;
        let entries = records
            .into_iter()
            .map(|record| {
                T::from_record(Arc::new(record)).map_err(|e| LoadError::Entry {
                    kind: T::KIND,
                    source: e,
                })
            })
            .collect::<Result<Vec<T>, _>>()?;

        let collection = Self { entries };
        collection.check_unique_paths()?;
        debug!("Collected {} {} entries", collection.len(), T::KIND);
        Ok(collection)
    }

    fn check_unique_paths(&self) -> Result<(), LoadError> {
        let mut seen: HashMap<String, &str> = HashMap::with_capacity(self.len());
        for entry in &self.entries {
            if let Some(first) = seen.insert(entry.path(), entry.slug()) {
                return Err(LoadError::DuplicatePath {
                    kind: T::KIND,
                    path: entry.path(),
                    first: first.to_string(),
                    second: entry.slug().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl<T> Index<usize> for Collection<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.entries[index]
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for Collection<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

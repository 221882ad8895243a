//! Every collection of the site, loaded together.
//!
//! Kinds live in disjoint directories and don't depend on one another, so
//! they load concurrently. The first failure fails the whole load.
//! Standalone pages (`about.md`) load alongside them.

use crate::collection::Collection;
use crate::entry::{AnyEntry, Article, Project, Scrap, Stream, Weeknote};
use crate::record::Page;
use crate::source::{ContentSource, LoadError};
use crate::types::Kind;
use log::info;

#[derive(Debug, Clone, Default)]
pub struct Site {
    pub articles: Collection<Article>,
    pub weeknotes: Collection<Weeknote>,
    pub projects: Collection<Project>,
    pub scraps: Collection<Scrap>,
    pub stream: Collection<Stream>,
    /// The about page, from `about.md` at the content root.
    pub about: Option<Page>,
}

impl Site {
    pub async fn load<S: ContentSource>(source: &S) -> Result<Self, LoadError> {
        let (articles, weeknotes, projects, scraps, stream, about) = tokio::try_join!(
            Collection::<Article>::load(source),
            Collection::<Weeknote>::load(source),
            Collection::<Project>::load(source),
            Collection::<Scrap>::load(source),
            Collection::<Stream>::load(source),
            source.load_page("about"),
        )?;

        let site = Self {
            articles,
            weeknotes,
            projects,
            scraps,
            stream,
            about,
        };
        info!(
            "Loaded {} articles, {} weeknotes, {} projects, {} scraps, {} stream posts",
            site.articles.len(),
            site.weeknotes.len(),
            site.projects.len(),
            site.scraps.len(),
            site.stream.len()
        );
        Ok(site)
    }

    /// Weeknotes followed by articles. Not date-ordered; callers sort.
    pub fn posts(&self) -> Collection<AnyEntry> {
        self.weeknotes
            .clone()
            .into_any()
            .chain(&self.articles.clone().into_any())
    }

    /// Every entry, kind by kind in [`Kind::ALL`] order.
    pub fn all(&self) -> Collection<AnyEntry> {
        Kind::ALL
            .iter()
            .flat_map(|&kind| self.of_kind(kind))
            .collect()
    }

    /// One kind's entries, widened.
    pub fn of_kind(&self, kind: Kind) -> Collection<AnyEntry> {
        match kind {
            Kind::Articles => self.articles.clone().into_any(),
            Kind::Weeknotes => self.weeknotes.clone().into_any(),
            Kind::Projects => self.projects.clone().into_any(),
            Kind::Scraps => self.scraps.clone().into_any(),
            Kind::Stream => self.stream.clone().into_any(),
        }
    }

    pub fn count(&self, kind: Kind) -> usize {
        match kind {
            Kind::Articles => self.articles.len(),
            Kind::Weeknotes => self.weeknotes.len(),
            Kind::Projects => self.projects.len(),
            Kind::Scraps => self.scraps.len(),
            Kind::Stream => self.stream.len(),
        }
    }

    /// Same site with drafts removed from every kind.
    pub fn published(&self) -> Self {
        Self {
            articles: self.articles.where_published(),
            weeknotes: self.weeknotes.where_published(),
            projects: self.projects.where_published(),
            scraps: self.scraps.where_published(),
            stream: self.stream.where_published(),
            about: self.about.clone(),
        }
    }
}

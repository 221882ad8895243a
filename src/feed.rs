//! RSS feed generation.
//!
//! Feeds list published entries, most recent first. Links are absolute,
//! built on `site.url`. A feed can name an XSL stylesheet so browsers render
//! it as a page instead of raw XML.

use crate::collection::Collection;
use crate::config::{FeedConfig, SiteConfig};
use crate::entry::Entry;
use chrono::{DateTime, Utc};
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use thiserror::Error;

const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("RSS validation failed: {0}")]
    Invalid(String),
}

/// One feed item, ready for the channel.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub pub_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    /// Absolute URL of the entry page.
    pub link: String,
}

impl FeedItem {
    pub fn from_entry<E: Entry>(entry: &E, base_url: &str) -> Self {
        Self {
            title: entry.title().to_string(),
            pub_date: entry.date(),
            description: entry.description().map(str::to_string),
            link: format!("{}{}", base_url.trim_end_matches('/'), entry.path()),
        }
    }

    fn to_rss(&self) -> rss::Item {
        ItemBuilder::default()
            .title(self.title.clone())
            .link(Some(self.link.clone()))
            .guid(
                GuidBuilder::default()
                    .permalink(true)
                    .value(self.link.clone())
                    .build(),
            )
            .description(self.description.clone())
            .pub_date(self.pub_date.map(|d| d.to_rfc2822()))
            .build()
    }
}

/// Map entries to feed items, keeping collection order.
pub fn feed_items<E: Entry>(collection: &Collection<E>, base_url: &str) -> Vec<FeedItem> {
    collection
        .iter()
        .map(|entry| FeedItem::from_entry(entry, base_url))
        .collect()
}

/// Build a feed from a collection: drafts dropped, newest first.
pub fn build_feed<E: Entry>(
    collection: &Collection<E>,
    feed: &FeedConfig,
    config: &SiteConfig,
) -> Result<String, FeedError> {
    let entries = collection.where_published().by_most_recent();
    render_feed(feed, config, &feed_items(&entries, config.base_url()))
}

/// Render a validated RSS 2.0 document.
pub fn render_feed(
    feed: &FeedConfig,
    config: &SiteConfig,
    items: &[FeedItem],
) -> Result<String, FeedError> {
    let channel = ChannelBuilder::default()
        .title(feed.title.clone())
        .link(config.base_url().to_string())
        .description(feed.description.clone())
        .language(Some(config.site.language.clone()))
        .generator(Some(GENERATOR.to_string()))
        .items(items.iter().map(FeedItem::to_rss).collect::<Vec<_>>())
        .build();

    channel
        .validate()
        .map_err(|e| FeedError::Invalid(e.to_string()))?;

    let xml = channel.to_string();
    Ok(match &feed.stylesheet {
        Some(href) => with_stylesheet(xml, href),
        None => xml,
    })
}

/// Insert an `xml-stylesheet` instruction after the XML declaration.
fn with_stylesheet(xml: String, href: &str) -> String {
    let instruction = format!(
        r#"<?xml-stylesheet href="{}" type="text/xsl"?>"#,
        href.replace('&', "&amp;").replace('"', "&quot;")
    );
    match xml.starts_with("<?xml ").then(|| xml.find("?>")).flatten() {
        Some(end) => {
            let (decl, rest) = xml.split_at(end + 2);
            format!("{decl}{instruction}{rest}")
        }
        None => format!("{instruction}{xml}"),
    }
}

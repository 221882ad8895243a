//! Sitemap generation.
//!
//! Lists the absolute URL of every published page for search engines.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://tomafro.net/2024/03/hello-world</loc>
//!     <lastmod>2024-03-02</lastmod>
//!   </url>
//! </urlset>
//! ```
//!
//! Dated entries carry their date as `lastmod`; listings and standalone
//! pages have none.

use chrono::{DateTime, Utc};

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Output file, relative to the output directory.
pub const SITEMAP_FILE: &str = "sitemap.xml";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sitemap {
    urls: Vec<UrlEntry>,
}

/// Single URL entry in the sitemap
#[derive(Debug, Clone, PartialEq)]
struct UrlEntry {
    loc: String,
    lastmod: Option<String>,
}

impl Sitemap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page by its root-relative path.
    pub fn push(&mut self, base_url: &str, path: &str, lastmod: Option<DateTime<Utc>>) {
        self.urls.push(UrlEntry {
            loc: format!("{base_url}{path}"),
            lastmod: lastmod.map(|d| d.format("%Y-%m-%d").to_string()),
        });
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Sitemap XML, URLs in sorted order so builds are repeatable.
    pub fn to_xml(&self) -> String {
        let mut urls: Vec<&UrlEntry> = self.urls.iter().collect();
        urls.sort_by(|a, b| a.loc.cmp(&b.loc));

        let mut xml = String::with_capacity(128 + urls.len() * 96);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');
        for entry in urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            if let Some(lastmod) = &entry.lastmod {
                xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            }
            xml.push_str("  </url>\n");
        }
        xml.push_str("</urlset>\n");
        xml
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

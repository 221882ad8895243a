//! Shared types used across loading, generation and output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A content collection. Each kind lives in its own directory under the
/// content root and is wrapped in its own entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Articles,
    Weeknotes,
    Projects,
    Scraps,
    Stream,
}

impl Kind {
    pub const ALL: [Kind; 5] = [
        Kind::Articles,
        Kind::Weeknotes,
        Kind::Projects,
        Kind::Scraps,
        Kind::Stream,
    ];

    /// Canonical name, also the directory name under the content root.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Articles => "articles",
            Kind::Weeknotes => "weeknotes",
            Kind::Projects => "projects",
            Kind::Scraps => "scraps",
            Kind::Stream => "stream",
        }
    }

    /// Heading used in CLI output.
    pub fn label(self) -> &'static str {
        match self {
            Kind::Articles => "Articles",
            Kind::Weeknotes => "Weeknotes",
            Kind::Projects => "Projects",
            Kind::Scraps => "Scraps",
            Kind::Stream => "Stream",
        }
    }

    /// Whether entries of this kind take their date from the slug prefix.
    pub fn is_slug_dated(self) -> bool {
        matches!(self, Kind::Articles | Kind::Scraps | Kind::Stream)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation link rendered in the site header (enabled sections only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub name: String,
    pub url: String,
}

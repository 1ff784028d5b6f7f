//! Core domain types shared by the fetcher, the comparison engine and the
//! browse controller.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Type aliases for domain clarity (MovieId)
//! - `Algorithm`, the opaque name of a server-side recommendation strategy
//! - `ScoredItem` and `ResultPage`, one page of scored results from one algorithm

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie, shared by every algorithm.
///
/// This is the join key when two result pages are compared.
pub type MovieId = u32;

/// Title shown for an item the service sent without any title.
pub fn placeholder_title(movie_id: MovieId) -> String {
    format!("Phim ID: {}", movie_id)
}

// =============================================================================
// Algorithm
// =============================================================================

/// A named recommendation strategy selected by the user.
///
/// The strategies themselves live on the server; this side only passes the
/// name through. Unknown names are kept verbatim in `Other` so a newer backend
/// keeps working with an older client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Algorithm {
    #[default]
    Hybrid,
    UserCf,
    ItemCf,
    Svd,
    Content,
    Collaborative,
    Other(String),
}

impl Algorithm {
    /// The identifier sent as the `algorithm` query parameter.
    pub fn as_str(&self) -> &str {
        match self {
            Algorithm::Hybrid => "hybrid",
            Algorithm::UserCf => "user_cf",
            Algorithm::ItemCf => "item_cf",
            Algorithm::Svd => "svd",
            Algorithm::Content => "content",
            Algorithm::Collaborative => "collaborative",
            Algorithm::Other(name) => name,
        }
    }

    /// Upper-cased name used to label comparison columns.
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl FromStr for Algorithm {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Ok(match name.to_lowercase().as_str() {
            "" | "hybrid" => Algorithm::Hybrid,
            "user_cf" => Algorithm::UserCf,
            "item_cf" => Algorithm::ItemCf,
            "svd" => Algorithm::Svd,
            "content" => Algorithm::Content,
            "collaborative" => Algorithm::Collaborative,
            _ => Algorithm::Other(name.to_string()),
        })
    }
}

impl From<String> for Algorithm {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(algorithm) => algorithm,
            Err(never) => match never {},
        }
    }
}

impl From<Algorithm> for String {
    fn from(value: Algorithm) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Scored items and pages
// =============================================================================

/// One recommended movie with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub movie_id: MovieId,
    /// Relevance score, always finite and non-negative
    pub score: f32,
    /// Display title, `None` when the service didn't provide one
    pub title: Option<String>,
}

impl ScoredItem {
    pub fn new(movie_id: MovieId, score: f32) -> Self {
        Self {
            movie_id,
            score,
            title: None,
        }
    }

    /// Builder-style title setter, handy for fixtures.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title to show, falling back to the generated placeholder.
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| placeholder_title(self.movie_id))
    }
}

/// One page of scored items from one algorithm.
///
/// Invariants (enforced by [`ResultPage::new`]):
/// - `1 <= page <= total_pages`
/// - an empty result set still reports one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    /// Items in the order the server ranked them
    pub items: Vec<ScoredItem>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

impl ResultPage {
    /// Create a page, normalizing the pagination counters.
    pub fn new(items: Vec<ScoredItem>, page: u32, total_pages: u32, total_results: u64) -> Self {
        let total_pages = total_pages.max(1);
        let page = page.clamp(1, total_pages);
        Self {
            items,
            page,
            total_pages,
            total_results,
        }
    }

    /// A page with no results.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 1, 1, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Previous page number, if there is one.
    pub fn prev_page(&self) -> Option<u32> {
        (self.page > 1).then(|| self.page - 1)
    }

    /// Next page number, if there is one.
    pub fn next_page(&self) -> Option<u32> {
        (self.page < self.total_pages).then(|| self.page + 1)
    }
}

impl Default for ResultPage {
    fn default() -> Self {
        Self::empty()
    }
}

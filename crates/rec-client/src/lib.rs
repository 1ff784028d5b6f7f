//! Client for the paginated recommendation service.
//!
//! This crate provides:
//! - `FetchRequest`, one algorithm/page/search combination to ask for
//! - the `RecommendationSource` trait, the seam the browse controller talks to
//! - `HttpRecommendationClient`, the reqwest implementation of that trait
//! - `RecommendationFetchError`, the single error kind callers surface to users
//!
//! ## Example Usage
//! ```ignore
//! use rec_client::{FetchRequest, HttpRecommendationClient, RecommendationSource};
//! use rec_model::Algorithm;
//!
//! let client = HttpRecommendationClient::new("http://127.0.0.1:5000");
//! let request = FetchRequest::new("1", Algorithm::Hybrid, 1).with_search("star");
//! let page = client.fetch_page(&request).await?;
//! ```

pub mod error;
pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use rec_model::{Algorithm, ResultPage};

pub use error::{RecommendationFetchError, UNKNOWN_ERROR_MESSAGE};
pub use http::HttpRecommendationClient;

/// One page request for one algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub user_id: String,
    pub algorithm: Algorithm,
    /// 1-based page number
    pub page: u32,
    /// Title filter; `None` means unfiltered
    pub search: Option<String>,
}

impl FetchRequest {
    pub fn new(user_id: impl Into<String>, algorithm: Algorithm, page: u32) -> Self {
        Self {
            user_id: user_id.into(),
            algorithm,
            page: page.max(1),
            search: None,
        }
    }

    /// Attach a search filter. Blank text leaves the request unfiltered.
    pub fn with_search(mut self, search: impl AsRef<str>) -> Self {
        let search = search.as_ref().trim();
        self.search = (!search.is_empty()).then(|| search.to_string());
        self
    }

    /// Query string parameters, `search` only when a filter is set.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("user_id", self.user_id.clone()),
            ("algorithm", self.algorithm.to_string()),
            ("page", self.page.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}

/// Anything that can serve pages of recommendations.
///
/// `Send + Sync` so a source can be shared with spawned fetch tasks.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Fetch one page of results for one algorithm.
    async fn fetch_page(&self, request: &FetchRequest) -> Result<ResultPage, RecommendationFetchError>;

    /// Fetch every known user identifier (used for autocomplete).
    async fn list_users(&self) -> Result<Vec<String>, RecommendationFetchError>;
}

#[async_trait]
impl<T: RecommendationSource + ?Sized> RecommendationSource for Arc<T> {
    async fn fetch_page(&self, request: &FetchRequest) -> Result<ResultPage, RecommendationFetchError> {
        (**self).fetch_page(request).await
    }

    async fn list_users(&self) -> Result<Vec<String>, RecommendationFetchError> {
        (**self).list_users().await
    }
}

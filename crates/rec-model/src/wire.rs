//! JSON shapes of the recommendation service and their conversion into
//! domain types.
//!
//! The service is lenient about what it sends (`movieId` may be missing,
//! `score` may be null, the title may live under `metadata`), so decoding is
//! done in two steps: serde reads the raw records, then `into_page` sanitizes
//! them into a `ResultPage` that upholds the domain invariants.

use crate::types::{MovieId, ResultPage, ScoredItem};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Success payload of `GET /api/recommendations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationPayload {
    #[serde(default)]
    pub data: Option<Vec<RecommendationRecord>>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_results: Option<u64>,
}

/// One raw record inside `data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationRecord {
    #[serde(rename = "movieId", default)]
    pub movie_id: Value,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub metadata: Option<RecordMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordMetadata {
    #[serde(default)]
    pub title: Option<String>,
}

/// Error payload sent alongside a non-success status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
}

impl RecommendationRecord {
    /// `metadata.title` wins over the top-level `title`; blank strings count as absent.
    fn resolved_title(&self) -> Option<String> {
        let from_metadata = self.metadata.as_ref().and_then(|m| m.title.as_deref());
        from_metadata
            .into_iter()
            .chain(self.title.as_deref())
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string)
    }

    /// Convert into a `ScoredItem`, or `None` when the record has no usable id.
    pub fn into_item(self) -> Option<ScoredItem> {
        let Some(movie_id) = parse_movie_id(&self.movie_id) else {
            warn!(movie_id = %self.movie_id, "Dropping recommendation without a usable movieId");
            return None;
        };
        let title = self.resolved_title();
        let score = sanitize_score(movie_id, self.score);
        Some(ScoredItem {
            movie_id,
            score,
            title,
        })
    }
}

impl RecommendationPayload {
    /// Build a normalized page.
    ///
    /// Missing counters fall back to the page that was asked for, a single page,
    /// and the number of decoded items respectively.
    pub fn into_page(self, requested_page: u32) -> ResultPage {
        let items: Vec<ScoredItem> = self
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(RecommendationRecord::into_item)
            .collect();

        let total_results = self.total_results.unwrap_or(items.len() as u64);
        let page = self.page.unwrap_or(requested_page);
        let total_pages = self.total_pages.unwrap_or(1);

        ResultPage::new(items, page, total_pages, total_results)
    }
}

/// Accept integer ids, integral floats and numeric strings.
pub fn parse_movie_id(value: &Value) -> Option<MovieId> {
    match value {
        Value::Number(n) => {
            if let Some(id) = n.as_u64() {
                MovieId::try_from(id).ok()
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= MovieId::MAX as f64)
                    .map(|f| f as MovieId)
            }
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Validated after narrowing: a finite f64 beyond `f32::MAX` becomes infinite.
fn sanitize_score(movie_id: MovieId, score: Option<f64>) -> f32 {
    let Some(raw) = score else {
        return 0.0;
    };
    let narrowed = raw as f32;
    if narrowed.is_finite() && narrowed >= 0.0 {
        // Drops the sign of -0.0
        narrowed + 0.0
    } else {
        warn!(movie_id, score = raw, "Clamping invalid score to 0");
        0.0
    }
}

/// Normalize the `/api/users` array into string identifiers.
///
/// Numbers and strings are kept (in server order); anything else is skipped.
pub fn decode_user_ids(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| match v {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

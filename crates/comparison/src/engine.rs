//! Side-by-side comparison of two result pages.
//!
//! ## Algorithm
//! 1. Index each page by movie id (the last occurrence of a duplicate id wins)
//! 2. Walk the union of both id sets; a side missing an id scores 0 there
//! 3. Rank rows by the better of the two scores, highest first, ties broken
//!    by ascending movie id, and keep the top N
//! 4. Scale both scores of every kept row against the best score in the top N
//!    so the presentation layer can draw proportional bars
//! 5. Report how much the two id sets overlap (Jaccard index, in percent)

use std::collections::{BTreeMap, BTreeSet};

use rec_model::{placeholder_title, MovieId, ResultPage, ScoredItem};
use serde::Serialize;
use tracing::debug;

/// Rows shown when no explicit size is configured.
pub const DEFAULT_TOP_N: usize = 10;

/// One movie seen through both algorithms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub movie_id: MovieId,
    pub title: String,
    /// Score from algorithm A, 0 when A didn't recommend this movie
    pub score_a: f32,
    /// Score from algorithm B, 0 when B didn't recommend this movie
    pub score_b: f32,
    pub max_score: f32,
    /// `score_a` relative to the best score on display, in `[0, 1]`
    pub width_a: f32,
    /// `score_b` relative to the best score on display, in `[0, 1]`
    pub width_b: f32,
}

impl ComparisonRow {
    /// How much higher A scored this movie than B.
    pub fn delta(&self) -> f32 {
        self.score_a - self.score_b
    }
}

/// Result of comparing two pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// Top rows ordered by `max_score`, highest first
    pub rows: Vec<ComparisonRow>,
    /// Ids recommended by both algorithms
    pub intersection_count: usize,
    /// Ids recommended by either algorithm, never below 1
    pub union_count: usize,
    /// `100 * intersection_count / union_count`
    pub jaccard_percent: f64,
    /// Both pages were empty; nothing else in here is meaningful
    pub is_empty: bool,
}

impl Comparison {
    fn empty() -> Self {
        Self {
            rows: Vec::new(),
            intersection_count: 0,
            union_count: 1,
            jaccard_percent: 0.0,
            is_empty: true,
        }
    }
}

/// Merges and ranks two pages of recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonEngine {
    top_n: usize,
}

impl ComparisonEngine {
    pub fn new() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }

    /// Configure how many rows are kept (default: 10)
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Compare page A against page B.
    pub fn compare(&self, page_a: &ResultPage, page_b: &ResultPage) -> Comparison {
        if page_a.is_empty() && page_b.is_empty() {
            debug!("Both pages are empty, nothing to compare");
            return Comparison::empty();
        }

        let by_id_a = index_by_movie(&page_a.items);
        let by_id_b = index_by_movie(&page_b.items);

        let union: BTreeSet<MovieId> = by_id_a.keys().chain(by_id_b.keys()).copied().collect();
        let intersection_count = by_id_a
            .keys()
            .filter(|id| by_id_b.contains_key(id))
            .count();
        let union_count = union.len().max(1);
        let jaccard_percent = 100.0 * intersection_count as f64 / union_count as f64;

        let mut rows: Vec<ComparisonRow> = union
            .into_iter()
            .map(|movie_id| build_row(movie_id, by_id_a.get(&movie_id), by_id_b.get(&movie_id)))
            .collect();

        rows.sort_by(|x, y| {
            y.max_score
                .total_cmp(&x.max_score)
                .then_with(|| x.movie_id.cmp(&y.movie_id))
        });
        rows.truncate(self.top_n);

        let best = rows.iter().map(|r| r.max_score).fold(0.0_f32, f32::max);
        let base = if best > 0.0 { best } else { 1.0 };
        for row in &mut rows {
            row.width_a = row.score_a / base;
            row.width_b = row.score_b / base;
        }

        debug!(
            rows = rows.len(),
            intersection_count,
            union_count,
            jaccard_percent,
            "Compared result pages"
        );

        Comparison {
            rows,
            intersection_count,
            union_count,
            jaccard_percent,
            is_empty: false,
        }
    }
}

impl Default for ComparisonEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare two pages with the default top-N size.
pub fn compare(page_a: &ResultPage, page_b: &ResultPage) -> Comparison {
    ComparisonEngine::new().compare(page_a, page_b)
}

fn index_by_movie(items: &[ScoredItem]) -> BTreeMap<MovieId, &ScoredItem> {
    let mut map = BTreeMap::new();
    for item in items {
        map.insert(item.movie_id, item);
    }
    map
}

fn build_row(
    movie_id: MovieId,
    item_a: Option<&&ScoredItem>,
    item_b: Option<&&ScoredItem>,
) -> ComparisonRow {
    let score_a = item_a.map(|i| i.score).unwrap_or(0.0);
    let score_b = item_b.map(|i| i.score).unwrap_or(0.0);
    let title = item_a
        .and_then(|i| i.title.clone())
        .or_else(|| item_b.and_then(|i| i.title.clone()))
        .unwrap_or_else(|| placeholder_title(movie_id));

    ComparisonRow {
        movie_id,
        title,
        score_a,
        score_b,
        max_score: score_a.max(score_b),
        width_a: 0.0,
        width_b: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: &[(MovieId, f32)]) -> ResultPage {
        let items = items
            .iter()
            .map(|&(id, score)| ScoredItem::new(id, score))
            .collect::<Vec<_>>();
        let len = items.len() as u64;
        ResultPage::new(items, 1, 1, len)
    }

    #[test]
    fn test_reference_scenario() {
        let a = page(&[(1, 0.9), (2, 0.5)]);
        let b = page(&[(2, 0.7), (3, 0.4)]);

        let result = compare(&a, &b);

        assert!(!result.is_empty);
        assert_eq!(result.union_count, 3);
        assert_eq!(result.intersection_count, 1);
        assert!((result.jaccard_percent - 100.0 / 3.0).abs() < 1e-9);

        let ids: Vec<MovieId> = result.rows.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(result.rows[0].max_score, 0.9);
        assert_eq!(result.rows[1].max_score, 0.7);
        assert_eq!(result.rows[2].max_score, 0.4);

        // Movie 2 is on both sides
        assert_eq!(result.rows[1].score_a, 0.5);
        assert_eq!(result.rows[1].score_b, 0.7);
        assert!((result.rows[1].delta() - (-0.2)).abs() < 1e-6);
    }

    #[test]
    fn test_widths_are_relative_to_best_displayed_score() {
        let a = page(&[(1, 2.0), (2, 1.0)]);
        let b = page(&[(2, 0.5)]);

        let result = compare(&a, &b);

        assert_eq!(result.rows[0].width_a, 1.0);
        assert_eq!(result.rows[0].width_b, 0.0);
        assert_eq!(result.rows[1].width_a, 0.5);
        assert_eq!(result.rows[1].width_b, 0.25);
    }

    #[test]
    fn test_all_zero_scores_do_not_divide_by_zero() {
        let a = page(&[(1, 0.0)]);
        let b = page(&[(2, 0.0)]);

        let result = compare(&a, &b);

        assert_eq!(result.rows.len(), 2);
        assert!(result.rows.iter().all(|r| r.width_a == 0.0 && r.width_b == 0.0));
    }

    #[test]
    fn test_both_empty() {
        let result = compare(&ResultPage::empty(), &ResultPage::empty());

        assert!(result.is_empty);
        assert!(result.rows.is_empty());
        assert_eq!(result.intersection_count, 0);
        assert_eq!(result.union_count, 1);
        assert_eq!(result.jaccard_percent, 0.0);
    }

    #[test]
    fn test_one_side_empty_is_not_the_empty_case() {
        let a = page(&[(1, 0.3), (2, 0.6)]);
        let result = compare(&a, &ResultPage::empty());

        assert!(!result.is_empty);
        assert_eq!(result.union_count, 2);
        assert_eq!(result.intersection_count, 0);
        assert_eq!(result.jaccard_percent, 0.0);
        assert_eq!(result.rows[0].movie_id, 2);
        assert!(result.rows.iter().all(|r| r.score_b == 0.0));
    }

    #[test]
    fn test_truncates_to_top_ten() {
        let a = page(&(1..=8).map(|id| (id, id as f32)).collect::<Vec<_>>());
        let b = page(&(5..=12).map(|id| (id, id as f32 / 2.0)).collect::<Vec<_>>());

        let result = compare(&a, &b);

        assert_eq!(result.union_count, 12);
        assert_eq!(result.intersection_count, 4);
        assert_eq!(result.rows.len(), DEFAULT_TOP_N);
        assert!(result.rows.windows(2).all(|w| w[0].max_score >= w[1].max_score));
    }

    #[test]
    fn test_custom_top_n() {
        let a = page(&[(1, 0.1), (2, 0.2), (3, 0.3)]);
        let result = ComparisonEngine::new().with_top_n(2).compare(&a, &a);

        let ids: Vec<MovieId> = result.rows.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(result.jaccard_percent, 100.0);
    }

    #[test]
    fn test_ties_are_broken_by_movie_id() {
        let a = page(&[(30, 0.5), (10, 0.5)]);
        let b = page(&[(20, 0.5)]);

        let result = compare(&a, &b);

        let ids: Vec<MovieId> = result.rows.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_duplicate_ids_last_one_wins() {
        let a = page(&[(1, 0.9), (1, 0.2)]);
        let b = page(&[]);

        let result = compare(&a, &b);

        assert_eq!(result.union_count, 1);
        assert_eq!(result.rows[0].score_a, 0.2);
    }

    #[test]
    fn test_title_resolution_prefers_a_then_b_then_placeholder() {
        let a = ResultPage::new(
            vec![ScoredItem::new(1, 0.5).with_title("From A"), ScoredItem::new(2, 0.4)],
            1,
            1,
            2,
        );
        let b = ResultPage::new(
            vec![
                ScoredItem::new(1, 0.3).with_title("From B"),
                ScoredItem::new(2, 0.3).with_title("Only B"),
                ScoredItem::new(3, 0.1),
            ],
            1,
            1,
            3,
        );

        let result = compare(&a, &b);
        let titles: Vec<&str> = result.rows.iter().map(|r| r.title.as_str()).collect();

        assert_eq!(titles, vec!["From A", "Only B", "Phim ID: 3"]);
    }
}

//! Autocomplete for user ids.
//!
//! The full id list is fetched once per session and cached; suggestions are
//! prefix matches against that cache.

use rec_client::RecommendationSource;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Suggestions returned per query.
pub const MAX_SUGGESTIONS: usize = 10;

/// Session-scoped cache of known user ids.
pub struct UserDirectory<S> {
    source: S,
    users: OnceCell<Vec<String>>,
}

impl<S: RecommendationSource> UserDirectory<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            users: OnceCell::new(),
        }
    }

    /// All known ids, fetched on first use.
    ///
    /// A failed fetch caches an empty list, so autocomplete quietly stays off
    /// for the rest of the session.
    pub async fn users(&self) -> &[String] {
        self.users
            .get_or_init(|| async {
                match self.source.list_users().await {
                    Ok(users) => {
                        info!(count = users.len(), "Cached user ids for autocomplete");
                        users
                    }
                    Err(e) => {
                        warn!(error = %e, "Could not load user ids, autocomplete disabled");
                        Vec::new()
                    }
                }
            })
            .await
    }

    /// Up to [`MAX_SUGGESTIONS`] ids starting with `query`.
    pub async fn suggest(&self, query: &str) -> Vec<String> {
        suggest_from(self.users().await, query)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Prefix-match `query` against `users`, keeping their order.
///
/// A blank query suggests nothing.
pub fn suggest_from<'a>(users: &'a [String], query: &str) -> Vec<&'a str> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    users
        .iter()
        .filter(|id| id.starts_with(query))
        .take(MAX_SUGGESTIONS)
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedSource;
    use std::sync::Arc;

    fn ids(range: std::ops::RangeInclusive<u32>) -> Vec<String> {
        range.map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_suggest_prefix_match() {
        let users = ids(1..=30);
        assert_eq!(suggest_from(&users, "2"), vec!["2", "20", "21", "22", "23", "24", "25", "26", "27", "28"]);
        assert_eq!(suggest_from(&users, " 3 "), vec!["3", "30"]);
    }

    #[test]
    fn test_blank_query_suggests_nothing() {
        let users = ids(1..=5);
        assert!(suggest_from(&users, "").is_empty());
        assert!(suggest_from(&users, "   ").is_empty());
    }

    #[tokio::test]
    async fn test_users_are_fetched_once() {
        let source = Arc::new(ScriptedSource::new().with_users(ids(1..=12)));
        let directory = UserDirectory::new(source.clone());

        assert_eq!(directory.suggest("1").await, vec!["1", "10", "11", "12"]);
        assert_eq!(directory.suggest("9").await, vec!["9"]);
        assert_eq!(source.user_list_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_caches_empty_list() {
        let source = Arc::new(ScriptedSource::new().failing_user_list());
        let directory = UserDirectory::new(source.clone());

        assert!(directory.suggest("1").await.is_empty());
        assert!(directory.users().await.is_empty());
        assert_eq!(source.user_list_calls(), 1);
    }
}

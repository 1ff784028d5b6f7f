//! In-memory recommendation source for controller, driver and directory tests.
//!
//! Pages are deterministic: for page `p` the hybrid algorithm returns movies
//! `10p+1` (0.9) and `10p+2` (0.5), every other algorithm returns `10p+2`
//! (0.7) and `10p+3` (0.4). The catalogue has three pages. A search keeps
//! only titles containing the search text.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rec_client::{FetchRequest, RecommendationFetchError, RecommendationSource};
use rec_model::{Algorithm, ResultPage, ScoredItem};

pub(crate) const TOTAL_PAGES: u32 = 3;

pub(crate) struct ScriptedSource {
    requests: Mutex<Vec<FetchRequest>>,
    failing: Mutex<HashSet<Algorithm>>,
    users: Option<Vec<String>>,
    user_list_calls: AtomicUsize,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            users: Some(Vec::new()),
            user_list_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_users(mut self, users: Vec<String>) -> Self {
        self.users = Some(users);
        self
    }

    pub(crate) fn failing_user_list(mut self) -> Self {
        self.users = None;
        self
    }

    /// Make every fetch for `algorithm` fail with a service error.
    pub(crate) fn fail_algorithm(&self, algorithm: Algorithm) {
        self.failing.lock().unwrap().insert(algorithm);
    }

    pub(crate) fn recover_algorithm(&self, algorithm: &Algorithm) {
        self.failing.lock().unwrap().remove(algorithm);
    }

    pub(crate) fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn user_list_calls(&self) -> usize {
        self.user_list_calls.load(Ordering::SeqCst)
    }

    /// The page this source serves for `request`, without recording it.
    pub(crate) fn page_for(request: &FetchRequest) -> ResultPage {
        let page = request.page.min(TOTAL_PAGES);
        let base = page * 10;
        let scored = if request.algorithm == Algorithm::Hybrid {
            vec![(base + 1, 0.9), (base + 2, 0.5)]
        } else {
            vec![(base + 2, 0.7), (base + 3, 0.4)]
        };

        let items: Vec<ScoredItem> = scored
            .into_iter()
            .map(|(id, score)| ScoredItem::new(id, score).with_title(format!("Movie {}", id)))
            .filter(|item| match &request.search {
                Some(search) => item.display_title().contains(search.as_str()),
                None => true,
            })
            .collect();

        if request.search.is_some() {
            let len = items.len() as u64;
            ResultPage::new(items, 1, 1, len)
        } else {
            ResultPage::new(items, page, TOTAL_PAGES, (TOTAL_PAGES * 2) as u64)
        }
    }
}

#[async_trait]
impl RecommendationSource for ScriptedSource {
    async fn fetch_page(&self, request: &FetchRequest) -> Result<ResultPage, RecommendationFetchError> {
        self.requests.lock().unwrap().push(request.clone());

        if request.user_id == "missing" {
            return Err(RecommendationFetchError::service(
                404,
                Some(format!("User {} not found", request.user_id)),
            ));
        }
        if self.failing.lock().unwrap().contains(&request.algorithm) {
            return Err(RecommendationFetchError::service(
                503,
                Some(format!("Algorithm {} unavailable", request.algorithm)),
            ));
        }

        Ok(Self::page_for(request))
    }

    async fn list_users(&self) -> Result<Vec<String>, RecommendationFetchError> {
        self.user_list_calls.fetch_add(1, Ordering::SeqCst);
        self.users
            .clone()
            .ok_or_else(|| RecommendationFetchError::Transport("connection refused".to_string()))
    }
}

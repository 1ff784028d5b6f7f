//! # Browse Controller
//!
//! Owns the session state and the published view model, and turns user
//! intents into fetch cycles:
//! 1. Freeze a snapshot of the state and mark the view as loading
//! 2. Fetch the primary algorithm's page
//! 3. Publish it, taking the page counters from the response
//! 4. When comparing, fetch the secondary algorithm at the same page
//! 5. Run the comparison engine and publish its output
//! 6. Return to idle, with the error message if any step failed
//!
//! A cycle can be driven inline (`submit`, `paginate`, `load_page`) or split
//! into `begin_cycle` / `complete_primary` / `complete_secondary` so the
//! fetches can run elsewhere. Each cycle carries a generation number; a
//! completion whose generation is not the latest is discarded, so a slow
//! response can never overwrite a newer one.

use comparison::ComparisonEngine;
use rec_client::{FetchRequest, RecommendationFetchError, RecommendationSource};
use rec_model::{Algorithm, ResultPage};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::state::{BrowseState, Submission};
use crate::view::{ComparisonView, Phase, PrimaryView, ViewModel};

/// A started fetch cycle: what to fetch for the primary list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclePlan {
    pub generation: u64,
    /// State as it was when the cycle started
    pub snapshot: BrowseState,
    /// Requested page
    pub page: u32,
}

impl CyclePlan {
    pub fn primary_request(&self) -> FetchRequest {
        FetchRequest::new(
            self.snapshot.user_id.clone(),
            self.snapshot.algorithm_a.clone(),
            self.page,
        )
        .with_search(&self.snapshot.search)
    }
}

/// Second half of a comparing cycle: what to fetch for algorithm B.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryPlan {
    pub generation: u64,
    pub request: FetchRequest,
    pub algorithm_a: Algorithm,
    /// Primary page the secondary one is compared against
    pub primary: ResultPage,
}

/// State machine behind the browse screen.
pub struct BrowseController<S> {
    source: S,
    engine: ComparisonEngine,
    state: BrowseState,
    view: ViewModel,
    /// Page count of the last successful primary fetch
    total_pages: Option<u32>,
    generation: u64,
    publisher: watch::Sender<ViewModel>,
}

impl<S: RecommendationSource> BrowseController<S> {
    pub fn new(source: S) -> Self {
        let (publisher, _) = watch::channel(ViewModel::default());
        Self {
            source,
            engine: ComparisonEngine::new(),
            state: BrowseState::new(),
            view: ViewModel::default(),
            total_pages: None,
            generation: 0,
            publisher,
        }
    }

    /// Use a differently configured comparison engine.
    pub fn with_engine(mut self, engine: ComparisonEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    /// Receive every published view model.
    pub fn subscribe(&self) -> watch::Receiver<ViewModel> {
        self.publisher.subscribe()
    }

    /// Generation of the most recently started cycle (0 before the first).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Page count of the last successful primary fetch.
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    fn publish(&self) {
        self.publisher.send_replace(self.view.clone());
    }

    // ========================================================================
    // Intents
    // ========================================================================

    /// Store a submitted form and start a cycle at page 1.
    ///
    /// Returns `None` (no fetch) when the submitted user id is empty.
    pub fn apply_submission(&mut self, submission: Submission) -> Option<CyclePlan> {
        self.state = BrowseState {
            user_id: submission.user_id.trim().to_string(),
            algorithm_a: submission.algorithm_a,
            algorithm_b: submission.algorithm_b.or_else(|| self.state.algorithm_b.take()),
            search: submission.search.trim().to_string(),
            compare_enabled: submission.compare,
            current_page: 1,
        };
        if self.state.compare_enabled && self.state.algorithm_b.is_none() {
            self.state.algorithm_b = Some(Algorithm::default());
        }
        if !self.state.compare_enabled && self.view.comparison.take().is_some() {
            self.publish();
        }
        self.begin_cycle(1)
    }

    /// Like [`apply_submission`](Self::apply_submission), but the first cycle
    /// asks for `page` directly. The service clamps a page beyond its range,
    /// and the response's page number is what gets stored.
    pub fn apply_submission_at(&mut self, submission: Submission, page: u32) -> Option<CyclePlan> {
        let plan = self.apply_submission(submission)?;
        Some(CyclePlan {
            page: page.max(1),
            ..plan
        })
    }

    /// Validate a page change and start a cycle for it.
    ///
    /// Ignored unless a primary page has been fetched, `target` lies within
    /// its page count, and differs from the current page.
    pub fn plan_paginate(&mut self, target: u32) -> Option<CyclePlan> {
        let total_pages = self.total_pages?;
        if target < 1 || target > total_pages || target == self.state.current_page {
            debug!(target, total_pages, current = self.state.current_page, "Ignoring page change");
            return None;
        }
        self.begin_cycle(target)
    }

    /// Store new search text.
    ///
    /// Returns whether a (debounced) page-1 fetch should follow, i.e. whether
    /// a user is selected.
    pub fn set_search_text(&mut self, text: &str) -> bool {
        self.state.search = text.trim().to_string();
        self.state.has_user()
    }

    /// Start the page-1 cycle a settled search edit asks for.
    pub fn plan_search(&mut self) -> Option<CyclePlan> {
        self.begin_cycle(1)
    }

    /// Turn comparison on or off.
    ///
    /// Turning it off hides the comparison right away; neither direction fetches.
    pub fn toggle_compare(&mut self, enabled: bool) {
        self.state.compare_enabled = enabled;
        if enabled && self.state.algorithm_b.is_none() {
            self.state.algorithm_b = Some(Algorithm::default());
        }
        if !enabled && self.view.comparison.take().is_some() {
            debug!("Comparison cleared");
            self.publish();
        }
    }

    /// Select the secondary algorithm for the next cycle.
    pub fn set_algorithm_b(&mut self, algorithm: Algorithm) {
        self.state.algorithm_b = Some(algorithm);
    }

    // ========================================================================
    // Fetch cycle
    // ========================================================================

    /// Start a cycle at `page`: bump the generation, show loading, clear the error.
    ///
    /// Returns `None` while no user is selected.
    pub fn begin_cycle(&mut self, page: u32) -> Option<CyclePlan> {
        if !self.state.has_user() {
            debug!("No user selected, skipping fetch");
            return None;
        }

        self.generation += 1;
        self.view.phase = Phase::Loading;
        self.view.error = None;
        self.publish();

        debug!(generation = self.generation, page, "Fetch cycle started");
        Some(CyclePlan {
            generation: self.generation,
            snapshot: self.state.clone(),
            page: page.max(1),
        })
    }

    fn is_stale(&self, generation: u64) -> bool {
        if generation != self.generation {
            debug!(generation, latest = self.generation, "Discarding stale fetch result");
            return true;
        }
        false
    }

    /// Apply the primary fetch result.
    ///
    /// Returns the secondary fetch to run when this cycle compares.
    pub fn complete_primary(
        &mut self,
        plan: &CyclePlan,
        result: Result<ResultPage, RecommendationFetchError>,
    ) -> Option<SecondaryPlan> {
        if self.is_stale(plan.generation) {
            return None;
        }

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.fail(e);
                return None;
            }
        };

        self.state.current_page = page.page;
        self.total_pages = Some(page.total_pages);
        self.view.primary = Some(PrimaryView::new(plan.snapshot.algorithm_a.clone(), page.clone()));

        info!(
            user_id = %plan.snapshot.user_id,
            algorithm = %plan.snapshot.algorithm_a,
            page = page.page,
            total_pages = page.total_pages,
            items = page.items.len(),
            "Primary page loaded"
        );

        if plan.snapshot.compare_enabled && self.state.compare_enabled {
            self.publish();
            let algorithm_b = plan.snapshot.secondary_algorithm();
            let request = FetchRequest::new(plan.snapshot.user_id.clone(), algorithm_b, plan.page)
                .with_search(&plan.snapshot.search);
            return Some(SecondaryPlan {
                generation: plan.generation,
                request,
                algorithm_a: plan.snapshot.algorithm_a.clone(),
                primary: page,
            });
        }

        self.view.comparison = None;
        self.finish();
        None
    }

    /// Apply the secondary fetch result and publish the comparison.
    pub fn complete_secondary(
        &mut self,
        plan: &SecondaryPlan,
        result: Result<ResultPage, RecommendationFetchError>,
    ) {
        if self.is_stale(plan.generation) {
            return;
        }

        let page_b = match result {
            Ok(page) => page,
            Err(e) => {
                self.fail(e);
                return;
            }
        };

        if !self.state.compare_enabled {
            // Compare was switched off while B was loading
            self.view.comparison = None;
            self.finish();
            return;
        }

        let result = self.engine.compare(&plan.primary, &page_b);
        info!(
            algorithm_a = %plan.algorithm_a,
            algorithm_b = %plan.request.algorithm,
            intersection = result.intersection_count,
            union = result.union_count,
            jaccard_percent = result.jaccard_percent,
            "Comparison ready"
        );

        self.view.comparison = Some(ComparisonView {
            algorithm_a: plan.algorithm_a.clone(),
            algorithm_b: plan.request.algorithm.clone(),
            result,
        });
        self.finish();
    }

    fn fail(&mut self, error: RecommendationFetchError) {
        warn!(error = %error, generation = self.generation, "Fetch cycle failed");
        self.view.error = Some(error.to_string());
        self.view.comparison = None;
        self.finish();
    }

    fn finish(&mut self) {
        self.view.phase = Phase::Idle;
        self.publish();
    }

    /// Run a started cycle to completion against this controller's source.
    pub async fn run_cycle(&mut self, plan: CyclePlan) {
        let result = self.source.fetch_page(&plan.primary_request()).await;
        if let Some(secondary) = self.complete_primary(&plan, result) {
            let result = self.source.fetch_page(&secondary.request).await;
            self.complete_secondary(&secondary, result);
        }
    }

    /// Submit the form and wait for the resulting cycle.
    pub async fn submit(&mut self, submission: Submission) -> &ViewModel {
        if let Some(plan) = self.apply_submission(submission) {
            self.run_cycle(plan).await;
        }
        &self.view
    }

    /// Submit the form with its first cycle at `page` and wait for it.
    pub async fn submit_at(&mut self, submission: Submission, page: u32) -> &ViewModel {
        if let Some(plan) = self.apply_submission_at(submission, page) {
            self.run_cycle(plan).await;
        }
        &self.view
    }

    /// Go to `target` and wait for the cycle. Returns whether a fetch happened.
    pub async fn paginate(&mut self, target: u32) -> bool {
        match self.plan_paginate(target) {
            Some(plan) => {
                self.run_cycle(plan).await;
                true
            }
            None => false,
        }
    }

    /// Apply a settled search edit: back to page 1 with the stored search text.
    pub async fn search(&mut self) -> &ViewModel {
        if let Some(plan) = self.plan_search() {
            self.run_cycle(plan).await;
        }
        &self.view
    }

    /// Reload `page` with the current selections.
    pub async fn load_page(&mut self, page: u32) -> &ViewModel {
        if let Some(plan) = self.begin_cycle(page) {
            self.run_cycle(plan).await;
        }
        &self.view
    }
}

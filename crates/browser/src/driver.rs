//! Event loop feeding user intents into a [`BrowseController`].
//!
//! Fetches run as spawned tasks and report back over a channel, so intents
//! keep being handled while a cycle is in flight. Search edits go through a
//! [`TrailingDebounce`]; a submit drops any edit still waiting on it.

use std::time::Duration;

use rec_client::{RecommendationFetchError, RecommendationSource};
use rec_model::{Algorithm, ResultPage};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::controller::{BrowseController, CyclePlan, SecondaryPlan};
use crate::debounce::TrailingDebounce;
use crate::state::Submission;
use crate::view::ViewModel;

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Submit(Submission),
    Paginate(u32),
    NextPage,
    PrevPage,
    /// Raw search box contents after an edit
    Search(String),
    ToggleCompare(bool),
    SetAlgorithmB(Algorithm),
}

enum CycleEvent {
    Primary(CyclePlan, Result<ResultPage, RecommendationFetchError>),
    Secondary(SecondaryPlan, Result<ResultPage, RecommendationFetchError>),
}

pub struct BrowseDriver<S> {
    controller: BrowseController<S>,
    debounce: TrailingDebounce<()>,
}

impl<S> BrowseDriver<S>
where
    S: RecommendationSource + Clone + 'static,
{
    /// Drive `controller`, settling search edits after `search_delay`.
    pub fn new(controller: BrowseController<S>, search_delay: Duration) -> Self {
        Self {
            controller,
            debounce: TrailingDebounce::new(search_delay),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewModel> {
        self.controller.subscribe()
    }

    /// Process intents until the sender is dropped and all work has settled.
    ///
    /// Returns the controller so callers can inspect the final state.
    pub async fn run(mut self, mut intents: mpsc::Receiver<Intent>) -> BrowseController<S> {
        let (events_tx, mut events) = mpsc::unbounded_channel();
        let mut in_flight = 0usize;
        let mut intents_open = true;

        info!(delay_ms = self.debounce.delay().as_millis() as u64, "Browse driver started");

        loop {
            if !intents_open && in_flight == 0 && !self.debounce.is_pending() {
                break;
            }

            tokio::select! {
                intent = intents.recv(), if intents_open => match intent {
                    Some(intent) => {
                        if let Some(plan) = self.handle(intent) {
                            self.spawn_primary(plan, &events_tx);
                            in_flight += 1;
                        }
                    }
                    None => {
                        debug!("Intent channel closed");
                        intents_open = false;
                    }
                },
                () = self.debounce.fired() => {
                    if let Some(plan) = self.controller.plan_search() {
                        self.spawn_primary(plan, &events_tx);
                        in_flight += 1;
                    }
                }
                Some(event) = events.recv() => {
                    in_flight -= 1;
                    match event {
                        CycleEvent::Primary(plan, result) => {
                            if let Some(secondary) = self.controller.complete_primary(&plan, result) {
                                self.spawn_secondary(secondary, &events_tx);
                                in_flight += 1;
                            }
                        }
                        CycleEvent::Secondary(plan, result) => {
                            self.controller.complete_secondary(&plan, result);
                        }
                    }
                }
            }
        }

        info!("Browse driver stopped");
        self.controller
    }

    fn handle(&mut self, intent: Intent) -> Option<CyclePlan> {
        debug!(?intent, "Handling intent");
        match intent {
            Intent::Submit(submission) => {
                self.debounce.cancel();
                self.controller.apply_submission(submission)
            }
            Intent::Paginate(page) => self.controller.plan_paginate(page),
            Intent::NextPage => {
                let page = self.controller.state().current_page.saturating_add(1);
                self.controller.plan_paginate(page)
            }
            Intent::PrevPage => {
                let page = self.controller.state().current_page.saturating_sub(1);
                self.controller.plan_paginate(page)
            }
            Intent::Search(text) => {
                if self.controller.set_search_text(&text) {
                    self.debounce.push(());
                } else {
                    self.debounce.cancel();
                }
                None
            }
            Intent::ToggleCompare(enabled) => {
                self.controller.toggle_compare(enabled);
                None
            }
            Intent::SetAlgorithmB(algorithm) => {
                self.controller.set_algorithm_b(algorithm);
                None
            }
        }
    }

    fn spawn_primary(&self, plan: CyclePlan, events: &mpsc::UnboundedSender<CycleEvent>) {
        let source = self.controller.source().clone();
        let events = events.clone();
        tokio::spawn(async move {
            let result = source.fetch_page(&plan.primary_request()).await;
            // The loop owns the receiver for as long as anything is in flight
            let _ = events.send(CycleEvent::Primary(plan, result));
        });
    }

    fn spawn_secondary(&self, plan: SecondaryPlan, events: &mpsc::UnboundedSender<CycleEvent>) {
        let source = self.controller.source().clone();
        let events = events.clone();
        tokio::spawn(async move {
            let result = source.fetch_page(&plan.request).await;
            let _ = events.send(CycleEvent::Secondary(plan, result));
        });
    }
}

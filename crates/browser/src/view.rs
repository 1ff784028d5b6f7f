//! View model published to the presentation layer.
//!
//! Rendering-agnostic: it holds data and pagination descriptors, never text
//! meant for the user (apart from the error message, which is surfaced as-is).

use comparison::Comparison;
use rec_model::{Algorithm, ResultPage};
use serde::Serialize;

/// Whether a fetch cycle is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
}

/// Status flag shown next to the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Status {
    Idle,
    Loading,
    Error(String),
}

/// The primary result list with what the pager needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimaryView {
    pub algorithm: Algorithm,
    pub page: ResultPage,
    /// Target of the "previous" button, `None` on the first page
    pub prev_page: Option<u32>,
    /// Target of the "next" button, `None` on the last page
    pub next_page: Option<u32>,
    /// The pager is only worth showing with more than one page
    pub show_pagination: bool,
}

impl PrimaryView {
    pub fn new(algorithm: Algorithm, page: ResultPage) -> Self {
        Self {
            algorithm,
            prev_page: page.prev_page(),
            next_page: page.next_page(),
            show_pagination: page.total_pages > 1,
            page,
        }
    }
}

/// Comparison table between the primary and the secondary algorithm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonView {
    pub algorithm_a: Algorithm,
    pub algorithm_b: Algorithm,
    pub result: Comparison,
}

impl ComparisonView {
    pub fn label_a(&self) -> String {
        self.algorithm_a.label()
    }

    pub fn label_b(&self) -> String {
        self.algorithm_b.label()
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewModel {
    pub primary: Option<PrimaryView>,
    pub comparison: Option<ComparisonView>,
    pub phase: Phase,
    /// Message of the last failed cycle, cleared when the next one starts
    pub error: Option<String>,
}

impl ViewModel {
    /// Loading wins over a stale error; an error outlives the cycle that raised it.
    pub fn status(&self) -> Status {
        match (&self.phase, &self.error) {
            (Phase::Loading, _) => Status::Loading,
            (Phase::Idle, Some(message)) => Status::Error(message.clone()),
            (Phase::Idle, None) => Status::Idle,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }
}

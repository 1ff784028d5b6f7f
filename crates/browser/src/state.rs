//! Session state owned by the browse controller.

use rec_model::Algorithm;

/// Everything the user has selected so far.
///
/// Created once per session with empty defaults. Only the controller mutates
/// it; a fetch cycle works on a frozen clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
    pub user_id: String,
    /// Algorithm of the primary list
    pub algorithm_a: Algorithm,
    /// Algorithm compared against; `None` until the user picks one
    pub algorithm_b: Option<Algorithm>,
    /// Trimmed title filter, empty for none
    pub search: String,
    pub compare_enabled: bool,
    /// Page reported by the last successful primary fetch
    pub current_page: u32,
}

impl BrowseState {
    pub fn new() -> Self {
        Self {
            user_id: String::new(),
            algorithm_a: Algorithm::default(),
            algorithm_b: None,
            search: String::new(),
            compare_enabled: false,
            current_page: 1,
        }
    }

    /// Fetch cycles only run once a user id is set.
    pub fn has_user(&self) -> bool {
        !self.user_id.is_empty()
    }

    /// Secondary algorithm, falling back to the default one.
    pub fn secondary_algorithm(&self) -> Algorithm {
        self.algorithm_b.clone().unwrap_or_default()
    }
}

impl Default for BrowseState {
    fn default() -> Self {
        Self::new()
    }
}

/// Values read from the form when the user submits it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub user_id: String,
    pub algorithm_a: Algorithm,
    pub algorithm_b: Option<Algorithm>,
    pub search: String,
    pub compare: bool,
}

impl Submission {
    pub fn new(user_id: impl Into<String>, algorithm_a: Algorithm) -> Self {
        Self {
            user_id: user_id.into(),
            algorithm_a,
            ..Self::default()
        }
    }

    /// Enable comparison against `algorithm_b`.
    pub fn compare_with(mut self, algorithm_b: Algorithm) -> Self {
        self.algorithm_b = Some(algorithm_b);
        self.compare = true;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}

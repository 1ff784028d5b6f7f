//! # Rec Model Crate
//!
//! Data shapes shared by every other crate in the workspace.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieId, Algorithm, ScoredItem, ResultPage)
//! - **wire**: JSON payloads of the recommendation service and their
//!   sanitizing conversion into domain types
//!
//! ## Example Usage
//!
//! ```ignore
//! use rec_model::wire::RecommendationPayload;
//!
//! let payload: RecommendationPayload = serde_json::from_str(body)?;
//! let page = payload.into_page(1);
//!
//! for item in &page.items {
//!     println!("{} {:.2}", item.display_title(), item.score);
//! }
//! ```

// Public modules
pub mod types;
pub mod wire;

// Re-export commonly used types for convenience
pub use types::{placeholder_title, Algorithm, MovieId, ResultPage, ScoredItem};

//! # Browser Crate
//!
//! Session logic behind the recommendation browse screen, independent of any
//! presentation layer.
//!
//! ## Main Components
//!
//! - **state**: What the user has selected (user, algorithms, search, page)
//! - **controller**: Fetch cycles, pagination and compare toggling over a
//!   `RecommendationSource`, publishing a `ViewModel` on a watch channel
//! - **driver**: Async event loop turning `Intent`s into controller calls,
//!   with debounced search
//! - **debounce**: Generic trailing-edge debounce
//! - **users**: Cached user id list for autocomplete
//! - **view**: The published view model
//! - **config**: `REEL_*` environment configuration
//!
//! ## Example Usage
//!
//! ```ignore
//! use browser::{BrowseConfig, BrowseController, BrowseDriver, Intent, Submission};
//! use rec_model::Algorithm;
//!
//! let config = BrowseConfig::from_env()?;
//! let controller = BrowseController::new(config.build_client()?);
//! let driver = BrowseDriver::new(controller, config.debounce());
//! let mut updates = driver.subscribe();
//!
//! let (tx, rx) = tokio::sync::mpsc::channel(16);
//! tokio::spawn(driver.run(rx));
//! tx.send(Intent::Submit(Submission::new("1", Algorithm::Hybrid))).await?;
//! ```

pub mod config;
pub mod controller;
pub mod debounce;
pub mod driver;
pub mod state;
pub mod users;
pub mod view;

#[cfg(test)]
mod testing;

pub use config::BrowseConfig;
pub use controller::{BrowseController, CyclePlan, SecondaryPlan};
pub use debounce::TrailingDebounce;
pub use driver::{BrowseDriver, Intent};
pub use state::{BrowseState, Submission};
pub use users::{suggest_from, UserDirectory, MAX_SUGGESTIONS};
pub use view::{ComparisonView, Phase, PrimaryView, Status, ViewModel};

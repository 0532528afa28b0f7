//! Search session module.
//!
//! Tracks the active query, accumulated result pages, and the selected
//! title, and turns user actions into OMDB requests.

mod controller;
mod request;
mod state;

#[allow(clippy::module_name_repetitions)]
pub use controller::SearchController;
pub use request::{ActionOutcome, Completion, PendingRequest};
#[allow(clippy::module_name_repetitions)]
pub use state::{Pagination, SearchFilters, SearchQuery, SearchSession, Selection, View};

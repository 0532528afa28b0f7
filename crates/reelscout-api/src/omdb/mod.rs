//! OMDB API client module.
//!
//! Handles HTTP requests to the OMDB endpoint and retrieves
//! title search pages and per-title details.

mod api;
mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOmdbApi, OmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, OmdbClient, OmdbClientBuilder, imdb_title_url};
pub use types::{
    DetailOutcome, MovieDetail, Poster, Rating, SearchOutcome, SearchParams, SearchResultItem,
    TitleKind,
};

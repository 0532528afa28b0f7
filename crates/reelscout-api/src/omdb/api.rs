//! `OmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{DetailOutcome, SearchOutcome, SearchParams};

/// OMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
///
/// An `Ok` value means OMDB answered; `NotFound` variants carry its
/// `Error` text. `Err` is reserved for transport failures.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(OmdbApi: Send)]
pub trait LocalOmdbApi {
    /// Searches titles by free text, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search(&self, params: &SearchParams) -> Result<SearchOutcome>;

    /// Fetches the full record of a single title by IMDb ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn title_details(&self, imdb_id: &str) -> Result<DetailOutcome>;
}

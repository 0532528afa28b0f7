//! API client library for reelscout.
//!
//! Provides a client for the OMDB API and the search session that
//! drives paginated title search and per-title detail lookup.

/// OMDB API client.
pub mod omdb;

/// Search session state and controller.
pub mod session;

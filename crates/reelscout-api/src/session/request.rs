//! Requests issued by a search session and their completions.

use anyhow::Result;

use super::state::SearchQuery;
use crate::omdb::{DetailOutcome, OmdbApi, SearchOutcome, SearchParams};

/// A request decided by the session, not yet sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    /// Page 1 of a newly submitted query.
    Search {
        /// Submitted query.
        query: SearchQuery,
        /// Request parameters.
        params: SearchParams,
    },
    /// A further page of the active query.
    NextPage {
        /// Request parameters; `params.page` is the page being loaded.
        params: SearchParams,
    },
    /// Detail lookup of one title.
    Details {
        /// IMDb identifier.
        imdb_id: String,
    },
}

impl PendingRequest {
    /// Sends the request and wraps the response for [`super::SearchSession::apply`].
    pub async fn execute<A>(self, api: &A) -> Completion
    where
        A: OmdbApi + Sync,
    {
        match self {
            Self::Search { query, params } => {
                let result = api.search(&params).await;
                Completion::Search { query, result }
            }
            Self::NextPage { params } => {
                let result = api.search(&params).await;
                Completion::NextPage {
                    page: params.page,
                    result,
                }
            }
            Self::Details { imdb_id } => {
                let result = api.title_details(&imdb_id).await;
                Completion::Details { imdb_id, result }
            }
        }
    }
}

/// A finished request, ready to be applied to the session.
///
/// `Err` results are transport failures.
#[derive(Debug)]
pub enum Completion {
    /// Response to [`PendingRequest::Search`].
    Search {
        /// Query the request was made for.
        query: SearchQuery,
        /// Response.
        result: Result<SearchOutcome>,
    },
    /// Response to [`PendingRequest::NextPage`].
    NextPage {
        /// Page the request was made for.
        page: u32,
        /// Response.
        result: Result<SearchOutcome>,
    },
    /// Response to [`PendingRequest::Details`].
    Details {
        /// Title the request was made for.
        imdb_id: String,
        /// Response.
        result: Result<DetailOutcome>,
    },
}

/// Effect of applying a completion, for status display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing to do: blank input or no further pages.
    Ignored,
    /// Items were placed in the result list.
    Listed {
        /// Number of items received.
        added: usize,
        /// Total matches of the active query.
        total: u32,
    },
    /// The submitted query matched nothing.
    NoResults {
        /// OMDB's explanation.
        reason: String,
    },
    /// A further page came back empty.
    NoMorePages {
        /// OMDB's explanation.
        reason: String,
    },
    /// A title is now selected.
    Selected,
    /// The requested title does not exist.
    DetailNotFound {
        /// OMDB's explanation.
        reason: String,
    },
    /// The request did not reach OMDB or its answer was unreadable.
    Failed {
        /// Error chain.
        reason: String,
    },
}

#[cfg(test)]
impl PendingRequest {
    /// Pairs a search request with a canned response.
    #[allow(clippy::panic)]
    pub(crate) fn into_completion_for_test(self, result: Result<SearchOutcome>) -> Completion {
        match self {
            Self::Search { query, .. } => Completion::Search { query, result },
            Self::NextPage { params } => Completion::NextPage {
                page: params.page,
                result,
            },
            Self::Details { .. } => panic!("detail request paired with a search response"),
        }
    }

    /// Pairs a detail request with a canned response.
    #[allow(clippy::panic)]
    pub(crate) fn into_detail_completion_for_test(self, result: Result<DetailOutcome>) -> Completion {
        match self {
            Self::Details { imdb_id } => Completion::Details { imdb_id, result },
            Self::Search { .. } | Self::NextPage { .. } => {
                panic!("search request paired with a detail response")
            }
        }
    }
}

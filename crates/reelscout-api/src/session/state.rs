//! Search session state and its transitions.

use std::fmt;

use super::request::{ActionOutcome, Completion, PendingRequest};
use crate::omdb::{
    DetailOutcome, MovieDetail, SearchOutcome, SearchParams, SearchResultItem, TitleKind,
};

/// A non-empty, trimmed search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Builds a query from user input. Returns `None` for blank input.
    #[must_use]
    pub fn new(term: &str) -> Option<Self> {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(String::from(trimmed)))
        }
    }

    /// Returns the query text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Page position within the active query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Last requested page (1-based).
    pub page: u32,
    /// Total matches reported with page 1.
    pub total: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, total: 0 }
    }
}

/// Optional filters applied to every search of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Title type filter.
    pub kind: Option<TitleKind>,
    /// Release year filter.
    pub year: Option<u16>,
}

/// The title currently shown in the details view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// No title selected; the list view is shown.
    #[default]
    None,
    /// A title's details are being viewed.
    Selected(Box<MovieDetail>),
}

/// What the UI should show, derived from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Nothing searched yet.
    Idle,
    /// A search happened and matched nothing.
    NoResults,
    /// Result list.
    Listing,
    /// Details of the selected title.
    Details,
}

/// Search state for one UI session.
///
/// Every change goes through a `begin_*` step, which returns the request to
/// send (if any), and [`SearchSession::apply`], which folds the response in.
/// Responses are applied in arrival order with no staleness check.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchSession {
    active_query: Option<SearchQuery>,
    filters: SearchFilters,
    results: Vec<SearchResultItem>,
    pagination: Pagination,
    selection: Selection,
    has_searched: bool,
    in_flight: usize,
}

impl SearchSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session that applies `filters` to every search.
    #[must_use]
    pub fn with_filters(filters: SearchFilters) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    /// Returns the query of the last successful submission.
    #[must_use]
    pub const fn active_query(&self) -> Option<&SearchQuery> {
        self.active_query.as_ref()
    }

    /// Returns the session filters.
    #[must_use]
    pub const fn filters(&self) -> SearchFilters {
        self.filters
    }

    /// Returns the accumulated results in received order.
    #[must_use]
    pub fn results(&self) -> &[SearchResultItem] {
        &self.results
    }

    /// Returns the page position.
    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Returns the current selection.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Returns the selected title's details, if any.
    #[must_use]
    pub fn selected_detail(&self) -> Option<&MovieDetail> {
        match &self.selection {
            Selection::Selected(detail) => Some(detail),
            Selection::None => None,
        }
    }

    /// Whether any search has completed against OMDB.
    #[must_use]
    pub const fn has_searched(&self) -> bool {
        self.has_searched
    }

    /// Whether at least one request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Whether OMDB reported more matches than are loaded.
    #[must_use]
    pub fn has_more(&self) -> bool {
        u32::try_from(self.results.len()).is_ok_and(|loaded| loaded < self.pagination.total)
    }

    /// Derives the view to render.
    #[must_use]
    pub fn view(&self) -> View {
        if matches!(self.selection, Selection::Selected(_)) {
            View::Details
        } else if !self.results.is_empty() {
            View::Listing
        } else if self.has_searched {
            View::NoResults
        } else {
            View::Idle
        }
    }

    /// Starts a new search. Blank terms are ignored and return `None`.
    pub fn begin_search(&mut self, term: &str) -> Option<PendingRequest> {
        let query = SearchQuery::new(term)?;
        let params = self.params_for(&query, 1);
        self.in_flight = self.in_flight.saturating_add(1);
        Some(PendingRequest::Search { query, params })
    }

    /// Advances to the next page of the active query.
    ///
    /// Returns `None` when nothing was searched yet or every match is loaded.
    /// The page counter moves forward immediately and is not rolled back if
    /// the request fails.
    pub fn begin_load_more(&mut self) -> Option<PendingRequest> {
        if !self.has_more() {
            return None;
        }
        let query = self.active_query.clone()?;
        let page = self.pagination.page.saturating_add(1);
        self.pagination.page = page;
        self.in_flight = self.in_flight.saturating_add(1);
        Some(PendingRequest::NextPage {
            params: self.params_for(&query, page),
        })
    }

    /// Starts a detail lookup. Blank IDs are ignored and return `None`.
    pub fn begin_select(&mut self, imdb_id: &str) -> Option<PendingRequest> {
        let imdb_id = imdb_id.trim();
        if imdb_id.is_empty() {
            return None;
        }
        self.in_flight = self.in_flight.saturating_add(1);
        Some(PendingRequest::Details {
            imdb_id: String::from(imdb_id),
        })
    }

    /// Returns to the list view. Results and pagination are kept.
    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    /// Folds a finished request into the session.
    pub fn apply(&mut self, completion: Completion) -> ActionOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        match completion {
            Completion::Search { query, result } => match result {
                Ok(outcome) => self.apply_first_page(query, outcome),
                Err(err) => {
                    let reason = format!("{err:#}");
                    tracing::error!(query = %query, "search request failed: {reason}");
                    ActionOutcome::Failed { reason }
                }
            },
            Completion::NextPage { page, result } => match result {
                Ok(outcome) => self.apply_next_page(page, outcome),
                Err(err) => {
                    let reason = format!("{err:#}");
                    tracing::error!(page, "page request failed: {reason}");
                    ActionOutcome::Failed { reason }
                }
            },
            Completion::Details { imdb_id, result } => match result {
                Ok(DetailOutcome::Found(detail)) => {
                    self.selection = Selection::Selected(detail);
                    ActionOutcome::Selected
                }
                Ok(DetailOutcome::NotFound { reason }) => {
                    tracing::warn!(imdb_id = %imdb_id, "title details not found: {reason}");
                    ActionOutcome::DetailNotFound { reason }
                }
                Err(err) => {
                    let reason = format!("{err:#}");
                    tracing::error!(imdb_id = %imdb_id, "detail request failed: {reason}");
                    ActionOutcome::Failed { reason }
                }
            },
        }
    }

    fn apply_first_page(&mut self, query: SearchQuery, outcome: SearchOutcome) -> ActionOutcome {
        self.active_query = Some(query);
        self.has_searched = true;
        self.pagination = Pagination::default();
        match outcome {
            SearchOutcome::Found { items, total } => {
                self.pagination.total = total;
                self.results = items;
                ActionOutcome::Listed {
                    added: self.results.len(),
                    total,
                }
            }
            SearchOutcome::NotFound { reason } => {
                self.results.clear();
                ActionOutcome::NoResults { reason }
            }
        }
    }

    fn apply_next_page(&mut self, page: u32, outcome: SearchOutcome) -> ActionOutcome {
        match outcome {
            SearchOutcome::Found { items, .. } => {
                let added = items.len();
                self.results.extend(items);
                ActionOutcome::Listed {
                    added,
                    total: self.pagination.total,
                }
            }
            SearchOutcome::NotFound { reason } => {
                tracing::warn!(page, "page returned no matches: {reason}");
                ActionOutcome::NoMorePages { reason }
            }
        }
    }

    fn params_for(&self, query: &SearchQuery, page: u32) -> SearchParams {
        let mut params = SearchParams::new(query.as_str()).page(page);
        if let Some(kind) = self.filters.kind {
            params = params.kind(kind);
        }
        if let Some(year) = self.filters.year {
            params = params.year(year);
        }
        params
    }
}

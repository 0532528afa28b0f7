//! `SearchController` - drives a `SearchSession` against an OMDB API.

use std::future::Future;
use std::sync::Arc;

use tracing::instrument;

use super::request::{ActionOutcome, Completion, PendingRequest};
use super::state::SearchSession;
use crate::omdb::OmdbApi;

/// Owns the search session and the API it talks to.
///
/// The async methods run one action to completion. UIs that must keep
/// drawing while a request is outstanding use the `begin_*` / [`dispatch`]
/// / [`apply`] steps instead.
///
/// [`dispatch`]: SearchController::dispatch
/// [`apply`]: SearchController::apply
#[derive(Debug)]
pub struct SearchController<A> {
    api: Arc<A>,
    session: SearchSession,
}

impl<A> SearchController<A> {
    /// Creates a controller with an empty session.
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self::with_session(api, SearchSession::new())
    }

    /// Creates a controller around an existing session.
    #[must_use]
    pub const fn with_session(api: Arc<A>, session: SearchSession) -> Self {
        Self { api, session }
    }

    /// Returns the session state.
    #[must_use]
    pub const fn session(&self) -> &SearchSession {
        &self.session
    }

    /// See [`SearchSession::begin_search`].
    pub fn begin_search(&mut self, term: &str) -> Option<PendingRequest> {
        self.session.begin_search(term)
    }

    /// See [`SearchSession::begin_load_more`].
    pub fn begin_load_more(&mut self) -> Option<PendingRequest> {
        self.session.begin_load_more()
    }

    /// See [`SearchSession::begin_select`].
    pub fn begin_select(&mut self, imdb_id: &str) -> Option<PendingRequest> {
        self.session.begin_select(imdb_id)
    }

    /// See [`SearchSession::apply`].
    pub fn apply(&mut self, completion: Completion) -> ActionOutcome {
        self.session.apply(completion)
    }

    /// Returns to the list view, keeping results and page position.
    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }
}

impl<A> SearchController<A>
where
    A: OmdbApi + Sync + 'static,
{
    /// Returns a detached future that sends `request`.
    ///
    /// The future owns a handle to the API, so it can be spawned while the
    /// controller keeps handling input.
    pub fn dispatch(
        &self,
        request: PendingRequest,
    ) -> impl Future<Output = Completion> + Send + 'static {
        let api = Arc::clone(&self.api);
        async move { request.execute(api.as_ref()).await }
    }

    /// Searches page 1 of `term`. Blank terms issue no request.
    #[instrument(skip_all, fields(term = %term))]
    pub async fn submit_search(&mut self, term: &str) -> ActionOutcome {
        let Some(request) = self.session.begin_search(term) else {
            tracing::debug!("blank query ignored");
            return ActionOutcome::Ignored;
        };
        self.run(request).await
    }

    /// Loads the next page of the active query, if OMDB reported more.
    #[instrument(skip_all)]
    pub async fn load_more(&mut self) -> ActionOutcome {
        let Some(request) = self.session.begin_load_more() else {
            return ActionOutcome::Ignored;
        };
        self.run(request).await
    }

    /// Fetches and selects the details of one title.
    #[instrument(skip_all, fields(imdb_id = %imdb_id))]
    pub async fn select_item(&mut self, imdb_id: &str) -> ActionOutcome {
        let Some(request) = self.session.begin_select(imdb_id) else {
            return ActionOutcome::Ignored;
        };
        self.run(request).await
    }

    async fn run(&mut self, request: PendingRequest) -> ActionOutcome {
        let completion = request.execute(self.api.as_ref()).await;
        self.session.apply(completion)
    }
}

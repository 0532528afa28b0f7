//! `OmdbClient` - OMDB API client implementation.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::OmdbApi;
use super::types::{
    DetailOutcome, RawDetailResponse, RawErrorResponse, RawSearchResponse, SearchOutcome,
    SearchParams, TitleKind,
};

/// Default base URL for the OMDB API.
pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Base URL of IMDb title pages.
const IMDB_TITLE_BASE_URL: &str = "https://www.imdb.com/title";

/// Returns the IMDb page URL for a title.
#[must_use]
pub fn imdb_title_url(imdb_id: &str) -> String {
    format!("{IMDB_TITLE_BASE_URL}/{imdb_id}/")
}

/// OMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key sent as the `apikey` query parameter.
    api_key: String,
}

/// Builder for `OmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl OmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the per-request timeout (default: 10s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OmdbClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .context("api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .context("failed to build HTTP client")?;

        Ok(OmdbClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl OmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OmdbClientBuilder {
        OmdbClientBuilder::new()
    }

    /// Sends a GET request to the base URL with the given query and the API key.
    ///
    /// The API key is appended after logging so it never shows up in traces.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        query: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!(params = ?query, "OMDB API request");

        let request = self
            .http_client
            .get(self.base_url.clone())
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .build()
            .context("failed to build OMDB request")?;

        let result = self.http_client.execute(request).await;
        let response = result.context("OMDB request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<RawErrorResponse>(&body) {
                bail!("OMDB API error (HTTP {status}): {}", error_response.error);
            }
            bail!("OMDB API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .context("failed to read OMDB response body")?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed = raw_result.context("failed to decode OMDB JSON response")?;
        Ok(parsed)
    }
}

impl OmdbApi for OmdbClient {
    #[instrument(skip_all, fields(query = %params.query, page = params.page))]
    async fn search(&self, params: &SearchParams) -> Result<SearchOutcome> {
        let mut query: Vec<(&str, String)> = vec![
            ("s", params.query.clone()),
            ("page", params.page.to_string()),
        ];
        if let Some(kind) = params.kind.and_then(TitleKind::as_query_value) {
            query.push(("type", String::from(kind)));
        }
        if let Some(year) = params.year {
            query.push(("y", year.to_string()));
        }

        let raw: RawSearchResponse = self.get_json(&query).await?;
        raw.into_outcome()
    }

    #[instrument(skip_all, fields(imdb_id = %imdb_id))]
    async fn title_details(&self, imdb_id: &str) -> Result<DetailOutcome> {
        let query = [("i", String::from(imdb_id)), ("plot", String::from("full"))];
        let raw: RawDetailResponse = self.get_json(&query).await?;
        raw.into_outcome()
    }
}

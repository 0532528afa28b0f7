//! OMDB API response types and search parameters.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Value OMDB uses for absent text fields and missing posters.
const NOT_APPLICABLE: &str = "N/A";

// --- Search parameters ---

/// Title type filter accepted by the `type` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleKind {
    /// Feature film.
    Movie,
    /// TV series.
    Series,
    /// Single TV episode.
    Episode,
    /// Video game.
    Game,
    /// Any type OMDB reports that is not one of the above.
    Other,
}

impl TitleKind {
    /// Parses the `Type` value from an OMDB response.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "movie" => Self::Movie,
            "series" => Self::Series,
            "episode" => Self::Episode,
            "game" => Self::Game,
            _ => Self::Other,
        }
    }

    /// Returns the value sent in the `type` query parameter.
    ///
    /// `Other` has no query form and returns `None`.
    #[must_use]
    pub const fn as_query_value(self) -> Option<&'static str> {
        match self {
            Self::Movie => Some("movie"),
            Self::Series => Some("series"),
            Self::Episode => Some("episode"),
            Self::Game => Some("game"),
            Self::Other => None,
        }
    }

    /// Short display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
            Self::Game => "game",
            Self::Other => "other",
        }
    }
}

/// Parameters for a title search (`s=` lookup).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search term.
    pub query: String,
    /// 1-based page number.
    pub page: u32,
    /// Optional title type filter.
    pub kind: Option<TitleKind>,
    /// Optional release year filter.
    pub year: Option<u16>,
}

impl SearchParams {
    /// Creates search params for page 1 with no filters.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            kind: None,
            year: None,
        }
    }

    /// Sets the page number.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the title type filter.
    #[must_use]
    pub const fn kind(mut self, kind: TitleKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the release year filter.
    #[must_use]
    pub const fn year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }
}

// --- Domain types ---

/// Poster reference of a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poster {
    /// Poster image URL.
    Url(String),
    /// OMDB has no poster for this title.
    Missing,
}

impl Poster {
    fn from_wire(value: Option<String>) -> Self {
        not_applicable(value).map_or(Self::Missing, Self::Url)
    }

    /// Returns the poster URL, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Missing => None,
        }
    }
}

/// A single entry of a search result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultItem {
    /// IMDb identifier (e.g. `tt0372784`).
    pub imdb_id: String,
    /// Title.
    pub title: String,
    /// Year or year range as reported by OMDB (e.g. `2005`, `2004–2007`).
    pub year: String,
    /// Title type.
    pub kind: TitleKind,
    /// Poster reference.
    pub poster: Poster,
}

/// Result of a search request that reached OMDB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Matches were found.
    Found {
        /// Items on the requested page, in upstream order.
        items: Vec<SearchResultItem>,
        /// Total number of matches across all pages.
        total: u32,
    },
    /// OMDB answered with `Response: "False"`.
    NotFound {
        /// OMDB's `Error` text.
        reason: String,
    },
}

/// A rating from one source (IMDb, Rotten Tomatoes, Metacritic).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    /// Rating source name.
    pub source: String,
    /// Rating value as text (e.g. `8.2/10`, `84%`).
    pub value: String,
}

/// Full detail record of a single title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDetail {
    /// IMDb identifier.
    pub imdb_id: String,
    /// Title.
    pub title: String,
    /// Year or year range.
    pub year: String,
    /// Title type.
    pub kind: TitleKind,
    /// MPAA-style rating (e.g. `PG-13`).
    pub rated: Option<String>,
    /// Release date text.
    pub released: Option<String>,
    /// Runtime text (e.g. `140 min`).
    pub runtime: Option<String>,
    /// Comma-separated genres.
    pub genre: Option<String>,
    /// Director(s).
    pub director: Option<String>,
    /// Main cast.
    pub actors: Option<String>,
    /// Plot summary.
    pub plot: Option<String>,
    /// Spoken languages.
    pub language: Option<String>,
    /// Production countries.
    pub country: Option<String>,
    /// IMDb user rating.
    pub imdb_rating: Option<String>,
    /// Ratings from all sources.
    pub ratings: Vec<Rating>,
    /// Poster reference.
    pub poster: Poster,
}

/// Result of a detail request that reached OMDB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    /// The title exists.
    Found(Box<MovieDetail>),
    /// OMDB answered with `Response: "False"` (e.g. unknown IMDb ID).
    NotFound {
        /// OMDB's `Error` text.
        reason: String,
    },
}

// --- Wire format ---

/// Raw `s=` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawSearchResponse {
    response: String,
    #[serde(default)]
    search: Vec<RawSearchItem>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
    error: Option<String>,
}

/// Raw entry of the `Search` array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawSearchItem {
    title: String,
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Type")]
    kind: String,
    poster: Option<String>,
}

/// Raw `i=` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawDetailResponse {
    response: String,
    error: Option<String>,
    title: Option<String>,
    year: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Type")]
    kind: Option<String>,
    rated: Option<String>,
    released: Option<String>,
    runtime: Option<String>,
    genre: Option<String>,
    director: Option<String>,
    actors: Option<String>,
    plot: Option<String>,
    language: Option<String>,
    country: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(default)]
    ratings: Vec<RawRating>,
    poster: Option<String>,
}

/// Raw entry of the `Ratings` array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawRating {
    source: String,
    value: String,
}

/// Error body returned with non-2xx statuses (e.g. invalid API key).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawErrorResponse {
    /// OMDB's `Error` text.
    pub error: String,
}

/// Maps OMDB's `"N/A"` and empty strings to `None`.
fn not_applicable(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != NOT_APPLICABLE)
}

fn is_true(response: &str) -> bool {
    response.eq_ignore_ascii_case("true")
}

impl From<RawSearchItem> for SearchResultItem {
    fn from(raw: RawSearchItem) -> Self {
        Self {
            imdb_id: raw.imdb_id,
            title: raw.title,
            year: raw.year,
            kind: TitleKind::from_wire(&raw.kind),
            poster: Poster::from_wire(raw.poster),
        }
    }
}

impl RawSearchResponse {
    /// Converts the wire body into a `SearchOutcome`.
    ///
    /// # Errors
    ///
    /// Returns an error if a positive response carries no parseable `totalResults`.
    pub(crate) fn into_outcome(self) -> Result<SearchOutcome> {
        if !is_true(&self.response) {
            return Ok(SearchOutcome::NotFound {
                reason: self.error.unwrap_or_else(|| String::from("no matches")),
            });
        }

        let raw_total = self
            .total_results
            .context("positive search response without totalResults")?;
        let total = raw_total
            .trim()
            .parse::<u32>()
            .with_context(|| format!("invalid totalResults: {raw_total}"))?;

        Ok(SearchOutcome::Found {
            items: self.search.into_iter().map(SearchResultItem::from).collect(),
            total,
        })
    }
}

impl RawDetailResponse {
    /// Converts the wire body into a `DetailOutcome`.
    ///
    /// # Errors
    ///
    /// Returns an error if a positive response lacks `imdbID` or `Title`.
    pub(crate) fn into_outcome(self) -> Result<DetailOutcome> {
        if !is_true(&self.response) {
            return Ok(DetailOutcome::NotFound {
                reason: self.error.unwrap_or_else(|| String::from("title not found")),
            });
        }

        let imdb_id = self
            .imdb_id
            .context("positive detail response without imdbID")?;
        let title = self.title.context("positive detail response without Title")?;

        Ok(DetailOutcome::Found(Box::new(MovieDetail {
            imdb_id,
            title,
            year: self.year.unwrap_or_default(),
            kind: self
                .kind
                .as_deref()
                .map_or(TitleKind::Other, TitleKind::from_wire),
            rated: not_applicable(self.rated),
            released: not_applicable(self.released),
            runtime: not_applicable(self.runtime),
            genre: not_applicable(self.genre),
            director: not_applicable(self.director),
            actors: not_applicable(self.actors),
            plot: not_applicable(self.plot),
            language: not_applicable(self.language),
            country: not_applicable(self.country),
            imdb_rating: not_applicable(self.imdb_rating),
            ratings: self
                .ratings
                .into_iter()
                .map(|r| Rating {
                    source: r.source,
                    value: r.value,
                })
                .collect(),
            poster: Poster::from_wire(self.poster),
        })))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_search_params_builder() {
        // Arrange & Act
        let params = SearchParams::new("batman")
            .page(3)
            .kind(TitleKind::Series)
            .year(2004);

        // Assert
        assert_eq!(params.query, "batman");
        assert_eq!(params.page, 3);
        assert_eq!(params.kind, Some(TitleKind::Series));
        assert_eq!(params.year, Some(2004));
    }

    #[test]
    fn test_title_kind_from_wire() {
        assert_eq!(TitleKind::from_wire("movie"), TitleKind::Movie);
        assert_eq!(TitleKind::from_wire("series"), TitleKind::Series);
        assert_eq!(TitleKind::from_wire("episode"), TitleKind::Episode);
        assert_eq!(TitleKind::from_wire("game"), TitleKind::Game);
        assert_eq!(TitleKind::from_wire("documentary"), TitleKind::Other);
        assert_eq!(TitleKind::Other.as_query_value(), None);
    }

    #[test]
    fn test_parse_search_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/search_batman_page1.json");

        // Act
        let raw: RawSearchResponse = serde_json::from_str(json).unwrap();
        let outcome = raw.into_outcome().unwrap();

        // Assert
        let SearchOutcome::Found { items, total } = outcome else {
            panic!("expected Found");
        };
        assert_eq!(total, 50);
        assert_eq!(items.len(), 10);
        assert_eq!(items[0].imdb_id, "tt0372784");
        assert_eq!(items[0].title, "Batman Begins");
        assert_eq!(items[0].kind, TitleKind::Movie);
        assert!(items[0].poster.url().is_some());
    }

    #[test]
    fn test_parse_search_missing_poster() {
        // Arrange
        let json = r#"{"Search":[{"Title":"Batman: Arkham","Year":"2019","imdbID":"tt0000001","Type":"game","Poster":"N/A"}],"totalResults":"1","Response":"True"}"#;

        // Act
        let raw: RawSearchResponse = serde_json::from_str(json).unwrap();
        let outcome = raw.into_outcome().unwrap();

        // Assert
        let SearchOutcome::Found { items, .. } = outcome else {
            panic!("expected Found");
        };
        assert_eq!(items[0].poster, Poster::Missing);
        assert_eq!(items[0].kind, TitleKind::Game);
    }

    #[test]
    fn test_parse_search_not_found_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/search_not_found.json");

        // Act
        let raw: RawSearchResponse = serde_json::from_str(json).unwrap();
        let outcome = raw.into_outcome().unwrap();

        // Assert
        assert_eq!(
            outcome,
            SearchOutcome::NotFound {
                reason: String::from("Movie not found!")
            }
        );
    }

    #[test]
    fn test_parse_search_invalid_total() {
        // Arrange
        let json = r#"{"Search":[],"totalResults":"lots","Response":"True"}"#;

        // Act
        let raw: RawSearchResponse = serde_json::from_str(json).unwrap();
        let result = raw.into_outcome();

        // Assert
        assert!(result.unwrap_err().to_string().contains("invalid totalResults"));
    }

    #[test]
    fn test_parse_detail_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/title_tt0372784.json");

        // Act
        let raw: RawDetailResponse = serde_json::from_str(json).unwrap();
        let outcome = raw.into_outcome().unwrap();

        // Assert
        let DetailOutcome::Found(detail) = outcome else {
            panic!("expected Found");
        };
        assert_eq!(detail.imdb_id, "tt0372784");
        assert_eq!(detail.title, "Batman Begins");
        assert_eq!(detail.year, "2005");
        assert_eq!(detail.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(detail.genre.as_deref(), Some("Action, Drama"));
        assert!(detail.plot.is_some());
        assert_eq!(detail.ratings.len(), 3);
        assert_eq!(detail.ratings[0].source, "Internet Movie Database");
    }

    #[test]
    fn test_parse_detail_maps_not_applicable_to_none() {
        // Arrange
        let json = r#"{"Title":"Obscure","Year":"1999","imdbID":"tt9999999","Type":"movie","Director":"N/A","Plot":"N/A","Poster":"N/A","Response":"True"}"#;

        // Act
        let raw: RawDetailResponse = serde_json::from_str(json).unwrap();
        let outcome = raw.into_outcome().unwrap();

        // Assert
        let DetailOutcome::Found(detail) = outcome else {
            panic!("expected Found");
        };
        assert!(detail.director.is_none());
        assert!(detail.plot.is_none());
        assert_eq!(detail.poster, Poster::Missing);
        assert!(detail.ratings.is_empty());
    }

    #[test]
    fn test_parse_detail_not_found_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/title_not_found.json");

        // Act
        let raw: RawDetailResponse = serde_json::from_str(json).unwrap();
        let outcome = raw.into_outcome().unwrap();

        // Assert
        assert_eq!(
            outcome,
            DetailOutcome::NotFound {
                reason: String::from("Incorrect IMDb ID.")
            }
        );
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"Response":"False","Error":"Invalid API key!"}"#;

        // Act
        let error: RawErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.error, "Invalid API key!");
    }
}

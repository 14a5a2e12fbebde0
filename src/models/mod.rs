use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod advisory;
pub mod comment;
pub mod verdict;

pub use advisory::{AdvisoryCategory, AdvisoryLevel, ContentAdvisory, Genre};
pub use comment::{Comment, NewComment, ThreadedComment, VoteDirection};
pub use verdict::{Recommendation, ViewingVerdict};

/// Kind of title in the TMDB catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }

    /// Parses TMDB's `media_type` field; anything else (e.g. "person") is `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(MediaType::Movie),
            "tv" => Some(MediaType::Tv),
            _ => None,
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifies a title across the catalog, the cache and the comments table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TitleKey {
    pub media_type: MediaType,
    pub tmdb_id: i64,
}

impl TitleKey {
    pub fn new(media_type: MediaType, tmdb_id: i64) -> Self {
        Self {
            media_type,
            tmdb_id,
        }
    }
}

impl Display for TitleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.media_type, self.tmdb_id)
    }
}

/// Represents a movie or TV show returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    pub tmdb_id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub release_year: Option<i32>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
}

/// Title summary plus the fields the advisory classifier needs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleMetadata {
    pub title: Title,
    pub genres: Vec<Genre>,
    pub runtime_minutes: Option<u32>,
}

/// Detail view of a title, including its certification and parental guide
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TitleDetails {
    #[serde(flatten)]
    pub title: Title,
    pub genres: Vec<Genre>,
    pub runtime_minutes: Option<u32>,
    pub certification: Option<String>,
    pub advisory: ContentAdvisory,
}

/// Extracts the year from a TMDB date ("2010-07-15"); TMDB sends "" for unknown dates
fn year_from_date(date: Option<&str>) -> Option<i32> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Page of results from /search/multi
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbSearchResult>,
}

/// One /search/multi hit. Movies carry `title`/`release_date`, shows `name`/`first_air_date`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResult {
    pub id: i64,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl TmdbSearchResult {
    /// Converts a search hit into a `Title`, dropping people and untitled entries
    pub fn into_title(self) -> Option<Title> {
        let media_type = MediaType::parse(self.media_type.as_deref()?)?;
        let (name, date) = match media_type {
            MediaType::Movie => (self.title, self.release_date),
            MediaType::Tv => (self.name, self.first_air_date),
        };

        Some(Title {
            tmdb_id: self.id,
            media_type,
            title: name?,
            release_year: year_from_date(date.as_deref()),
            overview: self.overview.filter(|o| !o.is_empty()),
            poster_path: self.poster_path,
            vote_average: self.vote_average,
        })
    }
}

/// Response of GET /movie/{id} or /tv/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTitleDetails {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
}

impl TmdbTitleDetails {
    pub fn into_metadata(self, media_type: MediaType) -> TitleMetadata {
        let (name, date, runtime_minutes) = match media_type {
            MediaType::Movie => (self.title, self.release_date, self.runtime),
            MediaType::Tv => (
                self.name,
                self.first_air_date,
                self.episode_run_time.first().copied(),
            ),
        };

        TitleMetadata {
            title: Title {
                tmdb_id: self.id,
                media_type,
                title: name.unwrap_or_default(),
                release_year: year_from_date(date.as_deref()),
                overview: self.overview.filter(|o| !o.is_empty()),
                poster_path: self.poster_path,
                vote_average: self.vote_average,
            },
            genres: self.genres,
            runtime_minutes: runtime_minutes.filter(|m| *m > 0),
        }
    }
}

/// Response of GET /movie/{id}/release_dates
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbReleaseDates {
    #[serde(default)]
    pub results: Vec<TmdbReleaseDatesEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbReleaseDatesEntry {
    pub iso_3166_1: String,
    #[serde(default)]
    pub release_dates: Vec<TmdbReleaseDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbReleaseDate {
    #[serde(default)]
    pub certification: String,
}

impl TmdbReleaseDates {
    /// First non-empty certification listed for the region
    pub fn certification_for(&self, region: &str) -> Option<String> {
        self.results
            .iter()
            .find(|r| r.iso_3166_1.eq_ignore_ascii_case(region))
            .and_then(|r| {
                r.release_dates
                    .iter()
                    .map(|rd| rd.certification.trim())
                    .find(|c| !c.is_empty())
            })
            .map(str::to_string)
    }
}

/// Response of GET /tv/{id}/content_ratings
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbContentRatings {
    #[serde(default)]
    pub results: Vec<TmdbContentRating>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbContentRating {
    pub iso_3166_1: String,
    #[serde(default)]
    pub rating: String,
}

impl TmdbContentRatings {
    pub fn certification_for(&self, region: &str) -> Option<String> {
        self.results
            .iter()
            .find(|r| r.iso_3166_1.eq_ignore_ascii_case(region))
            .map(|r| r.rating.trim().to_string())
            .filter(|r| !r.is_empty())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of catalog item a reference points at.
///
/// `Unknown` captures any value the current build does not recognize, e.g. a
/// record written by a newer schema. Unknown references are kept and listed
/// but skipped by enrichment, since no provider lookup can be built for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Movie,
    Series,
    #[serde(other)]
    Unknown,
}

impl MediaType {
    /// Provider URL path segment, `None` when no lookup is possible.
    pub fn provider_segment(&self) -> Option<&'static str> {
        match self {
            MediaType::Movie => Some("movie"),
            MediaType::Series => Some("tv"),
            MediaType::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Unknown => "unknown",
        }
    }

    /// Parse a stored string. Unrecognized values map to `Unknown` rather
    /// than failing the whole row.
    pub fn parse(value: &str) -> Self {
        match value {
            "movie" => MediaType::Movie,
            "series" => MediaType::Series,
            _ => MediaType::Unknown,
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three per-user reference collections. Each is independent: the same
/// item may sit in all three at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Watchlist,
    Favorites,
    History,
}

impl CollectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Watchlist => "watchlist",
            CollectionKind::Favorites => "favorites",
            CollectionKind::History => "history",
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal persisted record linking a user to a catalog item.
///
/// Uniqueness: (owner_id, item_id, media_type) is unique within one
/// collection; the schema enforces it and repeat adds upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    /// Identity that owns this record
    pub owner_id: Uuid,

    /// Provider-side catalog id
    pub item_id: i64,

    pub media_type: MediaType,

    /// Title as known at add time; refreshed by enrichment when the
    /// provider has a newer one
    pub title: String,

    pub poster_path: Option<String>,

    /// When the reference was (last) added
    pub created_at: DateTime<Utc>,
}

impl Reference {
    pub fn new(owner_id: Uuid, item_id: i64, media_type: MediaType, title: String) -> Self {
        Self {
            owner_id,
            item_id,
            media_type,
            title,
            poster_path: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_poster(mut self, poster_path: Option<String>) -> Self {
        self.poster_path = poster_path;
        self
    }
}

/// Optional enrichment fields sourced from the external provider.
///
/// Absence of a decoration is not an error: a record that never got enriched
/// carries the defaults below and is still a valid, full member of the list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decorations {
    pub overview: Option<String>,
    pub vote_average: f64,
    pub genres: Vec<String>,
    pub release_date: Option<String>,
    pub popularity: f64,
    /// Minutes; 0 when unknown
    pub runtime: u32,
}

/// A `Reference` plus its best-effort decorations. Shape is identical for
/// enriched and degraded items; degraded ones simply carry default
/// decorations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedReference {
    #[serde(flatten)]
    pub reference: Reference,

    #[serde(flatten)]
    pub decorations: Decorations,
}

impl EnrichedReference {
    /// Fallback form: the base record passed through untouched.
    pub fn from_base(reference: Reference) -> Self {
        Self {
            reference,
            decorations: Decorations::default(),
        }
    }
}

use chrono::NaiveDateTime;
use std::fmt;

macro_rules! numeric_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<u64> for $name {
            fn from(v: u64) -> Self {
                Self(v)
            }
        }
    };
}

numeric_id!(
    /// Gateway identifier of a user list.
    ListId
);
numeric_id!(
    /// External (metadata API) film identifier.
    TmdbId
);
numeric_id!(ReviewId);
numeric_id!(UserId);

/// Film rating on a 0-5 scale, one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Rating {
    Stars(f64),
    #[default]
    Unrated,
}

impl Rating {
    /// Halve a 0-10 source score. Missing or zero scores are unrated.
    pub fn from_vote_average(vote_average: Option<f64>) -> Self {
        match vote_average {
            Some(v) if v > 0.0 && v.is_finite() => Self::Stars((v / 2.0 * 10.0).round() / 10.0),
            _ => Self::Unrated,
        }
    }

    /// Parse an already-normalized value as stored by the gateway ("3.9", "N/A").
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Stars(v),
            _ => Self::Unrated,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stars(v) => write!(f, "{v:.1}"),
            Self::Unrated => f.write_str("N/A"),
        }
    }
}

/// A film entry inside a user list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListFilm {
    /// Gateway row id (or a client-generated fallback after an add).
    pub entry_id: Option<u64>,
    pub tmdb_id: TmdbId,
    pub title: String,
    pub year: Option<i32>,
    pub poster: Option<String>,
    pub rating: Rating,
}

impl ListFilm {
    pub fn year_label(&self) -> String {
        self.year.map_or_else(|| "N/A".to_string(), |y| y.to_string())
    }
}

/// Normalized record sent to the gateway when a film is added to a list.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListItem {
    pub list_id: ListId,
    pub tmdb_id: TmdbId,
    pub title: String,
    pub year: Option<i32>,
    pub poster: String,
    pub rating: Rating,
}

impl NewListItem {
    pub fn into_film(self, entry_id: u64) -> ListFilm {
        ListFilm {
            entry_id: Some(entry_id),
            tmdb_id: self.tmdb_id,
            title: self.title,
            year: self.year,
            poster: Some(self.poster),
            rating: self.rating,
        }
    }
}

/// A film as returned by the movie-metadata API.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataFilm {
    pub id: TmdbId,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
}

impl MetadataFilm {
    pub fn rating(&self) -> Rating {
        Rating::from_vote_average(self.vote_average)
    }
}

/// A named user list with its films in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilmList {
    pub id: ListId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub films: Vec<ListFilm>,
}

/// How many posters a list card previews before collapsing into "+N".
pub const POSTER_PREVIEW_LIMIT: usize = 5;

impl FilmList {
    pub fn contains(&self, tmdb_id: TmdbId) -> bool {
        self.films.iter().any(|f| f.tmdb_id == tmdb_id)
    }

    /// "1 film" / "N films"
    pub fn film_count_label(&self) -> String {
        match self.films.len() {
            1 => "1 film".to_string(),
            n => format!("{n} films"),
        }
    }

    /// Description, or `fallback` when blank.
    pub fn description_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(fallback)
    }

    /// First posters for the list card plus the number of films not shown.
    pub fn poster_preview(&self) -> (Vec<&ListFilm>, usize) {
        let shown: Vec<&ListFilm> = self.films.iter().take(POSTER_PREVIEW_LIMIT).collect();
        let overflow = self.films.len().saturating_sub(POSTER_PREVIEW_LIMIT);
        (shown, overflow)
    }

    pub fn created_label(&self) -> String {
        self.created_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Like,
    Unlike,
}

impl LikeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Unlike => "unlike",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Moderation actions offered for a review in this status.
    pub fn available_actions(&self) -> &'static [ModerationAction] {
        match self {
            Self::Pending => &[
                ModerationAction::Approve,
                ModerationAction::Reject,
                ModerationAction::Delete,
            ],
            Self::Approved => &[ModerationAction::Reject, ModerationAction::Delete],
            Self::Rejected => &[ModerationAction::Approve, ModerationAction::Delete],
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub username: String,
    pub movie_title: String,
    pub review_text: String,
    pub status: ReviewStatus,
    pub likes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Admin => "Admin",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }

    /// Status after a suspend/unsuspend toggle.
    pub fn toggled_suspension(&self) -> Self {
        match self {
            Self::Suspended => Self::Active,
            Self::Active | Self::Inactive => Self::Suspended,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub age: Option<u32>,
    pub role: UserRole,
    pub status: UserStatus,
}

/// Data for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub age: Option<u32>,
    pub role: UserRole,
    pub status: UserStatus,
}

/// Full replacement record for an existing user. A `None` password keeps the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub age: Option<u32>,
    pub role: UserRole,
    pub status: UserStatus,
}

impl UserUpdate {
    /// Replacement record that only changes the status.
    pub fn with_status(user: &User, status: UserStatus) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            password: None,
            age: user.age,
            role: user.role,
            status,
        }
    }
}

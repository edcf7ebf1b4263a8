//! Wire shapes of the PHP gateway.
//!
//! The gateway is loose with types: ids and counts arrive as numbers or numeric
//! strings, years and ratings as strings with an "N/A" sentinel.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::contract::model::{
    FilmList, ListFilm, ListId, NewListItem, NewUser, Rating, Review, ReviewId, ReviewStatus,
    TmdbId, User, UserId, UserRole, UserStatus, UserUpdate,
};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Int(i64),
    Float(f64),
    Str(String),
}

impl NumOrStr {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Str(s) => s.trim().parse().ok(),
        }
    }

    fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Int(v) => u64::try_from(*v).ok(),
            Self::Float(v) if *v >= 0.0 && v.fract() == 0.0 => Some(*v as u64),
            Self::Float(_) => None,
            Self::Str(s) => s.trim().parse().ok(),
        }
    }

    fn into_string(self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Str(s) => s,
        }
    }
}

fn lenient_u64<'de, D>(de: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = NumOrStr::deserialize(de)?;
    raw.as_u64()
        .ok_or_else(|| serde::de::Error::custom("expected a non-negative integer"))
}

fn lenient_opt_u64<'de, D>(de: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumOrStr>::deserialize(de)?.and_then(|v| v.as_u64()))
}

fn lenient_opt_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumOrStr>::deserialize(de)?.map(NumOrStr::into_string))
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// ---------- lists ----------

#[derive(Debug, Deserialize)]
pub struct ListItemsResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub films: Vec<ListFilmDto>,
}

#[derive(Debug, Deserialize)]
pub struct ListFilmDto {
    #[serde(default, deserialize_with = "lenient_opt_u64")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub tmdb_id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub year: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub rating: Option<String>,
}

/// MySQL-style `YYYY-MM-DD HH:MM:SS`, or ISO 8601 with a `T`.
fn parse_created_at(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

impl From<ListFilmDto> for ListFilm {
    fn from(dto: ListFilmDto) -> Self {
        Self {
            entry_id: dto.id,
            tmdb_id: TmdbId(dto.tmdb_id),
            title: dto.title.unwrap_or_default(),
            year: dto.year.as_deref().and_then(|y| y.trim().parse().ok()),
            poster: non_blank(dto.poster),
            rating: dto.rating.as_deref().map_or(Rating::Unrated, Rating::parse),
        }
    }
}

impl ListItemsResponse {
    pub fn into_list(self, id: ListId) -> FilmList {
        FilmList {
            id,
            name: self.name.unwrap_or_default(),
            description: self.description,
            created_at: self.created_at.as_deref().and_then(parse_created_at),
            films: self.films.into_iter().map(ListFilm::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddListItemBody<'a> {
    pub list_id: u64,
    pub tmdb_id: u64,
    pub title: &'a str,
    pub year: String,
    pub poster: &'a str,
    pub rating: String,
}

impl<'a> From<&'a NewListItem> for AddListItemBody<'a> {
    fn from(item: &'a NewListItem) -> Self {
        Self {
            list_id: item.list_id.0,
            tmdb_id: item.tmdb_id.0,
            title: &item.title,
            year: item
                .year
                .map_or_else(|| "N/A".to_string(), |y| y.to_string()),
            poster: &item.poster,
            rating: item.rating.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RemoveListItemBody {
    pub list_id: u64,
    pub tmdb_id: u64,
}

/// `{success, id?, error?}` acknowledgement used by most mutating endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient_opt_u64")]
    pub id: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    pub fn reason(self) -> Option<String> {
        non_blank(self.error).or_else(|| non_blank(self.message))
    }
}

// ---------- likes ----------

#[derive(Debug, Deserialize)]
pub struct LikeStatusResponse {
    #[serde(rename = "isLiked", default)]
    pub is_liked: bool,
}

#[derive(Debug, Serialize)]
pub struct LikeBody {
    pub review_id: u64,
    pub user_id: u64,
    pub action: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct LikeResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_u64")]
    pub likes: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LikeResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    pub fn reason(self) -> Option<String> {
        non_blank(self.message)
    }
}

// ---------- reviews ----------

#[derive(Debug, Deserialize)]
pub struct ReviewsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<ReviewDto>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ReviewsResponse {
    pub fn reason(self) -> Option<String> {
        non_blank(self.error)
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewDto {
    #[serde(deserialize_with = "lenient_u64")]
    pub id: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub movie_title: Option<String>,
    #[serde(default)]
    pub review_text: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_u64")]
    pub likes: Option<u64>,
}

impl ReviewDto {
    /// `None` (with a warning) when the status is not one the client knows.
    pub fn into_review(self) -> Option<Review> {
        let raw = self.status.unwrap_or_default();
        let Some(status) = ReviewStatus::parse(&raw) else {
            warn!(review_id = self.id, status = %raw, "Skipping review with unknown status");
            return None;
        };
        Some(Review {
            id: ReviewId(self.id),
            username: self.username.unwrap_or_default(),
            movie_title: self.movie_title.unwrap_or_default(),
            review_text: self.review_text.unwrap_or_default(),
            status,
            likes: self.likes.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewStatusBody {
    pub id: u64,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IdBody {
    pub id: u64,
}

// ---------- users ----------

#[derive(Debug, Deserialize)]
pub struct UserDto {
    #[serde(deserialize_with = "lenient_u64")]
    pub id: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_u64")]
    pub age: Option<u64>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl UserDto {
    /// `None` (with a warning) when the role or status is unknown.
    pub fn into_user(self) -> Option<User> {
        let role_raw = self.role.unwrap_or_default();
        let status_raw = self.status.unwrap_or_default();
        let (Some(role), Some(status)) =
            (UserRole::parse(&role_raw), UserStatus::parse(&status_raw))
        else {
            warn!(
                user_id = self.id,
                role = %role_raw,
                status = %status_raw,
                "Skipping user with unknown role or status"
            );
            return None;
        };
        Some(User {
            id: UserId(self.id),
            username: self.username.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: non_blank(self.phone),
            age: self.age.and_then(|a| u32::try_from(a).ok()),
            role,
            status,
        })
    }
}

/// Body for POST/PUT on `users.php`. The gateway hashes `password_hash` itself.
#[derive(Debug, Serialize)]
pub struct UserBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub username: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<&'a str>,
    pub age: Option<u32>,
    pub role: &'static str,
    pub status: &'static str,
}

impl<'a> From<&'a NewUser> for UserBody<'a> {
    fn from(u: &'a NewUser) -> Self {
        Self {
            id: None,
            username: &u.username,
            email: &u.email,
            phone: u.phone.as_deref(),
            password_hash: Some(&u.password),
            age: u.age,
            role: u.role.as_str(),
            status: u.status.as_str(),
        }
    }
}

impl<'a> From<&'a UserUpdate> for UserBody<'a> {
    fn from(u: &'a UserUpdate) -> Self {
        Self {
            id: Some(u.id.0),
            username: &u.username,
            email: &u.email,
            phone: u.phone.as_deref(),
            password_hash: u.password.as_deref(),
            age: u.age,
            role: u.role.as_str(),
            status: u.status.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_items_accept_stringly_numbers() {
        let raw = json!({
            "name": "Weekend",
            "description": null,
            "created_at": "2024-05-01 10:20:30",
            "films": [
                {"id": "12", "tmdb_id": "603", "title": "The Matrix", "year": "1999",
                 "poster": "https://img/matrix.jpg", "rating": "4.1"},
                {"id": 13, "tmdb_id": 27205, "title": "Inception", "year": "N/A",
                 "poster": "", "rating": "N/A"}
            ]
        });
        let list = serde_json::from_value::<ListItemsResponse>(raw)
            .unwrap()
            .into_list(ListId(9));

        assert_eq!(list.films.len(), 2);
        assert_eq!(list.films[0].entry_id, Some(12));
        assert_eq!(list.films[0].tmdb_id, TmdbId(603));
        assert_eq!(list.films[0].year, Some(1999));
        assert_eq!(list.films[0].rating, Rating::Stars(4.1));
        assert_eq!(list.films[1].year, None);
        assert_eq!(list.films[1].poster, None);
        assert_eq!(list.films[1].rating, Rating::Unrated);
        assert_eq!(list.created_label(), "2024-05-01");
    }

    #[test]
    fn unknown_review_status_is_skipped() {
        let dto: ReviewDto = serde_json::from_value(json!({
            "id": "5", "username": "andi", "movie_title": "Up",
            "review_text": "great", "status": "flagged", "likes": "3"
        }))
        .unwrap();
        assert!(dto.into_review().is_none());
    }

    #[test]
    fn add_body_uses_na_sentinels() {
        let item = NewListItem {
            list_id: ListId(2),
            tmdb_id: TmdbId(1),
            title: "Nameless".into(),
            year: None,
            poster: "https://placeholder".into(),
            rating: Rating::Unrated,
        };
        let body = serde_json::to_value(AddListItemBody::from(&item)).unwrap();
        assert_eq!(
            body,
            json!({
                "list_id": 2, "tmdb_id": 1, "title": "Nameless", "year": "N/A",
                "poster": "https://placeholder", "rating": "N/A"
            })
        );
    }

    #[test]
    fn update_body_omits_blank_password() {
        let update = UserUpdate {
            id: UserId(4),
            username: "sari".into(),
            email: "sari@example.com".into(),
            phone: None,
            password: None,
            age: Some(30),
            role: UserRole::Admin,
            status: UserStatus::Suspended,
        };
        let body = serde_json::to_value(UserBody::from(&update)).unwrap();
        assert_eq!(body["id"], 4);
        assert_eq!(body["role"], "admin");
        assert_eq!(body["status"], "suspended");
        assert!(body.get("password_hash").is_none());
    }
}

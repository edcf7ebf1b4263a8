use crate::contract::model::{ListId, MetadataFilm, NewListItem, Rating};

/// Builds list records and poster URLs from metadata API films.
#[derive(Debug, Clone)]
pub struct FilmNormalizer {
    image_base_url: String,
    placeholder_poster_url: String,
}

impl FilmNormalizer {
    pub fn new(image_base_url: impl Into<String>, placeholder_poster_url: impl Into<String>) -> Self {
        Self {
            image_base_url: image_base_url.into(),
            placeholder_poster_url: placeholder_poster_url.into(),
        }
    }

    /// Full poster URL, or the placeholder when the film has no poster.
    pub fn poster_url(&self, poster_path: Option<&str>) -> String {
        match poster_path.map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) => format!(
                "{}{}",
                self.image_base_url.trim_end_matches('/'),
                ensure_leading_slash(path)
            ),
            None => self.placeholder_poster_url.clone(),
        }
    }

    pub fn to_list_item(&self, list_id: ListId, film: &MetadataFilm) -> NewListItem {
        NewListItem {
            list_id,
            tmdb_id: film.id,
            title: film.title.clone(),
            year: release_year(film.release_date.as_deref()),
            poster: self.poster_url(film.poster_path.as_deref()),
            rating: Rating::from_vote_average(film.vote_average),
        }
    }
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Year from a `YYYY-MM-DD` release date.
pub fn release_year(release_date: Option<&str>) -> Option<i32> {
    release_date
        .and_then(|d| d.trim().get(..4))
        .and_then(|y| y.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::TmdbId;

    fn normalizer() -> FilmNormalizer {
        FilmNormalizer::new("https://image.tmdb.org/t/p/w500", "https://placeholder/none.png")
    }

    #[test]
    fn normalizes_complete_film() {
        let film = MetadataFilm {
            id: TmdbId(603),
            title: "The Matrix".into(),
            release_date: Some("1999-03-30".into()),
            poster_path: Some("/matrix.jpg".into()),
            vote_average: Some(8.2),
        };
        let item = normalizer().to_list_item(ListId(4), &film);
        assert_eq!(item.list_id, ListId(4));
        assert_eq!(item.tmdb_id, TmdbId(603));
        assert_eq!(item.year, Some(1999));
        assert_eq!(item.poster, "https://image.tmdb.org/t/p/w500/matrix.jpg");
        assert_eq!(item.rating.to_string(), "4.1");
    }

    #[test]
    fn missing_fields_fall_back() {
        let film = MetadataFilm {
            id: TmdbId(1),
            title: "Unknown".into(),
            release_date: Some("".into()),
            poster_path: None,
            vote_average: Some(0.0),
        };
        let item = normalizer().to_list_item(ListId(1), &film);
        assert_eq!(item.year, None);
        assert_eq!(item.poster, "https://placeholder/none.png");
        assert_eq!(item.rating, Rating::Unrated);
    }

    #[test]
    fn release_year_parsing() {
        assert_eq!(release_year(Some("2021-10-01")), Some(2021));
        assert_eq!(release_year(Some("20")), None);
        assert_eq!(release_year(Some("abcd-01-01")), None);
        assert_eq!(release_year(None), None);
    }
}

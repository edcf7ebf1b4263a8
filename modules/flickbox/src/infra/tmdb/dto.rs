use serde::Deserialize;

use crate::contract::model::{MetadataFilm, TmdbId};

/// Paged `results` envelope of the metadata API.
#[derive(Debug, Deserialize)]
pub struct ResultsPage {
    #[serde(default)]
    pub results: Vec<MovieDto>,
}

#[derive(Debug, Deserialize)]
pub struct MovieDto {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl From<MovieDto> for MetadataFilm {
    fn from(dto: MovieDto) -> Self {
        Self {
            id: TmdbId(dto.id),
            title: dto.title.unwrap_or_default(),
            release_date: dto.release_date.filter(|d| !d.trim().is_empty()),
            poster_path: dto.poster_path.filter(|p| !p.trim().is_empty()),
            vote_average: dto.vote_average,
        }
    }
}

use async_trait::async_trait;

use crate::contract::model::MetadataFilm;
use crate::domain::error::DomainError;

/// Third-party movie metadata lookups.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn popular(&self, page: u32) -> Result<Vec<MetadataFilm>, DomainError>;
    async fn search(&self, query: &str) -> Result<Vec<MetadataFilm>, DomainError>;
}

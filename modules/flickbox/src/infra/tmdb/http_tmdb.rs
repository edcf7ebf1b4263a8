use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use super::dto::ResultsPage;
use crate::contract::model::MetadataFilm;
use crate::domain::error::DomainError;
use crate::domain::ports::MetadataSource;
use modkit::TracedClient;

const POPULAR: &str = "movie/popular";
const SEARCH: &str = "search/movie";

/// Metadata API (TMDB v3) adapter. The key travels as the `api_key` query parameter.
pub struct TmdbClient {
    client: TracedClient,
    base: Url,
    api_key: String,
}

impl TmdbClient {
    pub fn new(client: TracedClient, base: Url, api_key: impl Into<String>) -> Result<Self, DomainError> {
        if base.cannot_be_a_base() {
            return Err(DomainError::invalid_base_url(
                base.as_str(),
                "URL cannot be a base",
            ));
        }
        Ok(Self {
            client,
            base,
            api_key: api_key.into(),
        })
    }

    pub fn parse(client: TracedClient, base: &str, api_key: impl Into<String>) -> Result<Self, DomainError> {
        let url = Url::parse(base).map_err(|e| DomainError::invalid_base_url(base, e.to_string()))?;
        Self::new(client, url, api_key)
    }

    fn endpoint(&self, path: &str) -> Result<Url, DomainError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DomainError::invalid_base_url(self.base.as_str(), "URL cannot be a base"))?
            .pop_if_empty()
            .extend(path.split('/'));
        Ok(url)
    }

    async fn fetch_page(
        &self,
        path: &'static str,
        param: (&str, &str),
    ) -> Result<Vec<MetadataFilm>, DomainError> {
        if self.api_key.trim().is_empty() {
            return Err(DomainError::NotConfigured {
                what: "metadata_api_key",
            });
        }
        let url = self.endpoint(path)?;
        let query = [("api_key", self.api_key.as_str()), param];
        let response = self
            .client
            .get_with_query(url.as_str(), &query)
            .await
            .map_err(|e| DomainError::transport(path, e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::http_status(path, status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::transport(path, e.without_url().to_string()))?;
        let page: ResultsPage =
            serde_json::from_slice(&bytes).map_err(|e| DomainError::decode(path, e.to_string()))?;
        debug!(count = page.results.len(), "Metadata page received");
        Ok(page.results.into_iter().map(MetadataFilm::from).collect())
    }
}

#[async_trait]
impl MetadataSource for TmdbClient {
    #[instrument(name = "flickbox.http.tmdb.popular", skip(self))]
    async fn popular(&self, page: u32) -> Result<Vec<MetadataFilm>, DomainError> {
        let page = page.max(1).to_string();
        self.fetch_page(POPULAR, ("page", &page)).await
    }

    #[instrument(name = "flickbox.http.tmdb.search", skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<MetadataFilm>, DomainError> {
        self.fetch_page(SEARCH, ("query", query)).await
    }
}

use std::sync::Arc;

use anyhow::Context;
use modkit::{ConfigError, ModuleCtx};
use tracing::{debug, info, warn};

use crate::config::FlickboxConfig;
use crate::contract::model::{ListId, Review, UserId};
use crate::domain::error::DomainError;
use crate::domain::events::LikeUpdated;
use crate::domain::film_search::FilmSearch;
use crate::domain::like_control::LikeControl;
use crate::domain::list_collection::ListCollectionView;
use crate::domain::moderation::ReviewModeration;
use crate::domain::normalize::FilmNormalizer;
use crate::domain::ports::{
    EventPublisher, LikeGateway, ListGateway, MetadataSource, ReviewGateway, UserGateway,
    UserPrompt,
};
use crate::domain::user_admin::UserAdmin;
use crate::infra::gateway::HttpGateway;
use crate::infra::tmdb::TmdbClient;

pub const MODULE_NAME: &str = "flickbox";

/// Adapters the view controllers talk through.
#[derive(Clone)]
pub struct FlickboxPorts {
    pub lists: Arc<dyn ListGateway>,
    pub likes: Arc<dyn LikeGateway>,
    pub reviews: Arc<dyn ReviewGateway>,
    pub users: Arc<dyn UserGateway>,
    pub metadata: Arc<dyn MetadataSource>,
    pub prompt: Arc<dyn UserPrompt>,
}

/// Module root: wires adapters from configuration and hands out view controllers.
#[derive(Clone)]
pub struct Flickbox {
    ports: FlickboxPorts,
    config: FlickboxConfig,
    normalizer: FilmNormalizer,
    user_id: Option<UserId>,
    like_observer: Option<Arc<dyn EventPublisher<LikeUpdated>>>,
}

impl Flickbox {
    /// Build the HTTP adapters from the module's config section.
    pub fn init(ctx: &ModuleCtx, prompt: Arc<dyn UserPrompt>) -> anyhow::Result<Self> {
        info!("Initializing {} module", ctx.current_module());

        let cfg: FlickboxConfig = match ctx.module_config_required() {
            Ok(cfg) => cfg,
            Err(ConfigError::Missing { .. } | ConfigError::NoProvider) => {
                debug!("No module config section, using defaults");
                FlickboxConfig::default()
            }
            Err(e) => return Err(e.into()),
        };
        debug!(
            gateway = %cfg.gateway_base_url,
            metadata = %cfg.metadata_base_url,
            popular_page = cfg.popular_page,
            "Loaded flickbox config"
        );
        if cfg.metadata_api_key.trim().is_empty() {
            warn!("metadata_api_key is not set; film search will be unavailable");
        }

        let gateway = Arc::new(
            HttpGateway::parse(ctx.http(), &cfg.gateway_base_url)
                .context("gateway_base_url")?,
        );
        let metadata = Arc::new(
            TmdbClient::parse(ctx.http(), &cfg.metadata_base_url, cfg.metadata_api_key.clone())
                .context("metadata_base_url")?,
        );

        let ports = FlickboxPorts {
            lists: gateway.clone(),
            likes: gateway.clone(),
            reviews: gateway.clone(),
            users: gateway,
            metadata,
            prompt,
        };
        Ok(Self::new(ports, cfg))
    }

    pub fn new(ports: FlickboxPorts, config: FlickboxConfig) -> Self {
        let normalizer =
            FilmNormalizer::new(&config.image_base_url, &config.placeholder_poster_url);
        Self {
            ports,
            config,
            normalizer,
            user_id: None,
            like_observer: None,
        }
    }

    /// Identity for like checks and toggles.
    pub fn with_user(mut self, user_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_like_observer(mut self, observer: Arc<dyn EventPublisher<LikeUpdated>>) -> Self {
        self.like_observer = Some(observer);
        self
    }

    pub fn config(&self) -> &FlickboxConfig {
        &self.config
    }

    /// The identified user, required by like toggles.
    pub fn active_user(&self) -> Result<UserId, DomainError> {
        self.user_id.ok_or(DomainError::NoActiveUser)
    }

    pub fn list_view(&self, list_id: ListId) -> ListCollectionView {
        ListCollectionView::new(
            list_id,
            self.ports.lists.clone(),
            self.ports.prompt.clone(),
            self.normalizer.clone(),
        )
    }

    pub fn film_search(&self) -> FilmSearch {
        FilmSearch::new(self.ports.metadata.clone(), self.config.popular_page)
    }

    pub fn like_control(&self, review: &Review) -> LikeControl {
        LikeControl::new(
            review.id,
            review.likes,
            self.user_id,
            self.ports.likes.clone(),
            self.like_observer.clone(),
        )
    }

    pub fn moderation(&self) -> ReviewModeration {
        ReviewModeration::new(self.ports.reviews.clone(), self.ports.prompt.clone())
    }

    pub fn user_admin(&self) -> UserAdmin {
        UserAdmin::new(self.ports.users.clone(), self.ports.prompt.clone())
    }
}

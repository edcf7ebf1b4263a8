use async_trait::async_trait;

use crate::contract::model::{
    FilmList, LikeAction, ListId, NewListItem, NewUser, Review, ReviewId, ReviewStatus, TmdbId,
    User, UserId, UserUpdate,
};
use crate::domain::error::DomainError;

/// List endpoints of the remote data gateway.
#[async_trait]
pub trait ListGateway: Send + Sync {
    async fn fetch_list(&self, id: ListId) -> Result<FilmList, DomainError>;
    /// Returns the gateway-assigned entry id when the gateway reports one.
    async fn add_item(&self, item: &NewListItem) -> Result<Option<u64>, DomainError>;
    /// Removing an id the list does not hold is a server-side no-op.
    async fn remove_item(&self, list_id: ListId, tmdb_id: TmdbId) -> Result<(), DomainError>;
}

#[async_trait]
pub trait LikeGateway: Send + Sync {
    async fn is_liked(&self, review: ReviewId, user: UserId) -> Result<bool, DomainError>;
    /// Applies the action and returns the authoritative like count.
    async fn set_like(
        &self,
        review: ReviewId,
        user: UserId,
        action: LikeAction,
    ) -> Result<u64, DomainError>;
}

#[async_trait]
pub trait ReviewGateway: Send + Sync {
    async fn list_reviews(&self) -> Result<Vec<Review>, DomainError>;
    async fn set_status(&self, id: ReviewId, status: ReviewStatus) -> Result<(), DomainError>;
    async fn delete_review(&self, id: ReviewId) -> Result<(), DomainError>;
}

#[async_trait]
pub trait UserGateway: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, DomainError>;
    async fn create_user(&self, user: &NewUser) -> Result<(), DomainError>;
    async fn update_user(&self, user: &UserUpdate) -> Result<(), DomainError>;
    async fn delete_user(&self, id: UserId) -> Result<(), DomainError>;
}

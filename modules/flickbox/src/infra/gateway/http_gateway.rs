use async_trait::async_trait;
use http::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::dto::{
    Ack, AddListItemBody, IdBody, LikeBody, LikeResponse, LikeStatusResponse, ListItemsResponse,
    RemoveListItemBody, ReviewStatusBody, ReviewsResponse, UserBody, UserDto,
};
use crate::contract::model::{
    FilmList, LikeAction, ListId, NewListItem, NewUser, Review, ReviewId, ReviewStatus, TmdbId,
    User, UserId, UserUpdate,
};
use crate::domain::error::DomainError;
use crate::domain::ports::{LikeGateway, ListGateway, ReviewGateway, UserGateway};
use modkit::TracedClient;

const CHECK_LIKE: &str = "check_like.php";
const LIKE_HANDLER: &str = "like_handler.php";
const LIST_ITEMS: &str = "movie_list_items.php";
const ADD_LIST_ITEM: &str = "add_movie_list_item.php";
const DELETE_LIST_ITEM: &str = "delete_movie_list_item.php";
const REVIEWS: &str = "moderasi_review.php";
const USERS: &str = "users.php";

/// Single HTTP adapter for every PHP gateway endpoint.
pub struct HttpGateway {
    client: TracedClient,
    base: Url,
}

impl HttpGateway {
    /// `base` must be a hierarchical URL such as `https://host/api`.
    pub fn new(client: TracedClient, base: Url) -> Result<Self, DomainError> {
        if base.cannot_be_a_base() {
            return Err(DomainError::invalid_base_url(
                base.as_str(),
                "URL cannot be a base",
            ));
        }
        Ok(Self { client, base })
    }

    pub fn parse(client: TracedClient, base: &str) -> Result<Self, DomainError> {
        let url = Url::parse(base).map_err(|e| DomainError::invalid_base_url(base, e.to_string()))?;
        Self::new(client, url)
    }

    fn endpoint(&self, name: &str) -> Result<Url, DomainError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DomainError::invalid_base_url(self.base.as_str(), "URL cannot be a base"))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    async fn get_json<T, Q>(&self, name: &str, query: &Q) -> Result<T, DomainError>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = self.endpoint(name)?;
        let response = self
            .client
            .get_with_query(url.as_str(), query)
            .await
            .map_err(|e| DomainError::transport(name, e.to_string()))?;
        read_json(name, response).await
    }

    async fn send<T, B>(&self, method: Method, name: &str, body: &B) -> Result<T, DomainError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.endpoint(name)?;
        let response = self
            .client
            .send_json(method, url.as_str(), body)
            .await
            .map_err(|e| DomainError::transport(name, e.to_string()))?;
        read_json(name, response).await
    }

    /// Send and require `success: true` in the acknowledgement.
    async fn send_acked<B>(&self, method: Method, name: &str, body: &B) -> Result<Ack, DomainError>
    where
        B: serde::Serialize + ?Sized,
    {
        let ack: Ack = self.send(method, name, body).await?;
        if ack.success {
            Ok(ack)
        } else {
            Err(DomainError::rejected(name, ack.reason()))
        }
    }
}

/// Status check, then a JSON body. Non-2xx answers are not decoded.
async fn read_json<T: DeserializeOwned>(
    name: &str,
    response: reqwest::Response,
) -> Result<T, DomainError> {
    let status = response.status();
    if !status.is_success() {
        return Err(DomainError::http_status(name, status.as_u16()));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| DomainError::transport(name, e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| DomainError::decode(name, e.to_string()))
}

#[async_trait]
impl ListGateway for HttpGateway {
    #[instrument(name = "flickbox.http.lists.fetch", skip_all, fields(list_id = %id))]
    async fn fetch_list(&self, id: ListId) -> Result<FilmList, DomainError> {
        let body: ListItemsResponse = self.get_json(LIST_ITEMS, &[("list_id", id.0)]).await?;
        Ok(body.into_list(id))
    }

    #[instrument(
        name = "flickbox.http.lists.add_item",
        skip_all,
        fields(list_id = %item.list_id, tmdb_id = %item.tmdb_id)
    )]
    async fn add_item(&self, item: &NewListItem) -> Result<Option<u64>, DomainError> {
        let ack = self
            .send_acked(Method::POST, ADD_LIST_ITEM, &AddListItemBody::from(item))
            .await?;
        debug!(entry_id = ?ack.id, "Gateway accepted list item");
        Ok(ack.id)
    }

    #[instrument(
        name = "flickbox.http.lists.remove_item",
        skip_all,
        fields(list_id = %list_id, tmdb_id = %tmdb_id)
    )]
    async fn remove_item(&self, list_id: ListId, tmdb_id: TmdbId) -> Result<(), DomainError> {
        let body = RemoveListItemBody {
            list_id: list_id.0,
            tmdb_id: tmdb_id.0,
        };
        self.send_acked(Method::POST, DELETE_LIST_ITEM, &body).await?;
        Ok(())
    }
}

#[async_trait]
impl LikeGateway for HttpGateway {
    #[instrument(name = "flickbox.http.likes.check", skip_all, fields(review_id = %review, user_id = %user))]
    async fn is_liked(&self, review: ReviewId, user: UserId) -> Result<bool, DomainError> {
        let body: LikeStatusResponse = self
            .get_json(CHECK_LIKE, &[("review_id", review.0), ("user_id", user.0)])
            .await?;
        Ok(body.is_liked)
    }

    #[instrument(
        name = "flickbox.http.likes.set",
        skip_all,
        fields(review_id = %review, user_id = %user, action = action.as_str())
    )]
    async fn set_like(
        &self,
        review: ReviewId,
        user: UserId,
        action: LikeAction,
    ) -> Result<u64, DomainError> {
        let body = LikeBody {
            review_id: review.0,
            user_id: user.0,
            action: action.as_str(),
        };
        let response: LikeResponse = self.send(Method::POST, LIKE_HANDLER, &body).await?;
        if !response.is_success() {
            return Err(DomainError::rejected(LIKE_HANDLER, response.reason()));
        }
        response
            .likes
            .ok_or_else(|| DomainError::decode(LIKE_HANDLER, "missing likes count"))
    }
}

#[async_trait]
impl ReviewGateway for HttpGateway {
    #[instrument(name = "flickbox.http.reviews.list", skip_all)]
    async fn list_reviews(&self) -> Result<Vec<Review>, DomainError> {
        let body: ReviewsResponse = self.get_json(REVIEWS, &[] as &[(&str, &str)]).await?;
        if !body.success {
            return Err(DomainError::rejected(REVIEWS, body.reason()));
        }
        Ok(body
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|dto| dto.into_review())
            .collect())
    }

    #[instrument(name = "flickbox.http.reviews.set_status", skip_all, fields(review_id = %id, status = %status))]
    async fn set_status(&self, id: ReviewId, status: ReviewStatus) -> Result<(), DomainError> {
        let body = ReviewStatusBody {
            id: id.0,
            status: status.as_str(),
        };
        self.send_acked(Method::POST, REVIEWS, &body).await?;
        Ok(())
    }

    #[instrument(name = "flickbox.http.reviews.delete", skip_all, fields(review_id = %id))]
    async fn delete_review(&self, id: ReviewId) -> Result<(), DomainError> {
        self.send_acked(Method::POST, REVIEWS, &IdBody { id: id.0 })
            .await?;
        Ok(())
    }
}

/// `users.php` mutation replies are not standardized; only an explicit
/// `success: false` counts as a refusal.
fn check_user_ack(value: serde_json::Value) -> Result<(), DomainError> {
    match value.get("success").and_then(serde_json::Value::as_bool) {
        Some(false) => {
            let ack: Ack = serde_json::from_value(value).unwrap_or_default();
            Err(DomainError::rejected(USERS, ack.reason()))
        }
        _ => Ok(()),
    }
}

impl HttpGateway {
    /// Like [`Self::send`] but tolerates an empty or non-JSON 2xx body.
    async fn send_user_mutation<B>(&self, method: Method, body: &B) -> Result<(), DomainError>
    where
        B: serde::Serialize + ?Sized,
    {
        let url = self.endpoint(USERS)?;
        let response = self
            .client
            .send_json(method, url.as_str(), body)
            .await
            .map_err(|e| DomainError::transport(USERS, e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::http_status(USERS, status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::transport(USERS, e.to_string()))?;
        match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(value) => check_user_ack(value),
            Err(_) => Ok(()),
        }
    }
}

#[async_trait]
impl UserGateway for HttpGateway {
    #[instrument(name = "flickbox.http.users.list", skip_all)]
    async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserDto> = self.get_json(USERS, &[] as &[(&str, &str)]).await?;
        Ok(rows.into_iter().filter_map(|dto| dto.into_user()).collect())
    }

    #[instrument(name = "flickbox.http.users.create", skip_all, fields(username = %user.username))]
    async fn create_user(&self, user: &NewUser) -> Result<(), DomainError> {
        self.send_user_mutation(Method::POST, &UserBody::from(user))
            .await
    }

    #[instrument(name = "flickbox.http.users.update", skip_all, fields(user_id = %user.id))]
    async fn update_user(&self, user: &UserUpdate) -> Result<(), DomainError> {
        self.send_user_mutation(Method::PUT, &UserBody::from(user))
            .await
    }

    #[instrument(name = "flickbox.http.users.delete", skip_all, fields(user_id = %id))]
    async fn delete_user(&self, id: UserId) -> Result<(), DomainError> {
        self.send_user_mutation(Method::DELETE, &IdBody { id: id.0 })
            .await
    }
}

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::contract::model::{Review, ReviewId, ReviewStatus};
use crate::domain::error::DomainError;
use crate::domain::filter::{filter_listing, Listing};
use crate::domain::ports::{ReviewGateway, UserPrompt};

pub const CONFIRM_DELETE_REVIEW: &str = "Are you sure you want to delete this review?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationOutcome {
    Applied,
    /// The review already had the requested status, or is not in the local list.
    Unchanged,
    Cancelled,
}

#[derive(Default)]
struct ModerationState {
    loaded: bool,
    loading: bool,
    reviews: Vec<Review>,
}

/// Review moderation table. Mutations patch the single affected row in place.
pub struct ReviewModeration {
    gateway: Arc<dyn ReviewGateway>,
    prompt: Arc<dyn UserPrompt>,
    state: Mutex<ModerationState>,
}

impl ReviewModeration {
    pub fn new(gateway: Arc<dyn ReviewGateway>, prompt: Arc<dyn UserPrompt>) -> Self {
        Self {
            gateway,
            prompt,
            state: Mutex::new(ModerationState::default()),
        }
    }

    /// Fetch reviews on first use. Later calls are no-ops; use [`Self::refresh`].
    pub async fn load(&self) {
        if self.state.lock().loaded {
            return;
        }
        self.refresh().await;
    }

    #[instrument(name = "flickbox.moderation.refresh", skip(self))]
    pub async fn refresh(&self) {
        self.state.lock().loading = true;
        let reviews = match self.gateway.list_reviews().await {
            Ok(reviews) => {
                debug!(count = reviews.len(), "Reviews loaded");
                reviews
            }
            Err(e) => {
                warn!(error = %e, "Fetching reviews failed");
                Vec::new()
            }
        };
        let mut s = self.state.lock();
        s.reviews = reviews;
        s.loaded = true;
        s.loading = false;
    }

    pub fn reviews(&self) -> Vec<Review> {
        self.state.lock().reviews.clone()
    }

    /// Reviews matching `term` across username, film title and text.
    pub fn listing(&self, term: &str) -> Listing<Review> {
        let s = self.state.lock();
        filter_listing(&s.reviews, term, s.loading)
    }

    pub async fn approve(&self, id: ReviewId) -> Result<ModerationOutcome, DomainError> {
        self.set_status(id, ReviewStatus::Approved).await
    }

    pub async fn reject(&self, id: ReviewId) -> Result<ModerationOutcome, DomainError> {
        self.set_status(id, ReviewStatus::Rejected).await
    }

    #[instrument(name = "flickbox.moderation.set_status", skip(self), fields(review_id = %id, status = %status))]
    async fn set_status(
        &self,
        id: ReviewId,
        status: ReviewStatus,
    ) -> Result<ModerationOutcome, DomainError> {
        let current = self
            .state
            .lock()
            .reviews
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status);
        match current {
            None => {
                debug!("Review not in the local list");
                return Ok(ModerationOutcome::Unchanged);
            }
            Some(s) if s == status => return Ok(ModerationOutcome::Unchanged),
            Some(_) => {}
        }

        if let Err(e) = self.gateway.set_status(id, status).await {
            warn!(error = %e, "Updating review status failed");
            self.prompt.alert(&e.alert_message("update review status"));
            return Err(e);
        }

        if let Some(review) = self.state.lock().reviews.iter_mut().find(|r| r.id == id) {
            review.status = status;
        }
        info!("Review status updated");
        Ok(ModerationOutcome::Applied)
    }

    #[instrument(name = "flickbox.moderation.delete", skip(self), fields(review_id = %id))]
    pub async fn delete(&self, id: ReviewId) -> Result<ModerationOutcome, DomainError> {
        if !self.prompt.confirm(CONFIRM_DELETE_REVIEW) {
            return Ok(ModerationOutcome::Cancelled);
        }

        if let Err(e) = self.gateway.delete_review(id).await {
            warn!(error = %e, "Deleting review failed");
            self.prompt.alert(&e.alert_message("delete review"));
            return Err(e);
        }

        self.state.lock().reviews.retain(|r| r.id != id);
        info!("Review deleted");
        Ok(ModerationOutcome::Applied)
    }
}

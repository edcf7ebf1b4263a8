use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use crate::contract::model::{LikeAction, ReviewId, UserId};
use crate::domain::events::LikeUpdated;
use crate::domain::ports::{EventPublisher, LikeGateway};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    Unknown,
    Checked { liked: bool },
}

impl LikeState {
    pub fn is_liked(&self) -> bool {
        matches!(self, Self::Checked { liked: true })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    NoUser,
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Toggled { liked: bool, likes: u64 },
    Ignored(IgnoredReason),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeSnapshot {
    pub state: LikeState,
    pub likes: u64,
    pub in_flight: bool,
}

struct Inner {
    state: LikeState,
    likes: u64,
    in_flight: bool,
}

/// Clears the in-flight flag when the toggle request settles.
struct Busy<'a>(&'a Mutex<Inner>);

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.0.lock().in_flight = false;
    }
}

/// Like button state for one review and the current user.
pub struct LikeControl {
    review_id: ReviewId,
    user_id: Option<UserId>,
    gateway: Arc<dyn LikeGateway>,
    observer: Option<Arc<dyn EventPublisher<LikeUpdated>>>,
    inner: Mutex<Inner>,
}

impl LikeControl {
    pub fn new(
        review_id: ReviewId,
        initial_likes: u64,
        user_id: Option<UserId>,
        gateway: Arc<dyn LikeGateway>,
        observer: Option<Arc<dyn EventPublisher<LikeUpdated>>>,
    ) -> Self {
        Self {
            review_id,
            user_id,
            gateway,
            observer,
            inner: Mutex::new(Inner {
                state: LikeState::Unknown,
                likes: initial_likes,
                in_flight: false,
            }),
        }
    }

    pub fn snapshot(&self) -> LikeSnapshot {
        let inner = self.inner.lock();
        LikeSnapshot {
            state: inner.state,
            likes: inner.likes,
            in_flight: inner.in_flight,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.user_id.is_none() || self.inner.lock().in_flight
    }

    /// Resolve whether the current user already likes the review.
    #[instrument(name = "flickbox.like.check", skip(self), fields(review_id = %self.review_id))]
    pub async fn check(&self) -> LikeState {
        let Some(user_id) = self.user_id else {
            debug!("No user identified, skipping like check");
            return self.inner.lock().state;
        };

        match self.gateway.is_liked(self.review_id, user_id).await {
            Ok(liked) => {
                let mut inner = self.inner.lock();
                inner.state = LikeState::Checked { liked };
                inner.state
            }
            Err(e) => {
                warn!(error = %e, "Like check failed");
                self.inner.lock().state
            }
        }
    }

    #[instrument(name = "flickbox.like.toggle", skip(self), fields(review_id = %self.review_id))]
    pub async fn toggle(&self) -> ToggleOutcome {
        let Some(user_id) = self.user_id else {
            return ToggleOutcome::Ignored(IgnoredReason::NoUser);
        };

        let action = {
            let mut inner = self.inner.lock();
            if inner.in_flight {
                return ToggleOutcome::Ignored(IgnoredReason::InFlight);
            }
            inner.in_flight = true;
            if inner.state.is_liked() {
                LikeAction::Unlike
            } else {
                LikeAction::Like
            }
        };
        let _busy = Busy(&self.inner);

        let likes = match self.gateway.set_like(self.review_id, user_id, action).await {
            Ok(likes) => likes,
            Err(e) => {
                warn!(error = %e, action = action.as_str(), "Like toggle failed");
                return ToggleOutcome::Failed;
            }
        };

        let liked = action == LikeAction::Like;
        {
            let mut inner = self.inner.lock();
            inner.state = LikeState::Checked { liked };
            inner.likes = likes;
        }
        debug!(liked, likes, "Like toggled");

        if let Some(observer) = &self.observer {
            observer.publish(&LikeUpdated {
                review_id: self.review_id,
                likes,
                liked,
            });
        }
        ToggleOutcome::Toggled { liked, likes }
    }
}

use crate::contract::model::ReviewId;

/// Emitted after the gateway confirms a like toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeUpdated {
    pub review_id: ReviewId,
    pub likes: u64,
    pub liked: bool,
}

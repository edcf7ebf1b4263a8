use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::contract::model::{FilmList, ListFilm, ListId, MetadataFilm, TmdbId};
use crate::domain::error::DomainError;
use crate::domain::normalize::FilmNormalizer;
use crate::domain::ports::{ListGateway, UserPrompt};

/// Header fallback when a list has no description.
pub const DEFAULT_LIST_DESCRIPTION: &str = "Your personalized film collection";

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    /// The initial fetch failed; nothing can be added or removed.
    Missing,
    Ready(FilmList),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(ListFilm),
    /// The external id is already in the collection; nothing was sent.
    AlreadyPresent,
    NoList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Number of local entries dropped (0 when the id was unknown locally).
    Removed { count: usize },
    NothingPending,
    NoList,
}

struct ViewState {
    list: ListState,
    pending_removal: Option<TmdbId>,
}

/// One list's detail screen: its films plus add/remove round-trips.
///
/// Local state only changes after the gateway confirms a mutation.
pub struct ListCollectionView {
    list_id: ListId,
    gateway: Arc<dyn ListGateway>,
    prompt: Arc<dyn UserPrompt>,
    normalizer: FilmNormalizer,
    state: Mutex<ViewState>,
}

impl ListCollectionView {
    pub fn new(
        list_id: ListId,
        gateway: Arc<dyn ListGateway>,
        prompt: Arc<dyn UserPrompt>,
        normalizer: FilmNormalizer,
    ) -> Self {
        Self {
            list_id,
            gateway,
            prompt,
            normalizer,
            state: Mutex::new(ViewState {
                list: ListState::Loading,
                pending_removal: None,
            }),
        }
    }

    /// Fetch the list and its films. A failed read leaves the view `Missing`.
    #[instrument(name = "flickbox.list.load", skip(self), fields(list_id = %self.list_id))]
    pub async fn load(&self) {
        let next = match self.gateway.fetch_list(self.list_id).await {
            Ok(list) => {
                debug!(films = list.films.len(), "List loaded");
                ListState::Ready(list)
            }
            Err(e) => {
                warn!(error = %e, "List fetch failed");
                ListState::Missing
            }
        };
        self.state.lock().list = next;
    }

    pub fn state(&self) -> ListState {
        self.state.lock().list.clone()
    }

    pub fn films(&self) -> Vec<ListFilm> {
        match &self.state.lock().list {
            ListState::Ready(list) => list.films.clone(),
            ListState::Loading | ListState::Missing => Vec::new(),
        }
    }

    /// True when the grid should show the empty-state prompt.
    pub fn is_empty(&self) -> bool {
        self.films().is_empty()
    }

    #[instrument(
        name = "flickbox.list.add_film",
        skip(self, film),
        fields(list_id = %self.list_id, tmdb_id = %film.id)
    )]
    pub async fn add_film(&self, film: &MetadataFilm) -> Result<AddOutcome, DomainError> {
        let item = {
            let state = self.state.lock();
            let ListState::Ready(list) = &state.list else {
                debug!("No list loaded, ignoring add");
                return Ok(AddOutcome::NoList);
            };
            if list.contains(film.id) {
                debug!("Film already in list");
                return Ok(AddOutcome::AlreadyPresent);
            }
            self.normalizer.to_list_item(self.list_id, film)
        };

        let assigned = match self.gateway.add_item(&item).await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Adding film failed");
                self.prompt.alert(&e.alert_message("add film"));
                return Err(e);
            }
        };

        let entry_id = assigned.unwrap_or_else(fallback_entry_id);
        let added = item.into_film(entry_id);

        let mut state = self.state.lock();
        if let ListState::Ready(list) = &mut state.list {
            if !list.contains(added.tmdb_id) {
                list.films.push(added.clone());
            }
        }
        info!(entry_id, "Film added to list");
        Ok(AddOutcome::Added(added))
    }

    /// Open the confirmation prompt for removing a film.
    pub fn request_remove(&self, tmdb_id: TmdbId) {
        self.state.lock().pending_removal = Some(tmdb_id);
    }

    pub fn cancel_remove(&self) {
        self.state.lock().pending_removal = None;
    }

    pub fn pending_removal(&self) -> Option<TmdbId> {
        self.state.lock().pending_removal
    }

    /// Remove the film awaiting confirmation, if any.
    pub async fn confirm_remove(&self) -> Result<RemoveOutcome, DomainError> {
        match self.pending_removal() {
            Some(tmdb_id) => self.remove_film(tmdb_id).await,
            None => Ok(RemoveOutcome::NothingPending),
        }
    }

    #[instrument(
        name = "flickbox.list.remove_film",
        skip(self),
        fields(list_id = %self.list_id, tmdb_id = %tmdb_id)
    )]
    pub async fn remove_film(&self, tmdb_id: TmdbId) -> Result<RemoveOutcome, DomainError> {
        if !matches!(self.state.lock().list, ListState::Ready(_)) {
            return Ok(RemoveOutcome::NoList);
        }

        if let Err(e) = self.gateway.remove_item(self.list_id, tmdb_id).await {
            warn!(error = %e, "Removing film failed");
            self.prompt.alert(&e.alert_message("remove film"));
            return Err(e);
        }

        let mut state = self.state.lock();
        let count = match &mut state.list {
            ListState::Ready(list) => {
                let before = list.films.len();
                list.films.retain(|f| f.tmdb_id != tmdb_id);
                before - list.films.len()
            }
            ListState::Loading | ListState::Missing => 0,
        };
        state.pending_removal = None;
        info!(count, "Film removed from list");
        Ok(RemoveOutcome::Removed { count })
    }
}

/// Client-side entry id used when the gateway does not return one.
fn fallback_entry_id() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}

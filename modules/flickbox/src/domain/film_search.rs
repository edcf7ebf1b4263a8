use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use crate::contract::model::MetadataFilm;
use crate::domain::ports::MetadataSource;

/// What the search modal shows right now.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchDisplay {
    Closed,
    Loading,
    NoResults,
    Films(Vec<MetadataFilm>),
}

#[derive(Default)]
struct SearchState {
    open: bool,
    query: String,
    results: Vec<MetadataFilm>,
    popular: Vec<MetadataFilm>,
    in_flight: usize,
}

impl SearchState {
    fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    fn shown(&self) -> &[MetadataFilm] {
        if self.has_query() {
            &self.results
        } else {
            &self.popular
        }
    }
}

/// Decrements the in-flight counter however the request ends.
struct InFlight<'a>(&'a Mutex<SearchState>);

impl<'a> InFlight<'a> {
    fn start(state: &'a Mutex<SearchState>) -> Self {
        state.lock().in_flight += 1;
        Self(state)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut s = self.0.lock();
        s.in_flight = s.in_flight.saturating_sub(1);
    }
}

/// Film picker backed by the metadata API.
///
/// Searches are never cancelled; whichever response lands last is displayed.
pub struct FilmSearch {
    metadata: Arc<dyn MetadataSource>,
    popular_page: u32,
    state: Mutex<SearchState>,
}

impl FilmSearch {
    pub fn new(metadata: Arc<dyn MetadataSource>, popular_page: u32) -> Self {
        Self {
            metadata,
            popular_page,
            state: Mutex::new(SearchState::default()),
        }
    }

    /// Show the modal. Popular films are fetched while the query is empty.
    #[instrument(name = "flickbox.search.open", skip(self))]
    pub async fn open(&self) {
        let needs_popular = {
            let mut s = self.state.lock();
            s.open = true;
            !s.has_query()
        };
        if !needs_popular {
            return;
        }

        let fetched = {
            let _guard = InFlight::start(&self.state);
            self.metadata.popular(self.popular_page).await
        };
        match fetched {
            Ok(films) => {
                debug!(count = films.len(), "Popular films loaded");
                let mut s = self.state.lock();
                if s.open {
                    s.popular = films;
                }
            }
            Err(e) => warn!(error = %e, "Fetching popular films failed"),
        }
    }

    #[instrument(name = "flickbox.search.set_query", skip(self))]
    pub async fn set_query(&self, query: &str) {
        {
            let mut s = self.state.lock();
            s.query = query.to_string();
            if !s.has_query() {
                s.results.clear();
                return;
            }
        }

        let fetched = {
            let _guard = InFlight::start(&self.state);
            self.metadata.search(query.trim()).await
        };
        let results = match fetched {
            Ok(films) => {
                debug!(count = films.len(), "Search results received");
                films
            }
            Err(e) => {
                warn!(error = %e, "Film search failed");
                Vec::new()
            }
        };

        let mut s = self.state.lock();
        if s.open && s.has_query() {
            s.results = results;
        }
    }

    /// Hide the modal and forget the query and results.
    pub fn close(&self) {
        let mut s = self.state.lock();
        s.open = false;
        s.query.clear();
        s.results.clear();
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().open
    }

    pub fn query(&self) -> String {
        self.state.lock().query.clone()
    }

    pub fn display(&self) -> SearchDisplay {
        let s = self.state.lock();
        if !s.open {
            return SearchDisplay::Closed;
        }
        if s.in_flight > 0 {
            return SearchDisplay::Loading;
        }
        match s.shown() {
            [] => SearchDisplay::NoResults,
            films => SearchDisplay::Films(films.to_vec()),
        }
    }

    /// The film at `index` among the currently displayed results.
    pub fn pick(&self, index: usize) -> Option<MetadataFilm> {
        let s = self.state.lock();
        if !s.open {
            return None;
        }
        s.shown().get(index).cloned()
    }
}

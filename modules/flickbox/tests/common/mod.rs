//! In-memory fakes for the flickbox ports.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use flickbox::config::FlickboxConfig;
use flickbox::domain::error::DomainError;
use flickbox::domain::events::LikeUpdated;
use flickbox::domain::ports::{
    EventPublisher, LikeGateway, ListGateway, MetadataSource, ReviewGateway, UserGateway,
    UserPrompt,
};
use flickbox::model::{
    FilmList, LikeAction, ListFilm, ListId, MetadataFilm, NewListItem, NewUser, Rating, Review,
    ReviewId, ReviewStatus, TmdbId, User, UserId, UserRole, UserStatus, UserUpdate,
};
use flickbox::{Flickbox, FlickboxPorts};

pub fn film(tmdb: u64) -> ListFilm {
    ListFilm {
        entry_id: Some(100 + tmdb),
        tmdb_id: TmdbId(tmdb),
        title: format!("Film {tmdb}"),
        year: Some(2001),
        poster: Some(format!("https://img/{tmdb}.jpg")),
        rating: Rating::Stars(3.5),
    }
}

pub fn metadata_film(id: u64) -> MetadataFilm {
    MetadataFilm {
        id: TmdbId(id),
        title: format!("Film {id}"),
        release_date: Some("2010-07-16".into()),
        poster_path: Some(format!("/{id}.jpg")),
        vote_average: Some(8.8),
    }
}

pub fn list_with(films: Vec<ListFilm>) -> FilmList {
    FilmList {
        id: ListId(1),
        name: "Favourites".into(),
        description: None,
        created_at: None,
        films,
    }
}

pub fn review(id: u64, status: ReviewStatus) -> Review {
    Review {
        id: ReviewId(id),
        username: format!("user{id}"),
        movie_title: format!("Movie {id}"),
        review_text: format!("Review text {id}"),
        status,
        likes: id,
    }
}

pub fn user(id: u64, name: &str, status: UserStatus) -> User {
    User {
        id: UserId(id),
        username: name.into(),
        email: format!("{name}@example.com"),
        phone: None,
        age: Some(25),
        role: UserRole::User,
        status,
    }
}

pub fn gateway_down(endpoint: &str) -> DomainError {
    DomainError::transport(endpoint, "connection refused")
}

// ---------- list gateway ----------

#[derive(Default)]
pub struct FakeLists {
    pub list: Mutex<Option<FilmList>>,
    pub added: Mutex<Vec<NewListItem>>,
    pub removed: Mutex<Vec<(ListId, TmdbId)>>,
    pub assign_id: Mutex<Option<u64>>,
    pub fail_with: Mutex<Option<DomainError>>,
}

impl FakeLists {
    pub fn with_list(list: FilmList) -> Arc<Self> {
        let fake = Self::default();
        *fake.list.lock() = Some(list);
        *fake.assign_id.lock() = Some(500);
        Arc::new(fake)
    }

    pub fn fail(&self, e: DomainError) {
        *self.fail_with.lock() = Some(e);
    }

    fn check(&self) -> Result<(), DomainError> {
        match self.fail_with.lock().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ListGateway for FakeLists {
    async fn fetch_list(&self, id: ListId) -> Result<FilmList, DomainError> {
        self.check()?;
        self.list
            .lock()
            .clone()
            .filter(|l| l.id == id)
            .ok_or_else(|| DomainError::http_status("movie_list_items.php", 404))
    }

    async fn add_item(&self, item: &NewListItem) -> Result<Option<u64>, DomainError> {
        self.check()?;
        self.added.lock().push(item.clone());
        Ok(*self.assign_id.lock())
    }

    async fn remove_item(&self, list_id: ListId, tmdb_id: TmdbId) -> Result<(), DomainError> {
        self.check()?;
        self.removed.lock().push((list_id, tmdb_id));
        Ok(())
    }
}

// ---------- likes ----------

/// Server-side like table for a single review.
pub struct FakeLikes {
    pub liked_by: Mutex<HashMap<(ReviewId, UserId), bool>>,
    pub count: Mutex<u64>,
    pub calls: Mutex<Vec<LikeAction>>,
    pub fail_with: Mutex<Option<DomainError>>,
    /// Gate used to hold a toggle request open.
    pub gate: Mutex<Option<Arc<tokio::sync::Notify>>>,
}

impl FakeLikes {
    pub fn new(count: u64) -> Arc<Self> {
        Arc::new(Self {
            liked_by: Mutex::new(HashMap::new()),
            count: Mutex::new(count),
            calls: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
            gate: Mutex::new(None),
        })
    }
}

#[async_trait]
impl LikeGateway for FakeLikes {
    async fn is_liked(&self, review: ReviewId, user: UserId) -> Result<bool, DomainError> {
        if let Some(e) = self.fail_with.lock().clone() {
            return Err(e);
        }
        Ok(self
            .liked_by
            .lock()
            .get(&(review, user))
            .copied()
            .unwrap_or(false))
    }

    async fn set_like(
        &self,
        review: ReviewId,
        user: UserId,
        action: LikeAction,
    ) -> Result<u64, DomainError> {
        self.calls.lock().push(action);
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(e) = self.fail_with.lock().clone() {
            return Err(e);
        }
        let mut count = self.count.lock();
        match action {
            LikeAction::Like => *count += 1,
            LikeAction::Unlike => *count = count.saturating_sub(1),
        }
        self.liked_by
            .lock()
            .insert((review, user), action == LikeAction::Like);
        Ok(*count)
    }
}

// ---------- reviews ----------

#[derive(Default)]
pub struct FakeReviews {
    pub rows: Mutex<Vec<Review>>,
    pub fetches: Mutex<usize>,
    pub status_calls: Mutex<Vec<(ReviewId, ReviewStatus)>>,
    pub deleted: Mutex<Vec<ReviewId>>,
    pub fail_mutations: Mutex<Option<DomainError>>,
    pub fail_reads: Mutex<bool>,
}

impl FakeReviews {
    pub fn with(rows: Vec<Review>) -> Arc<Self> {
        let fake = Self::default();
        *fake.rows.lock() = rows;
        Arc::new(fake)
    }
}

#[async_trait]
impl ReviewGateway for FakeReviews {
    async fn list_reviews(&self) -> Result<Vec<Review>, DomainError> {
        *self.fetches.lock() += 1;
        if *self.fail_reads.lock() {
            return Err(gateway_down("moderasi_review.php"));
        }
        Ok(self.rows.lock().clone())
    }

    async fn set_status(&self, id: ReviewId, status: ReviewStatus) -> Result<(), DomainError> {
        if let Some(e) = self.fail_mutations.lock().clone() {
            return Err(e);
        }
        self.status_calls.lock().push((id, status));
        Ok(())
    }

    async fn delete_review(&self, id: ReviewId) -> Result<(), DomainError> {
        if let Some(e) = self.fail_mutations.lock().clone() {
            return Err(e);
        }
        self.deleted.lock().push(id);
        Ok(())
    }
}

// ---------- users ----------

/// Stores users server-side so refetches observe mutations.
#[derive(Default)]
pub struct FakeUsers {
    pub rows: Mutex<Vec<User>>,
    pub fetches: Mutex<usize>,
    pub created: Mutex<Vec<NewUser>>,
    pub updated: Mutex<Vec<UserUpdate>>,
    pub deleted: Mutex<Vec<UserId>>,
    pub fail_mutations: Mutex<Option<DomainError>>,
}

impl FakeUsers {
    pub fn with(rows: Vec<User>) -> Arc<Self> {
        let fake = Self::default();
        *fake.rows.lock() = rows;
        Arc::new(fake)
    }

    fn check(&self) -> Result<(), DomainError> {
        match self.fail_mutations.lock().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserGateway for FakeUsers {
    async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        *self.fetches.lock() += 1;
        Ok(self.rows.lock().clone())
    }

    async fn create_user(&self, new: &NewUser) -> Result<(), DomainError> {
        self.check()?;
        self.created.lock().push(new.clone());
        let mut rows = self.rows.lock();
        let id = rows.iter().map(|u| u.id.0).max().unwrap_or(0) + 1;
        rows.push(User {
            id: UserId(id),
            username: new.username.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            age: new.age,
            role: new.role,
            status: new.status,
        });
        Ok(())
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<(), DomainError> {
        self.check()?;
        self.updated.lock().push(update.clone());
        if let Some(u) = self.rows.lock().iter_mut().find(|u| u.id == update.id) {
            u.username = update.username.clone();
            u.email = update.email.clone();
            u.phone = update.phone.clone();
            u.age = update.age;
            u.role = update.role;
            u.status = update.status;
        }
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), DomainError> {
        self.check()?;
        self.deleted.lock().push(id);
        self.rows.lock().retain(|u| u.id != id);
        Ok(())
    }
}

// ---------- metadata ----------

/// Scripted metadata API. Each search may be held behind its own gate.
#[derive(Default)]
pub struct FakeMetadata {
    pub popular: Mutex<Vec<MetadataFilm>>,
    pub by_query: Mutex<HashMap<String, Vec<MetadataFilm>>>,
    pub gates: Mutex<HashMap<String, Arc<tokio::sync::Notify>>>,
    pub popular_calls: Mutex<Vec<u32>>,
    pub search_calls: Mutex<Vec<String>>,
    pub fail: Mutex<bool>,
}

impl FakeMetadata {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn total_calls(&self) -> usize {
        self.popular_calls.lock().len() + self.search_calls.lock().len()
    }
}

#[async_trait]
impl MetadataSource for FakeMetadata {
    async fn popular(&self, page: u32) -> Result<Vec<MetadataFilm>, DomainError> {
        self.popular_calls.lock().push(page);
        if *self.fail.lock() {
            return Err(gateway_down("movie/popular"));
        }
        Ok(self.popular.lock().clone())
    }

    async fn search(&self, query: &str) -> Result<Vec<MetadataFilm>, DomainError> {
        self.search_calls.lock().push(query.to_string());
        let gate = self.gates.lock().get(query).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if *self.fail.lock() {
            return Err(gateway_down("search/movie"));
        }
        Ok(self
            .by_query
            .lock()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}

// ---------- prompt & observer ----------

pub struct RecordingPrompt {
    pub alerts: Mutex<Vec<String>>,
    pub confirms: Mutex<Vec<String>>,
    pub answers: Mutex<VecDeque<bool>>,
    pub default_answer: bool,
}

impl RecordingPrompt {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self::answering(true))
    }

    pub fn declining() -> Arc<Self> {
        Arc::new(Self::answering(false))
    }

    fn answering(default_answer: bool) -> Self {
        Self {
            alerts: Mutex::new(Vec::new()),
            confirms: Mutex::new(Vec::new()),
            answers: Mutex::new(VecDeque::new()),
            default_answer,
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().clone()
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().clone()
    }
}

impl UserPrompt for RecordingPrompt {
    fn alert(&self, message: &str) {
        self.alerts.lock().push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.confirms.lock().push(message.to_string());
        self.answers
            .lock()
            .pop_front()
            .unwrap_or(self.default_answer)
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<LikeUpdated>>,
}

impl EventPublisher<LikeUpdated> for RecordingObserver {
    fn publish(&self, event: &LikeUpdated) {
        self.events.lock().push(event.clone());
    }
}

// ---------- module ----------

pub struct Harness {
    pub lists: Arc<FakeLists>,
    pub likes: Arc<FakeLikes>,
    pub reviews: Arc<FakeReviews>,
    pub users: Arc<FakeUsers>,
    pub metadata: Arc<FakeMetadata>,
    pub prompt: Arc<RecordingPrompt>,
}

impl Harness {
    pub fn new(list: FilmList) -> Self {
        Self {
            lists: FakeLists::with_list(list),
            likes: FakeLikes::new(0),
            reviews: FakeReviews::with(Vec::new()),
            users: FakeUsers::with(Vec::new()),
            metadata: FakeMetadata::new(),
            prompt: RecordingPrompt::accepting(),
        }
    }

    pub fn module(&self) -> Flickbox {
        let ports = FlickboxPorts {
            lists: self.lists.clone(),
            likes: self.likes.clone(),
            reviews: self.reviews.clone(),
            users: self.users.clone(),
            metadata: self.metadata.clone(),
            prompt: self.prompt.clone(),
        };
        let config = FlickboxConfig {
            image_base_url: "https://image.test/w500".into(),
            placeholder_poster_url: "https://image.test/none.png".into(),
            ..FlickboxConfig::default()
        };
        Flickbox::new(ports, config)
    }
}

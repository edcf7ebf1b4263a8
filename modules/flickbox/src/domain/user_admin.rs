use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::contract::model::{NewUser, User, UserId, UserRole, UserStatus, UserUpdate};
use crate::domain::error::DomainError;
use crate::domain::filter::{filter_listing, Listing};
use crate::domain::ports::{UserGateway, UserPrompt};

pub const CONFIRM_DELETE_USER: &str = "Are you sure?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    Username,
    Email,
    Password,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
        }
    }
}

/// Per-field validation messages of the user form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<FormField, &'static str>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.0.iter().map(|(f, m)| (*f, *m))
    }

    fn insert(&mut self, field: FormField, message: &'static str) {
        self.0.insert(field, message);
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (_, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
            first = false;
        }
        Ok(())
    }
}

/// Add/edit form contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub age: Option<u32>,
    pub role: UserRole,
    pub status: UserStatus,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            phone: String::new(),
            password: String::new(),
            age: None,
            role: UserRole::User,
            status: UserStatus::Active,
        }
    }
}

impl UserForm {
    /// Edit form for an existing user. The password is always left blank.
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            password: String::new(),
            age: user.age,
            role: user.role,
            status: user.status,
        }
    }

    /// Password is only required when creating a user.
    pub fn validate(&self, editing: bool) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if self.username.trim().is_empty() {
            errors.insert(FormField::Username, "Username is required");
        }
        if self.email.trim().is_empty() {
            errors.insert(FormField::Email, "Email is required");
        }
        if !editing && self.password.trim().is_empty() {
            errors.insert(FormField::Password, "Password is required");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn phone(&self) -> Option<String> {
        Some(self.phone.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
    }

    fn into_new_user(self) -> NewUser {
        let phone = self.phone();
        NewUser {
            username: self.username,
            email: self.email,
            phone,
            password: self.password,
            age: self.age,
            role: self.role,
            status: self.status,
        }
    }

    fn into_update(self, id: UserId) -> UserUpdate {
        let phone = self.phone();
        let password = Some(self.password).filter(|p| !p.trim().is_empty());
        UserUpdate {
            id,
            username: self.username,
            email: self.email,
            phone,
            password,
            age: self.age,
            role: self.role,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOutcome {
    Applied,
    Cancelled,
    NotFound,
}

/// Confirmation text for a suspend toggle.
pub fn suspension_prompt(user: &User) -> String {
    let verb = match user.status.toggled_suspension() {
        UserStatus::Suspended => "Suspend",
        UserStatus::Active | UserStatus::Inactive => "Unsuspend",
    };
    format!("{verb} user: {}?", user.username)
}

#[derive(Default)]
struct AdminState {
    loading: bool,
    users: Vec<User>,
}

/// User management table. Every successful mutation refetches the whole collection.
pub struct UserAdmin {
    gateway: Arc<dyn UserGateway>,
    prompt: Arc<dyn UserPrompt>,
    state: Mutex<AdminState>,
}

impl UserAdmin {
    pub fn new(gateway: Arc<dyn UserGateway>, prompt: Arc<dyn UserPrompt>) -> Self {
        Self {
            gateway,
            prompt,
            state: Mutex::new(AdminState::default()),
        }
    }

    pub async fn load(&self) {
        self.refresh().await;
    }

    #[instrument(name = "flickbox.users.refresh", skip(self))]
    pub async fn refresh(&self) {
        self.state.lock().loading = true;
        let users = match self.gateway.list_users().await {
            Ok(users) => {
                debug!(count = users.len(), "Users loaded");
                users
            }
            Err(e) => {
                warn!(error = %e, "Fetching users failed");
                Vec::new()
            }
        };
        let mut s = self.state.lock();
        s.users = users;
        s.loading = false;
    }

    pub fn users(&self) -> Vec<User> {
        self.state.lock().users.clone()
    }

    pub fn find(&self, id: UserId) -> Option<User> {
        self.state.lock().users.iter().find(|u| u.id == id).cloned()
    }

    /// Users matching `term` across username, email and phone.
    pub fn listing(&self, term: &str) -> Listing<User> {
        let s = self.state.lock();
        filter_listing(&s.users, term, s.loading)
    }

    pub fn edit_form(&self, id: UserId) -> Option<UserForm> {
        self.find(id).as_ref().map(UserForm::from_user)
    }

    #[instrument(name = "flickbox.users.create", skip(self, form), fields(username = %form.username))]
    pub async fn create(&self, form: UserForm) -> Result<AdminOutcome, DomainError> {
        form.validate(false).map_err(DomainError::InvalidForm)?;
        let user = form.into_new_user();
        self.mutate("add user", self.gateway.create_user(&user))
            .await
    }

    #[instrument(name = "flickbox.users.update", skip(self, form), fields(user_id = %id))]
    pub async fn update(&self, id: UserId, form: UserForm) -> Result<AdminOutcome, DomainError> {
        form.validate(true).map_err(DomainError::InvalidForm)?;
        let update = form.into_update(id);
        self.mutate("update user", self.gateway.update_user(&update))
            .await
    }

    #[instrument(name = "flickbox.users.delete", skip(self), fields(user_id = %id))]
    pub async fn delete(&self, id: UserId) -> Result<AdminOutcome, DomainError> {
        if !self.prompt.confirm(CONFIRM_DELETE_USER) {
            return Ok(AdminOutcome::Cancelled);
        }
        self.mutate("delete user", self.gateway.delete_user(id))
            .await
    }

    /// Suspended users become active; everyone else becomes suspended.
    #[instrument(name = "flickbox.users.toggle_suspension", skip(self), fields(user_id = %id))]
    pub async fn toggle_suspension(&self, id: UserId) -> Result<AdminOutcome, DomainError> {
        let Some(user) = self.find(id) else {
            debug!("User not in the local list");
            return Ok(AdminOutcome::NotFound);
        };
        if !self.prompt.confirm(&suspension_prompt(&user)) {
            return Ok(AdminOutcome::Cancelled);
        }
        let update = UserUpdate::with_status(&user, user.status.toggled_suspension());
        self.mutate("update user status", self.gateway.update_user(&update))
            .await
    }

    async fn mutate<F>(&self, action: &str, request: F) -> Result<AdminOutcome, DomainError>
    where
        F: std::future::Future<Output = Result<(), DomainError>>,
    {
        if let Err(e) = request.await {
            warn!(error = %e, action, "User mutation failed");
            self.prompt.alert(&e.alert_message(action));
            return Err(e);
        }
        info!(action, "User mutation applied");
        self.refresh().await;
        Ok(AdminOutcome::Applied)
    }
}

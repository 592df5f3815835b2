//! Application state management
use agency_core::{Agency, Config, CoreError, Result, User};

/// The open store plus whoever is logged in for this invocation.
pub struct AppState {
    agency: Agency,
    user: Option<User>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let agency = Agency::new(config)?;
        Ok(Self { agency, user: None })
    }

    pub fn initialize(&self) -> Result<()> {
        self.agency.init()
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<&User> {
        let user = self.agency.login(email, password)?;
        Ok(self.user.insert(user))
    }

    /// The logged-in user, re-read from storage so edits made since login
    /// are visible.
    pub fn current_user(&self) -> Result<User> {
        let user = self
            .user
            .as_ref()
            .ok_or(agency_core::AccessError::InvalidCredentials)?;

        self.agency
            .refresh_user(user)
            .ok_or_else(|| CoreError::UserNotFound(user.id.clone()))
    }

    pub fn with_user<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Agency, &User) -> Result<T>,
    {
        let user = self.current_user()?;
        f(&self.agency, &user)
    }
}

//! User management commands
use serde::{Deserialize, Serialize};

use agency_core::{Result, User, UserDraft, UserRole};

use super::Render;
use crate::state::AppState;

/// A user as shown to operators. Passwords are never printed.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
        }
    }
}

impl Render for UserInfo {
    fn render(&self) -> String {
        format!(
            "{:<38} {:<9} {:<24} {:<28} {}",
            self.id,
            self.role.as_str(),
            self.name,
            self.email,
            self.phone.as_deref().unwrap_or("-")
        )
    }
}

pub fn list_users(state: &AppState) -> Result<Vec<UserInfo>> {
    state.with_user(|agency, actor| {
        actor.authorize(agency_core::Action::ManageUsers)?;
        Ok(agency.list_users().into_iter().map(UserInfo::from).collect())
    })
}

pub fn save_user(state: &AppState, draft: UserDraft) -> Result<UserInfo> {
    state.with_user(|agency, actor| Ok(agency.upsert_user_as(actor, draft)?.into()))
}

pub fn delete_user(state: &AppState, id: &str) -> Result<bool> {
    state.with_user(|agency, actor| agency.remove_user_as(actor, id))
}

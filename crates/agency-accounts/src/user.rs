//! User accounts

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agency_records::{Record, RecordError};

use crate::error::AccessError;

/// Password given to accounts created without one.
pub const DEFAULT_PASSWORD: &str = "password123";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Staff,
    Customer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Staff => "STAFF",
            UserRole::Customer => "CUSTOMER",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Ok(UserRole::Admin),
            "STAFF" => Ok(UserRole::Staff),
            "CUSTOMER" => Ok(UserRole::Customer),
            _ => Err(AccessError::UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique, never changes once assigned
    pub id: String,
    /// Login identifier. Uniqueness is up to the caller.
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl User {
    pub fn new(name: String, email: String, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            role,
            password: None,
            phone: None,
        }
    }

    /// Whether `customer_id` refers to this account. Surrounding whitespace
    /// on either side is ignored.
    pub fn owns(&self, customer_id: &str) -> bool {
        self.id.trim() == customer_id.trim()
    }

    /// Apply a self-service profile edit. A blank password keeps the
    /// current one.
    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        self.name = update.name;
        self.phone = non_blank(update.phone);
        if let Some(password) = non_blank(update.password) {
            self.password = Some(password);
        }
    }
}

impl Record for User {
    const COLLECTION: &'static str = "ss_users";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> agency_records::Result<()> {
        if self.name.trim().is_empty() {
            return Err(RecordError::invalid(self, "name cannot be empty"));
        }
        if self.email.trim().is_empty() {
            return Err(RecordError::invalid(self, "email cannot be empty"));
        }
        Ok(())
    }
}

/// Fields an administrator submits when creating or editing an account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDraft {
    /// `None` creates a new account
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub role: Option<UserRole>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

impl UserDraft {
    /// Build the record to save. `existing` is the stored account with the
    /// draft's id, if any.
    ///
    /// Password resolution: the draft's non-blank password, else the
    /// existing one, else [`DEFAULT_PASSWORD`]. An unset role or phone keeps
    /// the existing value; a blank phone clears it. New accounts default to
    /// customer.
    pub fn into_user(self, existing: Option<&User>) -> User {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let password = non_blank(self.password)
            .or_else(|| existing.and_then(|u| u.password.clone()))
            .unwrap_or_else(|| DEFAULT_PASSWORD.to_string());

        let role = self
            .role
            .or_else(|| existing.map(|u| u.role))
            .unwrap_or(UserRole::Customer);

        let phone = match self.phone {
            Some(phone) => non_blank(Some(phone)),
            None => existing.and_then(|u| u.phone.clone()),
        };

        User {
            id,
            email: self.email.trim().to_string(),
            name: self.name.trim().to_string(),
            role,
            password: Some(password),
            phone,
        }
    }
}

/// Self-service edit of one's own account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub phone: Option<String>,
    pub password: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

//! Access error types

use thiserror::Error;

use crate::access::Action;
use crate::user::UserRole;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AccessError {
    #[error("{role} accounts cannot {action}")]
    Forbidden { role: UserRole, action: Action },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account {0} is an administrator and cannot be deleted")]
    ProtectedAccount(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

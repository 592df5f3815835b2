//! Agency Accounts
//!
//! Roles and what they may do:
//! | Action              | Admin | Staff | Customer |
//! | View dashboard      | yes   | yes   | no       |
//! | Manage users        | yes   | no    | no       |
//! | Create/edit policy  | yes   | yes   | no       |
//! | Delete policy       | yes   | no    | no       |
//! | View all policies   | yes   | yes   | own only |
//! | Update own profile  | yes   | yes   | yes      |
//!
//! Passwords are plain demo strings compared by equality.

mod access;
mod auth;
mod error;
mod user;

pub use access::Action;
pub use auth::authenticate;
pub use error::AccessError;
pub use user::{ProfileUpdate, User, UserDraft, UserRole, DEFAULT_PASSWORD};

pub type Result<T> = std::result::Result<T, AccessError>;

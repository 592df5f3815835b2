//! Agency Core
//!
//! The store handle callers hold. Owns the database and both collections,
//! applies role rules, and pipes every policy read through the status
//! engine.

mod agency;
mod config;
mod error;
mod seed;
mod stats;

pub use agency::Agency;
pub use config::Config;
pub use error::CoreError;
pub use seed::{seed_policies, seed_users, SEED_FIXED_EXPIRY};
pub use stats::{CompanyCount, DashboardStats};

// Re-export domain types
pub use agency_accounts::{
    authenticate, AccessError, Action, ProfileUpdate, User, UserDraft, UserRole, DEFAULT_PASSWORD,
};
pub use agency_policy::{
    InsuranceCompany, Policy, PolicyDraft, PolicyError, PolicyFilter, PolicyStatus, StatusEngine,
};
pub use agency_records::{Record, RecordError, RecordStore};
pub use agency_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

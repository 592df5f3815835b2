//! Agency Policies
//!
//! A policy's status is never stored as truth. It is derived from the
//! expiry date every time a policy is read:
//! ```text
//! Active
//!   ↓ today reaches expiry - 30 days
//! ExpiringSoon
//!   ↓ today reaches expiry
//! Expired
//! ```
//! Editing the expiry date to a later day moves a policy back up.

mod error;
mod filter;
mod policy;
mod report;
mod status;

pub use error::PolicyError;
pub use filter::PolicyFilter;
pub use policy::{InsuranceCompany, Policy, PolicyDraft};
pub use report::{render_csv, report_file_name, REPORT_HEADER};
pub use status::{parse_expiry, PolicyStatus, StatusEngine, EXPIRING_SOON_DAYS};

pub type Result<T> = std::result::Result<T, PolicyError>;

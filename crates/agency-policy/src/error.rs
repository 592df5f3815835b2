//! Policy error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Invalid expiry date '{0}', expected YYYY-MM-DD")]
    InvalidExpiry(String),

    #[error("Unknown insurance company: {0}")]
    UnknownCompany(String),

    #[error("Unknown policy status: {0}")]
    UnknownStatus(String),
}

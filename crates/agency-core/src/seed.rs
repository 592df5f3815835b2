//! Demo dataset written on first start

use chrono::{DateTime, Days, Utc};

use agency_accounts::{User, UserRole};
use agency_policy::{InsuranceCompany, Policy, PolicyStatus};

/// Expiry of the seeded Star Health policy, far enough out to stay active.
pub const SEED_FIXED_EXPIRY: &str = "2099-02-15";

fn user(id: &str, email: &str, name: &str, role: UserRole, password: &str, phone: &str) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        role,
        password: Some(password.to_string()),
        phone: Some(phone.to_string()),
    }
}

pub fn seed_users() -> Vec<User> {
    vec![
        user("1", "admin@agency.com", "Agency Admin", UserRole::Admin, "admin123", "9876543210"),
        user("2", "staff@agency.com", "Office Staff", UserRole::Staff, "staff123", "9876543211"),
        user("3", "cust@gmail.com", "John Doe", UserRole::Customer, "cust123", "9876543212"),
    ]
}

/// Demo policies for a store seeded at `now`. The United India policy
/// expires 15 days later.
pub fn seed_policies(now: DateTime<Utc>) -> Vec<Policy> {
    let today = now.date_naive();
    let soon = today.checked_add_days(Days::new(15)).unwrap_or(today);

    vec![
        Policy {
            id: "p1".to_string(),
            policy_number: "UI-2024-001".to_string(),
            company: InsuranceCompany::UnitedIndia,
            insured_name: "John Doe".to_string(),
            customer_id: "3".to_string(),
            expiry_date: soon.format("%Y-%m-%d").to_string(),
            premium_amount: 12500.0,
            document_url: None,
            status: PolicyStatus::ExpiringSoon,
        },
        Policy {
            id: "p2".to_string(),
            policy_number: "SH-2024-992".to_string(),
            company: InsuranceCompany::StarHealth,
            insured_name: "Jane Doe".to_string(),
            customer_id: "3".to_string(),
            expiry_date: SEED_FIXED_EXPIRY.to_string(),
            premium_amount: 25000.0,
            document_url: None,
            status: PolicyStatus::Active,
        },
    ]
}

//! Policy lifecycle status
//!
//! Comparison is by calendar day. A policy lapses at the start of its
//! expiry date, so on the expiry day itself it already reads `Expired`.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::policy::Policy;

/// Days before expiry at which a policy starts reading `ExpiringSoon`.
pub const EXPIRING_SOON_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyStatus {
    #[serde(rename = "Active")]
    Active,
    #[serde(rename = "Expiring Soon")]
    ExpiringSoon,
    #[serde(rename = "Expired")]
    Expired,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Active => "Active",
            PolicyStatus::ExpiringSoon => "Expiring Soon",
            PolicyStatus::Expired => "Expired",
        }
    }
}

impl std::fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PolicyStatus {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "active" => Ok(PolicyStatus::Active),
            "expiringsoon" => Ok(PolicyStatus::ExpiringSoon),
            "expired" => Ok(PolicyStatus::Expired),
            _ => Err(PolicyError::UnknownStatus(s.to_string())),
        }
    }
}

/// Parse a stored `YYYY-MM-DD` expiry date.
pub fn parse_expiry(value: &str) -> Result<NaiveDate, PolicyError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| PolicyError::InvalidExpiry(value.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEngine {
    window_days: u32,
}

impl StatusEngine {
    pub fn new(window_days: u32) -> Self {
        Self { window_days }
    }

    /// Status of a policy expiring on `expiry`, as seen on `today`.
    pub fn status_on(&self, expiry: NaiveDate, today: NaiveDate) -> PolicyStatus {
        let horizon = today
            .checked_add_days(Days::new(u64::from(self.window_days)))
            .unwrap_or(NaiveDate::MAX);

        if expiry <= today {
            PolicyStatus::Expired
        } else if expiry <= horizon {
            PolicyStatus::ExpiringSoon
        } else {
            PolicyStatus::Active
        }
    }

    pub fn status(&self, expiry: NaiveDate, now: DateTime<Utc>) -> PolicyStatus {
        self.status_on(expiry, now.date_naive())
    }

    /// Status of a stored policy. An unparseable expiry reads as `Expired`.
    pub fn status_of(&self, policy: &Policy, now: DateTime<Utc>) -> PolicyStatus {
        match parse_expiry(&policy.expiry_date) {
            Ok(expiry) => self.status(expiry, now),
            Err(e) => {
                tracing::warn!(
                    policy_id = %policy.id,
                    error = %e,
                    "Stored policy has malformed expiry, reporting as expired"
                );
                PolicyStatus::Expired
            }
        }
    }

    /// Overwrite the stored status snapshot with the one derived for `now`.
    pub fn refresh(&self, mut policy: Policy, now: DateTime<Utc>) -> Policy {
        policy.status = self.status_of(&policy, now);
        policy
    }

    pub fn refresh_all(&self, policies: Vec<Policy>, now: DateTime<Utc>) -> Vec<Policy> {
        policies
            .into_iter()
            .map(|p| self.refresh(p, now))
            .collect()
    }
}

impl Default for StatusEngine {
    fn default() -> Self {
        Self::new(EXPIRING_SOON_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn days(n: i64) -> NaiveDate {
        today() + chrono::Duration::days(n)
    }

    #[test]
    fn test_status_boundaries() {
        let engine = StatusEngine::default();
        assert_eq!(engine.status_on(days(30), today()), PolicyStatus::ExpiringSoon);
        assert_eq!(engine.status_on(days(31), today()), PolicyStatus::Active);
        assert_eq!(engine.status_on(days(-1), today()), PolicyStatus::Expired);
        assert_eq!(engine.status_on(today(), today()), PolicyStatus::Expired);
        assert_eq!(engine.status_on(days(1), today()), PolicyStatus::ExpiringSoon);
    }

    #[test]
    fn test_status_uses_calendar_day_of_now() {
        let engine = StatusEngine::default();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 23, 59, 59).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(engine.status(days(30), late), PolicyStatus::ExpiringSoon);
        assert_eq!(engine.status(days(30), early), PolicyStatus::ExpiringSoon);
        assert_eq!(engine.status(today(), early), PolicyStatus::Expired);
    }

    #[test]
    fn test_time_moves_policy_through_states() {
        let engine = StatusEngine::default();
        let expiry = days(40);
        assert_eq!(engine.status_on(expiry, today()), PolicyStatus::Active);
        assert_eq!(engine.status_on(expiry, days(10)), PolicyStatus::ExpiringSoon);
        assert_eq!(engine.status_on(expiry, days(40)), PolicyStatus::Expired);
    }

    #[test]
    fn test_custom_window() {
        let engine = StatusEngine::new(7);
        assert_eq!(engine.status_on(days(7), today()), PolicyStatus::ExpiringSoon);
        assert_eq!(engine.status_on(days(8), today()), PolicyStatus::Active);
    }

    #[test]
    fn test_far_future_does_not_overflow() {
        let engine = StatusEngine::new(u32::MAX);
        assert_eq!(
            engine.status_on(NaiveDate::MAX, NaiveDate::MAX - chrono::Duration::days(1)),
            PolicyStatus::ExpiringSoon
        );
    }

    #[test]
    fn test_parse_expiry() {
        assert_eq!(parse_expiry("2024-06-01").unwrap(), today());
        assert!(matches!(
            parse_expiry("01/06/2024"),
            Err(PolicyError::InvalidExpiry(_))
        ));
        assert!(parse_expiry("2024-02-30").is_err());
        assert!(parse_expiry("").is_err());
    }

    #[test]
    fn test_status_parsing_and_display() {
        assert_eq!(
            "Expiring Soon".parse::<PolicyStatus>().unwrap(),
            PolicyStatus::ExpiringSoon
        );
        assert_eq!(
            "expiring-soon".parse::<PolicyStatus>().unwrap(),
            PolicyStatus::ExpiringSoon
        );
        assert_eq!("EXPIRED".parse::<PolicyStatus>().unwrap(), PolicyStatus::Expired);
        assert!("lapsed".parse::<PolicyStatus>().is_err());
        assert_eq!(PolicyStatus::ExpiringSoon.to_string(), "Expiring Soon");
    }
}

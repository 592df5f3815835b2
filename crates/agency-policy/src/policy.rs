//! Policy records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agency_records::{Record, RecordError};

use crate::error::PolicyError;
use crate::status::{parse_expiry, PolicyStatus, StatusEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsuranceCompany {
    #[serde(rename = "United India Insurance")]
    UnitedIndia,
    #[serde(rename = "Star Health Insurance")]
    StarHealth,
}

impl InsuranceCompany {
    pub const ALL: [InsuranceCompany; 2] =
        [InsuranceCompany::UnitedIndia, InsuranceCompany::StarHealth];

    pub fn as_str(&self) -> &'static str {
        match self {
            InsuranceCompany::UnitedIndia => "United India Insurance",
            InsuranceCompany::StarHealth => "Star Health Insurance",
        }
    }
}

impl std::fmt::Display for InsuranceCompany {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InsuranceCompany {
    type Err = PolicyError;

    /// Accepts the full name or a short form like `united-india` / `star`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower.starts_with("united") {
            Ok(InsuranceCompany::UnitedIndia)
        } else if lower.starts_with("star") {
            Ok(InsuranceCompany::StarHealth)
        } else {
            Err(PolicyError::UnknownCompany(s.to_string()))
        }
    }
}

fn placeholder_status() -> PolicyStatus {
    PolicyStatus::Active
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: String,
    /// Display and search key, not unique
    pub policy_number: String,
    pub company: InsuranceCompany,
    pub insured_name: String,
    /// Weak reference to a user id. May dangle.
    pub customer_id: String,
    /// `YYYY-MM-DD`
    pub expiry_date: String,
    pub premium_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    /// Snapshot of the last derived status. Read paths overwrite it; use
    /// [`Policy::status_at`] for the authoritative value.
    #[serde(default = "placeholder_status")]
    pub status: PolicyStatus,
}

impl Policy {
    pub fn expiry(&self) -> Result<NaiveDate, PolicyError> {
        parse_expiry(&self.expiry_date)
    }

    /// Status derived under `engine`'s expiring window. Ignores the stored
    /// snapshot.
    pub fn status_at(&self, engine: &StatusEngine, now: DateTime<Utc>) -> PolicyStatus {
        engine.status_of(self, now)
    }
}

impl Record for Policy {
    const COLLECTION: &'static str = "ss_policies";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> agency_records::Result<()> {
        if self.policy_number.trim().is_empty() {
            return Err(RecordError::invalid(self, "policy number cannot be empty"));
        }
        if self.insured_name.trim().is_empty() {
            return Err(RecordError::invalid(self, "insured name cannot be empty"));
        }
        if self.customer_id.trim().is_empty() {
            return Err(RecordError::invalid(self, "customer id cannot be empty"));
        }
        if !self.premium_amount.is_finite() || self.premium_amount < 0.0 {
            return Err(RecordError::invalid(
                self,
                format!("premium must be a non-negative amount, got {}", self.premium_amount),
            ));
        }
        if let Err(e) = self.expiry() {
            return Err(RecordError::invalid(self, e.to_string()));
        }
        Ok(())
    }
}

/// Fields submitted when creating or editing a policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDraft {
    /// `None` creates a new policy
    pub id: Option<String>,
    pub policy_number: String,
    pub company: InsuranceCompany,
    pub insured_name: String,
    pub customer_id: String,
    pub expiry_date: String,
    pub premium_amount: f64,
    pub document_url: Option<String>,
}

impl PolicyDraft {
    /// Build the record to save, with its status snapshot taken at `now`.
    pub fn into_policy(self, engine: &StatusEngine, now: DateTime<Utc>) -> Policy {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let policy = Policy {
            id,
            policy_number: self.policy_number.trim().to_string(),
            company: self.company,
            insured_name: self.insured_name.trim().to_string(),
            customer_id: self.customer_id.trim().to_string(),
            expiry_date: self.expiry_date.trim().to_string(),
            premium_amount: self.premium_amount,
            document_url: self.document_url.filter(|url| !url.trim().is_empty()),
            status: PolicyStatus::Active,
        };

        engine.refresh(policy, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn policy() -> Policy {
        Policy {
            id: "p1".into(),
            policy_number: "UI-2024-001".into(),
            company: InsuranceCompany::UnitedIndia,
            insured_name: "John Doe".into(),
            customer_id: "3".into(),
            expiry_date: "2024-06-16".into(),
            premium_amount: 12500.0,
            document_url: None,
            status: PolicyStatus::Active,
        }
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(policy()).unwrap();
        assert_eq!(json["policyNumber"], "UI-2024-001");
        assert_eq!(json["company"], "United India Insurance");
        assert_eq!(json["customerId"], "3");
        assert_eq!(json["expiryDate"], "2024-06-16");
        assert_eq!(json["premiumAmount"], 12500.0);
        assert_eq!(json["status"], "Active");
        assert!(json.get("documentUrl").is_none());
    }

    #[test]
    fn test_reads_record_without_status() {
        let json = r#"{"id":"x","policyNumber":"N","company":"Star Health Insurance",
            "insuredName":"Jane","customerId":"3","expiryDate":"2099-02-15",
            "premiumAmount":25000}"#;
        let policy: Policy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.company, InsuranceCompany::StarHealth);
        assert_eq!(policy.status, PolicyStatus::Active);
    }

    #[test]
    fn test_status_at_ignores_stored_status() {
        let mut p = policy();
        p.status = PolicyStatus::Active;
        let now = Utc.with_ymd_and_hms(2024, 6, 20, 9, 0, 0).unwrap();
        assert_eq!(p.status_at(&StatusEngine::default(), now), PolicyStatus::Expired);
    }

    #[test]
    fn test_status_at_follows_engine_window() {
        let p = policy();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        assert_eq!(
            p.status_at(&StatusEngine::default(), now),
            PolicyStatus::ExpiringSoon
        );
        assert_eq!(p.status_at(&StatusEngine::new(7), now), PolicyStatus::Active);
    }

    #[test]
    fn test_malformed_expiry_reads_expired() {
        let mut p = policy();
        p.expiry_date = "next tuesday".into();
        assert_eq!(
            p.status_at(&StatusEngine::default(), Utc::now()),
            PolicyStatus::Expired
        );
    }

    #[test]
    fn test_validation() {
        assert!(policy().validate().is_ok());

        let mut p = policy();
        p.premium_amount = -1.0;
        assert!(p.validate().is_err());

        let mut p = policy();
        p.premium_amount = f64::NAN;
        assert!(p.validate().is_err());

        let mut p = policy();
        p.expiry_date = "2024-13-01".into();
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("2024-13-01"));

        let mut p = policy();
        p.policy_number = " ".into();
        assert!(p.validate().is_err());

        let mut p = policy();
        p.premium_amount = 0.0;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_company_parsing() {
        assert_eq!(
            "United India Insurance".parse::<InsuranceCompany>().unwrap(),
            InsuranceCompany::UnitedIndia
        );
        assert_eq!("star".parse::<InsuranceCompany>().unwrap(), InsuranceCompany::StarHealth);
        assert!("acme".parse::<InsuranceCompany>().is_err());
    }

    #[test]
    fn test_draft_assigns_id_and_snapshot() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let draft = PolicyDraft {
            id: None,
            policy_number: " SH-1 ".into(),
            company: InsuranceCompany::StarHealth,
            insured_name: "Jane".into(),
            customer_id: "3".into(),
            expiry_date: "2024-06-10".into(),
            premium_amount: 100.0,
            document_url: Some("".into()),
        };
        let p = draft.into_policy(&StatusEngine::default(), now);
        assert!(!p.id.is_empty());
        assert_eq!(p.policy_number, "SH-1");
        assert_eq!(p.document_url, None);
        assert_eq!(p.status, PolicyStatus::ExpiringSoon);
    }
}

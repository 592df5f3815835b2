//! Dashboard figures

use serde::Serialize;

use agency_accounts::{User, UserRole};
use agency_policy::{InsuranceCompany, Policy, PolicyStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyCount {
    pub company: InsuranceCompany,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_policies: usize,
    pub total_premium: f64,
    /// In storage order
    pub expiring_soon: Vec<Policy>,
    pub expired_count: usize,
    pub by_company: Vec<CompanyCount>,
    pub customer_count: usize,
}

impl DashboardStats {
    /// `policies` must already carry their derived status.
    pub fn compute(policies: &[Policy], users: &[User]) -> Self {
        let by_company = InsuranceCompany::ALL
            .iter()
            .map(|&company| CompanyCount {
                company,
                count: policies.iter().filter(|p| p.company == company).count(),
            })
            .collect();

        Self {
            total_policies: policies.len(),
            total_premium: policies.iter().map(|p| p.premium_amount).sum(),
            expiring_soon: policies
                .iter()
                .filter(|p| p.status == PolicyStatus::ExpiringSoon)
                .cloned()
                .collect(),
            expired_count: policies
                .iter()
                .filter(|p| p.status == PolicyStatus::Expired)
                .count(),
            by_company,
            customer_count: users
                .iter()
                .filter(|u| u.role == UserRole::Customer)
                .count(),
        }
    }

    pub fn company_count(&self, company: InsuranceCompany) -> usize {
        self.by_company
            .iter()
            .find(|c| c.company == company)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{seed_policies, seed_users};
    use agency_policy::StatusEngine;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_seed_dashboard() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let policies = StatusEngine::default().refresh_all(seed_policies(now), now);
        let stats = DashboardStats::compute(&policies, &seed_users());

        assert_eq!(stats.total_policies, 2);
        assert_eq!(stats.total_premium, 37500.0);
        assert_eq!(stats.expiring_soon.len(), 1);
        assert_eq!(stats.expiring_soon[0].id, "p1");
        assert_eq!(stats.expired_count, 0);
        assert_eq!(stats.company_count(InsuranceCompany::UnitedIndia), 1);
        assert_eq!(stats.company_count(InsuranceCompany::StarHealth), 1);
        assert_eq!(stats.customer_count, 1);
    }

    #[test]
    fn test_empty_dashboard() {
        let stats = DashboardStats::compute(&[], &[]);
        assert_eq!(stats.total_policies, 0);
        assert_eq!(stats.total_premium, 0.0);
        assert!(stats.expiring_soon.is_empty());
        assert_eq!(stats.company_count(InsuranceCompany::StarHealth), 0);
    }
}

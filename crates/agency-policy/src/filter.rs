//! Policy search and filtering
//!
//! Every criterion is optional; an unset one matches everything. Filters
//! compare against the policy's current `status` field, so callers filter
//! policies that came through a read path.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::policy::{InsuranceCompany, Policy};
use crate::status::PolicyStatus;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyFilter {
    /// Case-insensitive substring of the policy number or insured name
    pub search: Option<String>,
    pub company: Option<InsuranceCompany>,
    pub status: Option<PolicyStatus>,
    /// Inclusive lower bound on the expiry date
    pub expiry_from: Option<NaiveDate>,
    /// Inclusive upper bound on the expiry date
    pub expiry_to: Option<NaiveDate>,
}

impl PolicyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then_some(term);
        self
    }

    pub fn company(mut self, company: InsuranceCompany) -> Self {
        self.company = Some(company);
        self
    }

    pub fn status(mut self, status: PolicyStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn expiring_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.expiry_from = from;
        self.expiry_to = to;
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, policy: &Policy) -> bool {
        self.matches_search(policy)
            && self.company.map_or(true, |c| policy.company == c)
            && self.status.map_or(true, |s| policy.status == s)
            && self.matches_dates(policy)
    }

    pub fn apply(&self, policies: &[Policy]) -> Vec<Policy> {
        policies
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect()
    }

    fn matches_search(&self, policy: &Policy) -> bool {
        match self.search.as_deref() {
            Some(term) => {
                let term = term.to_lowercase();
                policy.policy_number.to_lowercase().contains(&term)
                    || policy.insured_name.to_lowercase().contains(&term)
            }
            None => true,
        }
    }

    fn matches_dates(&self, policy: &Policy) -> bool {
        if self.expiry_from.is_none() && self.expiry_to.is_none() {
            return true;
        }

        // A malformed expiry never satisfies a date bound
        let Ok(expiry) = policy.expiry() else {
            return false;
        };

        self.expiry_from.map_or(true, |from| expiry >= from)
            && self.expiry_to.map_or(true, |to| expiry <= to)
    }
}

//! Policy commands
use chrono::Utc;
use serde::{Deserialize, Serialize};

use agency_core::{
    Action, Agency, InsuranceCompany, Policy, PolicyDraft, PolicyFilter, PolicyStatus, Result,
};

use super::Render;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct PolicyInfo {
    pub id: String,
    pub policy_number: String,
    pub company: InsuranceCompany,
    pub insured_name: String,
    pub customer_id: String,
    /// `None` when the customer id matches no user
    pub customer_name: Option<String>,
    pub expiry_date: String,
    pub premium_amount: f64,
    pub document_url: Option<String>,
    pub status: PolicyStatus,
}

impl PolicyInfo {
    fn new(agency: &Agency, policy: Policy) -> Self {
        let customer_name = agency.customer_for(&policy).map(|u| u.name);
        Self {
            id: policy.id,
            policy_number: policy.policy_number,
            company: policy.company,
            insured_name: policy.insured_name,
            customer_id: policy.customer_id,
            customer_name,
            expiry_date: policy.expiry_date,
            premium_amount: policy.premium_amount,
            document_url: policy.document_url,
            status: policy.status,
        }
    }
}

impl Render for PolicyInfo {
    fn render(&self) -> String {
        format!(
            "{:<38} {:<14} {:<23} {:<20} {:<20} {:<10} {:>10.2} {}",
            self.id,
            self.policy_number,
            self.company.as_str(),
            self.insured_name,
            self.customer_name.as_deref().unwrap_or("(unknown customer)"),
            self.expiry_date,
            self.premium_amount,
            self.status
        )
    }
}

pub fn list_policies(state: &AppState, filter: &PolicyFilter) -> Result<Vec<PolicyInfo>> {
    state.with_user(|agency, viewer| {
        Ok(agency
            .search_policies_at(viewer, filter, Utc::now())
            .into_iter()
            .map(|p| PolicyInfo::new(agency, p))
            .collect())
    })
}

pub fn save_policy(state: &AppState, draft: PolicyDraft) -> Result<PolicyInfo> {
    state.with_user(|agency, actor| {
        let policy = agency.upsert_policy_as(actor, draft)?;
        Ok(PolicyInfo::new(agency, policy))
    })
}

pub fn delete_policy(state: &AppState, id: &str) -> Result<bool> {
    state.with_user(|agency, actor| agency.remove_policy_as(actor, id))
}

pub fn orphaned_policies(state: &AppState) -> Result<Vec<PolicyInfo>> {
    state.with_user(|agency, actor| {
        actor.authorize(Action::ViewAllPolicies)?;
        Ok(agency
            .orphaned_policies()
            .into_iter()
            .map(|p| PolicyInfo::new(agency, p))
            .collect())
    })
}

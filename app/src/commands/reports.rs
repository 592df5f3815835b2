//! Dashboard and report commands
use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};

use agency_core::{DashboardStats, Result};

use super::Render;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardInfo {
    #[serde(flatten)]
    pub stats: DashboardStats,
}

impl Render for DashboardInfo {
    fn render(&self) -> String {
        let stats = &self.stats;
        let mut lines = vec![
            format!("Total policies:   {}", stats.total_policies),
            format!("Total premium:    {:.2}", stats.total_premium),
            format!("Expiring soon:    {}", stats.expiring_soon.len()),
            format!("Expired:          {}", stats.expired_count),
        ];
        for company in &stats.by_company {
            lines.push(format!("{:<24}{}", format!("{}:", company.company), company.count));
        }
        lines.push(format!("Customers:        {}", stats.customer_count));

        for policy in &stats.expiring_soon {
            lines.push(format!(
                "  ! {} {} expires {}",
                policy.policy_number, policy.insured_name, policy.expiry_date
            ));
        }

        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct ReportInfo {
    pub path: PathBuf,
    pub rows: usize,
}

impl Render for ReportInfo {
    fn render(&self) -> String {
        format!("Wrote {} policies to {}", self.rows, self.path.display())
    }
}

pub fn dashboard(state: &AppState) -> Result<DashboardInfo> {
    state.with_user(|agency, viewer| {
        Ok(DashboardInfo {
            stats: agency.dashboard_at(viewer, Utc::now())?,
        })
    })
}

/// Write the policy report. `out` may be a file or a directory; the
/// default is the dated file name in the working directory.
pub fn write_report(state: &AppState, out: Option<&Path>) -> Result<ReportInfo> {
    state.with_user(|agency, viewer| {
        let (file_name, csv) = agency.policy_report_at(viewer, Utc::now())?;

        let path = match out {
            Some(dir) if dir.is_dir() => dir.join(&file_name),
            Some(file) => file.to_path_buf(),
            None => PathBuf::from(&file_name),
        };
        std::fs::write(&path, &csv)?;

        let rows = csv.lines().count().saturating_sub(1);
        tracing::info!(path = %path.display(), rows, "Wrote policy report");

        Ok(ReportInfo { path, rows })
    })
}
